use super::error::Result;
use super::segmenttree::SegmentTree;
use super::sum::Sum;

/// 転倒数(`i < j`かつ`values[i] > values[j]`となる組の数)を数える.
///
/// 座標圧縮した値ごとの出現回数をSegmentTreeで管理し,
/// 先頭から順に自身を取り除いてから自身より小さい値の個数を足していく.
///
/// # Errors
///
/// 圧縮後の値は必ず木の範囲内に収まるので, 実際には失敗しない.
///
/// # Time complexity
///
/// - *O*(*n* log *n*)
pub fn count_inversions<T: Ord>(values: &[T]) -> Result<u64> {
    if values.is_empty() {
        return Ok(0);
    }
    let mut sorted = values.iter().collect::<Vec<_>>();
    sorted.sort_unstable();
    sorted.dedup();
    let ranks = values
        .iter()
        .map(|v| sorted.partition_point(|&s| s < v))
        .collect::<Vec<_>>();

    let mut freq = vec![0u64; sorted.len()];
    for &r in &ranks {
        freq[r] += 1;
    }
    let mut seg = SegmentTree::from_vec(Sum::new(), freq)?;

    let mut count = 0;
    for &r in &ranks {
        seg.apply(r, |c| c - 1)?;
        if r > 0 {
            count += seg.query(0, r - 1)?;
        }
    }
    tracing::trace!(len = values.len(), count, "inversions counted");
    Ok(count)
}
