use std::ops::{Bound, RangeBounds};

use super::error::{Error, Result};
use super::util::{Identity, Magma, Monoid};

/// ノードの深さに応じて合成方法を変えられるモノイド
///
/// `op_at`の`depth`は合成結果を格納するノードの深さ(根が0)である.
/// 全ての`Monoid`は深さを無視する`LevelMonoid`として扱える.
pub trait LevelMonoid {
    type T: Clone;

    fn e(&self) -> Self::T;
    fn op_at(&self, depth: usize, lhs: &Self::T, rhs: &Self::T) -> Self::T;
}

impl<M: Monoid> LevelMonoid for M
where
    M::T: Clone,
{
    type T = M::T;

    fn e(&self) -> M::T {
        Identity::e(self)
    }

    fn op_at(&self, _depth: usize, lhs: &M::T, rhs: &M::T) -> M::T {
        self.op(lhs, rhs)
    }
}

/// 点更新・区間取得のセグメントツリー
///
/// ノード`t`の子は`2t + 1`と`2t + 2`で, 区間`[low, high]`は
/// `mid = (low + high) / 2`で`[low, mid]`と`[mid + 1, high]`に分割される.
/// 記憶領域は構築時に`4n`要素確保し, 以降は確保しない.
#[derive(Clone)]
pub struct SegmentTree<M: LevelMonoid>(Box<[M::T]>, usize, M);

impl<M: LevelMonoid> SegmentTree<M> {
    /// 配列`vec`からSegmentTreeを構築する.
    ///
    /// # Errors
    ///
    /// - `vec`が空なら`Error::Empty`
    ///
    /// # Time complexity
    ///
    /// - *O*(*n*)
    pub fn from_vec(monoid: M, vec: Vec<M::T>) -> Result<Self> {
        let n = vec.len();
        if n == 0 {
            tracing::debug!("rejected build over an empty sequence");
            return Err(Error::Empty);
        }
        let mut seg = Self(
            (0..4 * n).map(|_| monoid.e()).collect(),
            n,
            monoid,
        );
        seg.build(0, 0, n - 1, 0, &vec);
        tracing::trace!(len = n, slots = seg.0.len(), "segment tree built");
        Ok(seg)
    }

    fn build(&mut self, t: usize, low: usize, high: usize, depth: usize, leaves: &[M::T]) {
        if low == high {
            self.0[t] = leaves[low].clone();
            return;
        }
        let mid = (low + high) / 2;
        self.build(2 * t + 1, low, mid, depth + 1, leaves);
        self.build(2 * t + 2, mid + 1, high, depth + 1, leaves);
        self.pull(t, depth);
    }

    fn pull(&mut self, t: usize, depth: usize) {
        self.0[t] = self.2.op_at(depth, &self.0[2 * t + 1], &self.0[2 * t + 2]);
    }

    /// SegmentTreeの長さを返す.
    ///
    /// # Time complexity
    ///
    /// - *O*(1)
    #[must_use]
    pub fn len(&self) -> usize {
        self.1
    }

    /// SegmentTreeが空かどうか調べる. 構築に成功した木は常に空でない.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.1 == 0
    }

    #[must_use]
    pub fn monoid(&self) -> &M {
        &self.2
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.len() {
            Ok(())
        } else {
            tracing::debug!(index, len = self.len(), "rejected out-of-bounds index");
            Err(Error::IndexOutOfBounds {
                index,
                len: self.len(),
            })
        }
    }

    /// SegmentTreeの`index`番目の値を取得する.
    ///
    /// # Errors
    ///
    /// - `index >= self.len()`なら`Error::IndexOutOfBounds`
    ///
    /// # Time complexity
    ///
    /// - *O*(log *n*)
    pub fn get(&self, index: usize) -> Result<&M::T> {
        self.check_index(index)?;
        let (mut t, mut low, mut high) = (0, 0, self.len() - 1);
        while low != high {
            let mid = (low + high) / 2;
            if index <= mid {
                t = 2 * t + 1;
                high = mid;
            } else {
                t = 2 * t + 2;
                low = mid + 1;
            }
        }
        Ok(&self.0[t])
    }

    /// SegmentTreeの`index`番目の値を`value`に設定する.
    ///
    /// # Errors
    ///
    /// - `index >= self.len()`なら`Error::IndexOutOfBounds`
    ///
    /// # Time complexity
    ///
    /// - *O*(log *n*)
    pub fn set(&mut self, index: usize, value: M::T) -> Result<()> {
        self.apply(index, |_| value)
    }

    /// SegmentTreeの`index`番目の値`x`を`f(x)`に置き換える.
    ///
    /// 加算による更新は`apply(index, |x| x + d)`と書ける.
    ///
    /// # Errors
    ///
    /// - `index >= self.len()`なら`Error::IndexOutOfBounds`
    ///
    /// # Time complexity
    ///
    /// - *O*(log *n*)
    pub fn apply(&mut self, index: usize, f: impl FnOnce(&M::T) -> M::T) -> Result<()> {
        self.check_index(index)?;
        let depth = self.update(0, 0, self.len() - 1, 0, index, f);
        tracing::trace!(index, depth, "point update");
        Ok(())
    }

    /// 葉まで降りて更新し, 祖先を再計算する. 葉の深さを返す.
    fn update(
        &mut self,
        t: usize,
        low: usize,
        high: usize,
        depth: usize,
        index: usize,
        f: impl FnOnce(&M::T) -> M::T,
    ) -> usize {
        if low == high {
            self.0[t] = f(&self.0[t]);
            return depth;
        }
        let mid = (low + high) / 2;
        let leaf = if index <= mid {
            self.update(2 * t + 1, low, mid, depth + 1, index, f)
        } else {
            self.update(2 * t + 2, mid + 1, high, depth + 1, index, f)
        };
        self.pull(t, depth);
        leaf
    }

    /// 閉区間`[l, r]`の要素の総積を計算する.
    ///
    /// 左側の結果が常に`op_at`の左オペランドになるので, 可換でないモノイドでもよい.
    ///
    /// # Errors
    ///
    /// - `l > r`なら`Error::ReversedRange`
    /// - `r >= self.len()`なら`Error::RangeOutOfBounds`
    ///
    /// # Time complexity
    ///
    /// - *O*(log *n*)
    pub fn query(&self, l: usize, r: usize) -> Result<M::T> {
        if l > r {
            tracing::debug!(l, r, "rejected reversed range");
            return Err(Error::ReversedRange { start: l, end: r });
        }
        if r >= self.len() {
            tracing::debug!(r, len = self.len(), "rejected out-of-bounds range");
            return Err(Error::RangeOutOfBounds {
                end: r,
                len: self.len(),
            });
        }
        Ok(self.fold(0, 0, self.len() - 1, 0, l, r))
    }

    fn fold(&self, t: usize, low: usize, high: usize, depth: usize, l: usize, r: usize) -> M::T {
        // 重ならない
        if r < low || high < l {
            return self.2.e();
        }
        // 完全に含まれる
        if l <= low && high <= r {
            return self.0[t].clone();
        }
        let mid = (low + high) / 2;
        let left = self.fold(2 * t + 1, low, mid, depth + 1, l, r);
        let right = self.fold(2 * t + 2, mid + 1, high, depth + 1, l, r);
        self.2.op_at(depth, &left, &right)
    }

    /// SegmentTreeの`range`の範囲の要素の総積を計算する. 空の区間では単位元を返す.
    ///
    /// # Errors
    ///
    /// - `range`が`0..self.len()`に含まれないなら`Error::RangeOutOfBounds`
    /// - 始点が終点より後ろなら`Error::ReversedRange`
    ///
    /// # Time complexity
    ///
    /// - *O*(log *n*)
    pub fn prod(&self, range: impl RangeBounds<usize>) -> Result<M::T> {
        let past = |i: usize| {
            i.checked_add(1).ok_or(Error::RangeOutOfBounds {
                end: i,
                len: self.len(),
            })
        };
        let start = match range.start_bound() {
            Bound::Included(&i) => i,
            Bound::Excluded(&i) => past(i)?,
            Bound::Unbounded => 0,
        };
        let end = match range.end_bound() {
            Bound::Included(&i) => past(i)?,
            Bound::Excluded(&i) => i,
            Bound::Unbounded => self.len(),
        };
        if end > self.len() {
            return Err(Error::RangeOutOfBounds {
                end: end - 1,
                len: self.len(),
            });
        }
        if start > end {
            return Err(Error::ReversedRange { start, end });
        }
        if start == end {
            return Ok(self.2.e());
        }
        self.query(start, end - 1)
    }

    /// 全体の総積(根の値)を返す.
    ///
    /// # Time complexity
    ///
    /// - *O*(1)
    #[must_use]
    pub fn all_prod(&self) -> &M::T {
        &self.0[0]
    }

    /// 葉の値を先頭から順に返すイテレータ
    pub fn leaves(&self) -> impl Iterator<Item = &M::T> + '_ {
        let mut stack = vec![(0, 0, self.len() - 1)];
        std::iter::from_fn(move || {
            while let Some((t, low, high)) = stack.pop() {
                if low == high {
                    return Some(&self.0[t]);
                }
                let mid = (low + high) / 2;
                stack.push((2 * t + 2, mid + 1, high));
                stack.push((2 * t + 1, low, mid));
            }
            None
        })
    }
}

impl<M: LevelMonoid> std::ops::Index<usize> for SegmentTree<M> {
    type Output = M::T;

    fn index(&self, index: usize) -> &M::T {
        match self.get(index) {
            Ok(v) => v,
            Err(e) => panic!("{e}"),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::util::{Associativity, HasZero};
    use proptest::prelude::*;

    /// 全ての内部ノードが子の合成と一致しているか調べる
    pub(crate) fn consistent<M: LevelMonoid>(seg: &SegmentTree<M>) -> bool
    where
        M::T: PartialEq,
    {
        fn walk<M: LevelMonoid>(
            seg: &SegmentTree<M>,
            t: usize,
            low: usize,
            high: usize,
            depth: usize,
        ) -> bool
        where
            M::T: PartialEq,
        {
            if low == high {
                return true;
            }
            let mid = (low + high) / 2;
            walk(seg, 2 * t + 1, low, mid, depth + 1)
                && walk(seg, 2 * t + 2, mid + 1, high, depth + 1)
                && seg.0[t] == seg.2.op_at(depth, &seg.0[2 * t + 1], &seg.0[2 * t + 2])
        }
        walk(seg, 0, 0, seg.len() - 1, 0)
    }

    struct SumMonoid;
    impl Magma for SumMonoid {
        type T = i32;
        fn op(&self, a: &i32, b: &i32) -> i32 {
            a + b
        }
    }
    impl Associativity for SumMonoid {}
    impl Identity for SumMonoid {
        fn e(&self) -> i32 {
            i32::zero()
        }
    }

    /// 文字列の連結. 可換でない
    struct Concat;
    impl Magma for Concat {
        type T = String;
        fn op(&self, a: &String, b: &String) -> String {
            format!("{a}{b}")
        }
    }
    impl Associativity for Concat {}
    impl Identity for Concat {
        fn e(&self) -> String {
            String::new()
        }
    }

    #[test]
    fn sum() {
        let mut seg = SegmentTree::from_vec(SumMonoid, vec![3, 1, 4, 1, 5, 9, 2, 6, 5, 3]).unwrap();

        assert_eq!(seg.prod(0..3), Ok(8));
        assert_eq!(seg.prod(1..8), Ok(28));
        assert_eq!(seg.prod(..), Ok(39));
        assert_eq!(seg.prod(4..4), Ok(0));
        assert_eq!(seg.query(2, 2), Ok(4));
        assert_eq!(*seg.all_prod(), 39);

        seg.set(4, -100).unwrap();

        assert_eq!(seg.prod(0..3), Ok(8));
        assert_eq!(seg.prod(1..8), Ok(-77));
        assert_eq!(seg.prod(..), Ok(-66));
        assert_eq!(seg.query(4, 4), Ok(-100));
        assert_eq!(seg[4], -100);

        seg.apply(0, |x| x + 10).unwrap();
        assert_eq!(*seg.all_prod(), -56);
        assert!(consistent(&seg));
    }

    #[test]
    fn single_leaf() {
        let mut seg = SegmentTree::from_vec(SumMonoid, vec![7]).unwrap();
        assert_eq!(seg.query(0, 0), Ok(7));
        seg.set(0, 2).unwrap();
        assert_eq!(*seg.all_prod(), 2);
        assert_eq!(seg.leaves().copied().collect::<Vec<_>>(), vec![2]);
    }

    #[test]
    fn order_is_kept() {
        let words = ["a", "b", "c", "d", "e", "f", "g"].map(String::from).to_vec();
        let mut seg = SegmentTree::from_vec(Concat, words).unwrap();
        assert_eq!(seg.query(0, 6).unwrap(), "abcdefg");
        assert_eq!(seg.query(2, 5).unwrap(), "cdef");
        seg.set(3, "X".to_string()).unwrap();
        assert_eq!(seg.query(1, 4).unwrap(), "bcXe");
        assert_eq!(seg.leaves().cloned().collect::<String>(), "abcXefg");
    }

    #[test]
    fn preconditions() {
        assert_eq!(
            SegmentTree::from_vec(SumMonoid, vec![]).err(),
            Some(Error::Empty)
        );

        let mut seg = SegmentTree::from_vec(SumMonoid, vec![1, 2, 3]).unwrap();
        assert_eq!(
            seg.set(3, 0),
            Err(Error::IndexOutOfBounds { index: 3, len: 3 })
        );
        assert_eq!(
            seg.get(5),
            Err(Error::IndexOutOfBounds { index: 5, len: 3 })
        );
        assert_eq!(
            seg.query(2, 1),
            Err(Error::ReversedRange { start: 2, end: 1 })
        );
        assert_eq!(
            seg.query(0, 3),
            Err(Error::RangeOutOfBounds { end: 3, len: 3 })
        );
        assert_eq!(
            seg.prod(0..4),
            Err(Error::RangeOutOfBounds { end: 3, len: 3 })
        );
        assert_eq!(
            seg.prod(0..=usize::MAX),
            Err(Error::RangeOutOfBounds {
                end: usize::MAX,
                len: 3
            })
        );
        assert_eq!(
            seg.prod((Bound::Excluded(usize::MAX), Bound::Unbounded)),
            Err(Error::RangeOutOfBounds {
                end: usize::MAX,
                len: 3
            })
        );
        // 失敗した操作は木を壊さない
        assert_eq!(*seg.all_prod(), 6);
        assert!(consistent(&seg));
    }

    #[test]
    #[should_panic(expected = "index 3 is out of bounds for length 3")]
    fn index_panics() {
        let seg = SegmentTree::from_vec(SumMonoid, vec![1, 2, 3]).unwrap();
        let _v = seg[3];
    }

    fn updates() -> impl Strategy<Value = (Vec<i32>, Vec<(usize, i32)>)> {
        prop::collection::vec(-1000i32..1000, 1..64).prop_flat_map(|v| {
            let n = v.len();
            (
                Just(v),
                prop::collection::vec((0..n, -1000i32..1000), 0..32),
            )
        })
    }

    proptest! {
        #[test]
        fn matches_naive_after_updates((mut v, ops) in updates()) {
            let mut seg = SegmentTree::from_vec(SumMonoid, v.clone()).unwrap();
            prop_assert_eq!(*seg.all_prod(), v.iter().sum::<i32>());
            for (i, x) in ops {
                seg.set(i, x).unwrap();
                v[i] = x;
                prop_assert!(consistent(&seg));
            }
            for l in 0..v.len() {
                for r in l..v.len() {
                    prop_assert_eq!(seg.query(l, r).unwrap(), v[l..=r].iter().sum::<i32>());
                }
                prop_assert_eq!(*seg.get(l).unwrap(), v[l]);
            }
            prop_assert_eq!(seg.leaves().copied().collect::<Vec<_>>(), v);
        }

        #[test]
        fn query_decomposes(words in prop::collection::vec("[a-z]{0,3}", 2..40), cut in any::<prop::sample::Index>()) {
            let n = words.len();
            let seg = SegmentTree::from_vec(Concat, words).unwrap();
            let m = cut.index(n - 1);
            for l in 0..=m {
                for r in m + 1..n {
                    let joined = Concat.op(&seg.query(l, m).unwrap(), &seg.query(m + 1, r).unwrap());
                    prop_assert_eq!(joined, seg.query(l, r).unwrap());
                }
            }
        }
    }
}
