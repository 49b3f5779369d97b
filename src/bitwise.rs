use super::error::{Error, Result};
use super::segmenttree::{LevelMonoid, SegmentTree};

/// ビット演算の種類
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BitOp {
    Or,
    Xor,
}

impl BitOp {
    #[must_use]
    pub fn apply(self, lhs: u64, rhs: u64) -> u64 {
        match self {
            Self::Or => lhs | rhs,
            Self::Xor => lhs ^ rhs,
        }
    }

    #[must_use]
    pub fn flip(self) -> Self {
        match self {
            Self::Or => Self::Xor,
            Self::Xor => Self::Or,
        }
    }
}

/// 深さの偶奇でORとXORを交互に使う合成
///
/// 深さが偶数のノードでは`root`, 奇数のノードではもう一方の演算を使う.
/// 0はどちらの演算でも単位元である.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AlternatingBits {
    pub root: BitOp,
}

impl AlternatingBits {
    /// 高さ`height`の完全二分木で, 葉の一つ上の段がORになるように根の演算を決める.
    #[must_use]
    pub fn for_height(height: u32) -> Self {
        let root = if height % 2 == 1 { BitOp::Or } else { BitOp::Xor };
        Self { root }
    }

    #[must_use]
    pub fn op_at_depth(&self, depth: usize) -> BitOp {
        if depth % 2 == 0 {
            self.root
        } else {
            self.root.flip()
        }
    }
}

impl LevelMonoid for AlternatingBits {
    type T = u64;

    fn e(&self) -> u64 {
        0
    }

    fn op_at(&self, depth: usize, lhs: &u64, rhs: &u64) -> u64 {
        self.op_at_depth(depth).apply(*lhs, *rhs)
    }
}

/// 長さ2^k の列に, 下の段から順にOR, XOR, OR, ... を交互に掛けた値を管理する
pub struct AlternatingTree(SegmentTree<AlternatingBits>);

impl AlternatingTree {
    /// 列`values`から構築する.
    ///
    /// # Errors
    ///
    /// - `values`が空なら`Error::Empty`
    /// - 長さが2冪でないなら`Error::NotPowerOfTwo`
    ///
    /// # Time complexity
    ///
    /// - *O*(*n*)
    pub fn new(values: Vec<u64>) -> Result<Self> {
        let len = values.len();
        if len == 0 {
            return Err(Error::Empty);
        }
        if !len.is_power_of_two() {
            return Err(Error::NotPowerOfTwo { len });
        }
        let bits = AlternatingBits::for_height(len.trailing_zeros());
        Ok(Self(SegmentTree::from_vec(bits, values)?))
    }

    #[must_use]
    pub fn root_op(&self) -> BitOp {
        self.0.monoid().root
    }

    #[must_use]
    pub fn value(&self) -> u64 {
        *self.0.all_prod()
    }

    /// `index`番目の値を`value`に変え, 新しい根の値を返す.
    ///
    /// # Errors
    ///
    /// - `index`が列の長さ以上なら`Error::IndexOutOfBounds`
    ///
    /// # Time complexity
    ///
    /// - *O*(log *n*)
    pub fn set(&mut self, index: usize, value: u64) -> Result<u64> {
        self.0.set(index, value)?;
        Ok(self.value())
    }
}
