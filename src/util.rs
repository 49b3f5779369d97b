/// 「0」に相当する値が存在することを表すトレイト
pub trait HasZero {
    /// 0の値を返す
    fn zero() -> Self;
}

/// 整数型にHasZeroを実装するマクロ
macro_rules! impl_zero {
    ($($t: ty),*) => {$(
        impl HasZero for $t {
            fn zero() -> $t { 0 }
        }
    )*};
}

impl_zero! { u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize }

/// マグマ. 二項演算で閉じている代数構造
pub trait Magma {
    /// マグマの元の型
    type T: Eq;
    /// 二項演算
    fn op(&self, lhs: &Self::T, rhs: &Self::T) -> Self::T;
}

/// マグマに単位元があることを表すトレイト
pub trait Identity: Magma<T: Clone> {
    /// 単位元を構築して返す
    fn e(&self) -> Self::T;
}

/// マグマが結合律が成り立つことを表すトレイト
pub trait Associativity: Magma {}

/// モノイド. 結合律と単位元を持つマグマ
///
/// 交換則は仮定しない. `op`の左右を入れ替えてはならない.
pub trait Monoid: Associativity + Identity {}
impl<T: Associativity + Identity> Monoid for T {}
