use std::marker::PhantomData;
use std::ops::Add;

use super::util::{Associativity, HasZero, Identity, Magma};

/// 加法のモノイド. 単位元は0で, 可換である
pub struct Sum<T>(PhantomData<fn() -> T>);

impl<T> Sum<T> {
    #[must_use]
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> Default for Sum<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Sum<T> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<T: Copy + Eq + Add<Output = T>> Magma for Sum<T> {
    type T = T;
    fn op(&self, lhs: &T, rhs: &T) -> T {
        *lhs + *rhs
    }
}

impl<T: Copy + Eq + Add<Output = T> + HasZero> Identity for Sum<T> {
    fn e(&self) -> T {
        T::zero()
    }
}

impl<T: Copy + Eq + Add<Output = T>> Associativity for Sum<T> {}
