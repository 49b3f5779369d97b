pub mod bitwise;
pub mod brackets;
pub mod error;
pub mod inversions;
pub mod segmenttree;
pub mod sum;
pub mod util;

pub use error::{Error, Result};
pub use segmenttree::{LevelMonoid, SegmentTree};
