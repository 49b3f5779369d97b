use thiserror::Error;

/// 各構造の事前条件違反
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("cannot build a segment tree over an empty sequence")]
    Empty,
    #[error("index {index} is out of bounds for length {len}")]
    IndexOutOfBounds { index: usize, len: usize },
    #[error("range end {end} is out of bounds for length {len}")]
    RangeOutOfBounds { end: usize, len: usize },
    #[error("range start {start} is greater than range end {end}")]
    ReversedRange { start: usize, end: usize },
    #[error("invalid bracket {found:?} at position {position}")]
    InvalidBracket { position: usize, found: char },
    #[error("length {len} is not a power of two")]
    NotPowerOfTwo { len: usize },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
