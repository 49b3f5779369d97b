use super::error::{Error, Result};
use super::segmenttree::SegmentTree;
use super::util::{Associativity, Identity, Magma};

/// 括弧列の区間の要約
///
/// - `open`: 対応の取れていない`(`の数
/// - `close`: 対応の取れていない`)`の数
/// - `full`: 対応の取れた括弧の組の数
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Brackets {
    pub open: usize,
    pub close: usize,
    pub full: usize,
}

impl Brackets {
    pub const OPEN: Self = Self {
        open: 1,
        close: 0,
        full: 0,
    };
    pub const CLOSE: Self = Self {
        open: 0,
        close: 1,
        full: 0,
    };

    /// `position`番目の文字`c`を葉の値に変換する.
    ///
    /// # Errors
    ///
    /// - `c`が括弧でないなら`Error::InvalidBracket`
    pub fn from_char(position: usize, c: char) -> Result<Self> {
        match c {
            '(' => Ok(Self::OPEN),
            ')' => Ok(Self::CLOSE),
            found => Err(Error::InvalidBracket { position, found }),
        }
    }
}

/// 括弧の対応を取るモノイド. 左の`(`と右の`)`を対応させるので可換でない
#[derive(Clone, Copy, Debug, Default)]
pub struct BracketMatching;

impl Magma for BracketMatching {
    type T = Brackets;
    fn op(&self, lhs: &Brackets, rhs: &Brackets) -> Brackets {
        let matched = lhs.open.min(rhs.close);
        Brackets {
            open: lhs.open + rhs.open - matched,
            close: lhs.close + rhs.close - matched,
            full: lhs.full + rhs.full + matched,
        }
    }
}

impl Identity for BracketMatching {
    fn e(&self) -> Brackets {
        Brackets::default()
    }
}

impl Associativity for BracketMatching {}

/// 括弧列の部分列として取れる正しい括弧列の最長の長さを求める構造
pub struct BracketSequence(SegmentTree<BracketMatching>);

impl BracketSequence {
    /// 括弧列`s`を読み込む.
    ///
    /// # Errors
    ///
    /// - `s`が空なら`Error::Empty`
    /// - 括弧以外の文字があれば`Error::InvalidBracket`
    ///
    /// # Time complexity
    ///
    /// - *O*(*n*)
    pub fn parse(s: &str) -> Result<Self> {
        let leaves = s
            .chars()
            .enumerate()
            .map(|(i, c)| Brackets::from_char(i, c))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self(SegmentTree::from_vec(BracketMatching, leaves)?))
    }

    fn len(&self) -> usize {
        self.0.len()
    }

    /// 閉区間`[l, r]`(1-indexed)の区間の要約を返す.
    ///
    /// # Errors
    ///
    /// - `l == 0`または`r > self.len()`なら`Error::RangeOutOfBounds`
    /// - `l > r`なら`Error::ReversedRange`
    pub fn summary(&self, l: usize, r: usize) -> Result<Brackets> {
        if l == 0 {
            return Err(Error::RangeOutOfBounds {
                end: 0,
                len: self.len(),
            });
        }
        if l > r {
            return Err(Error::ReversedRange { start: l, end: r });
        }
        if r > self.len() {
            return Err(Error::RangeOutOfBounds {
                end: r,
                len: self.len(),
            });
        }
        self.0.query(l - 1, r - 1)
    }

    /// 閉区間`[l, r]`(1-indexed)の部分列として取れる正しい括弧列の最長の長さ
    ///
    /// # Time complexity
    ///
    /// - *O*(log *n*)
    pub fn longest_regular(&self, l: usize, r: usize) -> Result<usize> {
        Ok(self.summary(l, r)?.full * 2)
    }

    /// `index`番目(0-indexed)の括弧を`c`に変える.
    pub fn set(&mut self, index: usize, c: char) -> Result<()> {
        let leaf = Brackets::from_char(index, c)?;
        self.0.set(index, leaf)
    }

    /// `index`番目(0-indexed)の括弧の向きを反転する.
    ///
    /// # Time complexity
    ///
    /// - *O*(log *n*)
    pub fn toggle(&mut self, index: usize) -> Result<()> {
        self.0.apply(index, |b| {
            if *b == Brackets::OPEN {
                Brackets::CLOSE
            } else {
                Brackets::OPEN
            }
        })
    }
}

impl std::fmt::Display for BracketSequence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for b in self.0.leaves() {
            f.write_str(if *b == Brackets::OPEN { "(" } else { ")" })?;
        }
        Ok(())
    }
}
