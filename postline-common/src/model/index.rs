use std::{
    fmt::{Display, Formatter},
    num::ParseIntError,
    str::FromStr,
};
use thiserror::Error;

/// Zero-based position of a post in the collection.
///
/// Positions are not stable: deleting a post shifts every later post down by
/// one. Negative values parse successfully but never address a post.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash)]
pub struct PostIndex(i64);

#[derive(Clone, Eq, PartialEq, Debug, Error)]
#[error("Index could not be converted to integer")]
pub struct InvalidPostIndexError(#[from] ParseIntError);

impl PostIndex {
    #[must_use]
    pub fn new(index: i64) -> Self {
        Self(index)
    }

    #[must_use]
    pub fn get(self) -> i64 {
        self.0
    }

    /// The slice position this index addresses in a collection of `len` posts.
    #[must_use]
    pub fn position(self, len: usize) -> Option<usize> {
        usize::try_from(self.0).ok().filter(|&position| position < len)
    }
}

impl FromStr for PostIndex {
    type Err = InvalidPostIndexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

impl Display for PostIndex {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl From<i64> for PostIndex {
    fn from(value: i64) -> Self {
        Self::new(value)
    }
}

impl From<PostIndex> for i64 {
    fn from(value: PostIndex) -> Self {
        value.get()
    }
}
