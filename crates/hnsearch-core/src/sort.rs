//! Client-side ordering of the displayed hits

use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;
use crate::hit::SearchHit;

/// Ordering strategy selectable from a column header
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortKey {
    /// Arrival order
    #[default]
    None,
    /// Ascending by title
    Title,
    /// Ascending by author
    Author,
    /// Descending by comment count
    Comments,
    /// Descending by points
    Points,
}

impl SortKey {
    pub const ALL: [SortKey; 5] = [
        SortKey::None,
        SortKey::Title,
        SortKey::Author,
        SortKey::Comments,
        SortKey::Points,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::None => "NONE",
            SortKey::Title => "TITLE",
            SortKey::Author => "AUTHOR",
            SortKey::Comments => "COMMENTS",
            SortKey::Points => "POINTS",
        }
    }

    /// Order `hits` by this strategy without reversing
    ///
    /// String keys compare byte-wise, so uppercase sorts before lowercase.
    /// Numeric keys are a stable ascending sort that is then reversed, which
    /// puts ties in reverse arrival order.
    pub fn apply<'a>(&self, hits: &'a [SearchHit]) -> Vec<&'a SearchHit> {
        let mut ordered: Vec<&SearchHit> = hits.iter().collect();
        match self {
            SortKey::None => {}
            SortKey::Title => ordered.sort_by(|a, b| a.title.cmp(&b.title)),
            SortKey::Author => ordered.sort_by(|a, b| a.author.cmp(&b.author)),
            SortKey::Comments => {
                ordered.sort_by_key(|hit| hit.num_comments);
                ordered.reverse();
            }
            SortKey::Points => {
                ordered.sort_by_key(|hit| hit.points);
                ordered.reverse();
            }
        }
        ordered
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortKey::ALL
            .into_iter()
            .find(|key| key.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CoreError::UnknownSortKey(s.to_string()))
    }
}

/// Order `hits` by `key`, reversing the result when `reverse` is set
pub fn sort_hits<'a>(key: SortKey, reverse: bool, hits: &'a [SearchHit]) -> Vec<&'a SearchHit> {
    let mut ordered = key.apply(hits);
    if reverse {
        ordered.reverse();
    }
    ordered
}

/// Active column and direction of the result table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SortState {
    pub key: SortKey,
    pub reversed: bool,
}

impl SortState {
    /// Select a column: the active one toggles direction, any other resets it
    pub fn select(&mut self, key: SortKey) {
        self.reversed = self.key == key && !self.reversed;
        self.key = key;
    }

    pub fn apply<'a>(&self, hits: &'a [SearchHit]) -> Vec<&'a SearchHit> {
        sort_hits(self.key, self.reversed, hits)
    }

    pub fn is_active(&self, key: SortKey) -> bool {
        self.key == key
    }
}
