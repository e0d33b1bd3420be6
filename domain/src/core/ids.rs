//! Identifier value objects
//!
//! Rounds, entries and votes are keyed by integers handed out by the store.
//! Jurors are keyed by their (wiki) username.

use serde::{Deserialize, Serialize};

/// Identifier of a judging round
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoundId(pub u64);

/// Identifier of an entry within a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(pub u64);

/// Identifier of a vote
///
/// Vote ids are handed out monotonically, so ordering by id is ordering by
/// creation. The allocation relies on this to keep its canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VoteId(pub u64);

/// Identity of a juror
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JurorId(String);

impl JurorId {
    /// Creates a JurorId from a username.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<T: Into<String>> From<T> for JurorId {
    fn from(s: T) -> Self {
        Self::new(s)
    }
}

macro_rules! display_numeric_id {
    ($($name:ident => $prefix:literal),* $(,)?) => {
        $(
            impl std::fmt::Display for $name {
                fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    write!(f, "{}{}", $prefix, self.0)
                }
            }
        )*
    };
}

display_numeric_id!(RoundId => "round#", EntryId => "entry#", VoteId => "vote#");

impl std::fmt::Display for JurorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
