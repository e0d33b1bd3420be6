//! Round and entry entities

use crate::core::ids::{EntryId, RoundId};
use serde::{Deserialize, Serialize};

/// An item under judgment in a round
///
/// Entries never move between rounds once the round has started.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: EntryId,
    pub round: RoundId,
    /// Display name (usually the file name of the photo)
    pub name: String,
}

impl Entry {
    pub fn new(id: EntryId, round: RoundId, name: impl Into<String>) -> Self {
        Self {
            id,
            round,
            name: name.into(),
        }
    }
}

/// A judging round
///
/// `quorum` is the number of active votes every entry currently requires.
/// `shuffle_order` is the permutation of entries fixed by the first
/// allocation; it stays empty until then. `version` is bumped by every
/// mutation of the round's votes and serves as the compare-and-swap token
/// for reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Round {
    pub id: RoundId,
    pub name: String,
    pub quorum: u32,
    #[serde(default)]
    pub shuffle_order: Vec<EntryId>,
    #[serde(default)]
    pub version: u64,
}

impl Round {
    /// Create a round that has not been allocated yet
    pub fn new(id: RoundId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            quorum: 0,
            shuffle_order: Vec::new(),
            version: 0,
        }
    }

    /// Whether the shuffle order has been fixed
    pub fn is_shuffled(&self) -> bool {
        !self.shuffle_order.is_empty()
    }
}
