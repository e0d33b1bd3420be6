//! The delta produced by a reconciliation

use crate::core::ids::{EntryId, JurorId, RoundId, VoteId};
use serde::{Deserialize, Serialize};

/// A vote the store has to insert
///
/// New votes carry no id; the store hands ids out in the order the votes
/// appear in [`VoteChangeset::created`], which keeps creation order canonical.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewVote {
    pub entry: EntryId,
    pub slot: u32,
    pub juror: JurorId,
}

/// An existing open vote that moves to another juror
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rebinding {
    pub vote: VoteId,
    pub from: Option<JurorId>,
    pub to: JurorId,
}

/// Everything a store must apply, atomically, to complete a reconciliation
///
/// `expected_version` is the round version the reconciliation was computed
/// against; stores reject the changeset if the round has moved on since.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteChangeset {
    pub round: RoundId,
    pub expected_version: u64,
    pub old_quorum: u32,
    pub new_quorum: u32,
    /// Set when the shuffle order has to be (re)persisted on the round
    pub shuffle_order: Option<Vec<EntryId>>,
    pub created: Vec<NewVote>,
    pub cancelled: Vec<VoteId>,
    pub rebound: Vec<Rebinding>,
}

impl VoteChangeset {
    pub fn new(round: RoundId, expected_version: u64, old_quorum: u32, new_quorum: u32) -> Self {
        Self {
            round,
            expected_version,
            old_quorum,
            new_quorum,
            shuffle_order: None,
            created: Vec::new(),
            cancelled: Vec::new(),
            rebound: Vec::new(),
        }
    }

    /// True when applying the changeset would not change anything
    pub fn is_empty(&self) -> bool {
        self.old_quorum == self.new_quorum
            && self.shuffle_order.is_none()
            && self.created.is_empty()
            && self.cancelled.is_empty()
            && self.rebound.is_empty()
    }

    /// One-line description for logs
    pub fn summary(&self) -> String {
        format!(
            "{}: quorum {} -> {}, {} created, {} cancelled, {} rebound",
            self.round,
            self.old_quorum,
            self.new_quorum,
            self.created.len(),
            self.cancelled.len(),
            self.rebound.len()
        )
    }
}
