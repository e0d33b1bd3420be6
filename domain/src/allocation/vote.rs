//! Vote types for round allocation
//!
//! A vote is the obligation of one juror to rate one entry. Votes are never
//! deleted; retiring one flips its status to [`VoteStatus::Cancelled`].

use crate::core::error::AllocationError;
use crate::core::ids::{EntryId, JurorId, VoteId};
use serde::{Deserialize, Serialize};

/// Lifecycle status of a vote
///
/// Only `Active` votes count toward an entry's quorum. `Cancelled` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum VoteStatus {
    #[default]
    Active,
    Cancelled,
}

impl VoteStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VoteStatus::Active => "active",
            VoteStatus::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for VoteStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A juror's score for an entry, on a 1 to 5 scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(value: u8) -> Result<Self, AllocationError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(AllocationError::InvalidRating(value))
        }
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Rating {
    type Error = AllocationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

/// A single (entry, slot) assignment within a round
///
/// `slot` is the index of the allocation pass that created the vote; every
/// pass creates exactly one vote per entry, in shuffle order.
///
/// # Example
///
/// ```
/// use montage_domain::allocation::{Rating, Vote};
/// use montage_domain::core::ids::{EntryId, JurorId, VoteId};
///
/// let mut vote = Vote::new(VoteId(1), EntryId(10), 0).bound_to(JurorId::new("Yarl"));
/// assert!(vote.is_open());
///
/// vote.rating = Some(Rating::new(4).unwrap());
/// assert!(vote.is_completed());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    pub id: VoteId,
    pub entry: EntryId,
    pub slot: u32,
    pub juror: Option<JurorId>,
    pub status: VoteStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<Rating>,
}

impl Vote {
    /// Create a new, unbound, active vote
    pub fn new(id: VoteId, entry: EntryId, slot: u32) -> Self {
        Self {
            id,
            entry,
            slot,
            juror: None,
            status: VoteStatus::Active,
            rating: None,
        }
    }

    /// Bind the vote to a juror
    pub fn bound_to(mut self, juror: JurorId) -> Self {
        self.juror = Some(juror);
        self
    }

    pub fn is_active(&self) -> bool {
        self.status == VoteStatus::Active
    }

    /// Active and not yet rated
    pub fn is_open(&self) -> bool {
        self.is_active() && self.rating.is_none()
    }

    /// Active and rated
    pub fn is_completed(&self) -> bool {
        self.is_active() && self.rating.is_some()
    }

    pub fn is_held_by(&self, juror: &JurorId) -> bool {
        self.juror.as_ref() == Some(juror)
    }
}
