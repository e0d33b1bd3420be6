//! Vote storage port
//!
//! Defines the interface the allocation use cases need from persistence.
//! Adapters (in-memory, JSON snapshot, a database) live in the
//! infrastructure layer.

use async_trait::async_trait;
use montage_domain::{Entry, JurorId, Rating, Round, RoundId, Vote, VoteChangeset, VoteId};
use thiserror::Error;

/// Errors raised by storage adapters
///
/// The use cases pass these through unchanged; retrying is up to the caller.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Round not found: {0}")]
    RoundNotFound(RoundId),

    #[error("Vote not found: {0}")]
    VoteNotFound(VoteId),

    #[error("Conflict on {round}: expected version {expected}, found {actual}")]
    Conflict {
        round: RoundId,
        expected: u64,
        actual: u64,
    },

    #[error("{vote} is not open for {juror}")]
    VoteNotOpen { vote: VoteId, juror: JurorId },

    #[error("{0} already has votes; its entries are frozen")]
    RoundStarted(RoundId),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl StoreError {
    /// Whether the operation lost a race and may succeed on a fresh read
    pub fn is_conflict(&self) -> bool {
        matches!(self, StoreError::Conflict { .. })
    }
}

/// Port for loading and mutating a round's votes
///
/// # Atomicity
///
/// [`apply_changeset`](VoteStore::apply_changeset) must apply every part of
/// a changeset (new votes, cancellations, rebindings, quorum and shuffle
/// order) as one unit, and only if the round's version still equals
/// `changeset.expected_version`. Readers must never observe half of it.
///
/// [`submit_rating`](VoteStore::submit_rating) is a conditional update: it
/// succeeds only for an active, unrated vote held by the given juror.
#[async_trait]
pub trait VoteStore: Send + Sync {
    /// Load a round
    async fn load_round(&self, round: RoundId) -> Result<Round, StoreError>;

    /// Load the round's entries, ordered by id
    async fn load_entries(&self, round: RoundId) -> Result<Vec<Entry>, StoreError>;

    /// Load every vote of the round, ordered by id (creation order)
    async fn load_votes(&self, round: RoundId) -> Result<Vec<Vote>, StoreError>;

    /// Apply a reconciliation atomically, returning the updated round
    async fn apply_changeset(&self, changeset: &VoteChangeset) -> Result<Round, StoreError>;

    /// Record a juror's rating on one of their open votes
    async fn submit_rating(
        &self,
        round: RoundId,
        vote: VoteId,
        juror: &JurorId,
        rating: Rating,
    ) -> Result<Vote, StoreError>;
}
