//! Juror Voting use case
//!
//! The juror-facing side of a round: fetch the next open vote, rate it, and
//! summarize how far each juror has got.

use crate::ports::allocation_logger::{AllocationEvent, AllocationLogger, NoAllocationLogger};
use crate::ports::vote_store::{StoreError, VoteStore};
use crate::use_cases::shared::{RoundLocks, load_snapshot};
use montage_domain::allocation::juror_counts;
use montage_domain::{AllocationError, JurorId, Rating, RoundId, Vote, VoteId};
use serde::Serialize;
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur during juror voting
#[derive(Error, Debug)]
pub enum JurorVotingError {
    #[error(transparent)]
    Allocation(#[from] AllocationError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Per-juror progress
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct JurorProgress {
    pub open: usize,
    pub total: usize,
}

impl JurorProgress {
    pub fn completed(&self) -> usize {
        self.total - self.open
    }
}

/// Snapshot of a round's voting progress
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoundStatus {
    pub round: RoundId,
    pub name: String,
    pub quorum: u32,
    pub version: u64,
    pub entry_count: usize,
    pub active_votes: usize,
    pub cancelled_votes: usize,
    pub jurors: BTreeMap<JurorId, JurorProgress>,
}

impl RoundStatus {
    pub fn open_votes(&self) -> usize {
        self.jurors.values().map(|p| p.open).sum()
    }

    /// True once every active vote has a rating
    pub fn is_complete(&self) -> bool {
        self.active_votes > 0 && self.open_votes() == 0
    }
}

/// Use case for juror actions on a round
pub struct JurorVotingUseCase<S: VoteStore + 'static> {
    store: Arc<S>,
    locks: RoundLocks,
    logger: Arc<dyn AllocationLogger>,
}

impl<S: VoteStore + 'static> JurorVotingUseCase<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            locks: RoundLocks::new(),
            logger: Arc::new(NoAllocationLogger),
        }
    }

    pub fn with_locks(mut self, locks: RoundLocks) -> Self {
        self.locks = locks;
        self
    }

    pub fn with_logger(mut self, logger: Arc<dyn AllocationLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// The juror's earliest open vote, in creation order
    pub async fn next_vote(
        &self,
        round: RoundId,
        juror: &JurorId,
    ) -> Result<Option<Vote>, JurorVotingError> {
        let mut votes = self.store.load_votes(round).await?;
        votes.sort_by_key(|v| v.id);
        let next = votes
            .into_iter()
            .find(|v| v.is_open() && v.is_held_by(juror));
        debug!(
            "Next vote for {} in {}: {:?}",
            juror,
            round,
            next.as_ref().map(|v| v.id)
        );
        Ok(next)
    }

    /// Record a rating on one of the juror's open votes
    pub async fn submit_rating(
        &self,
        round: RoundId,
        vote: VoteId,
        juror: &JurorId,
        value: u8,
    ) -> Result<Vote, JurorVotingError> {
        let rating = Rating::new(value)?;
        let _guard = self.locks.acquire(round).await;

        let rated = self.store.submit_rating(round, vote, juror, rating).await?;
        info!("{} rated {} on {} as {}", juror, rated.entry, vote, rating.value());
        self.logger.log(AllocationEvent::new(
            "rating_submitted",
            round,
            json!({
                "vote": vote,
                "entry": rated.entry,
                "juror": juror,
                "rating": rating,
            }),
        ));
        Ok(rated)
    }

    pub async fn round_status(&self, round: RoundId) -> Result<RoundStatus, JurorVotingError> {
        let snapshot = load_snapshot::<_, JurorVotingError>(self.store.as_ref(), round).await?;
        let (open, total) = juror_counts(snapshot.votes.votes());

        let jurors = total
            .into_iter()
            .map(|(juror, total)| {
                let open = open.get(&juror).copied().unwrap_or(0);
                (juror, JurorProgress { open, total })
            })
            .collect();
        let active_votes = snapshot.votes.active().count();

        Ok(RoundStatus {
            round: snapshot.round.id,
            name: snapshot.round.name.clone(),
            quorum: snapshot.round.quorum,
            version: snapshot.round.version,
            entry_count: snapshot.pool.len(),
            active_votes,
            cancelled_votes: snapshot.votes.len() - active_votes,
            jurors,
        })
    }
}
