//! Shared utilities for use cases.
//!
//! Contains the round-scoped lock registry and the snapshot loader used by
//! both the allocator and the juror voting flow.

use crate::ports::vote_store::{StoreError, VoteStore};
use montage_domain::{AllocationError, EntryPool, Round, RoundId, VoteAssignmentStore};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::OwnedMutexGuard;

/// Registry of per-round async locks
///
/// Cloning shares the registry. Allocators for the same round that share a
/// registry never reconcile concurrently; the store's version check still
/// catches writers that do not.
#[derive(Clone, Default)]
pub struct RoundLocks {
    locks: Arc<Mutex<HashMap<RoundId, Arc<tokio::sync::Mutex<()>>>>>,
}

impl RoundLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `round`
    pub async fn acquire(&self, round: RoundId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
            Arc::clone(locks.entry(round).or_default())
        };
        lock.lock_owned().await
    }
}

/// A consistent-enough read of one round
///
/// The three loads are separate calls; the round version read first is what
/// a later changeset is checked against, so any write in between surfaces
/// as a conflict rather than a lost update.
pub(crate) struct RoundSnapshot {
    pub round: Round,
    pub pool: EntryPool,
    pub votes: VoteAssignmentStore,
}

pub(crate) async fn load_snapshot<S, E>(store: &S, round: RoundId) -> Result<RoundSnapshot, E>
where
    S: VoteStore + ?Sized,
    E: From<StoreError> + From<AllocationError>,
{
    let round = store.load_round(round).await?;
    let entries = store.load_entries(round.id).await?;
    let votes = store.load_votes(round.id).await?;
    Ok(RoundSnapshot {
        pool: EntryPool::new(entries)?,
        votes: VoteAssignmentStore::new(votes),
        round,
    })
}
