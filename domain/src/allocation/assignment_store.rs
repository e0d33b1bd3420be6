//! Ordered view over the persisted votes of a round

use super::vote::Vote;
use crate::core::error::AllocationError;
use crate::core::ids::{EntryId, VoteId};
use crate::round::EntryPool;

/// The votes of one round in creation order
///
/// Built from whatever the store returned; the constructor sorts by id so
/// the creation order is canonical regardless of how the rows came back.
#[derive(Debug, Clone, Default)]
pub struct VoteAssignmentStore {
    votes: Vec<Vote>,
}

impl VoteAssignmentStore {
    pub fn new(mut votes: Vec<Vote>) -> Self {
        votes.sort_by_key(|v| v.id);
        Self { votes }
    }

    pub fn votes(&self) -> &[Vote] {
        &self.votes
    }

    pub fn into_votes(self) -> Vec<Vote> {
        self.votes
    }

    pub fn len(&self) -> usize {
        self.votes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.votes.is_empty()
    }

    pub fn active(&self) -> impl Iterator<Item = &Vote> {
        self.votes.iter().filter(|v| v.is_active())
    }

    /// Highest vote id in the store
    pub fn max_id(&self) -> Option<VoteId> {
        self.votes.last().map(|v| v.id)
    }

    /// Number of creation passes recorded in the store
    pub fn slot_count(&self) -> u32 {
        self.votes.iter().map(|v| v.slot + 1).max().unwrap_or(0)
    }

    /// Active votes per entry, indexed by the entry's pool position
    pub fn active_counts(&self, pool: &EntryPool) -> Vec<u32> {
        let mut counts = vec![0; pool.len()];
        for vote in self.active() {
            if let Some(pos) = pool.position(vote.entry) {
                counts[pos] += 1;
            }
        }
        counts
    }

    /// Recover the shuffle order from the first pass of votes
    ///
    /// Only needed for rounds allocated before the order was persisted on
    /// the round itself.
    pub fn recover_shuffle_order(&self, pool: &EntryPool) -> Result<Vec<EntryId>, AllocationError> {
        let order: Vec<EntryId> = self
            .votes
            .iter()
            .take(pool.len())
            .map(|v| v.entry)
            .collect();
        pool.validate_order(&order)?;
        Ok(order)
    }

    /// Check the stored votes against the round's invariants
    ///
    /// Every allocation pass creates one vote per entry, so the total is a
    /// multiple of the entry count. Cancelled votes stay in the store, which
    /// is why the per-entry check looks at active votes only.
    pub fn check_integrity(&self, pool: &EntryPool, old_quorum: u32) -> Result<(), AllocationError> {
        if self.votes.is_empty() {
            return Ok(());
        }
        if pool.is_empty() {
            return Err(AllocationError::DataIntegrity(format!(
                "round has {} votes but no entries",
                self.votes.len()
            )));
        }
        if old_quorum == 0 {
            return Err(AllocationError::DataIntegrity(format!(
                "round has {} votes but a quorum of 0",
                self.votes.len()
            )));
        }
        if let Some(stray) = self.votes.iter().find(|v| !pool.contains(v.entry)) {
            return Err(AllocationError::DataIntegrity(format!(
                "{} references {} which is not part of the round",
                stray.id, stray.entry
            )));
        }
        if self.votes.len() % pool.len() != 0 {
            return Err(AllocationError::DataIntegrity(format!(
                "{} votes are not evenly divisible by {} entries",
                self.votes.len(),
                pool.len()
            )));
        }

        let expected_active = pool.len() * old_quorum as usize;
        let active = self.active().count();
        if active != expected_active {
            return Err(AllocationError::DataIntegrity(format!(
                "expected {} active votes ({} entries x quorum {}), found {}",
                expected_active,
                pool.len(),
                old_quorum,
                active
            )));
        }

        let counts = self.active_counts(pool);
        if let Some((pos, count)) = counts.iter().enumerate().find(|(_, c)| **c != old_quorum) {
            return Err(AllocationError::DataIntegrity(format!(
                "{} has {} active votes, expected {}",
                pool.entries()[pos].id,
                count,
                old_quorum
            )));
        }
        Ok(())
    }
}
