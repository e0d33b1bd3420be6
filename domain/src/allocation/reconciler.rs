//! Quorum reconciliation
//!
//! Brings a round's votes in line with a (possibly new) quorum and juror
//! weight map:
//!
//! ```text
//! no votes yet     → shuffle entries once, create `quorum` passes
//! quorum increased → create `delta` passes in the persisted shuffle order
//! quorum decreased → retire `|delta|` votes per entry from discard jurors
//! always           → rebind freed open votes to jurors per the weight map
//! ```
//!
//! The shuffle order is drawn once and then persisted on the round. Every
//! later pass replays it, so slot `k` of every entry is created in the same
//! relative order as slot 0.

use super::assignment_store::VoteAssignmentStore;
use super::binding::assign_votes;
use super::changeset::{NewVote, Rebinding, VoteChangeset};
use super::plan::AllocationPlan;
use super::strategy::DiscardStrategy;
use super::vote::{Vote, VoteStatus};
use super::weight_map::JurorWeightMap;
use crate::core::error::AllocationError;
use crate::core::ids::{EntryId, JurorId, VoteId};
use crate::round::{EntryPool, Round};
use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::BTreeSet;

/// A validated reconciliation request
///
/// Construction enforces the request-level invariants so that nothing is
/// read from or written to a store for a malformed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuorumReconciler {
    weights: JurorWeightMap,
    quorum: u32,
    discard_jurors: BTreeSet<JurorId>,
    strategy: DiscardStrategy,
}

/// The outcome of a reconciliation: the delta to apply and the resulting votes
#[derive(Debug, Clone)]
pub struct Reconciliation {
    pub changeset: VoteChangeset,
    pub plan: AllocationPlan,
    /// Votes after the reconciliation; new votes carry provisional ids
    pub votes: Vec<Vote>,
    pub shuffle_order: Vec<EntryId>,
}

impl QuorumReconciler {
    pub fn new(
        weights: JurorWeightMap,
        quorum: u32,
        discard_jurors: BTreeSet<JurorId>,
        strategy: DiscardStrategy,
    ) -> Result<Self, AllocationError> {
        if quorum == 0 {
            return Err(AllocationError::Configuration(
                "quorum must be at least 1".to_string(),
            ));
        }
        weights.ensure_quorum(quorum)?;
        if let Some(juror) = discard_jurors.iter().find(|j| weights.contains(j)) {
            return Err(AllocationError::Configuration(format!(
                "juror {} is listed for discard but still has weight {}",
                juror,
                weights.weight(juror)
            )));
        }
        Ok(Self {
            weights,
            quorum,
            discard_jurors,
            strategy,
        })
    }

    pub fn quorum(&self) -> u32 {
        self.quorum
    }

    pub fn weights(&self) -> &JurorWeightMap {
        &self.weights
    }

    pub fn discard_jurors(&self) -> &BTreeSet<JurorId> {
        &self.discard_jurors
    }

    pub fn strategy(&self) -> DiscardStrategy {
        self.strategy
    }

    /// Compute the reconciliation of `round` without touching any store
    pub fn reconcile<R: Rng + ?Sized>(
        &self,
        round: &Round,
        pool: &EntryPool,
        store: &VoteAssignmentStore,
        rng: &mut R,
    ) -> Result<Reconciliation, AllocationError> {
        let old_quorum = round.quorum;
        let new_quorum = self.quorum;
        store.check_integrity(pool, old_quorum)?;

        let mut changeset = VoteChangeset::new(round.id, round.version, old_quorum, new_quorum);
        let mut votes = store.votes().to_vec();

        let shuffle_order = if store.is_empty() {
            let order = pool.shuffled_ids(rng);
            for slot in 0..new_quorum {
                push_pass(&mut votes, &order, slot);
            }
            if !order.is_empty() {
                changeset.shuffle_order = Some(order.clone());
            }
            order
        } else {
            let order = self.established_order(round, pool, store, &mut changeset)?;
            let delta = new_quorum as i64 - old_quorum as i64;
            if delta > 0 {
                let first_slot = store.slot_count();
                for slot in first_slot..first_slot + delta as u32 {
                    push_pass(&mut votes, &order, slot);
                }
            } else if delta < 0 {
                let retired = self.retire(pool, &mut votes, delta.unsigned_abs() as usize, rng)?;
                changeset.cancelled = retired;
            }
            order
        };

        assign_votes(pool, &self.weights, &self.discard_jurors, &mut votes)?;

        let existing = store.len();
        for (before, after) in store.votes().iter().zip(&votes) {
            if after.is_active()
                && before.juror != after.juror
                && let Some(to) = after.juror.clone()
            {
                changeset.rebound.push(Rebinding {
                    vote: after.id,
                    from: before.juror.clone(),
                    to,
                });
            }
        }
        for vote in &votes[existing..] {
            let juror = vote.juror.clone().ok_or_else(|| {
                AllocationError::DataIntegrity(format!("new vote for {} left unbound", vote.entry))
            })?;
            changeset.created.push(NewVote {
                entry: vote.entry,
                slot: vote.slot,
                juror,
            });
        }

        let plan = AllocationPlan::from_outcome(pool, store.votes(), &votes, &changeset);
        Ok(Reconciliation {
            changeset,
            plan,
            votes,
            shuffle_order,
        })
    }

    /// The shuffle order of an allocated round
    ///
    /// Rounds allocated before the order lived on the round get it recovered
    /// from their first pass of votes, and the changeset persists it.
    fn established_order(
        &self,
        round: &Round,
        pool: &EntryPool,
        store: &VoteAssignmentStore,
        changeset: &mut VoteChangeset,
    ) -> Result<Vec<EntryId>, AllocationError> {
        if round.is_shuffled() {
            pool.validate_order(&round.shuffle_order)?;
            Ok(round.shuffle_order.clone())
        } else {
            let order = store.recover_shuffle_order(pool)?;
            changeset.shuffle_order = Some(order.clone());
            Ok(order)
        }
    }

    /// Cancel `per_entry` active votes of every entry, drawn from discard jurors
    fn retire<R: Rng + ?Sized>(
        &self,
        pool: &EntryPool,
        votes: &mut [Vote],
        per_entry: usize,
        rng: &mut R,
    ) -> Result<Vec<VoteId>, AllocationError> {
        if self.discard_jurors.is_empty() {
            return Err(AllocationError::UnsatisfiableDecrease(
                "lowering the quorum requires at least one juror to discard".to_string(),
            ));
        }
        let remaining_jurors = self.weights.juror_count();
        if (self.quorum as usize) > remaining_jurors {
            return Err(AllocationError::UnsatisfiableDecrease(format!(
                "quorum {} exceeds the {} remaining jurors",
                self.quorum, remaining_jurors
            )));
        }

        let mut candidates: Vec<Vec<usize>> = vec![Vec::new(); pool.len()];
        for (idx, vote) in votes.iter().enumerate() {
            let from_discarded = vote
                .juror
                .as_ref()
                .is_some_and(|j| self.discard_jurors.contains(j));
            if vote.is_active()
                && from_discarded
                && let Some(pos) = pool.position(vote.entry)
            {
                candidates[pos].push(idx);
            }
        }

        let mut retired = Vec::with_capacity(per_entry * pool.len());
        for (pos, mut pick) in candidates.into_iter().enumerate() {
            if pick.len() < per_entry {
                return Err(AllocationError::UnsatisfiableDecrease(format!(
                    "{} has {} votes from discarded jurors, {} must be retired",
                    pool.entries()[pos].id,
                    pick.len(),
                    per_entry
                )));
            }
            pick.shuffle(rng);
            if self.strategy == DiscardStrategy::KeepBest {
                // stable: open votes first, random among equals
                pick.sort_by_key(|&idx| votes[idx].is_completed());
            }
            for &idx in pick.iter().take(per_entry) {
                votes[idx].status = VoteStatus::Cancelled;
                retired.push(votes[idx].id);
            }
        }
        retired.sort();
        Ok(retired)
    }
}

/// Append one vote per entry in `order`, with provisional ids
fn push_pass(votes: &mut Vec<Vote>, order: &[EntryId], slot: u32) {
    for entry in order {
        let id = VoteId(votes.last().map_or(1, |v| v.id.0 + 1));
        votes.push(Vote::new(id, *entry, slot));
    }
}
