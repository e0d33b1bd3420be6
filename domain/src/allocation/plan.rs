//! Dry-run summary of a reconciliation

use super::changeset::VoteChangeset;
use super::vote::Vote;
use crate::core::ids::JurorId;
use crate::round::EntryPool;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// What a reconciliation does (or would do) to a round
///
/// - `disqualified_entry_count`: entries that had active votes and would
///   have none afterwards
/// - `requalified_entry_count`: entries that had votes but no active ones,
///   and would have active votes afterwards
/// - `open_votes_per_juror` / `total_votes_per_juror`: unrated and all
///   active votes held by each juror afterwards
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationPlan {
    pub old_quorum: u32,
    pub new_quorum: u32,
    pub disqualified_entry_count: usize,
    pub requalified_entry_count: usize,
    pub open_votes_per_juror: BTreeMap<JurorId, usize>,
    pub total_votes_per_juror: BTreeMap<JurorId, usize>,
    pub votes_to_create: usize,
    pub votes_to_cancel: usize,
    pub votes_to_rebind: usize,
}

impl AllocationPlan {
    /// Summarize the transition from `before` to `after`
    pub fn from_outcome(
        pool: &EntryPool,
        before: &[Vote],
        after: &[Vote],
        changeset: &VoteChangeset,
    ) -> Self {
        let tally = |votes: &[Vote]| {
            let mut active = vec![0usize; pool.len()];
            let mut any = vec![false; pool.len()];
            for vote in votes {
                if let Some(pos) = pool.position(vote.entry) {
                    any[pos] = true;
                    if vote.is_active() {
                        active[pos] += 1;
                    }
                }
            }
            (active, any)
        };
        let (active_before, any_before) = tally(before);
        let (active_after, _) = tally(after);

        let disqualified_entry_count = (0..pool.len())
            .filter(|&i| active_before[i] > 0 && active_after[i] == 0)
            .count();
        let requalified_entry_count = (0..pool.len())
            .filter(|&i| any_before[i] && active_before[i] == 0 && active_after[i] > 0)
            .count();

        let (open_votes_per_juror, total_votes_per_juror) = juror_counts(after);

        Self {
            old_quorum: changeset.old_quorum,
            new_quorum: changeset.new_quorum,
            disqualified_entry_count,
            requalified_entry_count,
            open_votes_per_juror,
            total_votes_per_juror,
            votes_to_create: changeset.created.len(),
            votes_to_cancel: changeset.cancelled.len(),
            votes_to_rebind: changeset.rebound.len(),
        }
    }

    /// True when the reconciliation leaves the round untouched
    pub fn is_noop(&self) -> bool {
        self.old_quorum == self.new_quorum
            && self.votes_to_create == 0
            && self.votes_to_cancel == 0
            && self.votes_to_rebind == 0
    }
}

/// Open and total active votes per juror
pub fn juror_counts(votes: &[Vote]) -> (BTreeMap<JurorId, usize>, BTreeMap<JurorId, usize>) {
    let mut open = BTreeMap::new();
    let mut total = BTreeMap::new();
    for vote in votes.iter().filter(|v| v.is_active()) {
        let Some(juror) = &vote.juror else {
            continue;
        };
        *total.entry(juror.clone()).or_insert(0) += 1;
        let open_count = open.entry(juror.clone()).or_insert(0);
        if vote.is_open() {
            *open_count += 1;
        }
    }
    (open, total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocation::vote::{Rating, VoteStatus};
    use crate::core::ids::{EntryId, RoundId, VoteId};
    use crate::round::Entry;

    fn pool() -> EntryPool {
        EntryPool::new(vec![
            Entry::new(EntryId(1), RoundId(1), "a"),
            Entry::new(EntryId(2), RoundId(1), "b"),
        ])
        .unwrap()
    }

    #[test]
    fn test_juror_counts() {
        let mut rated = Vote::new(VoteId(2), EntryId(2), 0).bound_to(JurorId::new("x"));
        rated.rating = Some(Rating::new(2).unwrap());
        let votes = vec![
            Vote::new(VoteId(1), EntryId(1), 0).bound_to(JurorId::new("x")),
            rated,
            Vote {
                status: VoteStatus::Cancelled,
                ..Vote::new(VoteId(3), EntryId(1), 1).bound_to(JurorId::new("y"))
            },
        ];
        let (open, total) = juror_counts(&votes);
        assert_eq!(open[&JurorId::new("x")], 1);
        assert_eq!(total[&JurorId::new("x")], 2);
        assert!(!total.contains_key(&JurorId::new("y")));
    }

    #[test]
    fn test_disqualified_and_requalified() {
        let before = vec![
            Vote::new(VoteId(1), EntryId(1), 0),
            Vote {
                status: VoteStatus::Cancelled,
                ..Vote::new(VoteId(2), EntryId(2), 0)
            },
        ];
        let after = vec![
            Vote {
                status: VoteStatus::Cancelled,
                ..Vote::new(VoteId(1), EntryId(1), 0)
            },
            Vote {
                status: VoteStatus::Cancelled,
                ..Vote::new(VoteId(2), EntryId(2), 0)
            },
            Vote::new(VoteId(3), EntryId(2), 1),
        ];
        let cs = VoteChangeset::new(RoundId(1), 0, 1, 1);
        let plan = AllocationPlan::from_outcome(&pool(), &before, &after, &cs);
        assert_eq!(plan.disqualified_entry_count, 1);
        assert_eq!(plan.requalified_entry_count, 1);
    }

    #[test]
    fn test_plan_serializes_juror_maps_as_objects() {
        let votes = vec![Vote::new(VoteId(1), EntryId(1), 0).bound_to(JurorId::new("Yarl"))];
        let cs = VoteChangeset::new(RoundId(1), 0, 0, 1);
        let plan = AllocationPlan::from_outcome(&pool(), &[], &votes, &cs);
        let json = serde_json::to_value(&plan).unwrap();
        assert_eq!(json["open_votes_per_juror"]["Yarl"], 1);
        assert_eq!(json["total_votes_per_juror"]["Yarl"], 1);
        assert!(!plan.is_noop());
    }
}
