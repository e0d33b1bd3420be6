//! Vote-to-juror binding pass
//!
//! Decides which active votes are up for grabs and hands them to jurors
//! according to the weight map. For every entry, juror `j` ends up holding
//! `weight(j)` of the entry's active votes, unless rated votes pin more
//! work on a juror than their weight allows.

use super::vote::Vote;
use super::weight_map::JurorWeightMap;
use crate::core::error::AllocationError;
use crate::core::ids::JurorId;
use crate::round::EntryPool;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Indices of the active votes that are free to be (re)bound
///
/// A vote is up for grabs when it is open and either unbound, held by a
/// discarded juror, held by a juror missing from the weight map, or held by
/// a juror that already has their full share of the entry. Rated votes are
/// never freed.
pub fn free_votes(
    pool: &EntryPool,
    weights: &JurorWeightMap,
    discard_jurors: &BTreeSet<JurorId>,
    votes: &[Vote],
) -> Vec<usize> {
    let mut capacity = entry_capacities(pool, weights, votes);
    let mut free = Vec::new();

    for (idx, vote) in votes.iter().enumerate() {
        if !vote.is_open() {
            continue;
        }
        let Some(pos) = pool.position(vote.entry) else {
            continue;
        };
        let keep = match &vote.juror {
            Some(juror) if !discard_jurors.contains(juror) => match capacity[pos].get_mut(juror) {
                Some(remaining) if *remaining > 0 => {
                    *remaining -= 1;
                    true
                }
                _ => false,
            },
            _ => false,
        };
        if !keep {
            free.push(idx);
        }
    }
    free
}

/// Bind every free active vote to a juror
///
/// Free votes are visited in creation order. Each goes to the juror with the
/// most remaining capacity for that entry; ties go to the juror with the
/// lightest overall load, then to the lowest juror id.
pub fn assign_votes(
    pool: &EntryPool,
    weights: &JurorWeightMap,
    discard_jurors: &BTreeSet<JurorId>,
    votes: &mut [Vote],
) -> Result<(), AllocationError> {
    let free = free_votes(pool, weights, discard_jurors, votes);
    if free.is_empty() {
        return Ok(());
    }

    // Remaining capacity once completed and kept votes are accounted for
    let mut capacity = entry_capacities(pool, weights, votes);
    let free_set: BTreeSet<usize> = free.iter().copied().collect();
    let mut load: HashMap<JurorId, usize> = weights.jurors().map(|j| (j.clone(), 0)).collect();

    for (idx, vote) in votes.iter().enumerate() {
        if !vote.is_open() || free_set.contains(&idx) {
            continue;
        }
        if let (Some(juror), Some(pos)) = (&vote.juror, pool.position(vote.entry)) {
            if let Some(remaining) = capacity[pos].get_mut(juror) {
                *remaining -= 1;
            }
            if let Some(l) = load.get_mut(juror) {
                *l += 1;
            }
        }
    }
    for vote in votes.iter().filter(|v| v.is_completed()) {
        if let Some(l) = vote.juror.as_ref().and_then(|j| load.get_mut(j)) {
            *l += 1;
        }
    }

    for idx in free {
        let entry = votes[idx].entry;
        let pos = pool.position(entry).ok_or_else(|| {
            AllocationError::DataIntegrity(format!("{} is not part of the round", entry))
        })?;
        let juror = capacity[pos]
            .iter()
            .filter(|(_, remaining)| **remaining > 0)
            .max_by(|(ja, ra), (jb, rb)| {
                ra.cmp(rb)
                    .then_with(|| load[*jb].cmp(&load[*ja]))
                    .then_with(|| jb.cmp(ja))
            })
            .map(|(j, _)| j.clone())
            .ok_or_else(|| {
                AllocationError::DataIntegrity(format!(
                    "no juror has a free slot left for {}",
                    entry
                ))
            })?;

        if let Some(remaining) = capacity[pos].get_mut(&juror) {
            *remaining -= 1;
        }
        if let Some(l) = load.get_mut(&juror) {
            *l += 1;
        }
        votes[idx].juror = Some(juror);
    }
    Ok(())
}

/// Per-entry capacity left after rated votes are accounted for
///
/// Rated votes stay with whoever rated them; if that juror is in the weight
/// map the vote uses up one unit of their share of the entry.
fn entry_capacities(
    pool: &EntryPool,
    weights: &JurorWeightMap,
    votes: &[Vote],
) -> Vec<BTreeMap<JurorId, i64>> {
    let base: BTreeMap<JurorId, i64> = weights.iter().map(|(j, w)| (j.clone(), w as i64)).collect();
    let mut capacity = vec![base; pool.len()];
    for vote in votes.iter().filter(|v| v.is_completed()) {
        if let (Some(juror), Some(pos)) = (&vote.juror, pool.position(vote.entry))
            && let Some(remaining) = capacity[pos].get_mut(juror)
        {
            *remaining -= 1;
        }
    }
    capacity
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocation::vote::Rating;
    use crate::core::ids::{EntryId, RoundId, VoteId};
    use crate::round::Entry;

    fn pool(n: u64) -> EntryPool {
        EntryPool::new(
            (1..=n)
                .map(|i| Entry::new(EntryId(i), RoundId(1), i.to_string()))
                .collect(),
        )
        .unwrap()
    }

    fn unbound(n: u64, passes: u32) -> Vec<Vote> {
        let mut out = Vec::new();
        for slot in 0..passes {
            for e in 1..=n {
                out.push(Vote::new(VoteId(out.len() as u64 + 1), EntryId(e), slot));
            }
        }
        out
    }

    fn held(votes: &[Vote], juror: &str) -> usize {
        votes
            .iter()
            .filter(|v| v.is_active() && v.is_held_by(&JurorId::new(juror)))
            .count()
    }

    fn per_entry(votes: &[Vote], entry: u64, juror: &str) -> usize {
        votes
            .iter()
            .filter(|v| v.is_active() && v.entry == EntryId(entry) && v.is_held_by(&JurorId::new(juror)))
            .count()
    }

    #[test]
    fn test_unbound_votes_follow_weights() {
        let pool = pool(4);
        let weights = JurorWeightMap::from_pairs([("a", 1), ("b", 1), ("c", 1)]).unwrap();
        let mut votes = unbound(4, 3);

        assign_votes(&pool, &weights, &BTreeSet::new(), &mut votes).unwrap();

        assert!(votes.iter().all(|v| v.juror.is_some()));
        for e in 1..=4 {
            for j in ["a", "b", "c"] {
                assert_eq!(per_entry(&votes, e, j), 1, "entry {} juror {}", e, j);
            }
        }
    }

    #[test]
    fn test_heavier_juror_gets_more_slots() {
        let pool = pool(2);
        let weights = JurorWeightMap::from_pairs([("a", 2), ("b", 1)]).unwrap();
        let mut votes = unbound(2, 3);

        assign_votes(&pool, &weights, &BTreeSet::new(), &mut votes).unwrap();

        assert_eq!(held(&votes, "a"), 4);
        assert_eq!(held(&votes, "b"), 2);
    }

    #[test]
    fn test_discarded_juror_votes_are_freed() {
        let pool = pool(3);
        let weights = JurorWeightMap::from_pairs([("a", 1), ("c", 1)]).unwrap();
        let mut votes = unbound(3, 2);
        for v in votes.iter_mut() {
            v.juror = Some(JurorId::new(if v.slot == 0 { "a" } else { "b" }));
        }
        let discard: BTreeSet<JurorId> = [JurorId::new("b")].into_iter().collect();

        let free = free_votes(&pool, &weights, &discard, &votes);
        assert_eq!(free, vec![3, 4, 5]);

        assign_votes(&pool, &weights, &discard, &mut votes).unwrap();
        assert_eq!(held(&votes, "a"), 3);
        assert_eq!(held(&votes, "b"), 0);
        assert_eq!(held(&votes, "c"), 3);
    }

    #[test]
    fn test_rated_votes_are_never_moved() {
        let pool = pool(1);
        let weights = JurorWeightMap::from_pairs([("a", 1), ("c", 1)]).unwrap();
        let mut votes = unbound(1, 2);
        votes[0].juror = Some(JurorId::new("b"));
        votes[0].rating = Some(Rating::new(5).unwrap());
        votes[1].juror = Some(JurorId::new("b"));
        let discard: BTreeSet<JurorId> = [JurorId::new("b")].into_iter().collect();

        assign_votes(&pool, &weights, &discard, &mut votes).unwrap();

        assert!(votes[0].is_held_by(&JurorId::new("b")));
        assert!(votes[1].is_held_by(&JurorId::new("a")));
    }

    #[test]
    fn test_over_capacity_juror_loses_open_votes() {
        let pool = pool(1);
        let weights = JurorWeightMap::from_pairs([("a", 1), ("b", 1)]).unwrap();
        let mut votes = unbound(1, 2);
        votes[0].juror = Some(JurorId::new("a"));
        votes[1].juror = Some(JurorId::new("a"));

        assign_votes(&pool, &weights, &BTreeSet::new(), &mut votes).unwrap();

        assert!(votes[0].is_held_by(&JurorId::new("a")));
        assert!(votes[1].is_held_by(&JurorId::new("b")));
    }

    #[test]
    fn test_stable_assignment_is_untouched() {
        let pool = pool(2);
        let weights = JurorWeightMap::from_pairs([("a", 1), ("b", 1)]).unwrap();
        let mut votes = unbound(2, 2);
        assign_votes(&pool, &weights, &BTreeSet::new(), &mut votes).unwrap();
        let before = votes.clone();

        assert!(free_votes(&pool, &weights, &BTreeSet::new(), &votes).is_empty());
        assign_votes(&pool, &weights, &BTreeSet::new(), &mut votes).unwrap();
        assert_eq!(before, votes);
    }
}
