//! Plain store state shared by the in-memory and JSON snapshot adapters.
//!
//! All mutations validate first and write second, so a failed call leaves
//! the state untouched.

use montage_application::StoreError;
use montage_domain::{
    Entry, EntryId, JurorId, Rating, Round, RoundId, Vote, VoteChangeset, VoteId, VoteStatus,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One round with everything that belongs to it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundRecord {
    pub round: Round,
    pub entries: Vec<Entry>,
    /// Ordered by id
    pub votes: Vec<Vote>,
}

/// Whole-store state; this is also the on-disk snapshot format
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreState {
    pub rounds: Vec<RoundRecord>,
    next_round_id: u64,
    next_entry_id: u64,
    next_vote_id: u64,
}

impl Default for StoreState {
    fn default() -> Self {
        Self {
            rounds: Vec::new(),
            next_round_id: 1,
            next_entry_id: 1,
            next_vote_id: 1,
        }
    }
}

impl StoreState {
    pub fn record(&self, round: RoundId) -> Result<&RoundRecord, StoreError> {
        self.rounds
            .iter()
            .find(|r| r.round.id == round)
            .ok_or(StoreError::RoundNotFound(round))
    }

    fn record_mut(&mut self, round: RoundId) -> Result<&mut RoundRecord, StoreError> {
        self.rounds
            .iter_mut()
            .find(|r| r.round.id == round)
            .ok_or(StoreError::RoundNotFound(round))
    }

    pub fn create_round(&mut self, name: &str) -> Round {
        let round = Round::new(RoundId(self.next_round_id), name);
        self.next_round_id += 1;
        self.rounds.push(RoundRecord {
            round: round.clone(),
            entries: Vec::new(),
            votes: Vec::new(),
        });
        round
    }

    /// Add entries to a round that has no votes yet
    pub fn add_entries<I, N>(&mut self, round: RoundId, names: I) -> Result<Vec<Entry>, StoreError>
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        let mut next_id = self.next_entry_id;
        let record = self.record_mut(round)?;
        if !record.votes.is_empty() {
            return Err(StoreError::RoundStarted(round));
        }
        let added: Vec<Entry> = names
            .into_iter()
            .map(|name| {
                let entry = Entry::new(EntryId(next_id), round, name);
                next_id += 1;
                entry
            })
            .collect();
        record.entries.extend(added.iter().cloned());
        record.round.version += 1;
        self.next_entry_id = next_id;
        Ok(added)
    }

    /// Apply a reconciliation, checking the round version first
    pub fn apply(&mut self, changeset: &VoteChangeset) -> Result<Round, StoreError> {
        let mut next_vote_id = self.next_vote_id;
        let record = self.record_mut(changeset.round)?;

        if record.round.version != changeset.expected_version {
            return Err(StoreError::Conflict {
                round: changeset.round,
                expected: changeset.expected_version,
                actual: record.round.version,
            });
        }
        let known: HashSet<VoteId> = record.votes.iter().map(|v| v.id).collect();
        let touched = changeset
            .cancelled
            .iter()
            .chain(changeset.rebound.iter().map(|r| &r.vote));
        for id in touched {
            if !known.contains(id) {
                return Err(StoreError::VoteNotFound(*id));
            }
        }

        for vote in record.votes.iter_mut() {
            if changeset.cancelled.contains(&vote.id) {
                vote.status = VoteStatus::Cancelled;
            }
            if let Some(rebinding) = changeset.rebound.iter().find(|r| r.vote == vote.id) {
                vote.juror = Some(rebinding.to.clone());
            }
        }
        for new in &changeset.created {
            let vote = Vote::new(VoteId(next_vote_id), new.entry, new.slot)
                .bound_to(new.juror.clone());
            next_vote_id += 1;
            record.votes.push(vote);
        }

        record.round.quorum = changeset.new_quorum;
        if let Some(order) = &changeset.shuffle_order {
            record.round.shuffle_order = order.clone();
        }
        record.round.version += 1;
        let round = record.round.clone();
        self.next_vote_id = next_vote_id;
        Ok(round)
    }

    /// Rate an open vote held by `juror`
    pub fn rate(
        &mut self,
        round: RoundId,
        vote: VoteId,
        juror: &JurorId,
        rating: Rating,
    ) -> Result<Vote, StoreError> {
        let record = self.record_mut(round)?;
        let target = record
            .votes
            .iter_mut()
            .find(|v| v.id == vote)
            .ok_or(StoreError::VoteNotFound(vote))?;
        if !target.is_open() || !target.is_held_by(juror) {
            return Err(StoreError::VoteNotOpen {
                vote,
                juror: juror.clone(),
            });
        }
        target.rating = Some(rating);
        let rated = target.clone();
        record.round.version += 1;
        Ok(rated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use montage_domain::NewVote;

    fn started() -> (StoreState, RoundId) {
        let mut state = StoreState::default();
        let round = state.create_round("Round 1").id;
        state.add_entries(round, ["a.jpg", "b.jpg"]).unwrap();
        let mut cs = VoteChangeset::new(round, 1, 0, 1);
        cs.created = vec![
            NewVote {
                entry: EntryId(1),
                slot: 0,
                juror: JurorId::new("x"),
            },
            NewVote {
                entry: EntryId(2),
                slot: 0,
                juror: JurorId::new("x"),
            },
        ];
        state.apply(&cs).unwrap();
        (state, round)
    }

    #[test]
    fn test_ids_are_sequential() {
        let mut state = StoreState::default();
        let r1 = state.create_round("one").id;
        let r2 = state.create_round("two").id;
        assert_eq!((r1, r2), (RoundId(1), RoundId(2)));

        state.add_entries(r1, ["a"]).unwrap();
        let added = state.add_entries(r2, ["b", "c"]).unwrap();
        assert_eq!(added[0].id, EntryId(2));
        assert_eq!(added[1].round, r2);
    }

    #[test]
    fn test_entries_frozen_once_voting_started() {
        let (mut state, round) = started();
        let err = state.add_entries(round, ["late.jpg"]).unwrap_err();
        assert!(matches!(err, StoreError::RoundStarted(_)));
        assert_eq!(state.record(round).unwrap().entries.len(), 2);
    }

    #[test]
    fn test_apply_rejects_stale_version() {
        let (mut state, round) = started();
        let before = state.clone();
        let cs = VoteChangeset::new(round, 1, 1, 2);
        assert!(state.apply(&cs).unwrap_err().is_conflict());
        assert_eq!(state, before);
    }

    #[test]
    fn test_apply_rejects_unknown_vote_without_partial_write() {
        let (mut state, round) = started();
        let before = state.clone();
        let mut cs = VoteChangeset::new(round, 2, 1, 1);
        cs.cancelled = vec![VoteId(1), VoteId(99)];
        assert!(matches!(
            state.apply(&cs),
            Err(StoreError::VoteNotFound(VoteId(99)))
        ));
        assert_eq!(state, before);
    }

    #[test]
    fn test_rate_is_conditional() {
        let (mut state, round) = started();
        let x = JurorId::new("x");
        let rating = Rating::new(3).unwrap();

        assert!(matches!(
            state.rate(round, VoteId(1), &JurorId::new("y"), rating),
            Err(StoreError::VoteNotOpen { .. })
        ));
        let rated = state.rate(round, VoteId(1), &x, rating).unwrap();
        assert!(rated.is_completed());
        assert!(state.rate(round, VoteId(1), &x, rating).is_err());
        assert_eq!(state.record(round).unwrap().round.version, 3);
    }
}
