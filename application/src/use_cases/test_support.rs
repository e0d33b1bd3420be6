//! Test doubles shared by the use case tests.

use crate::ports::allocation_logger::{AllocationEvent, AllocationLogger};
use crate::ports::vote_store::{StoreError, VoteStore};
use async_trait::async_trait;
use montage_domain::{
    Entry, EntryId, JurorId, Rating, Round, RoundId, Vote, VoteChangeset, VoteId, VoteStatus,
};
use std::sync::Mutex;

#[derive(Default)]
struct MockState {
    round: Option<Round>,
    entries: Vec<Entry>,
    votes: Vec<Vote>,
    next_vote_id: u64,
    applied: usize,
}

/// Single-round in-memory store
pub(crate) struct MockStore {
    state: Mutex<MockState>,
}

impl MockStore {
    pub fn with_entries(n: u64) -> Self {
        let round = Round::new(RoundId(1), "Round 1");
        let entries = (1..=n)
            .map(|i| Entry::new(EntryId(i), round.id, format!("File:Entry {}.jpg", i)))
            .collect();
        Self {
            state: Mutex::new(MockState {
                round: Some(round),
                entries,
                votes: Vec::new(),
                next_vote_id: 1,
                applied: 0,
            }),
        }
    }

    pub fn votes(&self) -> Vec<Vote> {
        self.state.lock().unwrap().votes.clone()
    }

    pub fn round(&self) -> Round {
        self.state.lock().unwrap().round.clone().unwrap()
    }

    pub fn applied(&self) -> usize {
        self.state.lock().unwrap().applied
    }

    /// Simulate a concurrent writer
    pub fn bump_version(&self) {
        self.state.lock().unwrap().round.as_mut().unwrap().version += 1;
    }

    pub fn rate_all(&self, juror: &str, value: u8) {
        let mut state = self.state.lock().unwrap();
        for v in state.votes.iter_mut() {
            if v.is_open() && v.is_held_by(&JurorId::new(juror)) {
                v.rating = Some(Rating::new(value).unwrap());
            }
        }
    }

    pub fn active_per_entry(&self) -> Vec<usize> {
        let state = self.state.lock().unwrap();
        state
            .entries
            .iter()
            .map(|e| state.votes.iter().filter(|v| v.entry == e.id && v.is_active()).count())
            .collect()
    }
}

#[async_trait]
impl VoteStore for MockStore {
    async fn load_round(&self, round: RoundId) -> Result<Round, StoreError> {
        self.state
            .lock()
            .unwrap()
            .round
            .clone()
            .filter(|r| r.id == round)
            .ok_or(StoreError::RoundNotFound(round))
    }

    async fn load_entries(&self, _round: RoundId) -> Result<Vec<Entry>, StoreError> {
        Ok(self.state.lock().unwrap().entries.clone())
    }

    async fn load_votes(&self, _round: RoundId) -> Result<Vec<Vote>, StoreError> {
        Ok(self.state.lock().unwrap().votes.clone())
    }

    async fn apply_changeset(&self, changeset: &VoteChangeset) -> Result<Round, StoreError> {
        let mut state = self.state.lock().unwrap();
        let round = state.round.clone().unwrap();
        if round.version != changeset.expected_version {
            return Err(StoreError::Conflict {
                round: round.id,
                expected: changeset.expected_version,
                actual: round.version,
            });
        }
        for id in &changeset.cancelled {
            let vote = state.votes.iter_mut().find(|v| v.id == *id).unwrap();
            vote.status = VoteStatus::Cancelled;
        }
        for rebinding in &changeset.rebound {
            let vote = state.votes.iter_mut().find(|v| v.id == rebinding.vote).unwrap();
            vote.juror = Some(rebinding.to.clone());
        }
        for new in &changeset.created {
            let id = VoteId(state.next_vote_id);
            state.next_vote_id += 1;
            state
                .votes
                .push(Vote::new(id, new.entry, new.slot).bound_to(new.juror.clone()));
        }
        let r = state.round.as_mut().unwrap();
        r.quorum = changeset.new_quorum;
        if let Some(order) = &changeset.shuffle_order {
            r.shuffle_order = order.clone();
        }
        r.version += 1;
        let updated = r.clone();
        state.applied += 1;
        Ok(updated)
    }

    async fn submit_rating(
        &self,
        _round: RoundId,
        vote: VoteId,
        juror: &JurorId,
        rating: Rating,
    ) -> Result<Vote, StoreError> {
        let mut state = self.state.lock().unwrap();
        let v = state
            .votes
            .iter_mut()
            .find(|v| v.id == vote)
            .ok_or(StoreError::VoteNotFound(vote))?;
        if !v.is_open() || !v.is_held_by(juror) {
            return Err(StoreError::VoteNotOpen {
                vote,
                juror: juror.clone(),
            });
        }
        v.rating = Some(rating);
        let rated = v.clone();
        state.round.as_mut().unwrap().version += 1;
        Ok(rated)
    }
}

/// Logger that keeps event types for assertions
#[derive(Default)]
pub(crate) struct RecordingLogger {
    pub events: Mutex<Vec<&'static str>>,
}

impl AllocationLogger for RecordingLogger {
    fn log(&self, event: AllocationEvent) {
        self.events.lock().unwrap().push(event.event_type);
    }
}
