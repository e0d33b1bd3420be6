//! In-memory [`VoteStore`] adapter.

use super::state::StoreState;
use async_trait::async_trait;
use montage_application::{StoreError, VoteStore};
use montage_domain::{Entry, JurorId, Rating, Round, RoundId, Vote, VoteChangeset, VoteId};
use tokio::sync::RwLock;
use tracing::debug;

/// Vote store that keeps everything behind a single `RwLock`
///
/// Changesets and ratings take the write lock, so readers never see a
/// half-applied reconciliation.
#[derive(Debug, Default)]
pub struct InMemoryVoteStore {
    state: RwLock<StoreState>,
}

impl InMemoryVoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_state(state: StoreState) -> Self {
        Self {
            state: RwLock::new(state),
        }
    }

    /// Copy of the current state
    pub async fn snapshot(&self) -> StoreState {
        self.state.read().await.clone()
    }

    pub async fn create_round(&self, name: &str) -> Round {
        let round = self.state.write().await.create_round(name);
        debug!("Created {} ({})", round.id, round.name);
        round
    }

    /// Add entries to a round; fails once the round has votes
    pub async fn add_entries<I, N>(&self, round: RoundId, names: I) -> Result<Vec<Entry>, StoreError>
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        self.state.write().await.add_entries(round, names)
    }

    pub async fn rounds(&self) -> Vec<Round> {
        self.state
            .read()
            .await
            .rounds
            .iter()
            .map(|r| r.round.clone())
            .collect()
    }
}

#[async_trait]
impl VoteStore for InMemoryVoteStore {
    async fn load_round(&self, round: RoundId) -> Result<Round, StoreError> {
        Ok(self.state.read().await.record(round)?.round.clone())
    }

    async fn load_entries(&self, round: RoundId) -> Result<Vec<Entry>, StoreError> {
        let state = self.state.read().await;
        let mut entries = state.record(round)?.entries.clone();
        entries.sort_by_key(|e| e.id);
        Ok(entries)
    }

    async fn load_votes(&self, round: RoundId) -> Result<Vec<Vote>, StoreError> {
        Ok(self.state.read().await.record(round)?.votes.clone())
    }

    async fn apply_changeset(&self, changeset: &VoteChangeset) -> Result<Round, StoreError> {
        self.state.write().await.apply(changeset)
    }

    async fn submit_rating(
        &self,
        round: RoundId,
        vote: VoteId,
        juror: &JurorId,
        rating: Rating,
    ) -> Result<Vote, StoreError> {
        self.state.write().await.rate(round, vote, juror, rating)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use montage_application::{AllocationRequest, JurorVotingUseCase, VoteAllocator};
    use montage_domain::JurorWeightMap;
    use std::sync::Arc;

    async fn seeded_store(entries: usize) -> (Arc<InMemoryVoteStore>, RoundId) {
        let store = Arc::new(InMemoryVoteStore::new());
        let round = store.create_round("Quality images").await.id;
        store
            .add_entries(round, (0..entries).map(|i| format!("File:Photo {}.jpg", i)))
            .await
            .unwrap();
        (store, round)
    }

    fn request(round: RoundId, jurors: &[&str]) -> AllocationRequest {
        let weights = JurorWeightMap::from_pairs(jurors.iter().map(|j| (*j, 1))).unwrap();
        AllocationRequest::new(round, weights, jurors.len() as u32).with_seed(11)
    }

    #[tokio::test]
    async fn test_allocate_then_rate_end_to_end() {
        let (store, round) = seeded_store(6).await;
        VoteAllocator::new(Arc::clone(&store), request(round, &["ann", "bob"]))
            .unwrap()
            .process()
            .await
            .unwrap();

        let votes = store.load_votes(round).await.unwrap();
        assert_eq!(votes.len(), 12);
        assert!(votes.windows(2).all(|w| w[0].id < w[1].id));

        let voting = JurorVotingUseCase::new(Arc::clone(&store));
        let ann = JurorId::new("ann");
        let next = voting.next_vote(round, &ann).await.unwrap().unwrap();
        voting.submit_rating(round, next.id, &ann, 5).await.unwrap();

        let status = voting.round_status(round).await.unwrap();
        assert_eq!(status.jurors[&ann].open, 5);
        assert_eq!(status.quorum, 2);
    }

    #[tokio::test]
    async fn test_rating_between_plan_and_apply_conflicts() {
        let (store, round) = seeded_store(3).await;
        VoteAllocator::new(Arc::clone(&store), request(round, &["ann"]))
            .unwrap()
            .process()
            .await
            .unwrap();

        let stale = store.load_round(round).await.unwrap().version;
        let vote = store.load_votes(round).await.unwrap()[0].id;
        store
            .submit_rating(round, vote, &JurorId::new("ann"), Rating::new(2).unwrap())
            .await
            .unwrap();

        let cs = VoteChangeset::new(round, stale, 1, 1);
        let err = store.apply_changeset(&cs).await.unwrap_err();
        assert!(err.is_conflict());
    }

    #[tokio::test]
    async fn test_unknown_round() {
        let store = InMemoryVoteStore::new();
        assert!(matches!(
            store.load_votes(RoundId(4)).await,
            Err(StoreError::RoundNotFound(RoundId(4)))
        ));
    }

    #[tokio::test]
    async fn test_rounds_listing() {
        let store = InMemoryVoteStore::new();
        store.create_round("a").await;
        store.create_round("b").await;
        let names: Vec<_> = store.rounds().await.into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["a", "b"]);
    }
}
