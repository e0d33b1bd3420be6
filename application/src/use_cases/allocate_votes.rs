//! Allocate Votes use case
//!
//! Orchestrates a round's reconciliation: validates the request, loads the
//! round through the [`VoteStore`] port, runs the
//! [`QuorumReconciler`](montage_domain::QuorumReconciler), and applies the
//! resulting changeset.
//!
//! # Flow
//!
//! ```text
//! VoteAllocator::new()      ← rejects bad weights / strategy / discard set
//!        ↓
//! plan()                    ← read snapshot, reconcile in memory, report
//! process()                 ← round lock → snapshot → reconcile → apply (CAS)
//! ```

use crate::config::AllocationParams;
use crate::ports::allocation_logger::{AllocationEvent, AllocationLogger, NoAllocationLogger};
use crate::ports::vote_store::{StoreError, VoteStore};
use crate::use_cases::shared::{RoundLocks, load_snapshot};
use montage_domain::{
    AllocationError, AllocationPlan, DiscardStrategy, JurorId, JurorWeightMap, QuorumReconciler,
    Reconciliation, RoundId,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde_json::json;
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur while allocating votes
#[derive(Error, Debug)]
pub enum AllocateVotesError {
    #[error(transparent)]
    Allocation(#[from] AllocationError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl AllocateVotesError {
    /// Whether the request itself was invalid
    pub fn is_configuration(&self) -> bool {
        matches!(self, AllocateVotesError::Allocation(e) if e.is_configuration())
    }
}

/// Input for the allocator
///
/// `quorum_discard_strategy` is kept as the caller supplied it; it is parsed
/// (and rejected if unknown) when the allocator is constructed.
#[derive(Debug, Clone)]
pub struct AllocationRequest {
    pub round: RoundId,
    pub jury_weight_map: JurorWeightMap,
    pub quorum: u32,
    pub discard_vote_jurors: BTreeSet<JurorId>,
    pub quorum_discard_strategy: String,
    /// Seed for the random source; `None` draws from OS entropy
    pub seed: Option<u64>,
}

impl AllocationRequest {
    pub fn new(round: RoundId, jury_weight_map: JurorWeightMap, quorum: u32) -> Self {
        Self {
            round,
            jury_weight_map,
            quorum,
            discard_vote_jurors: BTreeSet::new(),
            quorum_discard_strategy: DiscardStrategy::default().to_string(),
            seed: None,
        }
    }

    /// Start from deployment defaults instead of the built-in ones
    pub fn from_params(
        round: RoundId,
        jury_weight_map: JurorWeightMap,
        quorum: u32,
        params: &AllocationParams,
    ) -> Self {
        Self {
            quorum_discard_strategy: params.default_strategy.to_string(),
            seed: params.seed,
            ..Self::new(round, jury_weight_map, quorum)
        }
    }

    pub fn with_discard_jurors<I, J>(mut self, jurors: I) -> Self
    where
        I: IntoIterator<Item = J>,
        J: Into<JurorId>,
    {
        self.discard_vote_jurors = jurors.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_strategy(mut self, strategy: impl Into<String>) -> Self {
        self.quorum_discard_strategy = strategy.into();
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Use case for reconciling a round's votes
///
/// The random source lives inside the allocator. `plan()` works on a copy of
/// it, so a plan followed by `process()` previews exactly what gets applied.
pub struct VoteAllocator<S: VoteStore + 'static> {
    store: Arc<S>,
    round: RoundId,
    reconciler: QuorumReconciler,
    rng: Mutex<StdRng>,
    locks: RoundLocks,
    logger: Arc<dyn AllocationLogger>,
}

impl<S: VoteStore + 'static> VoteAllocator<S> {
    /// Validate the request and build the allocator
    ///
    /// Fails with [`AllocationError::Configuration`] before touching the
    /// store when the weights do not add up to the quorum, the discard
    /// strategy is unknown, or a discard juror still carries weight.
    pub fn new(store: Arc<S>, request: AllocationRequest) -> Result<Self, AllocationError> {
        let strategy: DiscardStrategy = request.quorum_discard_strategy.parse()?;
        let reconciler = QuorumReconciler::new(
            request.jury_weight_map,
            request.quorum,
            request.discard_vote_jurors,
            strategy,
        )?;
        let rng = match request.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self {
            store,
            round: request.round,
            reconciler,
            rng: Mutex::new(rng),
            locks: RoundLocks::new(),
            logger: Arc::new(NoAllocationLogger),
        })
    }

    /// Share a lock registry with other allocators of the same deployment
    pub fn with_locks(mut self, locks: RoundLocks) -> Self {
        self.locks = locks;
        self
    }

    pub fn with_logger(mut self, logger: Arc<dyn AllocationLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn round(&self) -> RoundId {
        self.round
    }

    /// Dry run: what `process()` would do, without writing anything
    pub async fn plan(&self) -> Result<AllocationPlan, AllocateVotesError> {
        let snapshot =
            load_snapshot::<_, AllocateVotesError>(self.store.as_ref(), self.round).await?;
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner()).clone();
        let reconciliation = self.reconciler.reconcile(
            &snapshot.round,
            &snapshot.pool,
            &snapshot.votes,
            &mut rng,
        )?;

        debug!("Planned {}", reconciliation.changeset.summary());
        self.logger.log(AllocationEvent::new(
            "allocation_planned",
            self.round,
            json!({ "plan": &reconciliation.plan }),
        ));
        Ok(reconciliation.plan)
    }

    /// Reconcile the round and persist the result
    ///
    /// Holds the round lock for the whole read-compute-write cycle; the
    /// store additionally rejects the changeset if the round changed since
    /// it was read. Nothing is written when the reconciliation is a no-op.
    pub async fn process(&self) -> Result<AllocationPlan, AllocateVotesError> {
        let _guard = self.locks.acquire(self.round).await;

        let snapshot =
            load_snapshot::<_, AllocateVotesError>(self.store.as_ref(), self.round).await?;
        info!(
            "Reconciling {} ({} entries, {} votes): quorum {} -> {}",
            self.round,
            snapshot.pool.len(),
            snapshot.votes.len(),
            snapshot.round.quorum,
            self.reconciler.quorum()
        );

        let Reconciliation {
            changeset, plan, ..
        } = {
            let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
            self.reconciler.reconcile(
                &snapshot.round,
                &snapshot.pool,
                &snapshot.votes,
                &mut *rng,
            )?
        };

        if changeset.is_empty() {
            info!("{} is already reconciled; nothing to apply", self.round);
            self.logger.log(AllocationEvent::new(
                "allocation_noop",
                self.round,
                json!({ "quorum": changeset.new_quorum }),
            ));
            return Ok(plan);
        }

        let round = self.store.apply_changeset(&changeset).await.inspect_err(|e| {
            warn!("Failed to apply {}: {}", changeset.summary(), e);
        })?;
        info!("Applied {} (now version {})", changeset.summary(), round.version);

        self.logger.log(AllocationEvent::new(
            "allocation_applied",
            self.round,
            json!({
                "version": round.version,
                "old_quorum": changeset.old_quorum,
                "new_quorum": changeset.new_quorum,
                "created": changeset.created.len(),
                "cancelled": &changeset.cancelled,
                "rebound": &changeset.rebound,
                "shuffle_order_persisted": changeset.shuffle_order.is_some(),
            }),
        ));
        Ok(plan)
    }
}
