//! Domain layer for montage
//!
//! This crate contains the entities and the pure allocation algorithms of
//! the judging core. It has no dependencies on storage or presentation
//! concerns.
//!
//! # Core Concepts
//!
//! ## Round
//!
//! A round owns a fixed pool of entries and every vote ever created for
//! them. Its quorum is the number of active votes each entry requires.
//!
//! ## Allocation
//!
//! - **First allocation**: entries are shuffled once and `quorum` passes of
//!   votes are created in that order
//! - **Reconciliation**: quorum increases add passes in the same order,
//!   decreases retire votes of discarded jurors per a discard strategy

pub mod allocation;
pub mod core;
pub mod round;

// Re-export commonly used types
pub use allocation::{
    AllocationPlan, DiscardStrategy, JurorWeightMap, NewVote, QuorumReconciler, Rating, Rebinding,
    Reconciliation, Vote, VoteAssignmentStore, VoteChangeset, VoteStatus,
};
pub use core::{
    error::AllocationError,
    ids::{EntryId, JurorId, RoundId, VoteId},
};
pub use round::{Entry, EntryPool, Round};
