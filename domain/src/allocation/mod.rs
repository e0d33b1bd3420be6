//! Vote allocation domain
//!
//! Decides which juror has to vote on which entry, and repairs that
//! assignment when a round's quorum or jury changes.
//!
//! # Core Concepts
//!
//! ## Shuffle order
//! The first allocation of a round draws a random permutation of its
//! entries. Every later allocation pass replays that permutation, so adding
//! slots never reshuffles the work jurors already have.
//!
//! ## Slots and weights
//! A quorum of `q` means every entry has `q` active votes. The jury weight
//! map splits those `q` slots between jurors; the weights must add up to
//! the quorum.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  QuorumReconciler                                            │
//! ├──────────────────────────────────────────────────────────────┤
//! │  EntryPool + VoteAssignmentStore   (what the round holds)    │
//! │           ↓ check_integrity                                  │
//! │  create passes / retire votes      (slot counts)             │
//! │           ↓                                                  │
//! │  assign_votes                      (slot → juror binding)    │
//! │           ↓                                                  │
//! │  VoteChangeset + AllocationPlan    (delta + summary)         │
//! └──────────────────────────────────────────────────────────────┘
//! ```

pub mod assignment_store;
pub mod binding;
pub mod changeset;
pub mod plan;
pub mod reconciler;
pub mod strategy;
pub mod vote;
pub mod weight_map;

// Re-export main types
pub use assignment_store::VoteAssignmentStore;
pub use binding::{assign_votes, free_votes};
pub use changeset::{NewVote, Rebinding, VoteChangeset};
pub use plan::{AllocationPlan, juror_counts};
pub use reconciler::{QuorumReconciler, Reconciliation};
pub use strategy::DiscardStrategy;
pub use vote::{Rating, Vote, VoteStatus};
pub use weight_map::JurorWeightMap;
