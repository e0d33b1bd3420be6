//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod allocate_votes;
pub mod juror_voting;
pub(crate) mod shared;
#[cfg(test)]
mod test_support;

pub use shared::RoundLocks;
