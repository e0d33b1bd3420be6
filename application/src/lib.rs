//! Application layer for montage
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::AllocationParams;
pub use ports::{
    allocation_logger::{AllocationEvent, AllocationLogger, NoAllocationLogger},
    vote_store::{StoreError, VoteStore},
};
pub use use_cases::RoundLocks;
pub use use_cases::allocate_votes::{AllocateVotesError, AllocationRequest, VoteAllocator};
pub use use_cases::juror_voting::{
    JurorProgress, JurorVotingError, JurorVotingUseCase, RoundStatus,
};
