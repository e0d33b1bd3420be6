//! Core domain concepts shared across all subdomains.
//!
//! - [`ids`]: identifiers for rounds, entries, votes and jurors
//! - [`error::AllocationError`]: domain-level errors

pub mod error;
pub mod ids;
