//! Application-level configuration.
//!
//! - [`AllocationParams`]: defaults applied to every reconciliation request

pub mod allocation_params;

pub use allocation_params::AllocationParams;
