//! Domain error types

use thiserror::Error;

/// Errors raised by the allocation domain
///
/// Each variant is a distinct failure class so callers can tell bad input
/// apart from corrupted state or a quorum decrease that cannot be honoured.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AllocationError {
    /// Invalid reconciliation request (weights, quorum, strategy, discard set)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The requested quorum decrease cannot be satisfied by the discard jurors
    #[error("Unsatisfiable quorum decrease: {0}")]
    UnsatisfiableDecrease(String),

    /// The persisted votes violate the allocation invariants
    #[error("Data integrity error: {0}")]
    DataIntegrity(String),

    /// Rating value outside the accepted scale
    #[error("Invalid rating: {0} (expected {min}..={max})", min = crate::allocation::Rating::MIN, max = crate::allocation::Rating::MAX)]
    InvalidRating(u8),
}

impl AllocationError {
    /// Check if this error was caused by the request rather than stored state
    pub fn is_configuration(&self) -> bool {
        matches!(self, AllocationError::Configuration(_))
    }

    /// Check if this error indicates corrupted prior state
    pub fn is_data_integrity(&self) -> bool {
        matches!(self, AllocationError::DataIntegrity(_))
    }
}
