//! Logging infrastructure: structured allocation audit logging.
//!
//! Provides [`JsonlAllocationLogger`], a JSONL file writer that implements
//! the [`AllocationLogger`](montage_application::AllocationLogger) port.

mod jsonl_logger;

pub use jsonl_logger::JsonlAllocationLogger;
