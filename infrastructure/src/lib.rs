//! Infrastructure layer for montage
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod logging;
pub mod store;

// Re-export commonly used types
pub use config::{
    ConfigIssue, ConfigIssueCode, ConfigLoader, FileAllocationConfig, FileConfig,
    FileLoggingConfig, FileStoreConfig, Severity,
};
pub use logging::JsonlAllocationLogger;
pub use store::{InMemoryVoteStore, JsonFileVoteStore, RoundRecord, StoreState};
