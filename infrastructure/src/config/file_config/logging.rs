//! Logging configuration from TOML (`[logging]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw logging configuration from TOML
///
/// ```toml
/// [logging]
/// audit_log = "logs/allocation.jsonl"   # JSONL audit trail of applied changes
/// log_dir = "logs"                      # daily rotating tracing output
/// ```
///
/// Both are off when unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    pub audit_log: Option<PathBuf>,
    pub log_dir: Option<PathBuf>,
}
