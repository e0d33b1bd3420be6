//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod allocation;
mod logging;
mod store;

pub use allocation::FileAllocationConfig;
pub use logging::FileLoggingConfig;
pub use store::FileStoreConfig;

use crate::config::validation::{ConfigIssue, ConfigIssueCode, Severity};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Allocation defaults
    pub allocation: FileAllocationConfig,
    /// Vote store location
    pub store: FileStoreConfig,
    /// Audit and tracing log destinations
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    ///
    /// Checks:
    /// 1. Enum parse failures (`allocation.strategy`)
    /// 2. Empty paths, which would resolve to the working directory
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        issues.extend(self.allocation.parse_strategy().1);

        issues.extend(empty_path("store.path", Some(&self.store.path)));
        issues.extend(empty_path(
            "logging.audit_log",
            self.logging.audit_log.as_deref(),
        ));
        issues.extend(empty_path("logging.log_dir", self.logging.log_dir.as_deref()));

        issues
    }
}

fn empty_path(field: &str, path: Option<&Path>) -> Option<ConfigIssue> {
    let path = path?;
    if !path.as_os_str().is_empty() {
        return None;
    }
    Some(ConfigIssue {
        severity: Severity::Error,
        code: ConfigIssueCode::EmptyPath {
            field: field.to_string(),
        },
        message: format!("{}: path must not be empty", field),
    })
}
