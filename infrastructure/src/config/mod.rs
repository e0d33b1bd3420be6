//! Configuration file loading for montage
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `--config <path>` specified file
//! 2. `MONTAGE_*` environment variables
//! 3. Project root: `./montage.toml` or `./.montage.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/montage/config.toml`
//! 5. Default values

mod file_config;
mod loader;
mod validation;

pub use file_config::{FileAllocationConfig, FileConfig, FileLoggingConfig, FileStoreConfig};
pub use loader::ConfigLoader;
pub use validation::{ConfigIssue, ConfigIssueCode, Severity};
