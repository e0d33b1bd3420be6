//! Allocation configuration from TOML (`[allocation]` section)

use crate::config::validation::{ConfigIssue, ConfigIssueCode, Severity};
use montage_application::AllocationParams;
use montage_domain::DiscardStrategy;
use serde::{Deserialize, Serialize};

/// Raw allocation configuration from TOML
///
/// # Example
///
/// ```toml
/// [allocation]
/// strategy = "keep_best"   # "random" or "keep_best"
/// seed = 42                # omit for a fresh shuffle every run
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAllocationConfig {
    /// Default discard strategy for quorum decreases
    pub strategy: String,
    /// Fixed seed for the entry shuffle
    pub seed: Option<u64>,
}

impl Default for FileAllocationConfig {
    fn default() -> Self {
        Self {
            strategy: DiscardStrategy::default().to_string(),
            seed: None,
        }
    }
}

impl FileAllocationConfig {
    /// Parse the strategy string, returning warnings on failure.
    pub fn parse_strategy(&self) -> (DiscardStrategy, Vec<ConfigIssue>) {
        match self.strategy.parse::<DiscardStrategy>() {
            Ok(strategy) => (strategy, vec![]),
            Err(_) => {
                let issue = ConfigIssue {
                    severity: Severity::Warning,
                    code: ConfigIssueCode::InvalidEnumValue {
                        field: "allocation.strategy".to_string(),
                        value: self.strategy.clone(),
                        valid_values: DiscardStrategy::ALL
                            .iter()
                            .map(|s| s.to_string())
                            .collect(),
                    },
                    message: format!(
                        "allocation.strategy: unknown value '{}', falling back to '{}'",
                        self.strategy,
                        DiscardStrategy::default()
                    ),
                };
                (DiscardStrategy::default(), vec![issue])
            }
        }
    }

    /// Convert to application-layer [`AllocationParams`]
    pub fn to_params(&self) -> AllocationParams {
        AllocationParams::default()
            .with_default_strategy(self.parse_strategy().0)
            .with_seed(self.seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_strategy_aliases() {
        let config = FileAllocationConfig {
            strategy: "keep-best".to_string(),
            seed: None,
        };
        let (strategy, issues) = config.parse_strategy();
        assert_eq!(strategy, DiscardStrategy::KeepBest);
        assert!(issues.is_empty());
    }

    #[test]
    fn test_parse_strategy_unknown_falls_back() {
        let config = FileAllocationConfig {
            strategy: "worst_first".to_string(),
            seed: Some(1),
        };
        let (strategy, issues) = config.parse_strategy();
        assert_eq!(strategy, DiscardStrategy::Random);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Warning);

        let params = config.to_params();
        assert_eq!(params.default_strategy, DiscardStrategy::Random);
        assert_eq!(params.seed, Some(1));
    }
}
