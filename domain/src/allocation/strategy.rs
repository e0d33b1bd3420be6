//! Quorum discard strategies
//!
//! When a round's quorum decreases, some active votes have to be retired.
//! The strategy decides which ones.

use crate::core::error::AllocationError;
use serde::{Deserialize, Serialize};

/// Policy for choosing the votes to retire on a quorum decrease
///
/// - `Random`: any candidate vote, chosen uniformly
/// - `KeepBest`: retire unrated votes before rated ones, so completed
///   judging work is preserved where possible
///
/// # Example
///
/// ```
/// use montage_domain::allocation::DiscardStrategy;
///
/// let strategy: DiscardStrategy = "keep_best".parse().unwrap();
/// assert_eq!(strategy, DiscardStrategy::KeepBest);
/// assert!("invalid".parse::<DiscardStrategy>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DiscardStrategy {
    #[default]
    Random,
    KeepBest,
}

impl DiscardStrategy {
    /// All recognized strategies
    pub const ALL: [DiscardStrategy; 2] = [DiscardStrategy::Random, DiscardStrategy::KeepBest];

    pub fn as_str(&self) -> &'static str {
        match self {
            DiscardStrategy::Random => "random",
            DiscardStrategy::KeepBest => "keep_best",
        }
    }
}

impl std::fmt::Display for DiscardStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for DiscardStrategy {
    type Err = AllocationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "random" => Ok(DiscardStrategy::Random),
            "keep_best" | "keep-best" => Ok(DiscardStrategy::KeepBest),
            other => Err(AllocationError::Configuration(format!(
                "expected one of {:?} for quorum_discard_strategy, not {:?}",
                DiscardStrategy::ALL
                    .iter()
                    .map(|s| s.as_str())
                    .collect::<Vec<_>>(),
                other
            ))),
        }
    }
}
