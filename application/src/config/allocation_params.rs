//! Allocation parameters: defaults applied to reconciliation requests.
//!
//! [`AllocationParams`] groups the settings that are not part of an
//! individual request but shape every request a deployment makes: the
//! default discard strategy and an optional fixed seed for the random
//! source. These are application-layer concerns, not domain policy.

use montage_domain::DiscardStrategy;
use serde::{Deserialize, Serialize};

/// Deployment-wide allocation defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationParams {
    /// Strategy used when a request does not name one.
    pub default_strategy: DiscardStrategy,
    /// Fixed seed for the shuffle; `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl AllocationParams {
    // ==================== Builder Methods ====================

    pub fn with_default_strategy(mut self, strategy: DiscardStrategy) -> Self {
        self.default_strategy = strategy;
        self
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = AllocationParams::default();
        assert_eq!(params.default_strategy, DiscardStrategy::Random);
        assert_eq!(params.seed, None);
    }

    #[test]
    fn test_builder() {
        let params = AllocationParams::default()
            .with_default_strategy(DiscardStrategy::KeepBest)
            .with_seed(Some(42));
        assert_eq!(params.default_strategy, DiscardStrategy::KeepBest);
        assert_eq!(params.seed, Some(42));
    }
}
