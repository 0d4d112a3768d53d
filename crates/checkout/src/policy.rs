//! Discount-tier policy collaborator boundary.
//!
//! Tier configuration is owned by the catalog/settings side of the
//! system; the checkout core only reads it.

use async_trait::async_trait;
use domain::{DiscountTiers, PolicyError};

/// Source of the discount-tier configuration.
#[async_trait]
pub trait TierPolicySource: Send + Sync {
    /// Returns the current tier configuration.
    async fn tiers(&self) -> Result<DiscountTiers, PolicyError>;
}

#[async_trait]
impl TierPolicySource for std::sync::Arc<dyn TierPolicySource> {
    async fn tiers(&self) -> Result<DiscountTiers, PolicyError> {
        self.as_ref().tiers().await
    }
}

/// Fixed tier configuration.
#[derive(Debug, Clone, Default)]
pub struct StaticTierPolicy {
    tiers: DiscountTiers,
}

impl StaticTierPolicy {
    /// Creates a policy source that always returns the given tiers.
    pub fn new(tiers: DiscountTiers) -> Self {
        Self { tiers }
    }
}

#[async_trait]
impl TierPolicySource for StaticTierPolicy {
    async fn tiers(&self) -> Result<DiscountTiers, PolicyError> {
        Ok(self.tiers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_policy_returns_configured_tiers() {
        let tiers = DiscountTiers {
            tier1_quantity: 3,
            tier1_discount: 0.02,
            tier2_quantity: 6,
            tier2_discount: 0.08,
        };
        let policy = StaticTierPolicy::new(tiers);

        assert_eq!(policy.tiers().await.unwrap(), tiers);
    }

    #[tokio::test]
    async fn test_default_matches_seed_configuration() {
        let tiers = StaticTierPolicy::default().tiers().await.unwrap();
        assert_eq!(tiers.tier1_quantity, 5);
        assert_eq!(tiers.tier2_quantity, 10);
    }
}
