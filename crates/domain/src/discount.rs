//! Discount-tier policy and validated discount rates.
//!
//! The tier configuration is owned by an external settings collaborator;
//! this module only consumes it. Rates are converted to basis points once
//! at the boundary so that discount application stays in integer math.

use serde::{Deserialize, Serialize};

use crate::error::PolicyError;
use crate::money::Money;

const BASIS_POINTS_PER_UNIT: u32 = 10_000;

/// A validated discount rate, stored in basis points (1/100th of a percent).
///
/// `DiscountRate::from_fraction(0.05)` is 500 basis points. Construction
/// fails outside `[0, 1)`, so a rate in hand is always applicable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct DiscountRate {
    basis_points: u32,
}

impl DiscountRate {
    /// The zero rate applied below the first tier.
    pub const ZERO: DiscountRate = DiscountRate { basis_points: 0 };

    /// Creates a rate from a fraction in `[0, 1)`.
    pub fn from_fraction(rate: f64) -> Result<Self, PolicyError> {
        if !rate.is_finite() || !(0.0..1.0).contains(&rate) {
            return Err(PolicyError::InvalidRate { rate });
        }
        let basis_points = (rate * f64::from(BASIS_POINTS_PER_UNIT)).round() as u32;
        // 0.99999… rounds up to a full unit; still out of range.
        if basis_points >= BASIS_POINTS_PER_UNIT {
            return Err(PolicyError::InvalidRate { rate });
        }
        Ok(Self { basis_points })
    }

    /// Returns the rate as a fraction.
    pub fn as_fraction(&self) -> f64 {
        f64::from(self.basis_points) / f64::from(BASIS_POINTS_PER_UNIT)
    }

    /// Returns true if this is the zero rate.
    pub fn is_zero(&self) -> bool {
        self.basis_points == 0
    }

    /// Applies the rate to an amount, rounding half away from zero.
    pub fn of(&self, amount: Money) -> Money {
        let numerator = i128::from(amount.cents()) * i128::from(self.basis_points);
        let denominator = i128::from(BASIS_POINTS_PER_UNIT);
        let half = denominator / 2;
        let rounded = if numerator >= 0 {
            (numerator + half) / denominator
        } else {
            (numerator - half) / denominator
        };
        Money::from_cents(rounded as i64)
    }
}

impl Default for DiscountRate {
    fn default() -> Self {
        Self::ZERO
    }
}

impl std::fmt::Display for DiscountRate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.basis_points % 100 == 0 {
            write!(f, "{}%", self.basis_points / 100)
        } else {
            write!(f, "{:.2}%", f64::from(self.basis_points) / 100.0)
        }
    }
}

impl TryFrom<f64> for DiscountRate {
    type Error = PolicyError;

    fn try_from(rate: f64) -> Result<Self, Self::Error> {
        Self::from_fraction(rate)
    }
}

impl From<DiscountRate> for f64 {
    fn from(rate: DiscountRate) -> Self {
        rate.as_fraction()
    }
}

/// Quantity-threshold discount tiers as supplied by the settings
/// collaborator.
///
/// Field names match the settings wire format. The core does not enforce
/// `tier2_quantity > tier1_quantity` or rate monotonicity; resolution
/// checks the higher tier first so inverted configurations degrade
/// gracefully.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiscountTiers {
    pub tier1_quantity: u32,
    pub tier1_discount: f64,
    pub tier2_quantity: u32,
    pub tier2_discount: f64,
}

impl DiscountTiers {
    /// Resolves the applicable rate for a total cart quantity.
    ///
    /// The highest tier whose threshold is met wins; below the first
    /// tier the rate is zero. Fails if the configured rate for the
    /// selected tier is not a valid fraction.
    pub fn resolve(&self, total_quantity: u32) -> Result<DiscountRate, PolicyError> {
        if total_quantity >= self.tier2_quantity {
            DiscountRate::from_fraction(self.tier2_discount)
        } else if total_quantity >= self.tier1_quantity {
            DiscountRate::from_fraction(self.tier1_discount)
        } else {
            Ok(DiscountRate::ZERO)
        }
    }
}

impl Default for DiscountTiers {
    /// The seed configuration shipped with the original store: 5% from
    /// 5 items, 10% from 10 items.
    fn default() -> Self {
        Self {
            tier1_quantity: 5,
            tier1_discount: 0.05,
            tier2_quantity: 10,
            tier2_discount: 0.10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_from_fraction() {
        let rate = DiscountRate::from_fraction(0.05).unwrap();
        assert_eq!(rate.as_fraction(), 0.05);
        assert!(!rate.is_zero());
    }

    #[test]
    fn test_rate_rejects_out_of_range() {
        assert!(DiscountRate::from_fraction(-0.01).is_err());
        assert!(DiscountRate::from_fraction(1.0).is_err());
        assert!(DiscountRate::from_fraction(1.5).is_err());
        assert!(DiscountRate::from_fraction(f64::NAN).is_err());
        assert!(DiscountRate::from_fraction(0.99999).is_err());
    }

    #[test]
    fn test_rate_application_is_exact() {
        let rate = DiscountRate::from_fraction(0.10).unwrap();
        assert_eq!(rate.of(Money::from_cents(12_000)).cents(), 1200);

        let rate = DiscountRate::from_fraction(0.05).unwrap();
        assert_eq!(rate.of(Money::from_cents(10_000)).cents(), 500);
    }

    #[test]
    fn test_rate_application_rounds_half_up() {
        // 1% of 50 cents = 0.5 cents, rounds to 1
        let rate = DiscountRate::from_fraction(0.01).unwrap();
        assert_eq!(rate.of(Money::from_cents(50)).cents(), 1);
        assert_eq!(rate.of(Money::from_cents(49)).cents(), 0);
    }

    #[test]
    fn test_rate_display() {
        assert_eq!(DiscountRate::from_fraction(0.10).unwrap().to_string(), "10%");
        assert_eq!(DiscountRate::ZERO.to_string(), "0%");
        assert_eq!(
            DiscountRate::from_fraction(0.125).unwrap().to_string(),
            "12.50%"
        );
    }

    #[test]
    fn test_rate_serialization_as_fraction() {
        let rate = DiscountRate::from_fraction(0.10).unwrap();
        let json = serde_json::to_string(&rate).unwrap();
        assert_eq!(json, "0.1");
        let parsed: DiscountRate = serde_json::from_str("0.05").unwrap();
        assert_eq!(parsed, DiscountRate::from_fraction(0.05).unwrap());
    }

    #[test]
    fn test_tier_resolution() {
        let tiers = DiscountTiers::default();

        assert!(tiers.resolve(1).unwrap().is_zero());
        assert!(tiers.resolve(4).unwrap().is_zero());
        assert_eq!(
            tiers.resolve(5).unwrap(),
            DiscountRate::from_fraction(0.05).unwrap()
        );
        assert_eq!(
            tiers.resolve(9).unwrap(),
            DiscountRate::from_fraction(0.05).unwrap()
        );
        assert_eq!(
            tiers.resolve(10).unwrap(),
            DiscountRate::from_fraction(0.10).unwrap()
        );
        assert_eq!(
            tiers.resolve(250).unwrap(),
            DiscountRate::from_fraction(0.10).unwrap()
        );
    }

    #[test]
    fn test_tier_resolution_prefers_tier2_when_both_qualify() {
        let tiers = DiscountTiers {
            tier1_quantity: 2,
            tier1_discount: 0.05,
            tier2_quantity: 2,
            tier2_discount: 0.10,
        };
        assert_eq!(
            tiers.resolve(2).unwrap(),
            DiscountRate::from_fraction(0.10).unwrap()
        );
    }

    #[test]
    fn test_tier_resolution_surfaces_bad_configured_rate() {
        let tiers = DiscountTiers {
            tier1_quantity: 5,
            tier1_discount: 1.5,
            tier2_quantity: 10,
            tier2_discount: 0.10,
        };
        assert!(tiers.resolve(5).is_err());
        // Tier 2 is still usable.
        assert!(tiers.resolve(10).is_ok());
    }
}
