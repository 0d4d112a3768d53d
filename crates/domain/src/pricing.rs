//! The pricing calculator: cart line items + a resolved discount rate in,
//! a totals breakdown out. Pure arithmetic, no I/O.

use serde::{Deserialize, Serialize};

use crate::cart::LineItem;
use crate::discount::DiscountRate;
use crate::money::Money;

/// Computed totals for a cart.
///
/// Invariants: `final_total = subtotal + print_cost_subtotal - discount_amount`
/// and `discount_amount = (subtotal + print_cost_subtotal) x discount_rate`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricingResult {
    pub subtotal: Money,
    pub print_cost_subtotal: Money,
    pub discount_rate: DiscountRate,
    pub discount_amount: Money,
    pub final_total: Money,
}

impl PricingResult {
    /// Computes the totals for a cart at an already-resolved discount rate.
    ///
    /// Rate resolution against tier thresholds is the caller's concern;
    /// this stays a pure numeric transform. An empty item list yields an
    /// all-zero result and the rate is ignored.
    pub fn compute(items: &[LineItem], rate: DiscountRate) -> PricingResult {
        if items.is_empty() {
            return PricingResult::zero();
        }

        let subtotal: Money = items.iter().map(LineItem::line_total).sum();
        let print_cost_subtotal: Money = items
            .iter()
            .filter(|i| i.requires_print)
            .map(LineItem::print_total)
            .sum();

        let gross = subtotal + print_cost_subtotal;
        let discount_amount = rate.of(gross);

        PricingResult {
            subtotal,
            print_cost_subtotal,
            discount_rate: rate,
            discount_amount,
            final_total: gross - discount_amount,
        }
    }

    /// The all-zero result for an empty cart.
    pub fn zero() -> PricingResult {
        PricingResult {
            subtotal: Money::zero(),
            print_cost_subtotal: Money::zero(),
            discount_rate: DiscountRate::ZERO,
            discount_amount: Money::zero(),
            final_total: Money::zero(),
        }
    }
}
