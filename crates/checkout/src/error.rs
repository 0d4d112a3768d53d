//! Checkout error types.

use domain::{CartError, PolicyError};
use ledger::LedgerError;
use thiserror::Error;

/// Errors that abort a checkout.
///
/// Everything here is raised before the order is committed; once
/// `record` succeeds the checkout cannot fail, only degrade to a
/// partial-success outcome (see
/// [`CheckoutOutcome`](crate::CheckoutOutcome)).
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The submitted cart or customer failed validation.
    #[error("invalid checkout request: {0}")]
    Validation(#[from] CartError),

    /// The caller-supplied discount override is not a valid fraction.
    #[error("invalid discount override: {0}")]
    InvalidDiscountOverride(PolicyError),

    /// The configured discount policy is malformed.
    #[error("invalid discount policy: {0}")]
    Policy(#[from] PolicyError),

    /// The ledger failed before the order could be committed.
    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),
}
