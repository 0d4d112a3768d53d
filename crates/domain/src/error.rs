//! Domain error types.

use thiserror::Error;

/// Errors from validating a submitted cart or customer.
///
/// All of these are client errors: nothing has been priced, allocated,
/// or persisted when one is raised.
#[derive(Debug, Error, PartialEq)]
pub enum CartError {
    /// The cart has no line items.
    #[error("cart has no items")]
    Empty,

    /// A line item has a zero quantity.
    #[error("invalid quantity for {item:?}: {quantity} (must be at least 1)")]
    InvalidQuantity { item: String, quantity: u32 },

    /// A line item has a negative unit price.
    #[error("invalid price for {item:?}: {price} cents (must not be negative)")]
    InvalidPrice { item: String, price: i64 },

    /// A line item has a negative print cost.
    #[error("invalid print cost for {item:?}: {cost} cents (must not be negative)")]
    InvalidPrintCost { item: String, cost: i64 },

    /// A line item has a blank name.
    #[error("line item has a blank name")]
    BlankItemName,

    /// Customer name is required.
    #[error("customer name is required")]
    CustomerNameRequired,

    /// Customer email is missing or malformed.
    #[error("invalid customer email: {email:?}")]
    InvalidCustomerEmail { email: String },
}

/// Errors from a malformed discount policy or rate override.
#[derive(Debug, Error, PartialEq)]
pub enum PolicyError {
    /// A discount rate is outside `[0, 1)`.
    #[error("invalid discount rate: {rate} (must be a fraction in [0, 1))")]
    InvalidRate { rate: f64 },
}
