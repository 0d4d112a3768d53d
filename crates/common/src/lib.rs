//! Shared identifier types used across the order-processing crates.

pub mod types;

pub use types::{InvoiceNumber, InvoiceNumberError, Period, SEQUENCE_MAX};
