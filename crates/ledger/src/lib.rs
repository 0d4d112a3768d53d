//! Storage layer for the order-processing backend.
//!
//! Two trait boundaries — [`OrderLedger`] for completed sales plus
//! invoice-number allocation, [`NotificationLedger`] for print
//! notifications — with an in-memory backend for tests/dev and a
//! PostgreSQL backend for production.

pub mod error;
pub mod memory;
pub mod postgres;
pub mod store;

pub use error::{LedgerError, Result};
pub use memory::InMemoryLedger;
pub use postgres::PostgresLedger;
pub use store::{NotificationLedger, OrderLedger};
