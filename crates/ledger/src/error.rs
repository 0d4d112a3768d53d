use common::{InvoiceNumber, InvoiceNumberError, Period};
use thiserror::Error;

/// Errors that can occur when interacting with the ledger.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// An order with this invoice number already exists. With correct
    /// sequencing this should not happen; callers treat it as a signal
    /// to re-allocate and retry.
    #[error("duplicate invoice number: {0}")]
    DuplicateInvoice(InvoiceNumber),

    /// The period has used all 9999 sequence values.
    #[error("invoice sequence exhausted for period {period}")]
    SequenceExhausted { period: Period },

    /// A stored invoice number failed to parse back.
    #[error("corrupt invoice number in ledger: {0}")]
    InvalidInvoiceNumber(#[from] InvoiceNumberError),

    /// A database error occurred.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A serialization/deserialization error occurred.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for ledger operations.
pub type Result<T> = std::result::Result<T, LedgerError>;
