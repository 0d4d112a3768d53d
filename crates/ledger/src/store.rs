//! Ledger trait boundaries.

use async_trait::async_trait;
use common::{InvoiceNumber, Period};
use domain::{NotificationId, Order, PrintNotification};

use crate::Result;

/// Durable store for completed sales, keyed by invoice number, plus the
/// per-period invoice sequence.
///
/// Implementations must make `next_invoice_number` a single serializable
/// unit per period: two concurrent calls for the same period never
/// observe the same value, and values survive process restarts. The
/// serialization scope is the period — allocations for unrelated periods
/// do not contend.
#[async_trait]
pub trait OrderLedger: Send + Sync {
    /// Allocates the next invoice number for a period.
    ///
    /// Values are strictly increasing within the period, starting at 1,
    /// and are never reused. Fails with
    /// [`LedgerError::SequenceExhausted`](crate::LedgerError::SequenceExhausted)
    /// once the 4-digit space is used up.
    async fn next_invoice_number(&self, period: Period) -> Result<InvoiceNumber>;

    /// Persists one completed sale. Orders are immutable once written.
    ///
    /// Fails with
    /// [`LedgerError::DuplicateInvoice`](crate::LedgerError::DuplicateInvoice)
    /// if the invoice number is already present.
    async fn record(&self, order: &Order) -> Result<()>;

    /// Loads an order snapshot by invoice number.
    async fn get(&self, invoice_number: InvoiceNumber) -> Result<Option<Order>>;

    /// Lists all orders, most recent first. The listing is a snapshot at
    /// call time.
    async fn list_all(&self) -> Result<Vec<Order>>;
}

/// Durable store for print-notification records.
///
/// Method names are distinct from [`OrderLedger`] so a single backend can
/// implement both without call-site disambiguation.
#[async_trait]
pub trait NotificationLedger: Send + Sync {
    /// Persists one notification. Notifications are immutable once
    /// written.
    async fn record_notification(&self, notification: &PrintNotification) -> Result<()>;

    /// Loads a notification snapshot by record ID.
    async fn get_notification(&self, id: NotificationId) -> Result<Option<PrintNotification>>;

    /// Lists all notifications, most recent first.
    async fn list_notifications(&self) -> Result<Vec<PrintNotification>>;
}
