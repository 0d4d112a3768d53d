//! Record types persisted by the ledger.
//!
//! Both records are immutable once written; the ledger hands out
//! snapshots, never mutable references.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::cart::{Customer, LineItem};
use crate::money::Money;
use common::InvoiceNumber;

/// Unique identifier for a print-notification record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotificationId(Uuid);

impl NotificationId {
    /// Creates a new random notification ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a notification ID from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for NotificationId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for NotificationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for NotificationId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// One completed sale, keyed by its invoice number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub invoice_number: InvoiceNumber,
    pub order_date: DateTime<Utc>,
    pub total_amount: Money,
    pub customer_name: String,
    pub customer_email: String,
}

impl Order {
    pub fn new(
        invoice_number: InvoiceNumber,
        order_date: DateTime<Utc>,
        total_amount: Money,
        customer: &Customer,
    ) -> Self {
        Self {
            invoice_number,
            order_date,
            total_amount,
            customer_name: customer.name.clone(),
            customer_email: customer.email.clone(),
        }
    }
}

/// Durable record of a production request for an order's print-requiring
/// items.
///
/// `invoice_number` is a weak back-reference to the order, not an
/// enforced foreign key. `order_details` holds the original cart payload
/// verbatim so the production document can be regenerated later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrintNotification {
    pub id: NotificationId,
    pub invoice_number: InvoiceNumber,
    pub order_date: DateTime<Utc>,
    pub customer_name: String,
    pub customer_email: String,
    pub total_print_cost: Money,
    pub order_details: Vec<LineItem>,
}

impl PrintNotification {
    pub fn new(
        invoice_number: InvoiceNumber,
        order_date: DateTime<Utc>,
        customer: &Customer,
        total_print_cost: Money,
        order_details: Vec<LineItem>,
    ) -> Self {
        Self {
            id: NotificationId::new(),
            invoice_number,
            order_date,
            customer_name: customer.name.clone(),
            customer_email: customer.email.clone(),
            total_print_cost,
            order_details,
        }
    }
}
