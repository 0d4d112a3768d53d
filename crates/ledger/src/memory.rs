use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};

use common::{InvoiceNumber, Period, SEQUENCE_MAX};
use domain::{NotificationId, Order, PrintNotification};

use crate::error::LedgerError;
use crate::store::{NotificationLedger, OrderLedger};
use crate::Result;

/// In-memory ledger implementation for tests and local development.
///
/// Provides the same interface as the PostgreSQL implementation. The
/// sequence map is guarded by its own mutex; the critical section is a
/// bare integer increment, so allocation never blocks on order I/O.
#[derive(Clone, Default)]
pub struct InMemoryLedger {
    orders: Arc<RwLock<HashMap<InvoiceNumber, Order>>>,
    sequences: Arc<Mutex<HashMap<Period, u32>>>,
    notifications: Arc<RwLock<Vec<PrintNotification>>>,
}

impl InMemoryLedger {
    /// Creates a new empty in-memory ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of recorded orders.
    pub async fn order_count(&self) -> usize {
        self.orders.read().await.len()
    }

    /// Returns the number of recorded notifications.
    pub async fn notification_count(&self) -> usize {
        self.notifications.read().await.len()
    }

    /// Pre-seeds the sequence counter for a period, as if that many
    /// numbers had already been allocated.
    pub async fn seed_sequence(&self, period: Period, last_value: u32) {
        self.sequences.lock().await.insert(period, last_value);
    }

    /// Clears all orders, notifications, and sequence state.
    pub async fn clear(&self) {
        self.orders.write().await.clear();
        self.sequences.lock().await.clear();
        self.notifications.write().await.clear();
    }
}

#[async_trait]
impl OrderLedger for InMemoryLedger {
    async fn next_invoice_number(&self, period: Period) -> Result<InvoiceNumber> {
        let mut sequences = self.sequences.lock().await;
        let last = sequences.entry(period).or_insert(0);
        if *last >= SEQUENCE_MAX {
            return Err(LedgerError::SequenceExhausted { period });
        }
        *last += 1;
        Ok(InvoiceNumber::new(period, *last)?)
    }

    async fn record(&self, order: &Order) -> Result<()> {
        let mut orders = self.orders.write().await;
        if orders.contains_key(&order.invoice_number) {
            return Err(LedgerError::DuplicateInvoice(order.invoice_number));
        }
        orders.insert(order.invoice_number, order.clone());
        Ok(())
    }

    async fn get(&self, invoice_number: InvoiceNumber) -> Result<Option<Order>> {
        let orders = self.orders.read().await;
        Ok(orders.get(&invoice_number).cloned())
    }

    async fn list_all(&self) -> Result<Vec<Order>> {
        let orders = self.orders.read().await;
        let mut all: Vec<Order> = orders.values().cloned().collect();
        all.sort_by(|a, b| {
            b.order_date
                .cmp(&a.order_date)
                .then(b.invoice_number.cmp(&a.invoice_number))
        });
        Ok(all)
    }
}

#[async_trait]
impl NotificationLedger for InMemoryLedger {
    async fn record_notification(&self, notification: &PrintNotification) -> Result<()> {
        let mut notifications = self.notifications.write().await;
        notifications.push(notification.clone());
        Ok(())
    }

    async fn get_notification(&self, id: NotificationId) -> Result<Option<PrintNotification>> {
        let notifications = self.notifications.read().await;
        Ok(notifications.iter().find(|n| n.id == id).cloned())
    }

    async fn list_notifications(&self) -> Result<Vec<PrintNotification>> {
        let notifications = self.notifications.read().await;
        let mut all = notifications.clone();
        all.sort_by(|a, b| b.order_date.cmp(&a.order_date));
        Ok(all)
    }
}
