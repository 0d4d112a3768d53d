//! Print-notification side channel.
//!
//! The durable record is the source of truth; email is a convenience.
//! Dispatch persists first and only then attempts delivery, capturing
//! the transport outcome as a value instead of an error.

use chrono::{DateTime, Utc};

use common::InvoiceNumber;
use domain::{Customer, LineItem, Money, PrintNotification};
use ledger::{LedgerError, NotificationLedger};

use crate::mail::MailTransport;

/// Outcome of the best-effort email attempt. Consumed for logging and
/// reporting only — never propagated as a fatal error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryStatus {
    /// The transport accepted the message.
    Sent,
    /// The transport failed; the notification record is still durable.
    Failed(String),
}

/// Result of a dispatch call.
#[derive(Debug, Clone)]
pub enum DispatchOutcome {
    /// No line item requires production; nothing was persisted.
    Skipped,
    /// A notification was recorded and delivery was attempted.
    Dispatched {
        notification: PrintNotification,
        delivery: DeliveryStatus,
    },
}

/// Detects production-requiring line items, persists a notification
/// record, and attempts best-effort email delivery.
///
/// The caller guarantees at most one dispatch per checkout; the
/// dispatcher does not deduplicate by invoice number.
pub struct PrintNotificationDispatcher<N, M>
where
    N: NotificationLedger,
    M: MailTransport,
{
    notifications: N,
    mail: M,
}

impl<N, M> PrintNotificationDispatcher<N, M>
where
    N: NotificationLedger,
    M: MailTransport,
{
    /// Creates a new dispatcher.
    pub fn new(notifications: N, mail: M) -> Self {
        Self {
            notifications,
            mail,
        }
    }

    /// Dispatches the print notification for one checkout, if any line
    /// item requires production.
    ///
    /// The full cart snapshot is stored verbatim so the production
    /// document can be regenerated later. An error here means the
    /// notification record could not be persisted; transport failures
    /// are folded into the outcome.
    #[tracing::instrument(skip(self, items, customer), fields(invoice = %invoice_number))]
    pub async fn dispatch(
        &self,
        invoice_number: InvoiceNumber,
        order_date: DateTime<Utc>,
        items: &[LineItem],
        customer: &Customer,
    ) -> Result<DispatchOutcome, LedgerError> {
        if !items.iter().any(|item| item.requires_print) {
            return Ok(DispatchOutcome::Skipped);
        }

        let total_print_cost: Money = items
            .iter()
            .filter(|item| item.requires_print)
            .map(LineItem::print_total)
            .sum();

        let notification = PrintNotification::new(
            invoice_number,
            order_date,
            customer,
            total_print_cost,
            items.to_vec(),
        );
        self.notifications.record_notification(&notification).await?;
        metrics::counter!("print_notifications_recorded").increment(1);

        let delivery = match self.mail.send(&notification).await {
            Ok(()) => DeliveryStatus::Sent,
            Err(e) => {
                metrics::counter!("print_notification_mail_failures").increment(1);
                tracing::warn!(error = %e, "notification email failed, record kept");
                DeliveryStatus::Failed(e.to_string())
            }
        };

        Ok(DispatchOutcome::Dispatched {
            notification,
            delivery,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mail::InMemoryMailTransport;
    use chrono::TimeZone;
    use ledger::InMemoryLedger;

    fn setup() -> (
        PrintNotificationDispatcher<InMemoryLedger, InMemoryMailTransport>,
        InMemoryLedger,
        InMemoryMailTransport,
    ) {
        let store = InMemoryLedger::new();
        let mail = InMemoryMailTransport::new();
        let dispatcher = PrintNotificationDispatcher::new(store.clone(), mail.clone());
        (dispatcher, store, mail)
    }

    fn invoice() -> InvoiceNumber {
        "202608-0001".parse().unwrap()
    }

    fn date() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 7, 10, 0, 0).unwrap()
    }

    fn customer() -> Customer {
        Customer::new("Ada Lovelace", "ada@example.com")
    }

    #[tokio::test]
    async fn test_skipped_without_print_items() {
        let (dispatcher, store, mail) = setup();
        let items = vec![LineItem::new("Hat", Money::from_dollars(100), 2)];

        let outcome = dispatcher
            .dispatch(invoice(), date(), &items, &customer())
            .await
            .unwrap();

        assert!(matches!(outcome, DispatchOutcome::Skipped));
        assert_eq!(store.notification_count().await, 0);
        assert_eq!(mail.sent_count(), 0);
    }

    #[tokio::test]
    async fn test_dispatch_records_and_sends() {
        let (dispatcher, store, mail) = setup();
        let items = vec![
            LineItem::new("Hat", Money::from_dollars(100), 1),
            LineItem::with_print("Poster", Money::from_dollars(45), 3, Money::from_dollars(5)),
        ];

        let outcome = dispatcher
            .dispatch(invoice(), date(), &items, &customer())
            .await
            .unwrap();

        let DispatchOutcome::Dispatched {
            notification,
            delivery,
        } = outcome
        else {
            panic!("expected Dispatched");
        };
        assert_eq!(delivery, DeliveryStatus::Sent);
        assert_eq!(notification.total_print_cost, Money::from_cents(1_500));
        // The snapshot keeps the whole cart, not just print items.
        assert_eq!(notification.order_details.len(), 2);

        assert_eq!(store.notification_count().await, 1);
        assert_eq!(mail.sent_invoices(), vec![invoice()]);
    }

    #[tokio::test]
    async fn test_mail_failure_keeps_record() {
        let (dispatcher, store, mail) = setup();
        mail.set_fail_on_send(true);
        let items = vec![LineItem::with_print(
            "Poster",
            Money::from_dollars(100),
            1,
            Money::from_dollars(20),
        )];

        let outcome = dispatcher
            .dispatch(invoice(), date(), &items, &customer())
            .await
            .unwrap();

        let DispatchOutcome::Dispatched { delivery, .. } = outcome else {
            panic!("expected Dispatched");
        };
        assert!(matches!(delivery, DeliveryStatus::Failed(_)));
        assert_eq!(store.notification_count().await, 1);
        assert_eq!(mail.sent_count(), 0);
    }

    #[tokio::test]
    async fn test_print_cost_counts_only_flagged_items() {
        let (dispatcher, _, _) = setup();
        // Unflagged item carries a print cost that must be ignored.
        let mut hat = LineItem::new("Hat", Money::from_dollars(100), 2);
        hat.print_unit_cost = Money::from_dollars(50);
        let items = vec![
            hat,
            LineItem::with_print("Poster", Money::from_dollars(45), 2, Money::from_dollars(5)),
        ];

        let outcome = dispatcher
            .dispatch(invoice(), date(), &items, &customer())
            .await
            .unwrap();

        let DispatchOutcome::Dispatched { notification, .. } = outcome else {
            panic!("expected Dispatched");
        };
        assert_eq!(notification.total_print_cost, Money::from_cents(1_000));
    }
}
