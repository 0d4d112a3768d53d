//! Mail-transport collaborator boundary.
//!
//! Delivery is best-effort by design: the dispatcher records the
//! notification first and only then attempts to send, so a transport
//! failure never loses the production request.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use thiserror::Error;

use common::InvoiceNumber;
use domain::PrintNotification;

/// Errors that can occur when sending a notification email.
#[derive(Debug, Error)]
pub enum MailError {
    /// SMTP transport error.
    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    /// Failed to build the email message.
    #[error("failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    /// A configured address failed to parse.
    #[error("invalid email address: {0}")]
    InvalidAddress(String),

    /// The transport refused to accept the message.
    #[error("mail transport unavailable: {0}")]
    Unavailable(String),
}

/// SMTP connection settings, supplied out-of-band by the settings
/// collaborator.
#[derive(Debug, Clone)]
pub struct MailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub username: String,
    pub password: String,
    pub use_tls: bool,
    /// Sender address on outgoing notifications.
    pub from_address: String,
    /// Production inbox that receives print notifications.
    pub notify_address: String,
}

/// Trait for delivering print notifications by email.
#[async_trait]
pub trait MailTransport: Send + Sync {
    /// Sends a notification email. The caller treats any error as a
    /// logged, non-fatal delivery failure.
    async fn send(&self, notification: &PrintNotification) -> Result<(), MailError>;
}

#[async_trait]
impl MailTransport for Arc<dyn MailTransport> {
    async fn send(&self, notification: &PrintNotification) -> Result<(), MailError> {
        self.as_ref().send(notification).await
    }
}

/// SMTP-backed mail transport.
#[derive(Clone)]
pub struct SmtpMailTransport {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
    notify_address: String,
}

impl SmtpMailTransport {
    /// Creates a transport from SMTP configuration.
    pub fn new(config: &MailConfig) -> Result<Self, MailError> {
        let credentials = Credentials::new(config.username.clone(), config.password.clone());

        let builder = if config.use_tls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.smtp_host)
        };
        let mailer = builder
            .port(config.smtp_port)
            .credentials(credentials)
            .build();

        Ok(Self {
            mailer,
            from_address: config.from_address.clone(),
            notify_address: config.notify_address.clone(),
        })
    }

    fn body_text(notification: &PrintNotification) -> String {
        let mut body = format!(
            "Print production required for order {}\n\nCustomer: {} <{}>\nOrder date: {}\nTotal print cost: {}\n\nItems:\n",
            notification.invoice_number,
            notification.customer_name,
            notification.customer_email,
            notification.order_date.format("%Y-%m-%d %H:%M"),
            notification.total_print_cost,
        );
        for item in notification
            .order_details
            .iter()
            .filter(|i| i.requires_print)
        {
            body.push_str(&format!(
                "  - {} x{} ({} each)\n",
                item.name, item.quantity, item.print_unit_cost
            ));
        }
        body
    }
}

#[async_trait]
impl MailTransport for SmtpMailTransport {
    async fn send(&self, notification: &PrintNotification) -> Result<(), MailError> {
        let from = self
            .from_address
            .parse()
            .map_err(|_| MailError::InvalidAddress(self.from_address.clone()))?;
        let to = self
            .notify_address
            .parse()
            .map_err(|_| MailError::InvalidAddress(self.notify_address.clone()))?;

        let message = Message::builder()
            .from(from)
            .to(to)
            .subject(format!(
                "Print notification for order {}",
                notification.invoice_number
            ))
            .header(ContentType::TEXT_PLAIN)
            .body(Self::body_text(notification))?;

        self.mailer.send(message).await?;
        Ok(())
    }
}

#[derive(Debug, Default)]
struct InMemoryMailState {
    sent: Vec<InvoiceNumber>,
    fail_on_send: bool,
}

/// In-memory mail transport for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMailTransport {
    state: Arc<RwLock<InMemoryMailState>>,
}

impl InMemoryMailTransport {
    /// Creates a new in-memory mail transport.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the transport to fail on subsequent send calls.
    pub fn set_fail_on_send(&self, fail: bool) {
        self.state.write().unwrap().fail_on_send = fail;
    }

    /// Returns the number of notifications sent.
    pub fn sent_count(&self) -> usize {
        self.state.read().unwrap().sent.len()
    }

    /// Returns the invoice numbers of sent notifications, in send order.
    pub fn sent_invoices(&self) -> Vec<InvoiceNumber> {
        self.state.read().unwrap().sent.clone()
    }
}

#[async_trait]
impl MailTransport for InMemoryMailTransport {
    async fn send(&self, notification: &PrintNotification) -> Result<(), MailError> {
        let mut state = self.state.write().unwrap();

        if state.fail_on_send {
            return Err(MailError::Unavailable(
                "SMTP connection refused".to_string(),
            ));
        }

        state.sent.push(notification.invoice_number);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use domain::{Customer, LineItem, Money};

    fn notification() -> PrintNotification {
        PrintNotification::new(
            "202608-0001".parse().unwrap(),
            Utc.with_ymd_and_hms(2026, 8, 7, 9, 0, 0).unwrap(),
            &Customer::new("Ada", "ada@example.com"),
            Money::from_cents(2_000),
            vec![
                LineItem::with_print("Poster", Money::from_cents(500), 1, Money::from_cents(2_000)),
                LineItem::new("Hat", Money::from_cents(10_000), 1),
            ],
        )
    }

    #[tokio::test]
    async fn test_send_and_count() {
        let transport = InMemoryMailTransport::new();
        let n = notification();

        transport.send(&n).await.unwrap();

        assert_eq!(transport.sent_count(), 1);
        assert_eq!(transport.sent_invoices(), vec![n.invoice_number]);
    }

    #[tokio::test]
    async fn test_fail_on_send() {
        let transport = InMemoryMailTransport::new();
        transport.set_fail_on_send(true);

        let result = transport.send(&notification()).await;
        assert!(matches!(result, Err(MailError::Unavailable(_))));
        assert_eq!(transport.sent_count(), 0);
    }

    #[test]
    fn test_body_lists_only_print_items() {
        let body = SmtpMailTransport::body_text(&notification());

        assert!(body.contains("order 202608-0001"));
        assert!(body.contains("Total print cost: $20.00"));
        assert!(body.contains("Poster x1"));
        assert!(!body.contains("Hat"));
    }
}
