//! The checkout orchestrator.
//!
//! One call drives a request through validation, pricing, invoice
//! allocation, persistence, notification dispatch, and rendering. The
//! order record is the commit point: errors before it abort with no
//! side effects, errors after it degrade the outcome but never the sale.

use std::time::Duration;

use chrono::Utc;

use common::Period;
use domain::{Cart, Customer, DiscountRate, Money, Order, PricingResult, PrintNotification};
use ledger::{LedgerError, NotificationLedger, OrderLedger};

use crate::dispatch::{DeliveryStatus, DispatchOutcome, PrintNotificationDispatcher};
use crate::error::CheckoutError;
use crate::mail::MailTransport;
use crate::policy::TierPolicySource;
use crate::render::{DocumentRenderer, InvoiceDocument, invoice_filename};

/// Attempts for the allocate-and-record step before giving up.
const PERSIST_ATTEMPTS: u32 = 3;
const RETRY_BACKOFF: Duration = Duration::from_millis(50);

/// A checkout request: the cart, the customer, and an optional discount
/// override. Without an override the rate is resolved from the
/// configured tiers by total cart quantity.
#[derive(Debug, Clone)]
pub struct CheckoutRequest {
    pub cart: Cart,
    pub customer: Customer,
    pub discount_rate: Option<f64>,
}

/// What happened on the notification side channel.
#[derive(Debug, Clone)]
pub enum NotificationOutcome {
    /// No line item required production.
    Skipped,
    /// A notification was recorded; delivery may still have failed.
    Dispatched {
        notification: PrintNotification,
        delivery: DeliveryStatus,
    },
    /// The notification record itself could not be persisted. The order
    /// is committed regardless.
    Failed { reason: String },
}

/// The rendered response document, or the reason it is missing.
#[derive(Debug, Clone)]
pub enum DocumentOutcome {
    Rendered { filename: String, bytes: Vec<u8> },
    /// Rendering failed after the order was committed; the document can
    /// be re-requested by invoice number.
    Failed { reason: String },
}

/// Result of a completed checkout. The order always exists; the
/// notification and document fields report the post-commit side effects.
#[derive(Debug)]
pub struct CheckoutOutcome {
    pub order: Order,
    pub pricing: PricingResult,
    pub notification: NotificationOutcome,
    pub document: DocumentOutcome,
}

/// Orchestrates checkouts against the ledger and the external
/// collaborators.
pub struct CheckoutService<L, N, M, P, R>
where
    L: OrderLedger,
    N: NotificationLedger,
    M: MailTransport,
    P: TierPolicySource,
    R: DocumentRenderer,
{
    orders: L,
    dispatcher: PrintNotificationDispatcher<N, M>,
    policy: P,
    renderer: R,
}

impl<L, N, M, P, R> CheckoutService<L, N, M, P, R>
where
    L: OrderLedger,
    N: NotificationLedger,
    M: MailTransport,
    P: TierPolicySource,
    R: DocumentRenderer,
{
    /// Creates a new checkout service.
    pub fn new(orders: L, notifications: N, mail: M, policy: P, renderer: R) -> Self {
        Self {
            orders,
            dispatcher: PrintNotificationDispatcher::new(notifications, mail),
            policy,
            renderer,
        }
    }

    /// Executes one checkout.
    #[tracing::instrument(skip(self, request), fields(items = request.cart.items.len()))]
    pub async fn execute(
        &self,
        request: CheckoutRequest,
    ) -> Result<CheckoutOutcome, CheckoutError> {
        metrics::counter!("checkout_total").increment(1);
        let start = std::time::Instant::now();

        // Validating
        request.cart.validate()?;
        request.customer.validate()?;

        // Pricing: an explicit override wins, otherwise resolve against
        // the configured tiers by total cart quantity.
        let rate = match request.discount_rate {
            Some(fraction) => DiscountRate::from_fraction(fraction)
                .map_err(CheckoutError::InvalidDiscountOverride)?,
            None => self
                .policy
                .tiers()
                .await?
                .resolve(request.cart.total_quantity())?,
        };
        let pricing = PricingResult::compute(&request.cart.items, rate);

        // Allocating + Persisting. Once record succeeds the sale is
        // committed and nothing below can fail the checkout.
        let order_date = Utc::now();
        let order = self
            .allocate_and_record(&request.customer, order_date, pricing.final_total)
            .await?;
        tracing::info!(
            invoice = %order.invoice_number,
            total = %pricing.final_total,
            "order committed"
        );

        // Notifying: the side channel cannot roll back the sale.
        let notification = match self
            .dispatcher
            .dispatch(
                order.invoice_number,
                order_date,
                &request.cart.items,
                &request.customer,
            )
            .await
        {
            Ok(DispatchOutcome::Skipped) => NotificationOutcome::Skipped,
            Ok(DispatchOutcome::Dispatched {
                notification,
                delivery,
            }) => NotificationOutcome::Dispatched {
                notification,
                delivery,
            },
            Err(e) => {
                tracing::error!(error = %e, "notification record failed after commit");
                NotificationOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        };

        // Rendering: runs after all ledger calls have returned, so no
        // storage lock is held while the document is produced.
        let document = InvoiceDocument::for_checkout(&order, &request.cart.items, &pricing);
        let document = match self.renderer.render(&document) {
            Ok(bytes) => DocumentOutcome::Rendered {
                filename: invoice_filename(order.invoice_number),
                bytes,
            },
            Err(e) => {
                metrics::counter!("invoice_render_failures").increment(1);
                tracing::warn!(error = %e, "invoice rendering failed after commit");
                DocumentOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        };

        metrics::histogram!("checkout_duration_seconds").record(start.elapsed().as_secs_f64());
        Ok(CheckoutOutcome {
            order,
            pricing,
            notification,
            document,
        })
    }

    /// Allocates an invoice number and records the order, with bounded
    /// retry. A duplicate on record means another writer got there with
    /// the same number; retry with a freshly allocated one rather than
    /// surfacing the collision.
    async fn allocate_and_record(
        &self,
        customer: &Customer,
        order_date: chrono::DateTime<Utc>,
        total: Money,
    ) -> Result<Order, CheckoutError> {
        let period = Period::from_date(order_date);
        let mut attempt = 0;

        loop {
            attempt += 1;

            let invoice_number = match self.orders.next_invoice_number(period).await {
                Ok(number) => number,
                Err(e @ LedgerError::Database(_)) if attempt < PERSIST_ATTEMPTS => {
                    tracing::warn!(attempt, error = %e, "invoice allocation failed, retrying");
                    tokio::time::sleep(RETRY_BACKOFF * attempt).await;
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            let order = Order::new(invoice_number, order_date, total, customer);
            match self.orders.record(&order).await {
                Ok(()) => return Ok(order),
                Err(e @ (LedgerError::DuplicateInvoice(_) | LedgerError::Database(_)))
                    if attempt < PERSIST_ATTEMPTS =>
                {
                    tracing::warn!(attempt, error = %e, "order record failed, retrying");
                    tokio::time::sleep(RETRY_BACKOFF * attempt).await;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
}
