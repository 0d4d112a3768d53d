//! Order query endpoints and shared application state.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use serde::Serialize;

use checkout::{
    CheckoutService, DocumentRenderer, InvoiceDocument, MailTransport, TierPolicySource,
    invoice_filename,
};
use common::InvoiceNumber;
use domain::Order;
use ledger::{NotificationLedger, OrderLedger};

use crate::error::ApiError;
use crate::routes::pdf_response;

/// Shared application state accessible from all handlers.
///
/// The store backend implements both ledger traits; the external
/// collaborators are held behind trait objects so the handlers stay
/// generic over the store only.
pub struct AppState<S>
where
    S: OrderLedger + NotificationLedger + Clone,
{
    pub checkout: CheckoutService<
        S,
        S,
        Arc<dyn MailTransport>,
        Arc<dyn TierPolicySource>,
        Arc<dyn DocumentRenderer>,
    >,
    pub ledger: S,
    pub policy: Arc<dyn TierPolicySource>,
    pub renderer: Arc<dyn DocumentRenderer>,
}

#[derive(Serialize)]
pub struct OrderResponse {
    pub invoice_number: InvoiceNumber,
    pub order_date: String,
    pub total_cents: i64,
    pub customer_name: String,
    pub customer_email: String,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        Self {
            invoice_number: order.invoice_number,
            order_date: order.order_date.to_rfc3339(),
            total_cents: order.total_amount.cents(),
            customer_name: order.customer_name,
            customer_email: order.customer_email,
        }
    }
}

/// GET /orders — list the ledger, most recent first.
#[tracing::instrument(skip(state))]
pub async fn list<S: OrderLedger + NotificationLedger + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<Vec<OrderResponse>>, ApiError> {
    let orders = state.ledger.list_all().await?;
    Ok(Json(orders.into_iter().map(OrderResponse::from).collect()))
}

/// GET /orders/:invoice_number — load one order.
#[tracing::instrument(skip(state))]
pub async fn get<S: OrderLedger + NotificationLedger + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(invoice_number): Path<String>,
) -> Result<Json<OrderResponse>, ApiError> {
    let invoice_number = parse_invoice_number(&invoice_number)?;
    let order = state
        .ledger
        .get(invoice_number)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Order {invoice_number} not found")))?;

    Ok(Json(OrderResponse::from(order)))
}

/// GET /orders/:invoice_number/invoice — re-render the invoice PDF from
/// the ledger record. This is the retry path after a rendering failure
/// at checkout.
#[tracing::instrument(skip(state))]
pub async fn invoice_pdf<S: OrderLedger + NotificationLedger + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(invoice_number): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let invoice_number = parse_invoice_number(&invoice_number)?;
    let order = state
        .ledger
        .get(invoice_number)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Order {invoice_number} not found")))?;

    let bytes = state.renderer.render(&InvoiceDocument::for_order(&order))?;
    Ok(pdf_response(&invoice_filename(invoice_number), bytes))
}

pub(crate) fn parse_invoice_number(s: &str) -> Result<InvoiceNumber, ApiError> {
    s.parse()
        .map_err(|e| ApiError::BadRequest(format!("Invalid invoice number: {e}")))
}
