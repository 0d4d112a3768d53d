//! The checkout endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use checkout::{CheckoutRequest, DocumentOutcome};
use domain::{Cart, Customer, LineItem, Money};
use ledger::{NotificationLedger, OrderLedger};

use crate::error::ApiError;
use crate::routes::orders::AppState;
use crate::routes::pdf_response;

#[derive(Deserialize)]
pub struct CheckoutPayload {
    pub items: Vec<LineItemRequest>,
    pub customer_name: String,
    pub customer_email: String,
    /// Optional pre-resolved rate; the configured tiers apply when
    /// absent.
    pub discount_rate: Option<f64>,
}

#[derive(Deserialize)]
pub struct LineItemRequest {
    pub name: String,
    pub unit_price_cents: i64,
    pub quantity: u32,
    #[serde(default)]
    pub print_unit_cost_cents: i64,
    #[serde(default)]
    pub requires_print: bool,
}

impl From<LineItemRequest> for LineItem {
    fn from(req: LineItemRequest) -> Self {
        LineItem {
            name: req.name,
            unit_price: Money::from_cents(req.unit_price_cents),
            quantity: req.quantity,
            print_unit_cost: Money::from_cents(req.print_unit_cost_cents),
            requires_print: req.requires_print,
        }
    }
}

/// POST /checkout — price the cart, allocate an invoice number, persist
/// the order, and return the invoice PDF.
///
/// When the sale committed but rendering failed, responds `201` with
/// the invoice number and the error; the document can be re-requested
/// via `GET /orders/:invoice_number/invoice`.
#[tracing::instrument(skip(state, payload), fields(items = payload.items.len()))]
pub async fn create<S: OrderLedger + NotificationLedger + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(payload): Json<CheckoutPayload>,
) -> Result<Response, ApiError> {
    let request = CheckoutRequest {
        cart: Cart::new(payload.items.into_iter().map(LineItem::from).collect()),
        customer: Customer::new(payload.customer_name, payload.customer_email),
        discount_rate: payload.discount_rate,
    };

    let outcome = state.checkout.execute(request).await?;

    match outcome.document {
        DocumentOutcome::Rendered { filename, bytes } => {
            Ok(pdf_response(&filename, bytes).into_response())
        }
        DocumentOutcome::Failed { reason } => {
            // The order exists; report the partial success distinctly.
            let body = serde_json::json!({
                "invoice_number": outcome.order.invoice_number,
                "document_error": reason,
            });
            Ok((StatusCode::CREATED, Json(body)).into_response())
        }
    }
}
