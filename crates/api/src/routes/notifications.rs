//! Print-notification listing and document regeneration.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use serde::Serialize;

use checkout::{InvoiceDocument, notification_filename};
use common::InvoiceNumber;
use domain::{NotificationId, PrintNotification};
use ledger::{NotificationLedger, OrderLedger};

use crate::error::ApiError;
use crate::routes::orders::AppState;
use crate::routes::pdf_response;

#[derive(Serialize)]
pub struct NotificationResponse {
    pub id: NotificationId,
    pub invoice_number: InvoiceNumber,
    pub order_date: String,
    pub customer_name: String,
    pub customer_email: String,
    pub total_print_cost_cents: i64,
}

impl From<PrintNotification> for NotificationResponse {
    fn from(n: PrintNotification) -> Self {
        Self {
            id: n.id,
            invoice_number: n.invoice_number,
            order_date: n.order_date.to_rfc3339(),
            customer_name: n.customer_name,
            customer_email: n.customer_email,
            total_print_cost_cents: n.total_print_cost.cents(),
        }
    }
}

/// GET /print-notifications — list notification records, most recent
/// first.
#[tracing::instrument(skip(state))]
pub async fn list<S: OrderLedger + NotificationLedger + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<Vec<NotificationResponse>>, ApiError> {
    let notifications = state.ledger.list_notifications().await?;
    Ok(Json(
        notifications
            .into_iter()
            .map(NotificationResponse::from)
            .collect(),
    ))
}

/// GET /print-notifications/:id/pdf — regenerate the production
/// document from the stored cart snapshot.
#[tracing::instrument(skip(state))]
pub async fn pdf<S: OrderLedger + NotificationLedger + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let uuid = uuid::Uuid::parse_str(&id)
        .map_err(|e| ApiError::BadRequest(format!("Invalid notification ID: {e}")))?;
    let id = NotificationId::from_uuid(uuid);

    let notification = state
        .ledger
        .get_notification(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Notification {id} not found")))?;

    let bytes = state
        .renderer
        .render(&InvoiceDocument::for_notification(&notification))?;
    Ok(pdf_response(&notification_filename(id), bytes))
}
