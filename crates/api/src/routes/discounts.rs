//! Discount-settings read endpoint.
//!
//! The storefront reads the tiers to show discount hints in the cart;
//! the configuration itself is owned elsewhere.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;

use domain::DiscountTiers;
use ledger::{NotificationLedger, OrderLedger};

use crate::error::ApiError;
use crate::routes::orders::AppState;

/// GET /discount-settings — the tiers as consumed by checkout.
#[tracing::instrument(skip(state))]
pub async fn get<S: OrderLedger + NotificationLedger + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<DiscountTiers>, ApiError> {
    let tiers = state
        .policy
        .tiers()
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    Ok(Json(tiers))
}
