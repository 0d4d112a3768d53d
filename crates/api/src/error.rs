//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use checkout::{CheckoutError, RenderError};
use ledger::LedgerError;

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Resource not found.
    NotFound(String),
    /// Bad request from the client.
    BadRequest(String),
    /// Checkout failed before the order was committed.
    Checkout(CheckoutError),
    /// Ledger fault on the query side.
    Ledger(LedgerError),
    /// Document regeneration failed.
    Render(RenderError),
    /// Internal server error.
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Checkout(err) => checkout_error_to_response(err),
            ApiError::Ledger(err) => ledger_error_to_response(err),
            ApiError::Render(err) => (StatusCode::BAD_GATEWAY, err.to_string()),
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        let body = serde_json::json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}

fn checkout_error_to_response(err: CheckoutError) -> (StatusCode, String) {
    let message = err.to_string();
    match err {
        // Client-side input problems: nothing was persisted.
        CheckoutError::Validation(_) | CheckoutError::InvalidDiscountOverride(_) => {
            (StatusCode::BAD_REQUEST, message)
        }
        // The configured policy is the operator's problem, not the
        // caller's.
        CheckoutError::Policy(_) => {
            tracing::error!(error = %message, "discount policy rejected");
            (StatusCode::INTERNAL_SERVER_ERROR, message)
        }
        CheckoutError::Ledger(ledger_err) => ledger_status(&ledger_err, message),
    }
}

fn ledger_error_to_response(err: LedgerError) -> (StatusCode, String) {
    let message = err.to_string();
    ledger_status(&err, message)
}

fn ledger_status(err: &LedgerError, message: String) -> (StatusCode, String) {
    match err {
        LedgerError::SequenceExhausted { .. } => (StatusCode::SERVICE_UNAVAILABLE, message),
        LedgerError::DuplicateInvoice(_) => (StatusCode::CONFLICT, message),
        _ => {
            tracing::error!(error = %message, "ledger error");
            (StatusCode::INTERNAL_SERVER_ERROR, message)
        }
    }
}

impl From<CheckoutError> for ApiError {
    fn from(err: CheckoutError) -> Self {
        ApiError::Checkout(err)
    }
}

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        ApiError::Ledger(err)
    }
}

impl From<RenderError> for ApiError {
    fn from(err: RenderError) -> Self {
        ApiError::Render(err)
    }
}
