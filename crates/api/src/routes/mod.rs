//! Route handlers.

pub mod checkout;
pub mod discounts;
pub mod health;
pub mod metrics;
pub mod notifications;
pub mod orders;

use axum::http::{HeaderName, StatusCode, header};
use axum::response::IntoResponse;

/// Builds a PDF download response with the filename exposed both in
/// `Content-Disposition` and the `X-Filename` header the storefront
/// reads.
pub(crate) fn pdf_response(filename: &str, bytes: Vec<u8>) -> impl IntoResponse + use<> {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
            (HeaderName::from_static("x-filename"), filename.to_string()),
        ],
        bytes,
    )
}
