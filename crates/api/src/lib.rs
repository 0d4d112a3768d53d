//! HTTP API server for the order-processing backend.
//!
//! Exposes the checkout endpoint, order and notification queries,
//! document regeneration, and the discount-settings read, with
//! structured logging (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::http::{HeaderName, header};
use axum::routing::{get, post};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use checkout::{
    CheckoutService, DocumentRenderer, InMemoryMailTransport, MailTransport, PdfRenderer,
    StaticTierPolicy, TierPolicySource,
};
use ledger::{NotificationLedger, OrderLedger};

use routes::orders::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<S>(state: Arc<AppState<S>>, metrics_handle: PrometheusHandle) -> Router
where
    S: OrderLedger + NotificationLedger + Clone + 'static,
{
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/checkout", post(routes::checkout::create::<S>))
        .route("/orders", get(routes::orders::list::<S>))
        .route("/orders/{invoice_number}", get(routes::orders::get::<S>))
        .route(
            "/orders/{invoice_number}/invoice",
            get(routes::orders::invoice_pdf::<S>),
        )
        .route("/print-notifications", get(routes::notifications::list::<S>))
        .route(
            "/print-notifications/{id}/pdf",
            get(routes::notifications::pdf::<S>),
        )
        .route("/discount-settings", get(routes::discounts::get::<S>))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
                .expose_headers([
                    header::CONTENT_DISPOSITION,
                    HeaderName::from_static("x-filename"),
                ]),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates the application state from a store backend and explicit
/// collaborators.
pub fn create_state<S>(
    store: S,
    mail: Arc<dyn MailTransport>,
    policy: Arc<dyn TierPolicySource>,
    renderer: Arc<dyn DocumentRenderer>,
) -> Arc<AppState<S>>
where
    S: OrderLedger + NotificationLedger + Clone + 'static,
{
    let checkout = CheckoutService::new(
        store.clone(),
        store.clone(),
        mail,
        policy.clone(),
        renderer.clone(),
    );

    Arc::new(AppState {
        checkout,
        ledger: store,
        policy,
        renderer,
    })
}

/// Creates the default application state: built-in PDF renderer, seed
/// discount tiers, and a no-op in-memory mail transport.
pub fn create_default_state<S>(store: S) -> Arc<AppState<S>>
where
    S: OrderLedger + NotificationLedger + Clone + 'static,
{
    create_state(
        store,
        Arc::new(InMemoryMailTransport::new()),
        Arc::new(StaticTierPolicy::default()),
        Arc::new(PdfRenderer::new()),
    )
}
