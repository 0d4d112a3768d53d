//! API server entry point.

use std::sync::Arc;

use checkout::{
    InMemoryMailTransport, MailTransport, PdfRenderer, SmtpMailTransport, StaticTierPolicy,
};
use ledger::{InMemoryLedger, PostgresLedger};
use tokio::signal;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Waits for a shutdown signal (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install SIGINT handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("received SIGINT, starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("received SIGTERM, starting graceful shutdown");
        }
    }
}

#[tokio::main]
async fn main() {
    let config = api::config::Config::from_env();

    // 1. Initialize tracing
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone())),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 2. Install Prometheus metrics recorder
    let prometheus_builder = metrics_exporter_prometheus::PrometheusBuilder::new();
    let metrics_handle = prometheus_builder
        .install_recorder()
        .expect("failed to install Prometheus recorder");

    // 3. External collaborators
    let mail: Arc<dyn MailTransport> = match &config.mail {
        Some(mail_config) => Arc::new(
            SmtpMailTransport::new(mail_config).expect("invalid SMTP configuration"),
        ),
        None => {
            tracing::warn!("SMTP not configured; notification email delivery is disabled");
            Arc::new(InMemoryMailTransport::new())
        }
    };
    let policy = Arc::new(StaticTierPolicy::default());
    let renderer = Arc::new(PdfRenderer::new());

    // 4. Build the application on the configured ledger backend
    let app = match &config.database_url {
        Some(url) => {
            let pool = sqlx::postgres::PgPoolOptions::new()
                .max_connections(5)
                .connect(url)
                .await
                .expect("failed to connect to database");
            let store = PostgresLedger::new(pool);
            store.run_migrations().await.expect("migrations failed");
            tracing::info!("using PostgreSQL ledger");

            let state = api::create_state(store, mail, policy, renderer);
            api::create_app(state, metrics_handle)
        }
        None => {
            tracing::warn!("DATABASE_URL not set; using in-memory ledger");
            let state = api::create_state(InMemoryLedger::new(), mail, policy, renderer);
            api::create_app(state, metrics_handle)
        }
    };

    // 5. Start server
    let addr = config.addr();
    tracing::info!(%addr, "starting API server");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind address");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");

    tracing::info!("server shut down gracefully");
}
