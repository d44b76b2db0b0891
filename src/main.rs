//! payhook server entry point.
//!
//! Loads configuration, connects to PostgreSQL, wires adapters into the
//! billing handlers and serves the HTTP API.

use std::sync::Arc;

use axum::http::HeaderValue;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use payhook::adapters::alerts::TracingOperatorNotifier;
use payhook::adapters::http::{app_router, BillingAppState};
use payhook::adapters::postgres::{
    PostgresProcessedReferenceStore, PostgresSubscriptionRepository, PostgresUserDirectory,
    MIGRATOR,
};
use payhook::adapters::provider::{HttpGatewayConfig, HttpPaymentGateway};
use payhook::application::{
    ApplyChargeSettings, ApplyChargeSucceededHandler, HandlePaymentWebhookHandler,
    InitializePaymentHandler,
};
use payhook::config::{AppConfig, ServerConfig};
use payhook::domain::billing::{WebhookVerifier, RENEWAL_POLICY};
use payhook::ports::PaymentGateway;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config.server);
    config.validate()?;

    tracing::info!(
        environment = ?config.server.environment,
        verify_with_provider = config.payment.verify_with_provider,
        test_mode = config.payment.is_test_mode(),
        "Configuration loaded"
    );

    let pool = PgPoolOptions::new()
        .min_connections(config.database.min_connections)
        .max_connections(config.database.max_connections)
        .acquire_timeout(config.database.acquire_timeout())
        .idle_timeout(config.database.idle_timeout())
        .max_lifetime(config.database.max_lifetime())
        .connect(&config.database.url)
        .await?;

    if config.database.run_migrations {
        MIGRATOR.run(&pool).await?;
        tracing::info!("Migrations applied");
    }

    let gateway: Arc<dyn PaymentGateway> = Arc::new(HttpPaymentGateway::new(
        HttpGatewayConfig::new(config.payment.secret_key.clone())
            .with_base_url(config.payment.base_url.clone())
            .with_timeout(config.payment.provider_timeout())
            .with_max_retries(config.payment.provider_max_retries),
    )?);

    let apply = Arc::new(ApplyChargeSucceededHandler::new(
        Arc::new(PostgresUserDirectory::new(pool.clone())),
        Arc::new(PostgresSubscriptionRepository::new(pool.clone())),
        gateway.clone(),
        ApplyChargeSettings {
            verify_with_provider: config.payment.verify_with_provider,
            directory_timeout: config.database.lookup_timeout(),
            provider_timeout: config.payment.verification_budget(),
            renewal_policy: RENEWAL_POLICY,
        },
    ));

    let webhook_handler = HandlePaymentWebhookHandler::new(
        WebhookVerifier::new(config.payment.effective_webhook_secret()),
        Arc::new(PostgresProcessedReferenceStore::new(pool.clone())),
        apply,
        Arc::new(TracingOperatorNotifier::new()),
    );

    let state = BillingAppState::new(
        Arc::new(webhook_handler),
        Arc::new(InitializePaymentHandler::new(gateway)),
    )
    .with_signature_header(config.payment.signature_header_name()?);

    let app = app_router(state)
        .layer(TimeoutLayer::new(config.server.request_timeout()))
        .layer(cors_layer(&config.server))
        .layer(TraceLayer::new_for_http());

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "payhook listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// JSON logs in production, human-readable logs elsewhere.
/// `RUST_LOG` takes precedence over `server.log_level`.
fn init_tracing(server: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&server.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    if server.is_production() {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_current_span(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .compact()
            .init();
    }
}

fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = server
        .cors_origins_list()
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    if origins.is_empty() {
        CorsLayer::new()
    } else {
        CorsLayer::new().allow_origin(AllowOrigin::list(origins))
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
