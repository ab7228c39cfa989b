use axum::{
    routing::{get, post},
    Json, Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tracing::{error, info};

use demobank_backend::api;
use demobank_backend::api::payments::PaymentsState;
use demobank_backend::api::profiles::ProfilesState;
use demobank_backend::api::transactions::TransactionsState;
use demobank_backend::config::AppConfig;
use demobank_backend::database::pending_transfer_repository::PendingTransferRepository;
use demobank_backend::database::profile_repository::ProfileRepository;
use demobank_backend::database::repository::{
    PendingTransferStore, ProfileStore, TransactionStore,
};
use demobank_backend::database::transaction_repository::TransactionRepository;
use demobank_backend::database;
use demobank_backend::gateway::{PaymentGateway, PaystackClient};
use demobank_backend::health::{HealthChecker, HealthState, HealthStatus};
use demobank_backend::logging::init_tracing;
use demobank_backend::middleware::logging::{request_logging_middleware, UuidRequestId};
use demobank_backend::services::payment_flow::PaymentFlow;

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env()?;
    config.validate()?;

    init_tracing(&config.logging.level);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        host = %config.server.host,
        port = config.server.port,
        "🚀 Starting demobank backend service"
    );

    info!("📊 Initializing database connection pool...");
    let db_pool = database::init_pool_from_config(&config.database)
        .await
        .map_err(|e| {
            error!("Failed to initialize database pool: {}", e);
            e
        })?;
    info!(
        max_connections = config.database.max_connections,
        "✅ Database connection pool initialized"
    );

    let gateway: Arc<dyn PaymentGateway> =
        Arc::new(PaystackClient::new(config.gateway.clone()).map_err(|e| {
            error!("Failed to initialize payment gateway client: {}", e);
            e
        })?);
    info!(base_url = %config.gateway.base_url, "✅ Payment gateway client initialized");

    let profiles: Arc<dyn ProfileStore> = Arc::new(ProfileRepository::new(db_pool.clone()));
    let transactions: Arc<dyn TransactionStore> =
        Arc::new(TransactionRepository::new(db_pool.clone()));
    let pending: Arc<dyn PendingTransferStore> =
        Arc::new(PendingTransferRepository::new(db_pool.clone()));

    let flow = Arc::new(PaymentFlow::new(
        gateway,
        profiles.clone(),
        transactions.clone(),
        pending,
    ));

    let health_checker = HealthChecker::new(db_pool.clone());

    info!("🛣️  Setting up application routes...");
    let payment_routes = Router::new()
        .route("/api/payments/initiate", post(api::payments::initiate_payment))
        .route("/payment/verify", get(api::payments::verify_payment))
        .with_state(PaymentsState { flow });

    let transaction_routes = Router::new()
        .route("/api/transactions", get(api::transactions::list_transactions))
        .with_state(TransactionsState { transactions });

    let profile_routes = Router::new()
        .route("/api/profiles", post(api::profiles::create_profile))
        .with_state(ProfilesState { profiles });

    let app = Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .route("/health/live", get(liveness))
        .with_state(AppState { health_checker })
        .merge(payment_routes)
        .merge(transaction_routes)
        .merge(profile_routes)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(UuidRequestId))
                .layer(axum::middleware::from_fn(request_logging_middleware))
                .layer(PropagateRequestIdLayer::x_request_id()),
        );
    info!("✅ Routes configured");

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e| {
        error!("❌ Failed to bind to address {}: {}", addr, e);
        e
    })?;

    info!(address = %addr, "🚀 Server listening on http://{}", addr);
    info!("✅ Server is ready to accept connections");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("👋 Server shutdown complete");

    Ok(())
}

// Application state for the root and health routes
#[derive(Clone)]
struct AppState {
    health_checker: HealthChecker,
}

async fn root() -> &'static str {
    "Welcome to Demobank Backend API"
}

async fn health(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> Result<Json<HealthStatus>, (axum::http::StatusCode, String)> {
    let health_status = state.health_checker.check_health().await;

    if matches!(health_status.status, HealthState::Unhealthy) {
        error!("❌ Health check failed - service unhealthy");
        Err((
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            "Service Unavailable".to_string(),
        ))
    } else {
        Ok(Json(health_status))
    }
}

/// Readiness probe - checks if the service is ready to accept traffic
async fn readiness(
    state: axum::extract::State<AppState>,
) -> Result<Json<HealthStatus>, (axum::http::StatusCode, String)> {
    health(state).await
}

/// Liveness probe - checks if the service is alive (basic check)
async fn liveness() -> &'static str {
    "OK"
}
