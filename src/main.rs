use std::sync::Arc;
use std::time::Duration;

use axum::{
    routing::{get, post},
    Router,
};
use dca_platform::executors::{ExecutorRegistry, InjectiveExecutor, SonicExecutor};
use dca_platform::services::{DcaService, PriceService};
use dca_platform::{Config, Result};
use migration::MigratorTrait;
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dca_platform=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().map_err(|e| dca_platform::AppError::Config(e.to_string()))?;

    // Initialize database connection
    let db = sea_orm::Database::connect(&config.database_url)
        .await
        .map_err(dca_platform::AppError::Database)?;

    tracing::info!("Database connected successfully");

    // Run migrations
    migration::Migrator::up(&db, None)
        .await
        .map_err(dca_platform::AppError::Database)?;

    tracing::info!("Migrations completed successfully");

    // Initialize repositories
    let ledger = Arc::new(dca_platform::db::LedgerRepository::new(db.clone()));
    let price_history = Arc::new(dca_platform::db::PriceRepository::new(db));

    // Initialize chain executors
    let mut registry = ExecutorRegistry::new();
    registry.register(
        "SONIC",
        Arc::new(SonicExecutor::new(
            &config.sonic_rpc_url,
            &config.platform_private_key,
        )?),
    );
    registry.register(
        "INJ",
        Arc::new(InjectiveExecutor::new(
            &config.injective_rpc_url,
            &config.platform_private_key,
        )?),
    );
    let registry = Arc::new(registry);
    tracing::info!(tokens = ?registry.supported_tokens(), "Executor registry initialized");

    // Initialize services
    let price_service = Arc::new(PriceService::new(
        price_history,
        config.price_api_base.clone(),
    ));

    let dca_service = DcaService::new(
        ledger,
        price_service.clone(),
        registry,
        config.platform_wallet_address.clone(),
        Duration::from_secs(config.send_timeout_secs),
    );

    if config.reconcile_on_start {
        dca_service.reconcile(config.default_user_id).await?;
        tracing::info!("Aggregates reconciled from ledger");
    }

    // Re-arm timers for plans that were active before the restart
    dca_service.bootstrap().await?;

    // Create app state
    let app_state = dca_platform::api::AppState::new(
        dca_service,
        price_service,
        config.default_user_id,
    );

    // Build application router
    let app = Router::new()
        .route("/health", get(health_check))
        .route("/api/dca/plans", post(dca_platform::api::dca::create_plan))
        .route("/api/dca/plans", get(dca_platform::api::dca::list_plans))
        .route(
            "/api/dca/plans/{plan_id}/stop",
            post(dca_platform::api::dca::stop_plan),
        )
        .route(
            "/api/dca/plans/{plan_id}/transactions",
            get(dca_platform::api::dca::plan_transactions),
        )
        .route(
            "/api/dca/total-investment",
            get(dca_platform::api::dca::total_investment),
        )
        .route("/api/price/{symbol}", get(dca_platform::api::price::current_price))
        .route("/api/analyze/{symbol}", get(dca_platform::api::price::analyze))
        .route("/api/history/{symbol}", get(dca_platform::api::price::history))
        .with_state(app_state)
        .layer(CorsLayer::permissive());

    // Start server
    let addr = format!("{}:{}", config.server_host, config.server_port);
    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| dca_platform::AppError::Internal(e.to_string()))?;

    axum::serve(listener, app)
        .await
        .map_err(|e| dca_platform::AppError::Internal(e.to_string()))?;

    Ok(())
}

async fn health_check() -> &'static str {
    "OK"
}
