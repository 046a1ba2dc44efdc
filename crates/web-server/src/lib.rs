use analyzer::Analyzer;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};
use configuration::{ServerSettings, Settings};
use database::{DbRepository, PoolOptions, PropertyStore};
use std::sync::Arc;
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

pub mod error;
pub mod handlers;

/// The shared application state that all handlers can access.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn PropertyStore>,
    pub analyzer: Analyzer,
}

impl AppState {
    pub fn new(store: Arc<dyn PropertyStore>) -> Self {
        Self {
            analyzer: Analyzer::new(store.clone()),
            store,
        }
    }
}

/// Builds the application router around a store.
pub fn router(store: Arc<dyn PropertyStore>, body_limit_bytes: usize) -> Router {
    let app_state = Arc::new(AppState::new(store));
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods(Any)
        .allow_headers(AllowHeaders::any());

    // --- DEFINE THE APPLICATION ROUTES ---
    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route(
            "/api/properties",
            get(handlers::list_properties).post(handlers::create_property),
        )
        .route("/api/properties/:id", get(handlers::get_property))
        .route("/api/properties/:id/sale-date", put(handlers::set_sale_date))
        .route("/api/properties/:id/views", post(handlers::increment_view))
        .route("/api/analytics/price-per-area", get(handlers::price_per_area))
        .route("/api/analytics/charts", get(handlers::charts_data))
        .route("/api/analytics/conversion-rate", get(handlers::conversion_rate))
        .route("/api/analytics/days-on-market", get(handlers::days_on_market))
        .route("/api/analytics/zones", get(handlers::distinct_zones))
        .route("/api/analytics/zones/:zone/sold-vs-unsold", get(handlers::sold_vs_unsold))
        .route("/api/analytics/zones/:zone/price-per-area", get(handlers::zone_price_per_area))
        .route("/api/analytics/property-counts", get(handlers::property_counts))
        .route("/api/analytics/sales-summary", get(handlers::sales_summary))
        .with_state(app_state)
        .layer(cors)
        // This middleware will automatically log information about every incoming request.
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(body_limit_bytes))
}

/// Serves the API for `store` until Ctrl-C is received.
pub async fn serve(store: Arc<dyn PropertyStore>, server: &ServerSettings) -> anyhow::Result<()> {
    let addr = server.socket_addr()?;
    let app = router(store, server.body_limit_bytes);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Web server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Web server stopped.");
    Ok(())
}

/// Connects to PostgreSQL, applies migrations if configured, and serves the API.
pub async fn run_server(settings: &Settings) -> anyhow::Result<()> {
    let pool = database::connect(PoolOptions {
        max_connections: settings.database.max_connections,
        acquire_timeout: settings.database.acquire_timeout(),
    })
    .await?;

    if settings.database.run_migrations {
        database::run_migrations(&pool).await?;
    }

    let store: Arc<dyn PropertyStore> = Arc::new(DbRepository::new(pool));
    serve(store, &settings.server).await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for the shutdown signal.");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received.");
}
