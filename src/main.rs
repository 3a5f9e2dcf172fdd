use axum::routing::{get, post};
use axum::Router;
use po_recon_rust::{
    api, create_pool, AppConfig, ManifestService, MetricsService, ReconcileService, ScanService,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tracing::info;
use tracing_subscriber::fmt::time::ChronoLocal;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logging with local-time format
    tracing_subscriber::fmt()
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string()))
        .with_target(true)
        .with_level(true)
        .init();

    // Load configuration
    let config = AppConfig::from_env();
    info!("Starting server with config: {:?}", config);

    // Create the database connection pool
    let pool = create_pool(&config.database.url, config.database.max_connections).await?;
    info!("Database pool created");

    // One service per concern, each owning a pool handle
    let scans = Arc::new(ScanService::new(pool.clone()));
    let slips = Arc::new(ManifestService::new(pool.clone()));
    let recon = Arc::new(ReconcileService::new(pool.clone()));
    let metrics = Arc::new(MetricsService::new(pool));

    // Build the routers
    let scan_routes = Router::new()
        .route("/api/scans", post(api::record_scan).delete(api::clear_scans))
        .route("/api/scans/recent", get(api::recent_scans))
        .with_state(scans);

    let slip_routes = Router::new()
        .route("/api/slips/upload", post(api::upload_slip))
        .with_state(slips);

    let recon_routes = Router::new()
        .route("/api/reconcile/:po", get(api::reconcile_po))
        .with_state(recon);

    let metrics_routes = Router::new()
        .route("/api/metrics", get(api::metrics))
        .with_state(metrics);

    // Merge routes
    let app = Router::new()
        .route("/health", get(api::health_check))
        .merge(scan_routes)
        .merge(slip_routes)
        .merge(recon_routes)
        .merge(metrics_routes)
        .layer(ServiceBuilder::new());

    // Start the server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!("Server listening on {}", addr);
    info!("API Endpoints:");
    info!("  POST   /api/scans           - record one scan");
    info!("  GET    /api/scans/recent    - latest scans");
    info!("  DELETE /api/scans           - clear the operator's scans");
    info!("  POST   /api/slips/upload    - upload a packing-slip manifest");
    info!("  GET    /api/reconcile/:po   - reconciliation report for a PO");
    info!("  GET    /api/metrics         - dashboard counters");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
