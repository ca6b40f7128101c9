use records_manager::{
    api::{build_router, AppState},
    config::{Config, ObservabilityConfig},
    state::InMemoryRecordStore,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::load().unwrap_or_else(|e| {
        eprintln!("Failed to load configuration: {}", e);
        eprintln!("Using default configuration");
        Config::default()
    });

    // Initialize tracing
    init_tracing(&config.observability);

    tracing::info!(
        service = %config.observability.service_name,
        "Starting Records Manager v{}",
        env!("CARGO_PKG_VERSION")
    );

    // Initialize storage backend
    let store = Arc::new(InMemoryRecordStore::new());
    tracing::info!("In-memory record store initialized");

    let http_addr = config.bind_address();
    let app = build_router(AppState::new(store, config));

    // Start HTTP server
    let http_listener = tokio::net::TcpListener::bind(&http_addr).await?;

    tracing::info!("HTTP API server listening on http://{}", http_addr);
    tracing::info!("   Health check: http://{}/health", http_addr);
    tracing::info!("   Search: http://{}/v1/search?q=", http_addr);
    tracing::info!("   Records: http://{}/v1/records/:entity", http_addr);
    tracing::info!("Press Ctrl+C to shutdown");

    axum::serve(http_listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shut down gracefully");
    Ok(())
}

fn init_tracing(observability: &ObservabilityConfig) {
    let level = &observability.log_level;
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("records_manager={level},tower_http={level}").into());

    let registry = tracing_subscriber::registry().with(filter);
    if observability.json_logs {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    tracing::info!("Shutdown signal received");
}
