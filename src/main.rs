//! Binary entry point for the PAYE engine.
//!
//! Starts the Axum HTTP server for the PAYE calculation service.
//! Binds to the configured port (default 5002).

use paye_engine::api::{AppState, create_router};
use paye_engine::config::ServiceConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Configuration decides the default log level, so load it before tracing.
    let config = ServiceConfig::from_env();
    let default_level = config
        .as_ref()
        .map(ServiceConfig::default_log_level)
        .unwrap_or("info");

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();

    let config = config.map_err(|e| {
        tracing::error!("Configuration failed: {e}");
        e
    })?;
    tracing::info!(
        user_input_service_url = %config.user_input_service_url,
        tax_service_url = %config.tax_service_url,
        request_timeout_secs = config.request_timeout_secs,
        "Configuration loaded"
    );

    let state = AppState::from_config(&config).map_err(|e| {
        tracing::error!("Failed to create collaborator clients: {e}");
        e
    })?;

    if config.startup_health_checks {
        state.pipeline().verify_dependencies().await.map_err(|e| {
            tracing::error!("Dependency check failed: {e}");
            e
        })?;
        tracing::info!("Dependency checks passed");
    } else {
        tracing::warn!("Startup dependency checks disabled");
    }

    let app = create_router(state);

    let addr = config.bind_address();
    tracing::info!("PAYE engine listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
