//! # gemcert-api — Binary Entry Point
//!
//! Starts the Axum HTTP server for the GemCert API.
//! Binds to configurable port (default 8080).

use metrics_exporter_prometheus::PrometheusBuilder;

use gemcert_api::state::{AppConfig, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // Build configuration from environment.
    let config = AppConfig::from_env();
    let port = config.port;

    // Install the Prometheus recorder unless disabled. The server runs
    // without it if installation fails; /metrics then returns 404.
    let metrics = if config.metrics_enabled {
        match PrometheusBuilder::new().install_recorder() {
            Ok(handle) => Some(handle),
            Err(e) => {
                tracing::warn!("Prometheus recorder not installed: {e}. /metrics will return 404.");
                None
            }
        }
    } else {
        tracing::info!("metrics disabled via GEMCERT_METRICS_ENABLED");
        None
    };

    let state = AppState::with_config(config, metrics);
    let app = gemcert_api::app(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("GemCert API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
