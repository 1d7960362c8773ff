//! # gemcert-api — Axum API Services for GemCert
//!
//! HTTP surface over the certification engines: the client directory,
//! the job lifecycle state machine, the versioned schema registry, and
//! schema-validated certificate issuance with sequential number
//! allocation. All storage is in-memory; restarting the process starts
//! the world over.
//!
//! ## API Surface
//!
//! | Prefix                 | Module                    | Domain                  |
//! |------------------------|---------------------------|-------------------------|
//! | `/v1/clients/*`        | [`routes::clients`]       | Client directory        |
//! | `/v1/jobs/*`           | [`routes::jobs`]          | Job lifecycle           |
//! | `/v1/jobs/{id}/certificate` | [`routes::certificates`] | Certificate issuance |
//! | `/v1/certificates/*`   | [`routes::certificates`]  | Certificate lookup      |
//! | `/v1/schemas/*`        | [`routes::schemas`]       | Category schemas        |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! TraceLayer → MetricsMiddleware → Handler
//! ```
//!
//! ## OpenAPI
//!
//! Auto-generated OpenAPI spec via utoipa derive macros at `/openapi.json`.

pub mod error;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::extract::State;
use axum::middleware::from_fn;
use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::error::AppError;
use crate::state::AppState;

/// Assemble the full application router with all routes and middleware.
///
/// Health probes (`/health/*`) are mounted outside the middleware stack
/// so probe traffic stays out of the request metrics.
pub fn app(state: AppState) -> Router {
    let api = Router::new()
        .merge(routes::clients::router())
        .merge(routes::jobs::router())
        .merge(routes::certificates::router())
        .merge(routes::schemas::router())
        .merge(openapi::router())
        .route("/metrics", get(render_metrics))
        .layer(from_fn(middleware::metrics::track_requests))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let health = Router::new()
        .route("/health/liveness", get(liveness))
        .route("/health/readiness", get(readiness));

    Router::new().merge(health).merge(api)
}

/// Liveness probe — always returns 200 if the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe — returns 200 when the application is ready to serve.
async fn readiness() -> &'static str {
    "ready"
}

/// GET /metrics — Render the Prometheus exposition text.
///
/// 404 when no recorder is installed (tests build state without one).
async fn render_metrics(State(state): State<AppState>) -> Result<String, AppError> {
    let handle = state
        .metrics
        .as_ref()
        .ok_or_else(|| AppError::NotFound("metrics exporter is not installed".to_string()))?;
    Ok(handle.render())
}
