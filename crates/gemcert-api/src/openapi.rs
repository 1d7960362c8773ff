//! # OpenAPI Specification Assembly
//!
//! Assembles all utoipa-documented routes into a single OpenAPI spec,
//! served at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

/// Assembled OpenAPI spec for the entire API surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "GemCert API",
        version = "0.1.0",
        description = "Jewelry certification services: client directory, inspection and certification job lifecycle, versioned category schemas, and schema-validated certificate issuance with sequential number allocation.",
        license(name = "AGPL-3.0-or-later")
    ),
    paths(
        // Clients
        crate::routes::clients::register_client,
        crate::routes::clients::list_clients,
        crate::routes::clients::get_client,
        // Jobs
        crate::routes::jobs::create_job,
        crate::routes::jobs::list_jobs,
        crate::routes::jobs::get_job,
        crate::routes::jobs::advance_stage,
        crate::routes::jobs::set_status,
        crate::routes::jobs::set_priority,
        // Certificates
        crate::routes::certificates::issue_certificate,
        crate::routes::certificates::list_certificates,
        crate::routes::certificates::get_certificate,
        // Schemas
        crate::routes::schemas::register_schema,
        crate::routes::schemas::list_categories,
        crate::routes::schemas::get_active_schema,
        crate::routes::schemas::list_versions,
        crate::routes::schemas::get_version,
    ),
    components(schemas(
        // Record types
        crate::state::ClientRecord,
        gemcert_state::Job,
        gemcert_state::JobTransition,
        gemcert_state::JobKind,
        gemcert_state::JobStage,
        gemcert_state::JobStatus,
        gemcert_state::Priority,
        gemcert_state::Certificate,
        gemcert_schema::CategorySchema,
        gemcert_schema::FieldDef,
        gemcert_schema::FieldKind,
        // Error types
        crate::error::ErrorBody,
        crate::error::ErrorDetail,
        // Client DTOs
        crate::routes::clients::RegisterClientRequest,
        // Job DTOs
        crate::routes::jobs::CreateJobRequest,
        crate::routes::jobs::AdvanceStageRequest,
        crate::routes::jobs::SetStatusRequest,
        crate::routes::jobs::SetPriorityRequest,
        // Certificate DTOs
        crate::routes::certificates::IssueCertificateRequest,
        // Schema DTOs
        crate::routes::schemas::RegisterSchemaRequest,
    )),
    tags(
        (name = "clients", description = "Client directory"),
        (name = "jobs", description = "Job intake and lifecycle"),
        (name = "certificates", description = "Certificate issuance and lookup"),
        (name = "schemas", description = "Versioned category schema registry"),
    )
)]
pub struct ApiDoc;

/// Build the OpenAPI router.
///
/// Serves the OpenAPI JSON spec at `/openapi.json`.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

/// GET /openapi.json — Return the generated OpenAPI specification.
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
