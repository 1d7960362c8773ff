//! # Certificate API
//!
//! Certificate issuance and lookup. Issuance is the one place the three
//! engines meet: the job's readiness gate, validation against the active
//! category schema, and number allocation run in that order, and the
//! certificate link is written through the job store's atomic update so a
//! job can never end up with two certificates.

use std::collections::BTreeMap;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use metrics::counter;
use serde::Deserialize;
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;

use gemcert_core::{SequenceFormat, Timestamp};
use gemcert_schema::validate;
use gemcert_state::{Certificate, JobError};

use crate::error::AppError;
use crate::extractors::{extract_validated_json, Validate};
use crate::state::AppState;

/// Request to issue a certificate for a job.
#[derive(Debug, Deserialize, ToSchema)]
pub struct IssueCertificateRequest {
    /// Item category; resolved to that category's active schema version.
    pub category: String,
    /// Submitted field values, validated against the schema.
    #[serde(default)]
    #[schema(value_type = Object)]
    pub fields: BTreeMap<String, Value>,
}

impl Validate for IssueCertificateRequest {
    fn validate(&self) -> Result<(), String> {
        if self.category.trim().is_empty() {
            return Err("category must not be empty".to_string());
        }
        Ok(())
    }
}

/// Filters for listing certificates.
#[derive(Debug, Deserialize)]
pub struct CertificateListQuery {
    /// Only certificates of this category.
    pub category: Option<String>,
    /// Only certificates issued to this client.
    pub client_id: Option<Uuid>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/v1/jobs/{id}/certificate",
            axum::routing::post(issue_certificate),
        )
        .route("/v1/certificates", get(list_certificates))
        .route("/v1/certificates/{number}", get(get_certificate))
}

#[utoipa::path(
    post,
    path = "/v1/jobs/{id}/certificate",
    params(("id" = Uuid, Path, description = "Job ID")),
    request_body = IssueCertificateRequest,
    responses(
        (status = 201, description = "Certificate issued", body = Certificate),
        (status = 404, description = "Job or schema not found", body = crate::error::ErrorBody),
        (status = 409, description = "Job not ready or already certified", body = crate::error::ErrorBody),
        (status = 422, description = "Field validation failed", body = crate::error::ErrorBody),
        (status = 503, description = "Day's number range exhausted", body = crate::error::ErrorBody),
    ),
    tag = "certificates"
)]
async fn issue_certificate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: Result<Json<IssueCertificateRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Certificate>), AppError> {
    let req = extract_validated_json(body)?;

    let job = state
        .jobs
        .get(&id)
        .ok_or_else(|| AppError::NotFound(format!("job {id} not found")))?;

    // Fast readiness check on the snapshot. The authoritative check runs
    // again inside the atomic update below; this one only spares the
    // allocator a wasted number on requests that were never going to
    // succeed.
    job.certificate_readiness()?;

    let schema = state
        .schemas
        .active(&req.category)
        .ok_or_else(|| AppError::SchemaNotFound(req.category.clone()))?;
    let fields = validate(&schema, &req.fields)?;

    let now = Timestamp::now();
    let number = state
        .counters
        .allocate(&SequenceFormat::certificate_numbers(), now.date())?;

    let certificate = Certificate::new(
        number,
        job.client_id,
        job.id,
        schema.category.clone(),
        schema.version,
        fields,
        now,
    );

    // Check-and-link under the store's write lock. If a concurrent
    // request won the race, this fails and the number allocated above
    // stays unused; the numbering scheme tolerates gaps, never
    // duplicates.
    state
        .jobs
        .try_update(&id, |job| {
            job.attach_certificate(certificate.id, now)?;
            Ok::<_, JobError>(())
        })
        .ok_or_else(|| AppError::NotFound(format!("job {id} not found")))??;

    state
        .certificates
        .insert(certificate.id.as_uuid(), certificate.clone());

    counter!(
        "certificates_issued_total",
        "category" => certificate.category.clone()
    )
    .increment(1);
    tracing::info!(
        certificate_number = %certificate.certificate_number,
        job_number = %job.job_number,
        category = %certificate.category,
        schema_version = certificate.schema_version,
        "certificate issued"
    );

    Ok((StatusCode::CREATED, Json(certificate)))
}

#[utoipa::path(
    get,
    path = "/v1/certificates",
    params(
        ("category" = Option<String>, Query, description = "Filter by category"),
        ("client_id" = Option<Uuid>, Query, description = "Filter by client"),
    ),
    responses(
        (status = 200, description = "Certificates matching the filters", body = [Certificate]),
    ),
    tag = "certificates"
)]
async fn list_certificates(
    State(state): State<AppState>,
    Query(query): Query<CertificateListQuery>,
) -> Json<Vec<Certificate>> {
    let mut certificates: Vec<Certificate> = state
        .certificates
        .list()
        .into_iter()
        .filter(|c| query.category.as_deref().map_or(true, |cat| c.category == cat))
        .filter(|c| query.client_id.map_or(true, |id| c.client_id.as_uuid() == id))
        .collect();
    certificates.sort_by(|a, b| a.certificate_number.cmp(&b.certificate_number));
    Json(certificates)
}

#[utoipa::path(
    get,
    path = "/v1/certificates/{number}",
    params(("number" = String, Path, description = "Certificate number")),
    responses(
        (status = 200, description = "The certificate", body = Certificate),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
    ),
    tag = "certificates"
)]
async fn get_certificate(
    State(state): State<AppState>,
    Path(number): Path<String>,
) -> Result<Json<Certificate>, AppError> {
    let wanted = number.trim();
    let certificate = state
        .certificates
        .find(|c| c.certificate_number == wanted)
        .ok_or_else(|| AppError::NotFound(format!("certificate {wanted} not found")))?;
    Ok(Json(certificate))
}
