//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Maps domain errors from gemcert-state, gemcert-schema, and gemcert-core
//! to HTTP status codes. Returns JSON error response bodies with error
//! code, message, and details. Never exposes internal error details in
//! production responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use gemcert_core::AllocationError;
use gemcert_schema::{SchemaError, ValidationViolations};
use gemcert_state::JobError;

/// Structured JSON error response body.
///
/// All error responses use this format for consistency across the API
/// surface. The `details` field carries the per-field violation list for
/// 422 validation errors but is omitted everywhere else.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// Inner error detail.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "NOT_FOUND", "VALIDATION_FAILED").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Additional details, present only for validation errors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Application-level error type that implements [`IntoResponse`] for Axum.
///
/// Maps domain errors to appropriate HTTP status codes and structured
/// JSON error bodies. Internal error details are never exposed to clients.
#[derive(Error, Debug)]
pub enum AppError {
    /// Resource not found (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// No schema registered for the requested category (404).
    #[error("no schema registered for category {0:?}")]
    SchemaNotFound(String),

    /// Request body could not be parsed or referenced something invalid (400).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Certificate fields failed schema validation (422).
    #[error("validation failed with {} violation(s)", .0.len())]
    Validation(#[from] ValidationViolations),

    /// Conflict with current resource state (409).
    #[error("conflict: {0}")]
    Conflict(String),

    /// The job already carries a certificate (409).
    #[error("duplicate certificate: {0}")]
    DuplicateCertificate(String),

    /// A number sequence ran out of capacity (503).
    #[error(transparent)]
    Allocation(#[from] AllocationError),

    /// Internal server error (500). Message is logged but not returned to
    /// the client.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Return the HTTP status code and machine-readable error code for
    /// this error.
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::SchemaNotFound(_) => (StatusCode::NOT_FOUND, "SCHEMA_NOT_FOUND"),
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            Self::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_FAILED"),
            Self::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            Self::DuplicateCertificate(_) => (StatusCode::CONFLICT, "DUPLICATE_CERTIFICATE"),
            Self::Allocation(_) => (StatusCode::SERVICE_UNAVAILABLE, "SEQUENCE_EXHAUSTED"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        // Never expose internal error messages to clients. Validation
        // errors additionally carry the per-field violation list.
        let (message, details) = match &self {
            Self::Internal(_) => ("An internal error occurred".to_string(), None),
            Self::Validation(violations) => (
                self.to_string(),
                serde_json::to_value(violations.violations()).ok(),
            ),
            other => (other.to_string(), None),
        };

        // Log internal errors and exhausted sequences for operator
        // visibility; everything else is the client's problem.
        match &self {
            Self::Internal(_) => tracing::error!(error = %self, "internal server error"),
            Self::Allocation(e) => tracing::warn!(error = %e, "number allocation failed"),
            _ => {}
        }

        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
                details,
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Convert job transition errors to API errors.
///
/// Everything maps to 409: the request was well-formed, the job's current
/// state refused it. A second issuance attempt gets its own code so
/// clients can distinguish "already certified" from a stale expectation.
impl From<JobError> for AppError {
    fn from(err: JobError) -> Self {
        match &err {
            JobError::CertificateAlreadyLinked { .. } => {
                Self::DuplicateCertificate(err.to_string())
            }
            JobError::StageConflict { .. }
            | JobError::StatusConflict { .. }
            | JobError::Closed { .. }
            | JobError::OnHold
            | JobError::AtTerminalStage { .. }
            | JobError::StageRequiresIssuance { .. }
            | JobError::NotAtTerminalStage { .. }
            | JobError::NotCertificationKind { .. }
            | JobError::NotReadyForCertificate { .. } => Self::Conflict(err.to_string()),
        }
    }
}

/// Convert schema definition errors to API errors.
impl From<SchemaError> for AppError {
    fn from(err: SchemaError) -> Self {
        Self::BadRequest(err.to_string())
    }
}
