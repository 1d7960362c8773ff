//! # Job API
//!
//! Job intake and lifecycle endpoints. Creation allocates the job number;
//! stage and status changes go through the state machine in
//! `gemcert-state` with the caller's optimistic-concurrency expectation,
//! executed inside the store's atomic update.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use metrics::counter;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use gemcert_core::{ClientId, SequenceFormat, Timestamp};
use gemcert_state::{Job, JobError, JobKind, JobStage, JobStatus, Priority};

use crate::error::AppError;
use crate::extractors::{extract_json, extract_validated_json, Validate};
use crate::state::AppState;

/// Request to create a job.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateJobRequest {
    /// The registered client bringing in the item.
    pub client_id: Uuid,
    /// Which stage sequence the job follows.
    pub kind: JobKind,
    /// Work priority; defaults to MEDIUM when omitted.
    #[serde(default)]
    pub priority: Priority,
}

/// Request to advance a job to its next stage.
#[derive(Debug, Deserialize, ToSchema)]
pub struct AdvanceStageRequest {
    /// The stage the caller believes the job is currently at.
    pub expected_stage: JobStage,
}

/// Request to change a job's status.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SetStatusRequest {
    /// The status to move to.
    pub status: JobStatus,
    /// The status the caller believes the job currently has.
    pub expected_status: JobStatus,
    /// Optional note, recorded on the transition (e.g. a hold or
    /// cancellation reason).
    #[serde(default)]
    pub note: Option<String>,
}

impl Validate for SetStatusRequest {
    fn validate(&self) -> Result<(), String> {
        if let Some(note) = &self.note {
            if note.len() > 500 {
                return Err("note must not exceed 500 characters".to_string());
            }
        }
        Ok(())
    }
}

/// Request to change a job's priority.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SetPriorityRequest {
    pub priority: Priority,
}

/// Filters for the job listing.
#[derive(Debug, Deserialize)]
pub struct JobListQuery {
    pub kind: Option<JobKind>,
    pub status: Option<JobStatus>,
    pub client_id: Option<Uuid>,
}

/// Build the jobs router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/jobs", post(create_job).get(list_jobs))
        .route("/v1/jobs/{id}", get(get_job))
        .route("/v1/jobs/{id}/advance", post(advance_stage))
        .route("/v1/jobs/{id}/status", post(set_status))
        .route("/v1/jobs/{id}/priority", post(set_priority))
}

/// POST /v1/jobs — Create a job.
#[utoipa::path(
    post,
    path = "/v1/jobs",
    request_body = CreateJobRequest,
    responses(
        (status = 201, description = "Job created with an allocated job number", body = Job),
        (status = 400, description = "Malformed request or unregistered client", body = crate::error::ErrorBody),
    ),
    tag = "jobs"
)]
async fn create_job(
    State(state): State<AppState>,
    body: Result<Json<CreateJobRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Job>), AppError> {
    let req = extract_json(body)?;

    if !state.clients.contains(&req.client_id) {
        return Err(AppError::BadRequest(format!(
            "client {} is not registered",
            req.client_id
        )));
    }

    let now = Timestamp::now();
    let job_number = state
        .counters
        .allocate(&SequenceFormat::job_numbers(), now.date())?;

    let job = Job::new(
        ClientId(req.client_id),
        req.kind,
        req.priority,
        job_number,
        now,
    );
    state.jobs.insert(job.id.as_uuid(), job.clone());

    counter!("jobs_created_total", "kind" => job.kind.as_str()).increment(1);
    tracing::info!(
        job_id = %job.id,
        job_number = %job.job_number,
        kind = %job.kind,
        "job created"
    );

    Ok((StatusCode::CREATED, Json(job)))
}

/// GET /v1/jobs — List jobs, optionally filtered.
#[utoipa::path(
    get,
    path = "/v1/jobs",
    params(
        ("kind" = Option<String>, Query, description = "Filter by job kind"),
        ("status" = Option<String>, Query, description = "Filter by job status"),
        ("client_id" = Option<Uuid>, Query, description = "Filter by client"),
    ),
    responses(
        (status = 200, description = "Jobs in intake order", body = Vec<Job>),
    ),
    tag = "jobs"
)]
async fn list_jobs(
    State(state): State<AppState>,
    Query(query): Query<JobListQuery>,
) -> Json<Vec<Job>> {
    let mut jobs: Vec<Job> = state
        .jobs
        .list()
        .into_iter()
        .filter(|j| query.kind.map_or(true, |k| j.kind == k))
        .filter(|j| query.status.map_or(true, |s| j.status == s))
        .filter(|j| query.client_id.map_or(true, |c| j.client_id.as_uuid() == c))
        .collect();
    jobs.sort_by(|a, b| {
        a.created_at
            .cmp(&b.created_at)
            .then_with(|| a.job_number.cmp(&b.job_number))
    });
    Json(jobs)
}

/// GET /v1/jobs/{id} — Get a job.
#[utoipa::path(
    get,
    path = "/v1/jobs/{id}",
    params(("id" = Uuid, Path, description = "Job ID")),
    responses(
        (status = 200, description = "Job found", body = Job),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
    ),
    tag = "jobs"
)]
async fn get_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Job>, AppError> {
    let job = state
        .jobs
        .get(&id)
        .ok_or_else(|| AppError::NotFound(format!("job {id} not found")))?;
    Ok(Json(job))
}

/// POST /v1/jobs/{id}/advance — Advance the job to its next stage.
#[utoipa::path(
    post,
    path = "/v1/jobs/{id}/advance",
    params(("id" = Uuid, Path, description = "Job ID")),
    request_body = AdvanceStageRequest,
    responses(
        (status = 200, description = "Stage advanced", body = Job),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
        (status = 409, description = "Stale expectation or the stage refuses advancing", body = crate::error::ErrorBody),
    ),
    tag = "jobs"
)]
async fn advance_stage(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: Result<Json<AdvanceStageRequest>, JsonRejection>,
) -> Result<Json<Job>, AppError> {
    let req = extract_json(body)?;
    let now = Timestamp::now();

    let updated = state
        .jobs
        .try_update(&id, |job| {
            job.advance_stage(req.expected_stage, now)?;
            Ok::<_, JobError>(job.clone())
        })
        .ok_or_else(|| AppError::NotFound(format!("job {id} not found")))??;

    tracing::info!(job_id = %updated.id, stage = %updated.stage, "job stage advanced");
    Ok(Json(updated))
}

/// POST /v1/jobs/{id}/status — Change the job's status.
#[utoipa::path(
    post,
    path = "/v1/jobs/{id}/status",
    params(("id" = Uuid, Path, description = "Job ID")),
    request_body = SetStatusRequest,
    responses(
        (status = 200, description = "Status changed", body = Job),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
        (status = 409, description = "Stale expectation or the transition is not allowed", body = crate::error::ErrorBody),
    ),
    tag = "jobs"
)]
async fn set_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: Result<Json<SetStatusRequest>, JsonRejection>,
) -> Result<Json<Job>, AppError> {
    let req = extract_validated_json(body)?;
    let now = Timestamp::now();
    let note = req.note.filter(|n| !n.trim().is_empty());

    let updated = state
        .jobs
        .try_update(&id, |job| {
            job.set_status(req.status, req.expected_status, note, now)?;
            Ok::<_, JobError>(job.clone())
        })
        .ok_or_else(|| AppError::NotFound(format!("job {id} not found")))??;

    tracing::info!(job_id = %updated.id, status = %updated.status, "job status changed");
    Ok(Json(updated))
}

/// POST /v1/jobs/{id}/priority — Change the job's priority.
///
/// Priority is bookkeeping, not lifecycle: the change is allowed even on
/// completed or cancelled jobs and records no transition.
#[utoipa::path(
    post,
    path = "/v1/jobs/{id}/priority",
    params(("id" = Uuid, Path, description = "Job ID")),
    request_body = SetPriorityRequest,
    responses(
        (status = 200, description = "Priority changed", body = Job),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
    ),
    tag = "jobs"
)]
async fn set_priority(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: Result<Json<SetPriorityRequest>, JsonRejection>,
) -> Result<Json<Job>, AppError> {
    let req = extract_json(body)?;
    let now = Timestamp::now();

    let updated = state
        .jobs
        .update(&id, |job| job.set_priority(req.priority, now))
        .ok_or_else(|| AppError::NotFound(format!("job {id} not found")))?;

    Ok(Json(updated))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorBody;
    use crate::state::ClientRecord;

    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    /// Helper: fresh state with one registered client. Returns the state
    /// and the client's UUID.
    fn seeded_state() -> (AppState, Uuid) {
        let state = AppState::new();
        let client = ClientRecord {
            id: ClientId::new(),
            name: "Meridian Gems".to_string(),
            email: None,
            phone: None,
            created_at: Timestamp::now(),
        };
        let client_id = client.id.as_uuid();
        state.clients.insert(client_id, client);
        (state, client_id)
    }

    fn test_app(state: AppState) -> Router {
        router().with_state(state)
    }

    /// Helper: read the response body as bytes and deserialize from JSON.
    async fn body_json<T: serde::de::DeserializeOwned>(resp: axum::response::Response) -> T {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_json(uri: &str, body: String) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    async fn seed_job(app: &Router, client_id: Uuid, kind: &str) -> Job {
        let req = post_json(
            "/v1/jobs",
            format!(r#"{{"client_id":"{client_id}","kind":"{kind}"}}"#),
        );
        let resp = app.clone().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
        body_json(resp).await
    }

    // ── Creation ──

    #[tokio::test]
    async fn handler_create_job_allocates_first_number() {
        let (state, client_id) = seeded_state();
        let app = test_app(state);

        let job = seed_job(&app, client_id, "CERTIFICATION").await;
        assert_eq!(job.job_number, "DIA1001");
        assert_eq!(job.kind, JobKind::Certification);
        assert_eq!(job.stage, JobStage::Received);
        assert_eq!(job.status, JobStatus::Open);
        assert_eq!(job.priority, Priority::Medium);
        assert!(job.certificate_id.is_none());
    }

    #[tokio::test]
    async fn handler_create_job_numbers_are_sequential() {
        let (state, client_id) = seeded_state();
        let app = test_app(state);

        let first = seed_job(&app, client_id, "INSPECTION_ONLY").await;
        let second = seed_job(&app, client_id, "CERTIFICATION").await;
        assert_eq!(first.job_number, "DIA1001");
        assert_eq!(second.job_number, "DIA1002");
        assert_ne!(first.id, second.id);
    }

    #[tokio::test]
    async fn handler_create_job_honors_priority() {
        let (state, client_id) = seeded_state();
        let app = test_app(state);

        let req = post_json(
            "/v1/jobs",
            format!(r#"{{"client_id":"{client_id}","kind":"CERTIFICATION","priority":"URGENT"}}"#),
        );
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
        let job: Job = body_json(resp).await;
        assert_eq!(job.priority, Priority::Urgent);
    }

    #[tokio::test]
    async fn handler_create_job_unknown_client_returns_400() {
        let (state, _) = seeded_state();
        let app = test_app(state);

        let stranger = Uuid::new_v4();
        let req = post_json(
            "/v1/jobs",
            format!(r#"{{"client_id":"{stranger}","kind":"CERTIFICATION"}}"#),
        );
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: ErrorBody = body_json(resp).await;
        assert_eq!(body.error.code, "BAD_REQUEST");
    }

    #[tokio::test]
    async fn handler_create_job_bad_json_returns_400() {
        let (state, _) = seeded_state();
        let app = test_app(state);

        let req = post_json("/v1/jobs", "not valid json".to_string());
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    // ── Lookup and listing ──

    #[tokio::test]
    async fn handler_get_job_roundtrip() {
        let (state, client_id) = seeded_state();
        let app = test_app(state);

        let created = seed_job(&app, client_id, "CERTIFICATION").await;
        let req = Request::builder()
            .method("GET")
            .uri(format!("/v1/jobs/{}", created.id.as_uuid()))
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let fetched: Job = body_json(resp).await;
        assert_eq!(fetched.id, created.id);
        assert_eq!(fetched.job_number, "DIA1001");
    }

    #[tokio::test]
    async fn handler_get_job_not_found_returns_404() {
        let (state, _) = seeded_state();
        let app = test_app(state);

        let req = Request::builder()
            .method("GET")
            .uri(format!("/v1/jobs/{}", Uuid::new_v4()))
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn handler_list_jobs_filters_by_kind_and_status() {
        let (state, client_id) = seeded_state();
        let app = test_app(state);

        seed_job(&app, client_id, "INSPECTION_ONLY").await;
        let cert_job = seed_job(&app, client_id, "CERTIFICATION").await;

        let req = Request::builder()
            .method("GET")
            .uri("/v1/jobs?kind=CERTIFICATION")
            .body(Body::empty())
            .unwrap();
        let resp = app.clone().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let jobs: Vec<Job> = body_json(resp).await;
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].id, cert_job.id);

        let req = Request::builder()
            .method("GET")
            .uri("/v1/jobs?status=CANCELLED")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        let jobs: Vec<Job> = body_json(resp).await;
        assert!(jobs.is_empty());
    }

    #[tokio::test]
    async fn handler_list_jobs_filters_by_client() {
        let (state, client_id) = seeded_state();
        // Second client with a job of their own.
        let other = ClientRecord {
            id: ClientId::new(),
            name: "Aurora Fine Jewels".to_string(),
            email: None,
            phone: None,
            created_at: Timestamp::now(),
        };
        let other_id = other.id.as_uuid();
        state.clients.insert(other_id, other);
        let app = test_app(state);

        seed_job(&app, client_id, "CERTIFICATION").await;
        seed_job(&app, other_id, "CERTIFICATION").await;

        let req = Request::builder()
            .method("GET")
            .uri(format!("/v1/jobs?client_id={other_id}"))
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        let jobs: Vec<Job> = body_json(resp).await;
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].client_id.as_uuid(), other_id);
    }

    #[tokio::test]
    async fn handler_list_jobs_is_in_intake_order() {
        let (state, client_id) = seeded_state();
        let app = test_app(state);

        seed_job(&app, client_id, "CERTIFICATION").await;
        seed_job(&app, client_id, "CERTIFICATION").await;
        seed_job(&app, client_id, "INSPECTION_ONLY").await;

        let req = Request::builder()
            .method("GET")
            .uri("/v1/jobs")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        let jobs: Vec<Job> = body_json(resp).await;
        let numbers: Vec<&str> = jobs.iter().map(|j| j.job_number.as_str()).collect();
        assert_eq!(numbers, vec!["DIA1001", "DIA1002", "DIA1003"]);
    }

    // ── Stage advancement ──

    #[tokio::test]
    async fn handler_advance_stage_moves_to_next() {
        let (state, client_id) = seeded_state();
        let app = test_app(state);

        let job = seed_job(&app, client_id, "CERTIFICATION").await;
        let req = post_json(
            &format!("/v1/jobs/{}/advance", job.id.as_uuid()),
            r#"{"expected_stage":"RECEIVED"}"#.to_string(),
        );
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let updated: Job = body_json(resp).await;
        assert_eq!(updated.stage, JobStage::UnderInspection);
        assert_eq!(updated.transitions.len(), 1);
    }

    #[tokio::test]
    async fn handler_advance_stage_stale_expectation_returns_409() {
        let (state, client_id) = seeded_state();
        let app = test_app(state.clone());

        let job = seed_job(&app, client_id, "CERTIFICATION").await;
        let uri = format!("/v1/jobs/{}/advance", job.id.as_uuid());

        let resp = app
            .clone()
            .oneshot(post_json(&uri, r#"{"expected_stage":"RECEIVED"}"#.to_string()))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        // Replaying the same expectation must conflict, not double-advance.
        let resp = app
            .oneshot(post_json(&uri, r#"{"expected_stage":"RECEIVED"}"#.to_string()))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CONFLICT);
        let body: ErrorBody = body_json(resp).await;
        assert_eq!(body.error.code, "CONFLICT");

        let stored = state.jobs.get(&job.id.as_uuid()).unwrap();
        assert_eq!(stored.stage, JobStage::UnderInspection);
    }

    #[tokio::test]
    async fn handler_advance_stage_unknown_job_returns_404() {
        let (state, _) = seeded_state();
        let app = test_app(state);

        let req = post_json(
            &format!("/v1/jobs/{}/advance", Uuid::new_v4()),
            r#"{"expected_stage":"RECEIVED"}"#.to_string(),
        );
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn handler_advance_stage_on_hold_returns_409() {
        let (state, client_id) = seeded_state();
        let app = test_app(state);

        let job = seed_job(&app, client_id, "CERTIFICATION").await;
        let id = job.id.as_uuid();

        let resp = app
            .clone()
            .oneshot(post_json(
                &format!("/v1/jobs/{id}/status"),
                r#"{"status":"ON_HOLD","expected_status":"OPEN"}"#.to_string(),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let resp = app
            .oneshot(post_json(
                &format!("/v1/jobs/{id}/advance"),
                r#"{"expected_stage":"RECEIVED"}"#.to_string(),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CONFLICT);
    }

    // ── Status changes ──

    #[tokio::test]
    async fn handler_set_status_walks_and_records_note() {
        let (state, client_id) = seeded_state();
        let app = test_app(state);

        let job = seed_job(&app, client_id, "INSPECTION_ONLY").await;
        let id = job.id.as_uuid();

        let resp = app
            .clone()
            .oneshot(post_json(
                &format!("/v1/jobs/{id}/status"),
                r#"{"status":"IN_PROGRESS","expected_status":"OPEN"}"#.to_string(),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let resp = app
            .oneshot(post_json(
                &format!("/v1/jobs/{id}/status"),
                r#"{"status":"CANCELLED","expected_status":"IN_PROGRESS","note":"client withdrew the item"}"#
                    .to_string(),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let cancelled: Job = body_json(resp).await;
        assert_eq!(cancelled.status, JobStatus::Cancelled);
        assert_eq!(
            cancelled.transitions.last().unwrap().note.as_deref(),
            Some("client withdrew the item")
        );
    }

    #[tokio::test]
    async fn handler_set_status_stale_expectation_returns_409() {
        let (state, client_id) = seeded_state();
        let app = test_app(state);

        let job = seed_job(&app, client_id, "CERTIFICATION").await;
        let id = job.id.as_uuid();

        let resp = app
            .clone()
            .oneshot(post_json(
                &format!("/v1/jobs/{id}/status"),
                r#"{"status":"IN_PROGRESS","expected_status":"OPEN"}"#.to_string(),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let resp = app
            .oneshot(post_json(
                &format!("/v1/jobs/{id}/status"),
                r#"{"status":"ON_HOLD","expected_status":"OPEN"}"#.to_string(),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn handler_set_status_complete_before_terminal_stage_returns_409() {
        let (state, client_id) = seeded_state();
        let app = test_app(state);

        let job = seed_job(&app, client_id, "INSPECTION_ONLY").await;
        let resp = app
            .oneshot(post_json(
                &format!("/v1/jobs/{}/status", job.id.as_uuid()),
                r#"{"status":"COMPLETED","expected_status":"OPEN"}"#.to_string(),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn handler_set_status_same_status_is_accepted_noop() {
        let (state, client_id) = seeded_state();
        let app = test_app(state);

        let job = seed_job(&app, client_id, "CERTIFICATION").await;
        let resp = app
            .oneshot(post_json(
                &format!("/v1/jobs/{}/status", job.id.as_uuid()),
                r#"{"status":"OPEN","expected_status":"OPEN"}"#.to_string(),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let unchanged: Job = body_json(resp).await;
        assert!(unchanged.transitions.is_empty());
    }

    #[tokio::test]
    async fn handler_set_status_overlong_note_returns_400() {
        let (state, client_id) = seeded_state();
        let app = test_app(state);

        let job = seed_job(&app, client_id, "CERTIFICATION").await;
        let note = "x".repeat(501);
        let resp = app
            .oneshot(post_json(
                &format!("/v1/jobs/{}/status", job.id.as_uuid()),
                format!(r#"{{"status":"ON_HOLD","expected_status":"OPEN","note":"{note}"}}"#),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    // ── Priority ──

    #[tokio::test]
    async fn handler_set_priority_applies_even_on_cancelled_job() {
        let (state, client_id) = seeded_state();
        let app = test_app(state);

        let job = seed_job(&app, client_id, "CERTIFICATION").await;
        let id = job.id.as_uuid();

        let resp = app
            .clone()
            .oneshot(post_json(
                &format!("/v1/jobs/{id}/status"),
                r#"{"status":"CANCELLED","expected_status":"OPEN"}"#.to_string(),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let resp = app
            .oneshot(post_json(
                &format!("/v1/jobs/{id}/priority"),
                r#"{"priority":"URGENT"}"#.to_string(),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let updated: Job = body_json(resp).await;
        assert_eq!(updated.priority, Priority::Urgent);
        assert_eq!(updated.status, JobStatus::Cancelled);
    }

    #[tokio::test]
    async fn handler_set_priority_unknown_job_returns_404() {
        let (state, _) = seeded_state();
        let app = test_app(state);

        let resp = app
            .oneshot(post_json(
                &format!("/v1/jobs/{}/priority", Uuid::new_v4()),
                r#"{"priority":"LOW"}"#.to_string(),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
