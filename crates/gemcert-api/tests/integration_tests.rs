//! # Integration Tests for gemcert-api
//!
//! Tests the assembled application end to end: the full certification
//! workflow from client registration to certificate lookup, concurrent
//! issuance, the error envelope, health probes, and OpenAPI spec
//! generation.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use gemcert_api::state::AppState;

/// Helper: build the test app with fresh state and no metrics recorder.
fn test_app() -> axum::Router {
    let state = AppState::new();
    gemcert_api::app(state)
}

/// Helper: read response body as string.
async fn body_string(response: axum::http::Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Helper: read response body as JSON.
async fn body_json(response: axum::http::Response<Body>) -> Value {
    let text = body_string(response).await;
    serde_json::from_str(&text).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Helper: register a client and return its ID.
async fn register_client(app: &axum::Router, name: &str) -> String {
    let response = app
        .clone()
        .oneshot(post("/v1/clients", &json!({ "name": name })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    body["id"].as_str().unwrap().to_string()
}

/// Helper: register the v1 "diamond" schema.
async fn register_diamond_schema(app: &axum::Router) {
    let body = json!({
        "fields": [
            { "name": "carat", "kind": { "type": "number", "min": 0.0 }, "required": true },
            { "name": "clarity", "kind": { "type": "text" }, "required": true },
            { "name": "origin", "kind": { "type": "text" } },
        ],
    });
    let response = app
        .clone()
        .oneshot(post("/v1/schemas/diamond", &body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
}

/// Helper: create a job and return its ID.
async fn create_job(app: &axum::Router, client_id: &str, kind: &str) -> String {
    let body = json!({ "client_id": client_id, "kind": kind });
    let response = app.clone().oneshot(post("/v1/jobs", &body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    body["id"].as_str().unwrap().to_string()
}

/// Helper: advance a job one stage, asserting success.
async fn advance(app: &axum::Router, job_id: &str, expected_stage: &str) {
    let body = json!({ "expected_stage": expected_stage });
    let response = app
        .clone()
        .oneshot(post(&format!("/v1/jobs/{job_id}/advance"), &body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

// -- Health Probes ------------------------------------------------------------

#[tokio::test]
async fn test_liveness_probe() {
    let app = test_app();
    let response = app.oneshot(get("/health/liveness")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert_eq!(body, "ok");
}

#[tokio::test]
async fn test_readiness_probe() {
    let app = test_app();
    let response = app.oneshot(get("/health/readiness")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert_eq!(body, "ready");
}

// -- Full Workflow ------------------------------------------------------------

#[tokio::test]
async fn test_full_certification_workflow() {
    let app = test_app();

    let client_id = register_client(&app, "Meridian Gems").await;
    register_diamond_schema(&app).await;

    let job_id = create_job(&app, &client_id, "CERTIFICATION").await;
    let response = app.clone().oneshot(get(&format!("/v1/jobs/{job_id}"))).await.unwrap();
    let job = body_json(response).await;
    assert_eq!(job["job_number"], "DIA1001");
    assert_eq!(job["stage"], "RECEIVED");
    assert_eq!(job["status"], "OPEN");

    advance(&app, &job_id, "RECEIVED").await;
    advance(&app, &job_id, "UNDER_INSPECTION").await;

    let body = json!({
        "category": "diamond",
        "fields": { "carat": 1.25, "clarity": "VS1", "origin": "Botswana" },
    });
    let response = app
        .clone()
        .oneshot(post(&format!("/v1/jobs/{job_id}/certificate"), &body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let certificate = body_json(response).await;
    let number = certificate["certificate_number"].as_str().unwrap();
    assert!(number.starts_with('G'));
    assert!(number.ends_with("0001"));
    assert_eq!(certificate["schema_version"], 1);

    // Issuance moved the job to CERTIFICATE_ISSUED and linked the certificate.
    let response = app.clone().oneshot(get(&format!("/v1/jobs/{job_id}"))).await.unwrap();
    let job = body_json(response).await;
    assert_eq!(job["stage"], "CERTIFICATE_ISSUED");
    assert_eq!(job["certificate_id"], certificate["id"]);

    // Close the job out.
    advance(&app, &job_id, "CERTIFICATE_ISSUED").await;
    let body = json!({ "status": "COMPLETED", "expected_status": "OPEN" });
    let response = app
        .clone()
        .oneshot(post(&format!("/v1/jobs/{job_id}/status"), &body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let job = body_json(response).await;
    assert_eq!(job["stage"], "COMPLETED");
    assert_eq!(job["status"], "COMPLETED");
    assert_eq!(job["transitions"].as_array().unwrap().len(), 5);

    // The certificate is retrievable by its number.
    let response = app
        .clone()
        .oneshot(get(&format!("/v1/certificates/{number}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let fetched = body_json(response).await;
    assert_eq!(fetched["id"], certificate["id"]);
    assert_eq!(fetched["fields"]["carat"], json!(1.25));
}

#[tokio::test]
async fn test_inspection_job_never_reaches_issuance() {
    let app = test_app();

    let client_id = register_client(&app, "Atlas Minerals").await;
    register_diamond_schema(&app).await;

    let job_id = create_job(&app, &client_id, "INSPECTION_ONLY").await;
    advance(&app, &job_id, "RECEIVED").await;
    advance(&app, &job_id, "UNDER_INSPECTION").await;

    let response = app.clone().oneshot(get(&format!("/v1/jobs/{job_id}"))).await.unwrap();
    let job = body_json(response).await;
    assert_eq!(job["stage"], "REPORT_READY");

    let body = json!({
        "category": "diamond",
        "fields": { "carat": 1.25, "clarity": "VS1" },
    });
    let response = app
        .clone()
        .oneshot(post(&format!("/v1/jobs/{job_id}/certificate"), &body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_job_numbers_are_sequential_across_kinds() {
    let app = test_app();

    let client_id = register_client(&app, "Meridian Gems").await;
    for expected in ["DIA1001", "DIA1002", "DIA1003"] {
        let kind = if expected.ends_with('2') {
            "INSPECTION_ONLY"
        } else {
            "CERTIFICATION"
        };
        let body = json!({ "client_id": client_id, "kind": kind });
        let response = app.clone().oneshot(post("/v1/jobs", &body)).await.unwrap();
        let job = body_json(response).await;
        assert_eq!(job["job_number"], expected);
    }
}

// -- Concurrency --------------------------------------------------------------

#[tokio::test]
async fn test_concurrent_issuance_yields_one_certificate() {
    let app = test_app();

    let client_id = register_client(&app, "Meridian Gems").await;
    register_diamond_schema(&app).await;
    let job_id = create_job(&app, &client_id, "CERTIFICATION").await;
    advance(&app, &job_id, "RECEIVED").await;
    advance(&app, &job_id, "UNDER_INSPECTION").await;

    let body = json!({
        "category": "diamond",
        "fields": { "carat": 1.25, "clarity": "VS1" },
    });
    let uri = format!("/v1/jobs/{job_id}/certificate");
    let (first, second) = tokio::join!(
        app.clone().oneshot(post(&uri, &body)),
        app.clone().oneshot(post(&uri, &body)),
    );

    let mut statuses = [first.unwrap().status(), second.unwrap().status()];
    statuses.sort();
    assert_eq!(statuses, [StatusCode::CREATED, StatusCode::CONFLICT]);

    let response = app.clone().oneshot(get("/v1/certificates")).await.unwrap();
    let listed = body_json(response).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
}

// -- Error Envelope -----------------------------------------------------------

#[tokio::test]
async fn test_error_envelope_shape() {
    let app = test_app();

    let response = app
        .oneshot(get(&format!("/v1/jobs/{}", uuid::Uuid::new_v4())))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "NOT_FOUND");
    assert!(body["error"]["message"].is_string());
}

#[tokio::test]
async fn test_validation_envelope_names_fields() {
    let app = test_app();

    let client_id = register_client(&app, "Meridian Gems").await;
    register_diamond_schema(&app).await;
    let job_id = create_job(&app, &client_id, "CERTIFICATION").await;
    advance(&app, &job_id, "RECEIVED").await;
    advance(&app, &job_id, "UNDER_INSPECTION").await;

    let body = json!({ "category": "diamond", "fields": { "carat": -4 } });
    let response = app
        .clone()
        .oneshot(post(&format!("/v1/jobs/{job_id}/certificate"), &body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "VALIDATION_FAILED");
    let details = body["error"]["details"].as_array().unwrap();
    let fields: Vec<&str> = details
        .iter()
        .map(|d| d["field"].as_str().unwrap())
        .collect();
    assert!(fields.contains(&"carat"));
    assert!(fields.contains(&"clarity"));
}

#[tokio::test]
async fn test_unknown_route_returns_404() {
    let app = test_app();
    let response = app.oneshot(get("/v1/nonexistent")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// -- Metrics ------------------------------------------------------------------

#[tokio::test]
async fn test_metrics_endpoint_without_recorder_returns_404() {
    let app = test_app();
    let response = app.oneshot(get("/metrics")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// -- OpenAPI ------------------------------------------------------------------

#[tokio::test]
async fn test_openapi_spec_generation() {
    let app = test_app();
    let response = app.oneshot(get("/openapi.json")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let spec = body_json(response).await;
    assert!(spec["openapi"].is_string());
    assert!(spec["info"]["title"].is_string());
    assert!(spec["paths"].is_object());
    assert!(spec["paths"]["/v1/jobs"].is_object());
    assert!(spec["paths"]["/v1/clients"].is_object());
}

#[tokio::test]
async fn test_openapi_contains_all_routes() {
    let app = test_app();
    let response = app.oneshot(get("/openapi.json")).await.unwrap();
    let spec = body_json(response).await;
    let paths = spec["paths"].as_object().unwrap();

    let expected_paths = [
        "/v1/clients",
        "/v1/jobs",
        "/v1/jobs/{id}/advance",
        "/v1/jobs/{id}/status",
        "/v1/jobs/{id}/certificate",
        "/v1/certificates",
        "/v1/schemas",
        "/v1/schemas/{category}/versions",
    ];

    for expected in &expected_paths {
        assert!(
            paths
                .keys()
                .any(|k| k.starts_with(expected) || k == expected),
            "OpenAPI spec missing path: {expected}"
        );
    }
}
