//! # Schema API
//!
//! Category schema administration. Registering a schema for a category
//! appends the next version; versions are append-only and never edited or
//! deleted, so a certificate's `schema_version` always names exactly the
//! rules it was validated under.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use metrics::counter;
use serde::Deserialize;
use utoipa::ToSchema;

use gemcert_core::Timestamp;
use gemcert_schema::{CategorySchema, FieldDef};

use crate::error::AppError;
use crate::extractors::extract_json;
use crate::state::AppState;

/// Request to register the next schema version for a category.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterSchemaRequest {
    /// The field definitions making up this version.
    pub fields: Vec<FieldDef>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/schemas", get(list_categories))
        .route(
            "/v1/schemas/{category}",
            post(register_schema).get(get_active_schema),
        )
        .route("/v1/schemas/{category}/versions", get(list_versions))
        .route(
            "/v1/schemas/{category}/versions/{version}",
            get(get_version),
        )
}

#[utoipa::path(
    post,
    path = "/v1/schemas/{category}",
    params(("category" = String, Path, description = "Item category")),
    request_body = RegisterSchemaRequest,
    responses(
        (status = 201, description = "Schema version registered", body = CategorySchema),
        (status = 400, description = "Defective field definitions", body = crate::error::ErrorBody),
    ),
    tag = "schemas"
)]
async fn register_schema(
    State(state): State<AppState>,
    Path(category): Path<String>,
    body: Result<Json<RegisterSchemaRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CategorySchema>), AppError> {
    let req = extract_json(body)?;
    let now = Timestamp::now();

    let schema = state.schemas.register(&category, req.fields, now)?;

    counter!(
        "schema_versions_registered_total",
        "category" => schema.category.clone()
    )
    .increment(1);
    tracing::info!(
        category = %schema.category,
        version = schema.version,
        fields = schema.fields.len(),
        "schema version registered"
    );

    Ok((StatusCode::CREATED, Json(schema)))
}

#[utoipa::path(
    get,
    path = "/v1/schemas",
    responses(
        (status = 200, description = "All categories with a registered schema", body = [String]),
    ),
    tag = "schemas"
)]
async fn list_categories(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.schemas.categories())
}

#[utoipa::path(
    get,
    path = "/v1/schemas/{category}",
    params(("category" = String, Path, description = "Item category")),
    responses(
        (status = 200, description = "The category's active schema version", body = CategorySchema),
        (status = 404, description = "No schema registered", body = crate::error::ErrorBody),
    ),
    tag = "schemas"
)]
async fn get_active_schema(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Result<Json<CategorySchema>, AppError> {
    let schema = state
        .schemas
        .active(&category)
        .ok_or(AppError::SchemaNotFound(category))?;
    Ok(Json(schema))
}

#[utoipa::path(
    get,
    path = "/v1/schemas/{category}/versions",
    params(("category" = String, Path, description = "Item category")),
    responses(
        (status = 200, description = "All versions, oldest first", body = [CategorySchema]),
        (status = 404, description = "No schema registered", body = crate::error::ErrorBody),
    ),
    tag = "schemas"
)]
async fn list_versions(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Result<Json<Vec<CategorySchema>>, AppError> {
    let versions = state.schemas.versions(&category);
    if versions.is_empty() {
        return Err(AppError::SchemaNotFound(category));
    }
    Ok(Json(versions))
}

#[utoipa::path(
    get,
    path = "/v1/schemas/{category}/versions/{version}",
    params(
        ("category" = String, Path, description = "Item category"),
        ("version" = u32, Path, description = "Schema version number"),
    ),
    responses(
        (status = 200, description = "The requested schema version", body = CategorySchema),
        (status = 404, description = "Unknown category or version", body = crate::error::ErrorBody),
    ),
    tag = "schemas"
)]
async fn get_version(
    State(state): State<AppState>,
    Path((category, version)): Path<(String, u32)>,
) -> Result<Json<CategorySchema>, AppError> {
    match state.schemas.version(&category, version) {
        Some(schema) => Ok(Json(schema)),
        None if state.schemas.versions(&category).is_empty() => {
            Err(AppError::SchemaNotFound(category))
        }
        None => Err(AppError::NotFound(format!(
            "category {category:?} has no version {version}"
        ))),
    }
}
