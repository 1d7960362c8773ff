//! # Client API
//!
//! The client directory. Jobs reference clients by ID, so registration
//! comes first in every workflow; everything else here is lookup.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use metrics::counter;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use gemcert_core::{ClientId, Timestamp};

use crate::error::AppError;
use crate::extractors::{extract_validated_json, Validate};
use crate::state::{AppState, ClientRecord};

/// Request to register a client.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterClientRequest {
    /// Display name.
    pub name: String,
    /// Contact email.
    #[serde(default)]
    pub email: Option<String>,
    /// Contact phone.
    #[serde(default)]
    pub phone: Option<String>,
}

impl Validate for RegisterClientRequest {
    fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("name must not be empty".to_string());
        }
        if self.name.len() > 255 {
            return Err("name must not exceed 255 characters".to_string());
        }
        if let Some(email) = &self.email {
            if !email.contains('@') {
                return Err(format!("{email:?} is not a valid email address"));
            }
        }
        Ok(())
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/v1/clients",
            axum::routing::post(register_client).get(list_clients),
        )
        .route("/v1/clients/{id}", get(get_client))
}

#[utoipa::path(
    post,
    path = "/v1/clients",
    request_body = RegisterClientRequest,
    responses(
        (status = 201, description = "Client registered", body = ClientRecord),
        (status = 400, description = "Invalid request", body = crate::error::ErrorBody),
    ),
    tag = "clients"
)]
async fn register_client(
    State(state): State<AppState>,
    body: Result<Json<RegisterClientRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ClientRecord>), AppError> {
    let req = extract_validated_json(body)?;

    let record = ClientRecord {
        id: ClientId::new(),
        name: req.name.trim().to_string(),
        email: req.email,
        phone: req.phone,
        created_at: Timestamp::now(),
    };
    state.clients.insert(record.id.as_uuid(), record.clone());

    counter!("clients_registered_total").increment(1);
    tracing::info!(client_id = %record.id.as_uuid(), name = %record.name, "client registered");

    Ok((StatusCode::CREATED, Json(record)))
}

#[utoipa::path(
    get,
    path = "/v1/clients",
    responses(
        (status = 200, description = "All registered clients", body = [ClientRecord]),
    ),
    tag = "clients"
)]
async fn list_clients(State(state): State<AppState>) -> Json<Vec<ClientRecord>> {
    let mut clients = state.clients.list();
    clients.sort_by(|a, b| a.name.cmp(&b.name));
    Json(clients)
}

#[utoipa::path(
    get,
    path = "/v1/clients/{id}",
    params(("id" = Uuid, Path, description = "Client ID")),
    responses(
        (status = 200, description = "The client", body = ClientRecord),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
    ),
    tag = "clients"
)]
async fn get_client(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ClientRecord>, AppError> {
    let record = state
        .clients
        .get(&id)
        .ok_or_else(|| AppError::NotFound(format!("client {id} not found")))?;
    Ok(Json(record))
}
