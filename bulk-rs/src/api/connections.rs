//! Messaging account connection endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::api::handlers::{api_error, ApiResult, AppState, Owner};
use crate::connections::{Connection, ConnectionCredential};

/// POST /api/connections - Store account credentials
pub async fn create_connection(
    State(state): State<Arc<AppState>>,
    owner: Owner,
    Json(credential): Json<ConnectionCredential>,
) -> ApiResult<(StatusCode, Json<Connection>)> {
    let connection = state
        .connections
        .connect(&owner.0, credential)
        .await
        .map_err(api_error)?;

    Ok((StatusCode::CREATED, Json(connection)))
}

/// GET /api/connections - Stored connections, newest first
pub async fn list_connections(
    State(state): State<Arc<AppState>>,
    owner: Owner,
) -> ApiResult<Json<Vec<Connection>>> {
    let connections = state
        .connections
        .list_connections(&owner.0)
        .await
        .map_err(api_error)?;

    Ok(Json(connections))
}

/// POST /api/connections/:id/disconnect
pub async fn disconnect(
    State(state): State<Arc<AppState>>,
    owner: Owner,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state
        .connections
        .disconnect(&owner.0, &id)
        .await
        .map_err(api_error)?;

    Ok(StatusCode::NO_CONTENT)
}
