//! Shared API state, errors and general handlers

use axum::{
    extract::{FromRequestParts, State},
    http::{request::Parts, StatusCode},
    Json,
};
use serde::Serialize;
use sqlx::SqlitePool;
use std::sync::Arc;
use std::time::Duration;
use tracing::error;

use crate::campaigns::{BulkSender, CampaignManager};
use crate::config::Config;
use crate::connections::ConnectionManager;
use crate::contacts::{ContactManager, CsvError};
use crate::delivery::DeliveryTransport;
use crate::error::BulkError;
use crate::templates::{SubstitutionMode, MAX_TEMPLATE_LEN};

/// Header carrying the caller's identity
pub const OWNER_HEADER: &str = "x-owner-id";

/// Shared application state
pub struct AppState {
    pub contacts: ContactManager,
    pub connections: ConnectionManager,
    pub campaigns: Arc<CampaignManager>,
    pub sender: BulkSender,
    pub substitution: SubstitutionMode,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(db: SqlitePool, config: &Config, transport: Arc<dyn DeliveryTransport>) -> Self {
        let campaigns = Arc::new(CampaignManager::new(db.clone()));
        let sender = BulkSender::new(
            campaigns.clone(),
            transport,
            Duration::from_millis(config.delivery.send_delay_ms),
            config.templates.substitution,
        );

        Self {
            contacts: ContactManager::new(db.clone()),
            connections: ConnectionManager::new(db),
            campaigns,
            sender,
            substitution: config.templates.substitution,
            max_upload_bytes: config.limits.max_upload_bytes,
        }
    }
}

/// API error response
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
}

impl ApiError {
    pub fn new(msg: &str) -> Self {
        Self {
            error: msg.to_string(),
        }
    }
}

pub type ApiResult<T> = Result<T, (StatusCode, Json<ApiError>)>;

/// Map a service error to its HTTP response
pub fn api_error(e: BulkError) -> (StatusCode, Json<ApiError>) {
    let status = match &e {
        BulkError::Csv(CsvError::TooLarge { .. }) => StatusCode::PAYLOAD_TOO_LARGE,
        BulkError::Csv(_) | BulkError::InvalidMessage(_) | BulkError::Blocked(_) => StatusCode::BAD_REQUEST,
        BulkError::NoValidContacts => StatusCode::UNPROCESSABLE_ENTITY,
        BulkError::NotFound(_) => StatusCode::NOT_FOUND,
        BulkError::Aborted { .. } => StatusCode::BAD_GATEWAY,
        BulkError::Io(_)
        | BulkError::Config(_)
        | BulkError::Database(_)
        | BulkError::Parse(_)
        | BulkError::Json(_) => {
            error!("Request failed: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    (status, Json(ApiError::new(&e.to_string())))
}

/// Identity of the caller, taken from the `X-Owner-Id` header
#[derive(Debug, Clone)]
pub struct Owner(pub String);

#[axum::async_trait]
impl<S> FromRequestParts<S> for Owner
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<ApiError>);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(OWNER_HEADER)
            .and_then(|h| h.to_str().ok())
            .map(str::trim)
            .filter(|owner| !owner.is_empty())
            .map(|owner| Owner(owner.to_string()))
            .ok_or((
                StatusCode::UNAUTHORIZED,
                Json(ApiError::new("Missing X-Owner-Id header")),
            ))
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// GET /api/health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub contacts: usize,
    pub connected: bool,
    pub max_contacts: usize,
    pub max_message_length: usize,
}

/// GET /api/stats - Dashboard counters
pub async fn stats(State(state): State<Arc<AppState>>, owner: Owner) -> ApiResult<Json<StatsResponse>> {
    let contacts = state.contacts.count_contacts(&owner.0).await.map_err(api_error)?;
    let connected = state
        .connections
        .has_active_connection(&owner.0)
        .await
        .map_err(api_error)?;

    Ok(Json(StatsResponse {
        contacts,
        connected,
        max_contacts: crate::contacts::MAX_RECIPIENTS,
        max_message_length: MAX_TEMPLATE_LEN,
    }))
}
