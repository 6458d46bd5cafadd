//! Message composition and bulk send endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::api::handlers::{api_error, ApiResult, AppState, Owner};
use crate::campaigns::{MessageRecord, SendRecord, SendReport};
use crate::error::BulkError;
use crate::session::Session;
use crate::templates::{MessageTemplate, TemplateRenderer, MAX_TEMPLATE_LEN};

#[derive(Debug, Deserialize)]
pub struct MessageRequest {
    pub template: String,
}

#[derive(Debug, Serialize)]
pub struct PreviewResponse {
    pub rendered: String,
    pub length: usize,
    pub max_length: usize,
    /// Placeholders that will be sent as written
    pub unknown_placeholders: Vec<String>,
}

/// POST /api/messages/preview - Render against the sample recipient
pub async fn preview_message(
    State(state): State<Arc<AppState>>,
    _owner: Owner,
    Json(payload): Json<MessageRequest>,
) -> ApiResult<Json<PreviewResponse>> {
    let template = MessageTemplate::new(payload.template).map_err(api_error)?;

    Ok(Json(PreviewResponse {
        rendered: TemplateRenderer::preview(&template, state.substitution),
        length: template.len(),
        max_length: MAX_TEMPLATE_LEN,
        unknown_placeholders: TemplateRenderer::unknown_placeholders(template.as_str()),
    }))
}

/// POST /api/messages/send - Send a message to every stored contact
pub async fn send_message(
    State(state): State<Arc<AppState>>,
    owner: Owner,
    Json(payload): Json<MessageRequest>,
) -> ApiResult<Json<SendReport>> {
    let template = MessageTemplate::new(payload.template).map_err(api_error)?;
    let recipients = state.contacts.list_contacts(&owner.0).await.map_err(api_error)?;
    let connected = state
        .connections
        .has_active_connection(&owner.0)
        .await
        .map_err(api_error)?;

    let session = Session::new()
        .with_recipients(recipients)
        .with_template(template)
        .with_connection(connected);

    let report = state.sender.send_all(&owner.0, &session).await.map_err(api_error)?;
    Ok(Json(report))
}

/// GET /api/messages - Sent messages, newest first
pub async fn list_messages(
    State(state): State<Arc<AppState>>,
    owner: Owner,
) -> ApiResult<Json<Vec<MessageRecord>>> {
    let messages = state.campaigns.list_messages(&owner.0).await.map_err(api_error)?;
    Ok(Json(messages))
}

/// GET /api/messages/:id/sends - Per-recipient outcome of a message
pub async fn list_sends(
    State(state): State<Arc<AppState>>,
    owner: Owner,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<SendRecord>>> {
    let message = state
        .campaigns
        .get_message(&id)
        .await
        .map_err(api_error)?
        .filter(|m| m.owner_id == owner.0)
        .ok_or_else(|| api_error(BulkError::NotFound(format!("Message not found: {}", id))))?;

    let sends = state.campaigns.list_sends(&message.id).await.map_err(api_error)?;
    Ok(Json(sends))
}
