//! Contact list endpoints

use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

use crate::api::handlers::{api_error, ApiError, ApiResult, AppState, Owner};
use crate::contacts::{demo_csv, parse_contacts, validate_upload, Recipient};
use crate::error::BulkError;

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub imported: usize,
}

/// Uploaded file pulled out of the multipart body
struct UploadedFile {
    file_name: Option<String>,
    content_type: Option<String>,
    data: Vec<u8>,
}

fn bad_request(msg: &str) -> (StatusCode, Json<ApiError>) {
    (StatusCode::BAD_REQUEST, Json(ApiError::new(msg)))
}

/// Map a multipart read failure, keeping the body limit as a 413
fn upload_error(e: MultipartError, max_bytes: usize) -> (StatusCode, Json<ApiError>) {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        warn!("Upload rejected by body limit: {}", e);
        return (
            StatusCode::PAYLOAD_TOO_LARGE,
            Json(ApiError::new(&format!(
                "File is larger than the limit of {} bytes",
                max_bytes
            ))),
        );
    }

    warn!("Malformed multipart upload: {}", e);
    bad_request("Failed to read upload")
}

/// POST /api/contacts/upload - Replace the contact list from a CSV file
///
/// Expects a multipart body with a `file` field.
pub async fn upload_contacts(
    State(state): State<Arc<AppState>>,
    owner: Owner,
    mut multipart: Multipart,
) -> ApiResult<Json<UploadResponse>> {
    let mut upload = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| upload_error(e, state.max_upload_bytes))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let data = field
            .bytes()
            .await
            .map_err(|e| upload_error(e, state.max_upload_bytes))?;

        upload = Some(UploadedFile {
            file_name,
            content_type,
            data: data.to_vec(),
        });
    }

    let upload = upload.ok_or_else(|| bad_request("Missing file field"))?;

    validate_upload(
        upload.file_name.as_deref(),
        upload.content_type.as_deref(),
        upload.data.len(),
        state.max_upload_bytes,
    )
    .map_err(|e| api_error(e.into()))?;

    let text = String::from_utf8_lossy(&upload.data);
    let recipients = parse_contacts(&text).map_err(|e| api_error(e.into()))?;

    if recipients.is_empty() {
        return Err(api_error(BulkError::NoValidContacts));
    }

    let imported = state
        .contacts
        .replace_contacts(&owner.0, &recipients)
        .await
        .map_err(api_error)?;

    info!(
        "Imported {} contacts for {} from {}",
        imported,
        owner.0,
        upload.file_name.as_deref().unwrap_or("unnamed file")
    );

    Ok(Json(UploadResponse { imported }))
}

/// GET /api/contacts - Current contact list
pub async fn list_contacts(
    State(state): State<Arc<AppState>>,
    owner: Owner,
) -> ApiResult<Json<Vec<Recipient>>> {
    let contacts = state.contacts.list_contacts(&owner.0).await.map_err(api_error)?;
    Ok(Json(contacts))
}

/// GET /api/contacts/demo - Download a sample contact file
pub async fn download_demo() -> impl IntoResponse {
    let headers = [
        (header::CONTENT_TYPE, "text/csv"),
        (
            header::CONTENT_DISPOSITION,
            "attachment; filename=\"demo-contacts.csv\"",
        ),
    ];

    (headers, demo_csv())
}
