//! Handler for image uploads that later serve as job resource locators.

use axum::extract::{Multipart, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use spark_core::upload::{locator_for, stored_extension, validate_upload};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Response for `POST /ai/uploads`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub upload_id: Uuid,
    /// Name the file was stored under.
    pub filename: String,
    /// Resource locator to submit as a job's `resourceLocator`.
    pub url: String,
    pub size: usize,
    pub content_type: String,
}

/// POST /api/v1/ai/uploads
///
/// Accepts a multipart form with a required `file` field holding an image.
pub async fn upload_image(
    auth: AuthUser,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let mut file: Option<(String, String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or("upload").to_string();
        let content_type = field.content_type().unwrap_or_default().to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        file = Some((filename, content_type, data.to_vec()));
    }

    let (original_name, content_type, data) =
        file.ok_or_else(|| AppError::BadRequest("No image file provided".into()))?;

    validate_upload(&content_type, data.len(), state.config.max_upload_bytes)?;
    let ext = stored_extension(&original_name, &content_type)?;

    let upload_id = Uuid::new_v4();
    let stored_name = format!("{upload_id}.{ext}");

    tokio::fs::create_dir_all(&state.config.upload_dir)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?;
    tokio::fs::write(state.config.upload_dir.join(&stored_name), &data)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?;

    tracing::info!(
        upload_id = %upload_id,
        user_id = %auth.user_id,
        size = data.len(),
        content_type = %content_type,
        "Image uploaded",
    );

    Ok(Json(DataResponse {
        data: UploadResponse {
            upload_id,
            url: locator_for(&stored_name),
            filename: stored_name,
            size: data.len(),
            content_type,
        },
    }))
}
