//! Image upload routes.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::Caller;

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct UploadUrlResponse {
    pub upload_url: String,
}

/// Issue a short-lived upload URL. The storage id obtained from the upload
/// is later passed to the group or suggestion edit routes.
///
/// POST /api/v1/storage/upload-url
pub async fn generate_upload_url(
    State(state): State<AppState>,
    Caller(ctx): Caller,
) -> Result<Json<UploadUrlResponse>, ApiError> {
    let upload_url = state.engine.generate_upload_url(&ctx).await?;
    Ok(Json(UploadUrlResponse { upload_url }))
}
