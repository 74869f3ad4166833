//! Comment routes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use domain::models::{
    CreateCommentRequest, CreateCommentResponse, DeletedResponse, ListCommentsResponse,
};
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::Caller;

/// POST /api/v1/suggestions/:suggestion_id/comments
pub async fn create_comment(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    Path(suggestion_id): Path<Uuid>,
    Json(request): Json<CreateCommentRequest>,
) -> Result<(StatusCode, Json<CreateCommentResponse>), ApiError> {
    let comment = state
        .engine
        .add_comment(&ctx, suggestion_id, request)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(CreateCommentResponse { id: comment.id }),
    ))
}

/// Comments newest first, each with its author's username and image.
///
/// GET /api/v1/suggestions/:suggestion_id/comments
pub async fn list_comments(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    Path(suggestion_id): Path<Uuid>,
) -> Result<Json<ListCommentsResponse>, ApiError> {
    let data = state.engine.fetch_comments(&ctx, suggestion_id).await?;
    let count = data.len();
    Ok(Json(ListCommentsResponse { data, count }))
}

/// Author-only.
///
/// DELETE /api/v1/comments/:comment_id
pub async fn delete_comment(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    Path(comment_id): Path<Uuid>,
) -> Result<Json<DeletedResponse>, ApiError> {
    let deleted = state.engine.delete_comment(&ctx, comment_id).await?;
    Ok(Json(DeletedResponse { deleted }))
}
