//! Suggestion routes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use domain::models::{
    CreateSuggestionRequest, CreateSuggestionResponse, DeletedResponse, EditSuggestionRequest,
    InvitationCodeResponse, JoinSuggestionResponse, Suggestion, SuggestionCodeRequest,
    SuggestionDetails, SuggestionSearchView, ToggleLikeResponse,
};
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::Caller;

/// Post a suggestion to a group.
///
/// POST /api/v1/suggestions
pub async fn create_suggestion(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    Json(request): Json<CreateSuggestionRequest>,
) -> Result<(StatusCode, Json<CreateSuggestionResponse>), ApiError> {
    let suggestion = state.engine.add_suggestion(&ctx, request).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateSuggestionResponse {
            id: suggestion.id,
            invitation_code: suggestion.invitation_code,
        }),
    ))
}

/// Suggestion with the caller's like state; `null` when it does not exist.
///
/// GET /api/v1/suggestions/:suggestion_id
pub async fn get_suggestion(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    Path(suggestion_id): Path<Uuid>,
) -> Result<Json<Option<SuggestionDetails>>, ApiError> {
    Ok(Json(
        state
            .engine
            .fetch_suggestion_details(&ctx, suggestion_id)
            .await?,
    ))
}

/// PATCH /api/v1/suggestions/:suggestion_id
pub async fn update_suggestion(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    Path(suggestion_id): Path<Uuid>,
    Json(request): Json<EditSuggestionRequest>,
) -> Result<Json<Suggestion>, ApiError> {
    Ok(Json(
        state
            .engine
            .edit_suggestion(&ctx, suggestion_id, request)
            .await?,
    ))
}

/// DELETE /api/v1/suggestions/:suggestion_id
pub async fn delete_suggestion(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    Path(suggestion_id): Path<Uuid>,
) -> Result<Json<DeletedResponse>, ApiError> {
    let deleted = state.engine.delete_suggestion(&ctx, suggestion_id).await?;
    Ok(Json(DeletedResponse { deleted }))
}

/// POST /api/v1/suggestions/:suggestion_id/invitation-code
pub async fn regenerate_invitation_code(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    Path(suggestion_id): Path<Uuid>,
) -> Result<Json<InvitationCodeResponse>, ApiError> {
    let invitation_code = state
        .engine
        .regenerate_suggestion_code(&ctx, suggestion_id)
        .await?;
    Ok(Json(InvitationCodeResponse { invitation_code }))
}

/// Flip the caller's like on a suggestion.
///
/// POST /api/v1/suggestions/:suggestion_id/like
pub async fn toggle_like(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    Path(suggestion_id): Path<Uuid>,
) -> Result<Json<ToggleLikeResponse>, ApiError> {
    let liked = state.engine.toggle_like(&ctx, suggestion_id).await?;
    Ok(Json(ToggleLikeResponse { liked }))
}

/// POST /api/v1/suggestions/search
pub async fn search_by_invitation_code(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    Json(request): Json<SuggestionCodeRequest>,
) -> Result<Json<Option<SuggestionSearchView>>, ApiError> {
    request.validate()?;
    Ok(Json(
        state
            .engine
            .search_suggestions_by_invitation_code(&ctx, &request.invitation_code)
            .await?,
    ))
}

/// Join a single suggestion; also grants narrow membership of its group.
///
/// POST /api/v1/suggestions/join
pub async fn join_by_invitation_code(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    Json(request): Json<SuggestionCodeRequest>,
) -> Result<Json<JoinSuggestionResponse>, ApiError> {
    request.validate()?;
    let invitation_id = state
        .engine
        .request_to_join_suggestion(&ctx, &request.invitation_code)
        .await?;
    Ok(Json(JoinSuggestionResponse { invitation_id }))
}
