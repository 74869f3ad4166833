//! Group routes: creation, membership, invitation codes and cascade deletion.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use domain::models::{
    CreateGroupRequest, CreateGroupResponse, DeletedResponse, EditGroupRequest, Group,
    GroupCodeRequest, GroupOverview, GroupSearchView, InvitationCodeResponse, JoinGroupResponse,
    ListGroupsResponse, ListSuggestionsResponse,
};
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::Caller;

/// Create a group owned by the caller.
///
/// POST /api/v1/groups
pub async fn create_group(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    Json(request): Json<CreateGroupRequest>,
) -> Result<(StatusCode, Json<CreateGroupResponse>), ApiError> {
    let group = state.engine.add_group(&ctx, request).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateGroupResponse {
            id: group.id,
            invitation_code: group.invitation_code,
        }),
    ))
}

/// List groups the caller owns or was invited to.
///
/// GET /api/v1/groups
pub async fn list_groups(
    State(state): State<AppState>,
    Caller(ctx): Caller,
) -> Result<Json<ListGroupsResponse>, ApiError> {
    let data = state.engine.fetch_user_groups(&ctx).await?;
    let count = data.len();
    Ok(Json(ListGroupsResponse { data, count }))
}

/// Group details with the caller's role; `null` when the group does not exist.
///
/// GET /api/v1/groups/:group_id
pub async fn get_group(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    Path(group_id): Path<Uuid>,
) -> Result<Json<Option<GroupOverview>>, ApiError> {
    Ok(Json(state.engine.fetch_group_details(&ctx, group_id).await?))
}

/// Owner-only partial update.
///
/// PATCH /api/v1/groups/:group_id
pub async fn update_group(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    Path(group_id): Path<Uuid>,
    Json(request): Json<EditGroupRequest>,
) -> Result<Json<Group>, ApiError> {
    Ok(Json(state.engine.edit_group(&ctx, group_id, request).await?))
}

/// Delete a group with all of its suggestions, likes, comments and invitations.
///
/// DELETE /api/v1/groups/:group_id
pub async fn delete_group(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    Path(group_id): Path<Uuid>,
) -> Result<Json<DeletedResponse>, ApiError> {
    let deleted = state.engine.delete_group(&ctx, group_id).await?;
    Ok(Json(DeletedResponse { deleted }))
}

/// Replace the group's invitation code.
///
/// POST /api/v1/groups/:group_id/invitation-code
pub async fn regenerate_invitation_code(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    Path(group_id): Path<Uuid>,
) -> Result<Json<InvitationCodeResponse>, ApiError> {
    let invitation_code = state.engine.regenerate_group_code(&ctx, group_id).await?;
    Ok(Json(InvitationCodeResponse { invitation_code }))
}

/// Suggestions of a group visible to the caller, newest first.
///
/// GET /api/v1/groups/:group_id/suggestions
pub async fn list_group_suggestions(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    Path(group_id): Path<Uuid>,
) -> Result<Json<ListSuggestionsResponse>, ApiError> {
    let data = state.engine.fetch_suggestions(&ctx, group_id).await?;
    let count = data.len();
    Ok(Json(ListSuggestionsResponse { data, count }))
}

/// Look a group up by invitation code. Non-owners get a masked view.
///
/// POST /api/v1/groups/search
pub async fn search_by_invitation_code(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    Json(request): Json<GroupCodeRequest>,
) -> Result<Json<Option<GroupSearchView>>, ApiError> {
    request.validate()?;
    Ok(Json(
        state
            .engine
            .search_groups_by_invitation_code(&ctx, &request.invitation_code)
            .await?,
    ))
}

/// Join a group with its invitation code.
///
/// POST /api/v1/groups/join
pub async fn join_by_invitation_code(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    Json(request): Json<GroupCodeRequest>,
) -> Result<Json<JoinGroupResponse>, ApiError> {
    request.validate()?;
    let invitation_id = state
        .engine
        .request_to_join_group(&ctx, &request.invitation_code)
        .await?;
    Ok(Json(JoinGroupResponse { invitation_id }))
}
