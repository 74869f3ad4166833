//! Caller profile routes.

use axum::{extract::State, Json};
use domain::models::{RegisterUserRequest, UpdateProfileRequest, User};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::Caller;

/// Register the caller, or return the existing record.
///
/// POST /api/v1/users
pub async fn register_user(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    Json(request): Json<RegisterUserRequest>,
) -> Result<Json<User>, ApiError> {
    Ok(Json(state.engine.ensure_user(&ctx, request).await?))
}

/// GET /api/v1/users/me
pub async fn get_current_user(
    State(state): State<AppState>,
    Caller(ctx): Caller,
) -> Result<Json<User>, ApiError> {
    Ok(Json(state.engine.current_user(&ctx).await?))
}

/// Partially update the caller's profile.
///
/// PATCH /api/v1/users/me
pub async fn update_current_user(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<User>, ApiError> {
    Ok(Json(state.engine.update_profile(&ctx, request).await?))
}
