//! User domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A registered person, linked to exactly one external identity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct User {
    pub id: Uuid,
    /// Identity-provider subject; unique.
    pub external_id: String,
    pub username: String,
    pub fullname: String,
    /// Unique across users.
    pub email: String,
    pub image: Option<String>,
    /// Informational only, see `SuggestionBox::delete_group`.
    pub suggestions_count: i64,
    pub comments_count: i64,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for a user row.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub external_id: String,
    pub username: String,
    pub fullname: String,
    pub email: String,
    pub image: Option<String>,
}

/// Request payload for registering the caller.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct RegisterUserRequest {
    #[validate(custom(function = "shared::validation::validate_username"))]
    pub username: String,

    #[validate(length(
        min = 1,
        max = 100,
        message = "Full name must be between 1 and 100 characters"
    ))]
    pub fullname: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(url(message = "Image must be a URL"))]
    pub image: Option<String>,
}

/// Request payload for updating the caller's profile.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct UpdateProfileRequest {
    #[validate(custom(function = "shared::validation::validate_username"))]
    pub username: Option<String>,

    #[validate(length(
        min = 1,
        max = 100,
        message = "Full name must be between 1 and 100 characters"
    ))]
    pub fullname: Option<String>,

    #[validate(url(message = "Image must be a URL"))]
    pub image: Option<String>,
}
