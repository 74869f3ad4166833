//! Comment domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A comment on a suggestion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct Comment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub suggestion_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for a comment row.
#[derive(Debug, Clone)]
pub struct NewComment {
    pub user_id: Uuid,
    pub suggestion_id: Uuid,
    pub content: String,
}

/// Request payload for commenting on a suggestion.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateCommentRequest {
    #[validate(length(
        min = 1,
        max = 2000,
        message = "Comment must be between 1 and 2000 characters"
    ))]
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub content: String,
}

/// A comment joined with its author's public profile.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct CommentWithAuthor {
    #[serde(flatten)]
    pub comment: Comment,
    pub username: String,
    pub user_image: Option<String>,
}

/// Response for creating a comment.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct CreateCommentResponse {
    pub id: Uuid,
}

/// Response for listing a suggestion's comments.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ListCommentsResponse {
    pub data: Vec<CommentWithAuthor>,
    pub count: usize,
}
