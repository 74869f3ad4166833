//! Comment entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{Comment, CommentWithAuthor};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the comments table.
#[derive(Debug, Clone, FromRow)]
pub struct CommentEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub suggestion_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl From<CommentEntity> for Comment {
    fn from(entity: CommentEntity) -> Self {
        Self {
            id: entity.id,
            user_id: entity.user_id,
            suggestion_id: entity.suggestion_id,
            content: entity.content,
            created_at: entity.created_at,
        }
    }
}

/// A comment row joined with its author's public profile.
#[derive(Debug, Clone, FromRow)]
pub struct CommentWithAuthorEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub suggestion_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub username: String,
    pub user_image: Option<String>,
}

impl From<CommentWithAuthorEntity> for CommentWithAuthor {
    fn from(entity: CommentWithAuthorEntity) -> Self {
        Self {
            comment: Comment {
                id: entity.id,
                user_id: entity.user_id,
                suggestion_id: entity.suggestion_id,
                content: entity.content,
                created_at: entity.created_at,
            },
            username: entity.username,
            user_image: entity.user_image,
        }
    }
}
