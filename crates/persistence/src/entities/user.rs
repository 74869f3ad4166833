//! User entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the users table.
#[derive(Debug, Clone, FromRow)]
pub struct UserEntity {
    pub id: Uuid,
    pub external_id: String,
    pub username: String,
    pub fullname: String,
    pub email: String,
    pub image: Option<String>,
    pub suggestions_count: i64,
    pub comments_count: i64,
    pub created_at: DateTime<Utc>,
}

impl From<UserEntity> for domain::models::User {
    fn from(entity: UserEntity) -> Self {
        Self {
            id: entity.id,
            external_id: entity.external_id,
            username: entity.username,
            fullname: entity.fullname,
            email: entity.email,
            image: entity.image,
            suggestions_count: entity.suggestions_count,
            comments_count: entity.comments_count,
            created_at: entity.created_at,
        }
    }
}
