//! Like entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the likes table.
#[derive(Debug, Clone, FromRow)]
pub struct LikeEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub suggestion_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl From<LikeEntity> for domain::models::Like {
    fn from(entity: LikeEntity) -> Self {
        Self {
            id: entity.id,
            user_id: entity.user_id,
            suggestion_id: entity.suggestion_id,
            created_at: entity.created_at,
        }
    }
}
