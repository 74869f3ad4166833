//! Suggestion entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::SuggestionStatus;
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for suggestion_status that maps to PostgreSQL enum type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "suggestion_status", rename_all = "lowercase")]
pub enum SuggestionStatusDb {
    Open,
    Approved,
    Rejected,
    Closed,
}

impl From<SuggestionStatusDb> for SuggestionStatus {
    fn from(db_status: SuggestionStatusDb) -> Self {
        match db_status {
            SuggestionStatusDb::Open => SuggestionStatus::Open,
            SuggestionStatusDb::Approved => SuggestionStatus::Approved,
            SuggestionStatusDb::Rejected => SuggestionStatus::Rejected,
            SuggestionStatusDb::Closed => SuggestionStatus::Closed,
        }
    }
}

impl From<SuggestionStatus> for SuggestionStatusDb {
    fn from(status: SuggestionStatus) -> Self {
        match status {
            SuggestionStatus::Open => SuggestionStatusDb::Open,
            SuggestionStatus::Approved => SuggestionStatusDb::Approved,
            SuggestionStatus::Rejected => SuggestionStatusDb::Rejected,
            SuggestionStatus::Closed => SuggestionStatusDb::Closed,
        }
    }
}

/// Database row mapping for the suggestions table.
#[derive(Debug, Clone, FromRow)]
pub struct SuggestionEntity {
    pub id: Uuid,
    pub owner_user_id: Uuid,
    pub group_id: Uuid,
    pub invitation_code: String,
    pub title: String,
    pub description: String,
    pub comments_count: i64,
    pub likes_count: i64,
    pub end_goal: i64,
    pub status: SuggestionStatusDb,
    pub storage_id: Option<String>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<SuggestionEntity> for domain::models::Suggestion {
    fn from(entity: SuggestionEntity) -> Self {
        Self {
            id: entity.id,
            owner_user_id: entity.owner_user_id,
            group_id: entity.group_id,
            invitation_code: entity.invitation_code,
            title: entity.title,
            description: entity.description,
            comments_count: entity.comments_count,
            likes_count: entity.likes_count,
            end_goal: entity.end_goal,
            status: entity.status.into(),
            storage_id: entity.storage_id,
            image_url: entity.image_url,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

/// Database row mapping for the suggestion_invitations table.
#[derive(Debug, Clone, FromRow)]
pub struct SuggestionInvitationEntity {
    pub id: Uuid,
    pub suggestion_id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl From<SuggestionInvitationEntity> for domain::models::SuggestionInvitation {
    fn from(entity: SuggestionInvitationEntity) -> Self {
        Self {
            id: entity.id,
            suggestion_id: entity.suggestion_id,
            user_id: entity.user_id,
            created_at: entity.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suggestion_status_db_conversion() {
        for status in [
            SuggestionStatus::Open,
            SuggestionStatus::Approved,
            SuggestionStatus::Rejected,
            SuggestionStatus::Closed,
        ] {
            let db: SuggestionStatusDb = status.into();
            assert_eq!(SuggestionStatus::from(db), status);
        }
    }
}
