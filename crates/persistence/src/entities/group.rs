//! Group entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::GroupStatus;
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for group_status that maps to PostgreSQL enum type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "group_status", rename_all = "lowercase")]
pub enum GroupStatusDb {
    Open,
    Closed,
}

impl From<GroupStatusDb> for GroupStatus {
    fn from(db_status: GroupStatusDb) -> Self {
        match db_status {
            GroupStatusDb::Open => GroupStatus::Open,
            GroupStatusDb::Closed => GroupStatus::Closed,
        }
    }
}

impl From<GroupStatus> for GroupStatusDb {
    fn from(status: GroupStatus) -> Self {
        match status {
            GroupStatus::Open => GroupStatusDb::Open,
            GroupStatus::Closed => GroupStatusDb::Closed,
        }
    }
}

/// Database row mapping for the groups table.
#[derive(Debug, Clone, FromRow)]
pub struct GroupEntity {
    pub id: Uuid,
    pub owner_user_id: Uuid,
    pub group_name: String,
    pub invitation_code: String,
    pub suggestions_count: i64,
    pub status: GroupStatusDb,
    pub storage_id: Option<String>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<GroupEntity> for domain::models::Group {
    fn from(entity: GroupEntity) -> Self {
        Self {
            id: entity.id,
            owner_user_id: entity.owner_user_id,
            group_name: entity.group_name,
            invitation_code: entity.invitation_code,
            suggestions_count: entity.suggestions_count,
            status: entity.status.into(),
            storage_id: entity.storage_id,
            image_url: entity.image_url,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

/// Database row mapping for the group_invitations table.
#[derive(Debug, Clone, FromRow)]
pub struct GroupInvitationEntity {
    pub id: Uuid,
    pub group_id: Uuid,
    pub user_id: Uuid,
    pub all_suggestions: bool,
    pub created_at: DateTime<Utc>,
}

impl From<GroupInvitationEntity> for domain::models::GroupInvitation {
    fn from(entity: GroupInvitationEntity) -> Self {
        Self {
            id: entity.id,
            group_id: entity.group_id,
            user_id: entity.user_id,
            all_suggestions: entity.all_suggestions,
            created_at: entity.created_at,
        }
    }
}
