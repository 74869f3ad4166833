//! Like domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user's vote on a suggestion. Presence is the liked state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct Like {
    pub id: Uuid,
    pub user_id: Uuid,
    pub suggestion_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Response for toggling a like.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ToggleLikeResponse {
    /// The caller's like state after the toggle.
    pub liked: bool,
}
