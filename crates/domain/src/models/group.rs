//! Group domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

use super::invitation::{MaskedStatus, GROUP_CODE_REGEX};

/// Lifecycle status of a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupStatus {
    Open,
    Closed,
}

impl GroupStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GroupStatus::Open => "open",
            GroupStatus::Closed => "closed",
        }
    }
}

impl FromStr for GroupStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "open" => Ok(GroupStatus::Open),
            "closed" => Ok(GroupStatus::Closed),
            _ => Err(format!("Invalid group status: {}", s)),
        }
    }
}

impl fmt::Display for GroupStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The caller's relationship to a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupRole {
    Owner,
    Invited,
}

impl GroupRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            GroupRole::Owner => "owner",
            GroupRole::Invited => "invited",
        }
    }
}

impl fmt::Display for GroupRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A suggestion group, exclusively owned by its creator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct Group {
    pub id: Uuid,
    pub owner_user_id: Uuid,
    pub group_name: String,
    pub invitation_code: String,
    /// Always equals the number of suggestions whose `group_id` is this group.
    pub suggestions_count: i64,
    pub status: GroupStatus,
    pub storage_id: Option<String>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert payload for a group row.
#[derive(Debug, Clone)]
pub struct NewGroup {
    pub owner_user_id: Uuid,
    pub group_name: String,
    pub invitation_code: String,
    pub status: GroupStatus,
}

/// Request payload for creating a group.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateGroupRequest {
    #[validate(length(
        min = 1,
        max = 100,
        message = "Group name must be between 1 and 100 characters"
    ))]
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub group_name: String,

    pub status: GroupStatus,
}

/// Partial update of a group. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct EditGroupRequest {
    #[validate(length(
        min = 1,
        max = 100,
        message = "Group name must be between 1 and 100 characters"
    ))]
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub group_name: Option<String>,

    #[validate(regex(
        path = *GROUP_CODE_REGEX,
        message = "Invalid group invitation code format"
    ))]
    pub invitation_code: Option<String>,

    pub status: Option<GroupStatus>,

    #[validate(length(min = 1, max = 200, message = "Invalid storage id"))]
    #[validate(custom(function = "shared::validation::validate_storage_id"))]
    pub storage_id: Option<String>,
}

/// A group annotated with the caller's role and live decision counts.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct GroupOverview {
    #[serde(flatten)]
    pub group: Group,
    pub role: GroupRole,
    /// Computed at read time from the group's suggestions.
    pub approved_count: i64,
    pub rejected_count: i64,
}

/// What a non-owner learns about a group from its invitation code.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct MaskedGroup {
    pub id: Uuid,
    pub group_name: String,
    pub image_url: Option<String>,
    pub suggestions_count: i64,
    pub status: MaskedStatus,
}

impl From<&Group> for MaskedGroup {
    fn from(group: &Group) -> Self {
        Self {
            id: group.id,
            group_name: group.group_name.clone(),
            image_url: group.image_url.clone(),
            suggestions_count: 0,
            status: MaskedStatus::Private,
        }
    }
}

/// Result of looking a group up by invitation code.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum GroupSearchView {
    /// The caller owns the group.
    Full(Group),
    Masked(MaskedGroup),
}

/// Response for creating a group.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct CreateGroupResponse {
    pub id: Uuid,
    pub invitation_code: String,
}

/// Response for listing the caller's groups.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ListGroupsResponse {
    pub data: Vec<GroupOverview>,
    pub count: usize,
}
