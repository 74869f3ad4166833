//! Suggestion domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

use super::invitation::{MaskedStatus, SUGGESTION_CODE_REGEX};

/// Decision status of a suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionStatus {
    Open,
    Approved,
    Rejected,
    Closed,
}

impl SuggestionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SuggestionStatus::Open => "open",
            SuggestionStatus::Approved => "approved",
            SuggestionStatus::Rejected => "rejected",
            SuggestionStatus::Closed => "closed",
        }
    }
}

impl FromStr for SuggestionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "open" => Ok(SuggestionStatus::Open),
            "approved" => Ok(SuggestionStatus::Approved),
            "rejected" => Ok(SuggestionStatus::Rejected),
            "closed" => Ok(SuggestionStatus::Closed),
            _ => Err(format!("Invalid suggestion status: {}", s)),
        }
    }
}

impl fmt::Display for SuggestionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A suggestion posted within a group.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct Suggestion {
    pub id: Uuid,
    pub owner_user_id: Uuid,
    pub group_id: Uuid,
    pub invitation_code: String,
    pub title: String,
    pub description: String,
    pub comments_count: i64,
    pub likes_count: i64,
    /// Target vote count.
    pub end_goal: i64,
    pub status: SuggestionStatus,
    pub storage_id: Option<String>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert payload for a suggestion row.
#[derive(Debug, Clone)]
pub struct NewSuggestion {
    pub owner_user_id: Uuid,
    pub group_id: Uuid,
    pub invitation_code: String,
    pub title: String,
    pub description: String,
    pub end_goal: i64,
    pub status: SuggestionStatus,
}

/// Request payload for creating a suggestion.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateSuggestionRequest {
    pub group_id: Uuid,

    #[validate(length(
        min = 1,
        max = 150,
        message = "Title must be between 1 and 150 characters"
    ))]
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub title: String,

    #[validate(length(max = 5000, message = "Description must be at most 5000 characters"))]
    pub description: String,

    #[validate(range(min = 1, max = 1_000_000, message = "End goal must be at least 1"))]
    pub end_goal: i64,

    pub status: SuggestionStatus,
}

/// Update of a suggestion. Unlike groups, all fields but the image are required.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct EditSuggestionRequest {
    #[validate(regex(
        path = *SUGGESTION_CODE_REGEX,
        message = "Invalid suggestion invitation code format"
    ))]
    pub invitation_code: String,

    pub status: SuggestionStatus,

    #[validate(range(min = 1, max = 1_000_000, message = "End goal must be at least 1"))]
    pub end_goal: i64,

    #[validate(length(min = 1, max = 200, message = "Invalid storage id"))]
    #[validate(custom(function = "shared::validation::validate_storage_id"))]
    pub storage_id: Option<String>,
}

/// A suggestion plus whether the caller has liked it.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct SuggestionDetails {
    #[serde(flatten)]
    pub suggestion: Suggestion,
    pub has_liked: bool,
}

/// What a non-owner learns about a suggestion from its invitation code.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct MaskedSuggestion {
    pub id: Uuid,
    pub title: String,
    pub image_url: Option<String>,
    pub likes_count: i64,
    pub comments_count: i64,
    pub end_goal: i64,
    pub status: MaskedStatus,
}

impl From<&Suggestion> for MaskedSuggestion {
    fn from(suggestion: &Suggestion) -> Self {
        Self {
            id: suggestion.id,
            title: suggestion.title.clone(),
            image_url: suggestion.image_url.clone(),
            likes_count: 0,
            comments_count: 0,
            end_goal: 0,
            status: MaskedStatus::Private,
        }
    }
}

/// Result of looking a suggestion up by invitation code.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum SuggestionSearchView {
    /// The caller owns the suggestion.
    Full(Suggestion),
    Masked(MaskedSuggestion),
}

/// Response for creating a suggestion.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct CreateSuggestionResponse {
    pub id: Uuid,
    pub invitation_code: String,
}

/// Response for listing a group's suggestions.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ListSuggestionsResponse {
    pub data: Vec<Suggestion>,
    pub count: usize,
}

/// Response for deleting a group or suggestion.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct DeletedResponse {
    pub deleted: bool,
}
