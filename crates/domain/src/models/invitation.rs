//! Invitation and join-request domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A user's membership record for a group.
///
/// `all_suggestions = true` grants owner-equivalent visibility of the group's
/// suggestions; `false` restricts the member to suggestions they hold a
/// [`SuggestionInvitation`] for. At most one per `(group_id, user_id)`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct GroupInvitation {
    pub id: Uuid,
    pub group_id: Uuid,
    pub user_id: Uuid,
    pub all_suggestions: bool,
    pub created_at: DateTime<Utc>,
}

/// A user's join record for one suggestion. At most one per `(suggestion_id, user_id)`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct SuggestionInvitation {
    pub id: Uuid,
    pub suggestion_id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Status shown in place of the real one on masked search results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaskedStatus {
    Private,
}

lazy_static::lazy_static! {
    pub static ref GROUP_CODE_REGEX: regex::Regex =
        regex::Regex::new(r"^grp.{5}.+.{5}G0g$").unwrap();
    pub static ref SUGGESTION_CODE_REGEX: regex::Regex =
        regex::Regex::new(r"^sug.{5}.+.{5}S0s$").unwrap();
}

/// Request carrying a group invitation code (search or join).
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct GroupCodeRequest {
    #[validate(regex(
        path = *GROUP_CODE_REGEX,
        message = "Invalid group invitation code format"
    ))]
    pub invitation_code: String,
}

/// Request carrying a suggestion invitation code (search or join).
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct SuggestionCodeRequest {
    #[validate(regex(
        path = *SUGGESTION_CODE_REGEX,
        message = "Invalid suggestion invitation code format"
    ))]
    pub invitation_code: String,
}

/// Response after asking to join a group. `None` when the code matched nothing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct JoinGroupResponse {
    pub invitation_id: Option<Uuid>,
}

/// Response after joining a suggestion.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct JoinSuggestionResponse {
    pub invitation_id: Uuid,
}

/// Response after regenerating an invitation code.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct InvitationCodeResponse {
    pub invitation_code: String,
}
