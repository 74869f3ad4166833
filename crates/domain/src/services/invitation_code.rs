//! Invitation-code generation.
//!
//! A code is `<prefix><5 random><parent id><5 random><suffix>`. The prefix and
//! suffix pair tells group codes from suggestion codes; clients match on it
//! before searching. The embedded id is cosmetic: lookups use the whole code
//! through a unique index, and codes are not re-checked for collisions.

use uuid::Uuid;

const RANDOM_SEGMENT_LEN: usize = 5;

/// Which index a code belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeKind {
    Group,
    Suggestion,
}

impl CodeKind {
    pub fn prefix(&self) -> &'static str {
        match self {
            CodeKind::Group => "grp",
            CodeKind::Suggestion => "sug",
        }
    }

    pub fn suffix(&self) -> &'static str {
        match self {
            CodeKind::Group => "G0g",
            CodeKind::Suggestion => "S0s",
        }
    }
}

/// Generates a fresh code of `kind` embedding `embedded_id`.
///
/// Groups embed their owner's id, suggestions their parent group's id.
pub fn generate_code(kind: CodeKind, embedded_id: Uuid) -> String {
    format!(
        "{}{}{}{}{}",
        kind.prefix(),
        shared::crypto::random_alphanumeric(RANDOM_SEGMENT_LEN),
        embedded_id.simple(),
        shared::crypto::random_alphanumeric(RANDOM_SEGMENT_LEN),
        kind.suffix()
    )
}
