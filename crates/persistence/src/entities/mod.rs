//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod comment;
pub mod group;
pub mod like;
pub mod suggestion;
pub mod user;

pub use comment::{CommentEntity, CommentWithAuthorEntity};
pub use group::{GroupEntity, GroupInvitationEntity, GroupStatusDb};
pub use like::LikeEntity;
pub use suggestion::{SuggestionEntity, SuggestionInvitationEntity, SuggestionStatusDb};
pub use user::UserEntity;
