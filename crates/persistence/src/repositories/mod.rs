//! Repository implementations for database operations.
//!
//! Repositories are stateless; each call runs on the connection it is given
//! so that one engine operation maps onto one database transaction.

pub mod comment;
pub mod group;
pub mod group_invitation;
pub mod like;
pub mod suggestion;
pub mod suggestion_invitation;
pub mod user;

pub use comment::CommentRepository;
pub use group::GroupRepository;
pub use group_invitation::GroupInvitationRepository;
pub use like::LikeRepository;
pub use suggestion::SuggestionRepository;
pub use suggestion_invitation::SuggestionInvitationRepository;
pub use user::UserRepository;
