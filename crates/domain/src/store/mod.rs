//! Transactional record-store seam.
//!
//! The engine opens one [`StoreTransaction`] per operation, performs all of
//! its reads and writes through it and commits at the end. A transaction that
//! is dropped without [`StoreTransaction::commit`] is rolled back, so an
//! operation that fails half-way leaves nothing behind.
//!
//! "At most one" rules (one like per user and suggestion, one membership per
//! user and group, one suggestion invitation per user and suggestion) are
//! enforced here by uniqueness, not by the engine's prior reads.

mod memory;

pub use memory::{MemoryState, MemoryStore};

use thiserror::Error;
use uuid::Uuid;

use crate::models::{
    Comment, CommentWithAuthor, Group, GroupInvitation, Like, NewComment, NewGroup,
    NewSuggestion, NewUser, Suggestion, SuggestionInvitation, User,
};

/// Record-store failure.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A concurrent transaction or a uniqueness rule prevented the write.
    /// Retrying the whole operation is safe.
    #[error("{0}")]
    Conflict(String),

    /// A write targeted a record that no longer exists.
    #[error("Record missing: {0}")]
    Missing(String),

    #[error("Database error: {0}")]
    Database(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Factory for transactions.
#[async_trait::async_trait]
pub trait Store: Send + Sync {
    async fn begin(&self) -> StoreResult<Box<dyn StoreTransaction>>;

    /// Cheap liveness probe used by health checks.
    async fn ping(&self) -> StoreResult<()>;
}

/// One atomic unit of work. Listings named "newest first" are ordered by
/// descending creation time.
#[async_trait::async_trait]
pub trait StoreTransaction: Send {
    async fn commit(self: Box<Self>) -> StoreResult<()>;

    // Users

    async fn find_user_by_external_id(&mut self, external_id: &str) -> StoreResult<Option<User>>;

    async fn find_user(&mut self, id: Uuid) -> StoreResult<Option<User>>;

    /// Inserts a user; `None` when the external id is already registered.
    async fn insert_user(&mut self, user: NewUser) -> StoreResult<Option<User>>;

    /// Persists profile fields and counters.
    async fn update_user(&mut self, user: &User) -> StoreResult<()>;

    // Groups

    async fn insert_group(&mut self, group: NewGroup) -> StoreResult<Group>;

    async fn find_group(&mut self, id: Uuid) -> StoreResult<Option<Group>>;

    async fn find_group_by_code(&mut self, invitation_code: &str) -> StoreResult<Option<Group>>;

    /// Groups owned by `owner_user_id`, newest first.
    async fn list_groups_by_owner(&mut self, owner_user_id: Uuid) -> StoreResult<Vec<Group>>;

    /// Persists every mutable column, the invitation code and counters included.
    async fn update_group(&mut self, group: &Group) -> StoreResult<()>;

    async fn delete_group(&mut self, id: Uuid) -> StoreResult<()>;

    // Group invitations

    /// Records membership of `user_id` in `group_id`. An existing record is
    /// kept and only ever promoted from `all_suggestions = false` to `true`.
    async fn upsert_group_invitation(
        &mut self,
        group_id: Uuid,
        user_id: Uuid,
        all_suggestions: bool,
    ) -> StoreResult<GroupInvitation>;

    async fn find_group_invitation(
        &mut self,
        group_id: Uuid,
        user_id: Uuid,
    ) -> StoreResult<Option<GroupInvitation>>;

    /// The user's memberships, newest first.
    async fn list_group_invitations_for_user(
        &mut self,
        user_id: Uuid,
    ) -> StoreResult<Vec<GroupInvitation>>;

    async fn delete_group_invitations_for_group(&mut self, group_id: Uuid) -> StoreResult<u64>;

    // Suggestions

    async fn insert_suggestion(&mut self, suggestion: NewSuggestion) -> StoreResult<Suggestion>;

    async fn find_suggestion(&mut self, id: Uuid) -> StoreResult<Option<Suggestion>>;

    async fn find_suggestion_by_code(
        &mut self,
        invitation_code: &str,
    ) -> StoreResult<Option<Suggestion>>;

    /// Suggestions of a group, newest first.
    async fn list_suggestions_for_group(&mut self, group_id: Uuid) -> StoreResult<Vec<Suggestion>>;

    async fn update_suggestion(&mut self, suggestion: &Suggestion) -> StoreResult<()>;

    async fn delete_suggestion(&mut self, id: Uuid) -> StoreResult<()>;

    // Suggestion invitations

    /// Inserts the pair; `None` when it already exists.
    async fn insert_suggestion_invitation(
        &mut self,
        suggestion_id: Uuid,
        user_id: Uuid,
    ) -> StoreResult<Option<SuggestionInvitation>>;

    async fn find_suggestion_invitation(
        &mut self,
        suggestion_id: Uuid,
        user_id: Uuid,
    ) -> StoreResult<Option<SuggestionInvitation>>;

    /// The user's suggestion invitations, newest first.
    async fn list_suggestion_invitations_for_user(
        &mut self,
        user_id: Uuid,
    ) -> StoreResult<Vec<SuggestionInvitation>>;

    async fn delete_suggestion_invitations_for_suggestion(
        &mut self,
        suggestion_id: Uuid,
    ) -> StoreResult<u64>;

    // Likes

    async fn find_like(&mut self, user_id: Uuid, suggestion_id: Uuid) -> StoreResult<Option<Like>>;

    /// Inserts the pair; `None` when the user already likes the suggestion.
    async fn insert_like(&mut self, user_id: Uuid, suggestion_id: Uuid) -> StoreResult<Option<Like>>;

    async fn delete_like(&mut self, id: Uuid) -> StoreResult<()>;

    async fn delete_likes_for_suggestion(&mut self, suggestion_id: Uuid) -> StoreResult<u64>;

    // Comments

    async fn insert_comment(&mut self, comment: NewComment) -> StoreResult<Comment>;

    async fn find_comment(&mut self, id: Uuid) -> StoreResult<Option<Comment>>;

    /// Comments with their authors, newest first.
    async fn list_comments_for_suggestion(
        &mut self,
        suggestion_id: Uuid,
    ) -> StoreResult<Vec<CommentWithAuthor>>;

    async fn delete_comment(&mut self, id: Uuid) -> StoreResult<()>;

    async fn delete_comments_for_suggestion(&mut self, suggestion_id: Uuid) -> StoreResult<u64>;
}
