//! PostgreSQL implementation of the engine's record store.
//!
//! Each engine operation gets one `SERIALIZABLE` transaction. Read-modify-write
//! counter updates therefore cannot lose writes; a transaction that would
//! fails with a serialization error, surfaced as `StoreError::Conflict`.

use domain::models::{
    Comment, CommentWithAuthor, Group, GroupInvitation, Like, NewComment, NewGroup,
    NewSuggestion, NewUser, Suggestion, SuggestionInvitation, User,
};
use domain::store::{Store, StoreError, StoreResult, StoreTransaction};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::error::map_sqlx_error;
use crate::metrics::record_pool_metrics;
use crate::repositories::{
    CommentRepository, GroupInvitationRepository, GroupRepository, LikeRepository,
    SuggestionInvitationRepository, SuggestionRepository, UserRepository,
};

/// Record store backed by a PostgreSQL pool.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait::async_trait]
impl Store for PgStore {
    async fn begin(&self) -> StoreResult<Box<dyn StoreTransaction>> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL SERIALIZABLE")
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;
        Ok(Box::new(PgTransaction { tx }))
    }

    async fn ping(&self) -> StoreResult<()> {
        record_pool_metrics(&self.pool);
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(())
    }
}

/// An open database transaction. Dropping it rolls back.
pub struct PgTransaction {
    tx: Transaction<'static, Postgres>,
}

fn expect_one(rows: u64, table: &str, id: Uuid) -> StoreResult<()> {
    match rows {
        0 => Err(StoreError::Missing(format!("{} {}", table, id))),
        _ => Ok(()),
    }
}

#[async_trait::async_trait]
impl StoreTransaction for PgTransaction {
    async fn commit(self: Box<Self>) -> StoreResult<()> {
        self.tx.commit().await.map_err(map_sqlx_error)
    }

    async fn find_user_by_external_id(&mut self, external_id: &str) -> StoreResult<Option<User>> {
        let user = UserRepository::find_by_external_id(&mut self.tx, external_id)
            .await
            .map_err(map_sqlx_error)?;
        Ok(user.map(Into::into))
    }

    async fn find_user(&mut self, id: Uuid) -> StoreResult<Option<User>> {
        let user = UserRepository::find_by_id(&mut self.tx, id)
            .await
            .map_err(map_sqlx_error)?;
        Ok(user.map(Into::into))
    }

    async fn insert_user(&mut self, user: NewUser) -> StoreResult<Option<User>> {
        let inserted = UserRepository::insert(
            &mut self.tx,
            &user.external_id,
            &user.username,
            &user.fullname,
            &user.email,
            user.image.as_deref(),
        )
        .await
        .map_err(map_sqlx_error)?;
        Ok(inserted.map(Into::into))
    }

    async fn update_user(&mut self, user: &User) -> StoreResult<()> {
        let rows = UserRepository::update(
            &mut self.tx,
            user.id,
            &user.username,
            &user.fullname,
            user.image.as_deref(),
            user.suggestions_count,
            user.comments_count,
        )
        .await
        .map_err(map_sqlx_error)?;
        expect_one(rows, "user", user.id)
    }

    async fn insert_group(&mut self, group: NewGroup) -> StoreResult<Group> {
        let inserted = GroupRepository::insert(
            &mut self.tx,
            group.owner_user_id,
            &group.group_name,
            &group.invitation_code,
            group.status.into(),
        )
        .await
        .map_err(map_sqlx_error)?;
        Ok(inserted.into())
    }

    async fn find_group(&mut self, id: Uuid) -> StoreResult<Option<Group>> {
        let group = GroupRepository::find_by_id(&mut self.tx, id)
            .await
            .map_err(map_sqlx_error)?;
        Ok(group.map(Into::into))
    }

    async fn find_group_by_code(&mut self, invitation_code: &str) -> StoreResult<Option<Group>> {
        let group = GroupRepository::find_by_code(&mut self.tx, invitation_code)
            .await
            .map_err(map_sqlx_error)?;
        Ok(group.map(Into::into))
    }

    async fn list_groups_by_owner(&mut self, owner_user_id: Uuid) -> StoreResult<Vec<Group>> {
        let groups = GroupRepository::list_by_owner(&mut self.tx, owner_user_id)
            .await
            .map_err(map_sqlx_error)?;
        Ok(groups.into_iter().map(Into::into).collect())
    }

    async fn update_group(&mut self, group: &Group) -> StoreResult<()> {
        let rows = GroupRepository::update(
            &mut self.tx,
            group.id,
            &group.group_name,
            &group.invitation_code,
            group.suggestions_count,
            group.status.into(),
            group.storage_id.as_deref(),
            group.image_url.as_deref(),
            group.updated_at,
        )
        .await
        .map_err(map_sqlx_error)?;
        expect_one(rows, "group", group.id)
    }

    async fn delete_group(&mut self, id: Uuid) -> StoreResult<()> {
        let rows = GroupRepository::delete(&mut self.tx, id)
            .await
            .map_err(map_sqlx_error)?;
        expect_one(rows, "group", id)
    }

    async fn upsert_group_invitation(
        &mut self,
        group_id: Uuid,
        user_id: Uuid,
        all_suggestions: bool,
    ) -> StoreResult<GroupInvitation> {
        let invitation =
            GroupInvitationRepository::upsert(&mut self.tx, group_id, user_id, all_suggestions)
                .await
                .map_err(map_sqlx_error)?;
        Ok(invitation.into())
    }

    async fn find_group_invitation(
        &mut self,
        group_id: Uuid,
        user_id: Uuid,
    ) -> StoreResult<Option<GroupInvitation>> {
        let invitation = GroupInvitationRepository::find(&mut self.tx, group_id, user_id)
            .await
            .map_err(map_sqlx_error)?;
        Ok(invitation.map(Into::into))
    }

    async fn list_group_invitations_for_user(
        &mut self,
        user_id: Uuid,
    ) -> StoreResult<Vec<GroupInvitation>> {
        let invitations = GroupInvitationRepository::list_for_user(&mut self.tx, user_id)
            .await
            .map_err(map_sqlx_error)?;
        Ok(invitations.into_iter().map(Into::into).collect())
    }

    async fn delete_group_invitations_for_group(&mut self, group_id: Uuid) -> StoreResult<u64> {
        GroupInvitationRepository::delete_for_group(&mut self.tx, group_id)
            .await
            .map_err(map_sqlx_error)
    }

    async fn insert_suggestion(&mut self, suggestion: NewSuggestion) -> StoreResult<Suggestion> {
        let inserted = SuggestionRepository::insert(
            &mut self.tx,
            suggestion.owner_user_id,
            suggestion.group_id,
            &suggestion.invitation_code,
            &suggestion.title,
            &suggestion.description,
            suggestion.end_goal,
            suggestion.status.into(),
        )
        .await
        .map_err(map_sqlx_error)?;
        Ok(inserted.into())
    }

    async fn find_suggestion(&mut self, id: Uuid) -> StoreResult<Option<Suggestion>> {
        let suggestion = SuggestionRepository::find_by_id(&mut self.tx, id)
            .await
            .map_err(map_sqlx_error)?;
        Ok(suggestion.map(Into::into))
    }

    async fn find_suggestion_by_code(
        &mut self,
        invitation_code: &str,
    ) -> StoreResult<Option<Suggestion>> {
        let suggestion = SuggestionRepository::find_by_code(&mut self.tx, invitation_code)
            .await
            .map_err(map_sqlx_error)?;
        Ok(suggestion.map(Into::into))
    }

    async fn list_suggestions_for_group(&mut self, group_id: Uuid) -> StoreResult<Vec<Suggestion>> {
        let suggestions = SuggestionRepository::list_for_group(&mut self.tx, group_id)
            .await
            .map_err(map_sqlx_error)?;
        Ok(suggestions.into_iter().map(Into::into).collect())
    }

    async fn update_suggestion(&mut self, suggestion: &Suggestion) -> StoreResult<()> {
        let rows = SuggestionRepository::update(
            &mut self.tx,
            suggestion.id,
            &suggestion.invitation_code,
            suggestion.comments_count,
            suggestion.likes_count,
            suggestion.end_goal,
            suggestion.status.into(),
            suggestion.storage_id.as_deref(),
            suggestion.image_url.as_deref(),
            suggestion.updated_at,
        )
        .await
        .map_err(map_sqlx_error)?;
        expect_one(rows, "suggestion", suggestion.id)
    }

    async fn delete_suggestion(&mut self, id: Uuid) -> StoreResult<()> {
        let rows = SuggestionRepository::delete(&mut self.tx, id)
            .await
            .map_err(map_sqlx_error)?;
        expect_one(rows, "suggestion", id)
    }

    async fn insert_suggestion_invitation(
        &mut self,
        suggestion_id: Uuid,
        user_id: Uuid,
    ) -> StoreResult<Option<SuggestionInvitation>> {
        let invitation =
            SuggestionInvitationRepository::insert(&mut self.tx, suggestion_id, user_id)
                .await
                .map_err(map_sqlx_error)?;
        Ok(invitation.map(Into::into))
    }

    async fn find_suggestion_invitation(
        &mut self,
        suggestion_id: Uuid,
        user_id: Uuid,
    ) -> StoreResult<Option<SuggestionInvitation>> {
        let invitation = SuggestionInvitationRepository::find(&mut self.tx, suggestion_id, user_id)
            .await
            .map_err(map_sqlx_error)?;
        Ok(invitation.map(Into::into))
    }

    async fn list_suggestion_invitations_for_user(
        &mut self,
        user_id: Uuid,
    ) -> StoreResult<Vec<SuggestionInvitation>> {
        let invitations = SuggestionInvitationRepository::list_for_user(&mut self.tx, user_id)
            .await
            .map_err(map_sqlx_error)?;
        Ok(invitations.into_iter().map(Into::into).collect())
    }

    async fn delete_suggestion_invitations_for_suggestion(
        &mut self,
        suggestion_id: Uuid,
    ) -> StoreResult<u64> {
        SuggestionInvitationRepository::delete_for_suggestion(&mut self.tx, suggestion_id)
            .await
            .map_err(map_sqlx_error)
    }

    async fn find_like(&mut self, user_id: Uuid, suggestion_id: Uuid) -> StoreResult<Option<Like>> {
        let like = LikeRepository::find(&mut self.tx, user_id, suggestion_id)
            .await
            .map_err(map_sqlx_error)?;
        Ok(like.map(Into::into))
    }

    async fn insert_like(&mut self, user_id: Uuid, suggestion_id: Uuid) -> StoreResult<Option<Like>> {
        let like = LikeRepository::insert(&mut self.tx, user_id, suggestion_id)
            .await
            .map_err(map_sqlx_error)?;
        Ok(like.map(Into::into))
    }

    async fn delete_like(&mut self, id: Uuid) -> StoreResult<()> {
        let rows = LikeRepository::delete(&mut self.tx, id)
            .await
            .map_err(map_sqlx_error)?;
        expect_one(rows, "like", id)
    }

    async fn delete_likes_for_suggestion(&mut self, suggestion_id: Uuid) -> StoreResult<u64> {
        LikeRepository::delete_for_suggestion(&mut self.tx, suggestion_id)
            .await
            .map_err(map_sqlx_error)
    }

    async fn insert_comment(&mut self, comment: NewComment) -> StoreResult<Comment> {
        let inserted = CommentRepository::insert(
            &mut self.tx,
            comment.user_id,
            comment.suggestion_id,
            &comment.content,
        )
        .await
        .map_err(map_sqlx_error)?;
        Ok(inserted.into())
    }

    async fn find_comment(&mut self, id: Uuid) -> StoreResult<Option<Comment>> {
        let comment = CommentRepository::find_by_id(&mut self.tx, id)
            .await
            .map_err(map_sqlx_error)?;
        Ok(comment.map(Into::into))
    }

    async fn list_comments_for_suggestion(
        &mut self,
        suggestion_id: Uuid,
    ) -> StoreResult<Vec<CommentWithAuthor>> {
        let comments = CommentRepository::list_with_author(&mut self.tx, suggestion_id)
            .await
            .map_err(map_sqlx_error)?;
        Ok(comments.into_iter().map(Into::into).collect())
    }

    async fn delete_comment(&mut self, id: Uuid) -> StoreResult<()> {
        let rows = CommentRepository::delete(&mut self.tx, id)
            .await
            .map_err(map_sqlx_error)?;
        expect_one(rows, "comment", id)
    }

    async fn delete_comments_for_suggestion(&mut self, suggestion_id: Uuid) -> StoreResult<u64> {
        CommentRepository::delete_for_suggestion(&mut self.tx, suggestion_id)
            .await
            .map_err(map_sqlx_error)
    }
}
