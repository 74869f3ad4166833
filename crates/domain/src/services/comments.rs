//! Comment operations.

use uuid::Uuid;
use validator::Validate;

use super::identity::resolve_current_user;
use super::membership::ensure_can_view_suggestion;
use super::{decrement_counter, SuggestionBox};
use crate::context::RequestContext;
use crate::error::{DomainError, DomainResult};
use crate::models::{Comment, CommentWithAuthor, CreateCommentRequest, NewComment};

impl SuggestionBox {
    /// Comments on a visible suggestion. Increments the suggestion's and the
    /// author's `comments_count`.
    pub async fn add_comment(
        &self,
        ctx: &RequestContext,
        suggestion_id: Uuid,
        request: CreateCommentRequest,
    ) -> DomainResult<Comment> {
        request.validate()?;

        let mut tx = self.store.begin().await?;
        let mut user = resolve_current_user(tx.as_mut(), ctx).await?;

        let mut suggestion = tx
            .find_suggestion(suggestion_id)
            .await?
            .ok_or(DomainError::NotFound("Suggestion"))?;
        ensure_can_view_suggestion(tx.as_mut(), &suggestion, &user).await?;

        let comment = tx
            .insert_comment(NewComment {
                user_id: user.id,
                suggestion_id: suggestion.id,
                content: request.content,
            })
            .await?;

        suggestion.comments_count += 1;
        tx.update_suggestion(&suggestion).await?;
        user.comments_count += 1;
        tx.update_user(&user).await?;
        tx.commit().await?;

        tracing::info!(
            user_id = %user.id,
            suggestion_id = %suggestion.id,
            comment_id = %comment.id,
            "Comment added"
        );
        Ok(comment)
    }

    /// Deletes one of the caller's own comments.
    pub async fn delete_comment(&self, ctx: &RequestContext, comment_id: Uuid) -> DomainResult<bool> {
        let mut tx = self.store.begin().await?;
        let mut user = resolve_current_user(tx.as_mut(), ctx).await?;

        let comment = tx
            .find_comment(comment_id)
            .await?
            .ok_or(DomainError::NotFound("Comment"))?;
        if comment.user_id != user.id {
            return Err(DomainError::Unauthorized("comment"));
        }

        tx.delete_comment(comment.id).await?;
        if let Some(mut suggestion) = tx.find_suggestion(comment.suggestion_id).await? {
            suggestion.comments_count =
                decrement_counter(suggestion.comments_count, "comments_count", suggestion.id);
            tx.update_suggestion(&suggestion).await?;
        }
        user.comments_count = decrement_counter(user.comments_count, "comments_count", user.id);
        tx.update_user(&user).await?;
        tx.commit().await?;

        tracing::info!(user_id = %user.id, comment_id = %comment.id, "Comment deleted");
        Ok(true)
    }

    /// Comments on a visible suggestion with their authors, newest first.
    pub async fn fetch_comments(
        &self,
        ctx: &RequestContext,
        suggestion_id: Uuid,
    ) -> DomainResult<Vec<CommentWithAuthor>> {
        let mut tx = self.store.begin().await?;
        let user = resolve_current_user(tx.as_mut(), ctx).await?;

        let suggestion = tx
            .find_suggestion(suggestion_id)
            .await?
            .ok_or(DomainError::NotFound("Suggestion"))?;
        ensure_can_view_suggestion(tx.as_mut(), &suggestion, &user).await?;

        Ok(tx.list_comments_for_suggestion(suggestion.id).await?)
    }
}
