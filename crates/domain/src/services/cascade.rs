//! Cascade deletion of groups and suggestions.
//!
//! Child rows go first, then the root record, all inside the operation's
//! transaction. Images are removed from the blob store only after the
//! transaction commits, since the blob store cannot roll back.

use uuid::Uuid;

use super::groups::owned_group;
use super::identity::resolve_current_user;
use super::suggestions::owned_suggestion;
use super::{decrement_counter, SuggestionBox};
use crate::context::RequestContext;
use crate::error::DomainResult;
use crate::models::Suggestion;
use crate::store::StoreTransaction;

/// Deletes a suggestion with its comments, likes and invitations. Returns the
/// storage id of its image, if any.
async fn remove_suggestion_subtree(
    tx: &mut dyn StoreTransaction,
    suggestion: &Suggestion,
) -> DomainResult<Option<String>> {
    let comments = tx.delete_comments_for_suggestion(suggestion.id).await?;
    let likes = tx.delete_likes_for_suggestion(suggestion.id).await?;
    let invitations = tx
        .delete_suggestion_invitations_for_suggestion(suggestion.id)
        .await?;
    tx.delete_suggestion(suggestion.id).await?;

    tracing::debug!(
        suggestion_id = %suggestion.id,
        comments,
        likes,
        invitations,
        "Suggestion subtree removed"
    );
    Ok(suggestion.storage_id.clone())
}

impl SuggestionBox {
    /// Deletes a suggestion the caller owns with everything attached to it,
    /// and decrements its group's `suggestions_count`.
    pub async fn delete_suggestion(
        &self,
        ctx: &RequestContext,
        suggestion_id: Uuid,
    ) -> DomainResult<bool> {
        let mut tx = self.store.begin().await?;
        let mut user = resolve_current_user(tx.as_mut(), ctx).await?;
        let suggestion = owned_suggestion(tx.as_mut(), suggestion_id, user.id).await?;

        let image = remove_suggestion_subtree(tx.as_mut(), &suggestion).await?;

        if let Some(mut group) = tx.find_group(suggestion.group_id).await? {
            group.suggestions_count =
                decrement_counter(group.suggestions_count, "suggestions_count", group.id);
            tx.update_group(&group).await?;
        }
        user.suggestions_count =
            decrement_counter(user.suggestions_count, "suggestions_count", user.id);
        tx.update_user(&user).await?;
        tx.commit().await?;

        tracing::info!(
            user_id = %user.id,
            group_id = %suggestion.group_id,
            suggestion_id = %suggestion.id,
            "Suggestion deleted"
        );
        self.delete_blobs(image.into_iter().collect()).await;
        Ok(true)
    }

    /// Deletes a group the caller owns, every suggestion in it (with their
    /// children) and all memberships.
    pub async fn delete_group(&self, ctx: &RequestContext, group_id: Uuid) -> DomainResult<bool> {
        let mut tx = self.store.begin().await?;
        let user = resolve_current_user(tx.as_mut(), ctx).await?;
        let group = owned_group(tx.as_mut(), group_id, user.id).await?;

        let mut images = Vec::new();
        let suggestions = tx.list_suggestions_for_group(group.id).await?;
        for suggestion in &suggestions {
            images.extend(remove_suggestion_subtree(tx.as_mut(), suggestion).await?);
        }
        let memberships = tx.delete_group_invitations_for_group(group.id).await?;
        images.extend(group.storage_id.clone());
        tx.delete_group(group.id).await?;
        tx.commit().await?;

        tracing::info!(
            user_id = %user.id,
            group_id = %group.id,
            suggestions = suggestions.len(),
            memberships,
            "Group deleted"
        );
        self.delete_blobs(images).await;
        Ok(true)
    }
}
