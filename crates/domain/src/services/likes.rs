//! Like toggling.

use uuid::Uuid;

use super::identity::resolve_current_user;
use super::membership::ensure_can_view_suggestion;
use super::{decrement_counter, SuggestionBox};
use crate::context::RequestContext;
use crate::error::{DomainError, DomainResult};

impl SuggestionBox {
    /// Flips the caller's like on a suggestion and returns the new state.
    ///
    /// The like row and `likes_count` change together. If the insert finds
    /// the pair already present, the call behaves as an unlike.
    pub async fn toggle_like(&self, ctx: &RequestContext, suggestion_id: Uuid) -> DomainResult<bool> {
        let mut tx = self.store.begin().await?;
        let user = resolve_current_user(tx.as_mut(), ctx).await?;

        let mut suggestion = tx
            .find_suggestion(suggestion_id)
            .await?
            .ok_or(DomainError::NotFound("Suggestion"))?;
        ensure_can_view_suggestion(tx.as_mut(), &suggestion, &user).await?;

        let existing = match tx.find_like(user.id, suggestion.id).await? {
            Some(like) => Some(like),
            None => match tx.insert_like(user.id, suggestion.id).await? {
                Some(_) => None,
                None => tx.find_like(user.id, suggestion.id).await?,
            },
        };

        let liked = match existing {
            Some(like) => {
                tx.delete_like(like.id).await?;
                suggestion.likes_count =
                    decrement_counter(suggestion.likes_count, "likes_count", suggestion.id);
                false
            }
            None => {
                suggestion.likes_count += 1;
                true
            }
        };

        tx.update_suggestion(&suggestion).await?;
        tx.commit().await?;

        tracing::info!(
            user_id = %user.id,
            suggestion_id = %suggestion.id,
            liked,
            likes_count = suggestion.likes_count,
            "Like toggled"
        );
        Ok(liked)
    }
}
