//! Memberships and the visibility rules built on them.
//!
//! A user relates to a group as its owner, as a member with
//! `all_suggestions = true` (sees every suggestion), or as a member with
//! `all_suggestions = false` (sees only suggestions they joined by code).
//! Joining a group by code grants the wide membership; joining a suggestion
//! grants the narrow one, and never narrows an existing wide membership.

use uuid::Uuid;

use super::identity::resolve_current_user;
use super::SuggestionBox;
use crate::context::RequestContext;
use crate::error::{DomainError, DomainResult};
use crate::models::{Group, Suggestion, User};
use crate::store::StoreTransaction;

/// How much of a group's content a user may see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupAccess {
    Owner,
    AllSuggestions,
    SelectedSuggestions,
}

impl GroupAccess {
    pub fn sees_all_suggestions(&self) -> bool {
        matches!(self, GroupAccess::Owner | GroupAccess::AllSuggestions)
    }
}

/// The user's access to `group`, `None` without any membership.
pub(crate) async fn group_access(
    tx: &mut dyn StoreTransaction,
    group: &Group,
    user: &User,
) -> DomainResult<Option<GroupAccess>> {
    if group.owner_user_id == user.id {
        return Ok(Some(GroupAccess::Owner));
    }
    Ok(tx
        .find_group_invitation(group.id, user.id)
        .await?
        .map(|invitation| match invitation.all_suggestions {
            true => GroupAccess::AllSuggestions,
            false => GroupAccess::SelectedSuggestions,
        }))
}

/// Fails with `NoAccess` unless `user` may see `suggestion`: its owner, the
/// group owner, a wide member, or a holder of an invitation to it.
pub(crate) async fn ensure_can_view_suggestion(
    tx: &mut dyn StoreTransaction,
    suggestion: &Suggestion,
    user: &User,
) -> DomainResult<()> {
    if suggestion.owner_user_id == user.id {
        return Ok(());
    }

    let group = tx
        .find_group(suggestion.group_id)
        .await?
        .ok_or(DomainError::NotFound("Group"))?;
    let wide = group_access(tx, &group, user)
        .await?
        .is_some_and(|access| access.sees_all_suggestions());
    if wide {
        return Ok(());
    }

    match tx.find_suggestion_invitation(suggestion.id, user.id).await? {
        Some(_) => Ok(()),
        None => Err(DomainError::NoAccess("suggestion")),
    }
}

impl SuggestionBox {
    /// Joins the group behind `invitation_code` with full visibility.
    ///
    /// Returns `None` when no group has that code. An existing membership is
    /// promoted in place, so repeating the call leaves a single record.
    pub async fn request_to_join_group(
        &self,
        ctx: &RequestContext,
        invitation_code: &str,
    ) -> DomainResult<Option<Uuid>> {
        let mut tx = self.store.begin().await?;
        let user = resolve_current_user(tx.as_mut(), ctx).await?;

        let Some(group) = tx.find_group_by_code(invitation_code).await? else {
            return Ok(None);
        };
        if group.owner_user_id == user.id {
            return Err(DomainError::SelfJoinForbidden("group"));
        }

        let invitation = tx.upsert_group_invitation(group.id, user.id, true).await?;
        tx.commit().await?;

        tracing::info!(
            user_id = %user.id,
            group_id = %group.id,
            invitation_id = %invitation.id,
            "Joined group"
        );
        Ok(Some(invitation.id))
    }

    /// Joins the suggestion behind `invitation_code`.
    ///
    /// Records the suggestion invitation together with a narrow membership in
    /// its group. Fails with `DuplicateRequest` if the caller already joined.
    pub async fn request_to_join_suggestion(
        &self,
        ctx: &RequestContext,
        invitation_code: &str,
    ) -> DomainResult<Uuid> {
        let mut tx = self.store.begin().await?;
        let user = resolve_current_user(tx.as_mut(), ctx).await?;

        let suggestion = tx
            .find_suggestion_by_code(invitation_code)
            .await?
            .ok_or(DomainError::NotFound("Suggestion"))?;
        if suggestion.owner_user_id == user.id {
            return Err(DomainError::SelfJoinForbidden("suggestion"));
        }

        tx.upsert_group_invitation(suggestion.group_id, user.id, false)
            .await?;
        let invitation = tx
            .insert_suggestion_invitation(suggestion.id, user.id)
            .await?
            .ok_or(DomainError::DuplicateRequest)?;
        tx.commit().await?;

        tracing::info!(
            user_id = %user.id,
            suggestion_id = %suggestion.id,
            invitation_id = %invitation.id,
            "Joined suggestion"
        );
        Ok(invitation.id)
    }

    /// Suggestions of `group_id` visible to the caller, newest first.
    pub async fn fetch_suggestions(
        &self,
        ctx: &RequestContext,
        group_id: Uuid,
    ) -> DomainResult<Vec<Suggestion>> {
        let mut tx = self.store.begin().await?;
        let user = resolve_current_user(tx.as_mut(), ctx).await?;

        let group = tx
            .find_group(group_id)
            .await?
            .ok_or(DomainError::NotFound("Group"))?;
        let access = group_access(tx.as_mut(), &group, &user)
            .await?
            .ok_or(DomainError::NoAccess("group"))?;

        if access.sees_all_suggestions() {
            return Ok(tx.list_suggestions_for_group(group_id).await?);
        }

        let invitations = tx.list_suggestion_invitations_for_user(user.id).await?;
        let mut visible = Vec::with_capacity(invitations.len());
        for invitation in invitations {
            if let Some(suggestion) = tx.find_suggestion(invitation.suggestion_id).await? {
                if suggestion.group_id == group_id {
                    visible.push(suggestion);
                }
            }
        }
        visible.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(visible)
    }
}
