//! Group operations.

use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use super::identity::resolve_current_user;
use super::invitation_code::{generate_code, CodeKind};
use super::membership::group_access;
use super::SuggestionBox;
use crate::context::RequestContext;
use crate::error::{DomainError, DomainResult};
use crate::models::{
    CreateGroupRequest, EditGroupRequest, Group, GroupOverview, GroupRole, GroupSearchView,
    MaskedGroup, NewGroup, SuggestionStatus,
};
use crate::store::StoreTransaction;

/// Annotates `group` with `role` and its live decision counts.
async fn overview(
    tx: &mut dyn StoreTransaction,
    group: Group,
    role: GroupRole,
) -> DomainResult<GroupOverview> {
    let suggestions = tx.list_suggestions_for_group(group.id).await?;
    let count = |status: SuggestionStatus| {
        suggestions.iter().filter(|s| s.status == status).count() as i64
    };
    Ok(GroupOverview {
        approved_count: count(SuggestionStatus::Approved),
        rejected_count: count(SuggestionStatus::Rejected),
        group,
        role,
    })
}

/// Loads a group the caller must own.
pub(crate) async fn owned_group(
    tx: &mut dyn StoreTransaction,
    group_id: Uuid,
    user_id: Uuid,
) -> DomainResult<Group> {
    let group = tx
        .find_group(group_id)
        .await?
        .ok_or(DomainError::NotFound("Group"))?;
    if group.owner_user_id != user_id {
        return Err(DomainError::Unauthorized("group"));
    }
    Ok(group)
}

impl SuggestionBox {
    /// Creates a group owned by the caller.
    pub async fn add_group(
        &self,
        ctx: &RequestContext,
        request: CreateGroupRequest,
    ) -> DomainResult<Group> {
        request.validate()?;

        let mut tx = self.store.begin().await?;
        let user = resolve_current_user(tx.as_mut(), ctx).await?;

        let group = tx
            .insert_group(NewGroup {
                owner_user_id: user.id,
                group_name: request.group_name,
                invitation_code: generate_code(CodeKind::Group, user.id),
                status: request.status,
            })
            .await?;
        tx.commit().await?;

        tracing::info!(user_id = %user.id, group_id = %group.id, "Group created");
        Ok(group)
    }

    /// The group with the caller's role, `None` if it does not exist.
    pub async fn fetch_group_details(
        &self,
        ctx: &RequestContext,
        group_id: Uuid,
    ) -> DomainResult<Option<GroupOverview>> {
        let mut tx = self.store.begin().await?;
        let user = resolve_current_user(tx.as_mut(), ctx).await?;

        let Some(group) = tx.find_group(group_id).await? else {
            return Ok(None);
        };
        let role = match group_access(tx.as_mut(), &group, &user).await? {
            Some(super::GroupAccess::Owner) => GroupRole::Owner,
            Some(_) => GroupRole::Invited,
            None => return Err(DomainError::NoAccess("group")),
        };

        Ok(Some(overview(tx.as_mut(), group, role).await?))
    }

    /// Groups the caller owns followed by groups they joined, each list
    /// newest first, without duplicates.
    pub async fn fetch_user_groups(&self, ctx: &RequestContext) -> DomainResult<Vec<GroupOverview>> {
        let mut tx = self.store.begin().await?;
        let user = resolve_current_user(tx.as_mut(), ctx).await?;

        let mut candidates: Vec<(Group, GroupRole)> = tx
            .list_groups_by_owner(user.id)
            .await?
            .into_iter()
            .map(|g| (g, GroupRole::Owner))
            .collect();
        for invitation in tx.list_group_invitations_for_user(user.id).await? {
            if let Some(group) = tx.find_group(invitation.group_id).await? {
                candidates.push((group, GroupRole::Invited));
            }
        }

        let mut seen = std::collections::HashSet::new();
        let mut groups = Vec::with_capacity(candidates.len());
        for (group, role) in candidates {
            if seen.insert(group.id) {
                groups.push(overview(tx.as_mut(), group, role).await?);
            }
        }
        Ok(groups)
    }

    /// Applies the provided fields to a group the caller owns.
    ///
    /// A new `storage_id` must resolve to an image; the replaced image is
    /// deleted once the update is committed.
    pub async fn edit_group(
        &self,
        ctx: &RequestContext,
        group_id: Uuid,
        request: EditGroupRequest,
    ) -> DomainResult<Group> {
        request.validate()?;

        // Resolved before the transaction so the blob store round trip never
        // holds store locks.
        let image = match request.storage_id {
            Some(storage_id) => {
                let image_url = self.resolve_image(&storage_id).await?;
                Some((storage_id, image_url))
            }
            None => None,
        };

        let mut tx = self.store.begin().await?;
        let user = resolve_current_user(tx.as_mut(), ctx).await?;
        let mut group = owned_group(tx.as_mut(), group_id, user.id).await?;

        let mut replaced_image = None;
        if let Some((storage_id, image_url)) = image {
            if group.storage_id.as_deref() != Some(storage_id.as_str()) {
                replaced_image = group.storage_id.take();
            }
            group.storage_id = Some(storage_id);
            group.image_url = Some(image_url);
        }
        if let Some(group_name) = request.group_name {
            group.group_name = group_name;
        }
        if let Some(invitation_code) = request.invitation_code {
            group.invitation_code = invitation_code;
        }
        if let Some(status) = request.status {
            group.status = status;
        }
        group.updated_at = Utc::now();

        tx.update_group(&group).await?;
        tx.commit().await?;

        tracing::info!(user_id = %user.id, group_id = %group.id, "Group updated");
        self.delete_blobs(replaced_image.into_iter().collect()).await;
        Ok(group)
    }

    /// Replaces the group's invitation code. The old code stops resolving.
    pub async fn regenerate_group_code(
        &self,
        ctx: &RequestContext,
        group_id: Uuid,
    ) -> DomainResult<String> {
        let mut tx = self.store.begin().await?;
        let user = resolve_current_user(tx.as_mut(), ctx).await?;
        let mut group = owned_group(tx.as_mut(), group_id, user.id).await?;

        group.invitation_code = generate_code(CodeKind::Group, user.id);
        group.updated_at = Utc::now();
        tx.update_group(&group).await?;
        tx.commit().await?;

        tracing::info!(user_id = %user.id, group_id = %group.id, "Group invitation code regenerated");
        Ok(group.invitation_code)
    }

    /// Looks a group up by invitation code. Only the owner gets the full view.
    pub async fn search_groups_by_invitation_code(
        &self,
        ctx: &RequestContext,
        invitation_code: &str,
    ) -> DomainResult<Option<GroupSearchView>> {
        let mut tx = self.store.begin().await?;
        let user = resolve_current_user(tx.as_mut(), ctx).await?;

        Ok(tx
            .find_group_by_code(invitation_code)
            .await?
            .map(|group| match group.owner_user_id == user.id {
                true => GroupSearchView::Full(group),
                false => GroupSearchView::Masked(MaskedGroup::from(&group)),
            }))
    }
}
