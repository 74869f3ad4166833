//! Suggestion operations.

use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use super::identity::resolve_current_user;
use super::invitation_code::{generate_code, CodeKind};
use super::membership::{ensure_can_view_suggestion, group_access};
use super::SuggestionBox;
use crate::context::RequestContext;
use crate::error::{DomainError, DomainResult};
use crate::models::{
    CreateSuggestionRequest, EditSuggestionRequest, MaskedSuggestion, NewSuggestion, Suggestion,
    SuggestionDetails, SuggestionSearchView,
};
use crate::store::StoreTransaction;

/// Loads a suggestion the caller must own.
pub(crate) async fn owned_suggestion(
    tx: &mut dyn StoreTransaction,
    suggestion_id: Uuid,
    user_id: Uuid,
) -> DomainResult<Suggestion> {
    let suggestion = tx
        .find_suggestion(suggestion_id)
        .await?
        .ok_or(DomainError::NotFound("Suggestion"))?;
    if suggestion.owner_user_id != user_id {
        return Err(DomainError::Unauthorized("suggestion"));
    }
    Ok(suggestion)
}

impl SuggestionBox {
    /// Posts a suggestion in a group the caller owns or fully belongs to.
    ///
    /// The group's `suggestions_count` is incremented in the same transaction.
    pub async fn add_suggestion(
        &self,
        ctx: &RequestContext,
        request: CreateSuggestionRequest,
    ) -> DomainResult<Suggestion> {
        request.validate()?;

        let mut tx = self.store.begin().await?;
        let mut user = resolve_current_user(tx.as_mut(), ctx).await?;

        let mut group = tx
            .find_group(request.group_id)
            .await?
            .ok_or(DomainError::NotFound("Group"))?;
        let can_post = group_access(tx.as_mut(), &group, &user)
            .await?
            .is_some_and(|access| access.sees_all_suggestions());
        if !can_post {
            return Err(DomainError::NoAccess("group"));
        }

        let suggestion = tx
            .insert_suggestion(NewSuggestion {
                owner_user_id: user.id,
                group_id: group.id,
                invitation_code: generate_code(CodeKind::Suggestion, group.id),
                title: request.title,
                description: request.description,
                end_goal: request.end_goal,
                status: request.status,
            })
            .await?;

        group.suggestions_count += 1;
        group.updated_at = Utc::now();
        tx.update_group(&group).await?;

        user.suggestions_count += 1;
        tx.update_user(&user).await?;
        tx.commit().await?;

        tracing::info!(
            user_id = %user.id,
            group_id = %group.id,
            suggestion_id = %suggestion.id,
            "Suggestion created"
        );
        Ok(suggestion)
    }

    /// The suggestion with the caller's like state, `None` if it does not exist.
    pub async fn fetch_suggestion_details(
        &self,
        ctx: &RequestContext,
        suggestion_id: Uuid,
    ) -> DomainResult<Option<SuggestionDetails>> {
        let mut tx = self.store.begin().await?;
        let user = resolve_current_user(tx.as_mut(), ctx).await?;

        let Some(suggestion) = tx.find_suggestion(suggestion_id).await? else {
            return Ok(None);
        };
        ensure_can_view_suggestion(tx.as_mut(), &suggestion, &user).await?;

        let has_liked = tx.find_like(user.id, suggestion.id).await?.is_some();
        Ok(Some(SuggestionDetails {
            suggestion,
            has_liked,
        }))
    }

    /// Replaces the editable fields of a suggestion the caller owns.
    pub async fn edit_suggestion(
        &self,
        ctx: &RequestContext,
        suggestion_id: Uuid,
        request: EditSuggestionRequest,
    ) -> DomainResult<Suggestion> {
        request.validate()?;

        let image = match request.storage_id {
            Some(storage_id) => {
                let image_url = self.resolve_image(&storage_id).await?;
                Some((storage_id, image_url))
            }
            None => None,
        };

        let mut tx = self.store.begin().await?;
        let user = resolve_current_user(tx.as_mut(), ctx).await?;
        let mut suggestion = owned_suggestion(tx.as_mut(), suggestion_id, user.id).await?;

        let mut replaced_image = None;
        if let Some((storage_id, image_url)) = image {
            if suggestion.storage_id.as_deref() != Some(storage_id.as_str()) {
                replaced_image = suggestion.storage_id.take();
            }
            suggestion.storage_id = Some(storage_id);
            suggestion.image_url = Some(image_url);
        }
        suggestion.invitation_code = request.invitation_code;
        suggestion.status = request.status;
        suggestion.end_goal = request.end_goal;
        suggestion.updated_at = Utc::now();

        tx.update_suggestion(&suggestion).await?;
        tx.commit().await?;

        tracing::info!(
            user_id = %user.id,
            suggestion_id = %suggestion.id,
            status = %suggestion.status,
            "Suggestion updated"
        );
        self.delete_blobs(replaced_image.into_iter().collect()).await;
        Ok(suggestion)
    }

    /// Replaces the suggestion's invitation code. The old code stops resolving.
    pub async fn regenerate_suggestion_code(
        &self,
        ctx: &RequestContext,
        suggestion_id: Uuid,
    ) -> DomainResult<String> {
        let mut tx = self.store.begin().await?;
        let user = resolve_current_user(tx.as_mut(), ctx).await?;
        let mut suggestion = owned_suggestion(tx.as_mut(), suggestion_id, user.id).await?;

        suggestion.invitation_code = generate_code(CodeKind::Suggestion, suggestion.group_id);
        suggestion.updated_at = Utc::now();
        tx.update_suggestion(&suggestion).await?;
        tx.commit().await?;

        tracing::info!(
            user_id = %user.id,
            suggestion_id = %suggestion.id,
            "Suggestion invitation code regenerated"
        );
        Ok(suggestion.invitation_code)
    }

    /// Looks a suggestion up by invitation code. Only the owner gets the full view.
    pub async fn search_suggestions_by_invitation_code(
        &self,
        ctx: &RequestContext,
        invitation_code: &str,
    ) -> DomainResult<Option<SuggestionSearchView>> {
        let mut tx = self.store.begin().await?;
        let user = resolve_current_user(tx.as_mut(), ctx).await?;

        Ok(tx
            .find_suggestion_by_code(invitation_code)
            .await?
            .map(|suggestion| match suggestion.owner_user_id == user.id {
                true => SuggestionSearchView::Full(suggestion),
                false => SuggestionSearchView::Masked(MaskedSuggestion::from(&suggestion)),
            }))
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::Harness;
    use super::*;
    use crate::models::{SuggestionStatus, SUGGESTION_CODE_REGEX};

    fn create_request(group_id: Uuid) -> CreateSuggestionRequest {
        CreateSuggestionRequest {
            group_id,
            title: "Dark mode".to_string(),
            description: String::new(),
            end_goal: 50,
            status: SuggestionStatus::Open,
        }
    }

    fn edit_request(suggestion: &Suggestion) -> EditSuggestionRequest {
        EditSuggestionRequest {
            invitation_code: suggestion.invitation_code.clone(),
            status: suggestion.status,
            end_goal: suggestion.end_goal,
            storage_id: None,
        }
    }

    #[tokio::test]
    async fn test_add_suggestion_increments_counters() {
        let h = Harness::new();
        let (owner, owner_user) = h.register("owner").await;
        let group = h.group(&owner, "Roadmap").await;

        let suggestion = h.suggestion(&owner, group.id, "Dark mode").await;
        h.suggestion(&owner, group.id, "Offline sync").await;

        assert!(SUGGESTION_CODE_REGEX.is_match(&suggestion.invitation_code));
        assert_eq!(suggestion.likes_count, 0);
        assert_eq!(suggestion.comments_count, 0);
        assert_eq!(h.group_row(group.id).await.suggestions_count, 2);

        let state = h.state().await;
        let owner_row = state.users.iter().find(|u| u.id == owner_user.id).unwrap();
        assert_eq!(owner_row.suggestions_count, 2);
    }

    #[tokio::test]
    async fn test_add_suggestion_missing_group() {
        let h = Harness::new();
        let (owner, _) = h.register("owner").await;
        let result = h
            .engine
            .add_suggestion(&owner, create_request(Uuid::new_v4()))
            .await;
        assert!(matches!(result, Err(DomainError::NotFound("Group"))));
    }

    #[tokio::test]
    async fn test_add_suggestion_membership_rules() {
        let h = Harness::new();
        let (owner, _) = h.register("owner").await;
        let (narrow, _) = h.register("narrow").await;
        let (wide, _) = h.register("wide").await;
        let (stranger, _) = h.register("stranger").await;
        let group = h.group(&owner, "Roadmap").await;
        let seed = h.suggestion(&owner, group.id, "Seed").await;

        h.engine
            .request_to_join_suggestion(&narrow, &seed.invitation_code)
            .await
            .unwrap();
        h.engine
            .request_to_join_group(&wide, &group.invitation_code)
            .await
            .unwrap();

        for ctx in [&narrow, &stranger] {
            let result = h.engine.add_suggestion(ctx, create_request(group.id)).await;
            assert!(matches!(result, Err(DomainError::NoAccess(_))));
        }
        assert_eq!(h.group_row(group.id).await.suggestions_count, 1);

        h.engine
            .add_suggestion(&wide, create_request(group.id))
            .await
            .unwrap();
        assert_eq!(h.group_row(group.id).await.suggestions_count, 2);
    }

    #[tokio::test]
    async fn test_add_suggestion_rejects_zero_goal() {
        let h = Harness::new();
        let (owner, _) = h.register("owner").await;
        let group = h.group(&owner, "Roadmap").await;

        let result = h
            .engine
            .add_suggestion(
                &owner,
                CreateSuggestionRequest {
                    end_goal: 0,
                    ..create_request(group.id)
                },
            )
            .await;
        assert!(matches!(result, Err(DomainError::Validation(_))));
        assert_eq!(h.group_row(group.id).await.suggestions_count, 0);
    }

    #[tokio::test]
    async fn test_details_report_has_liked() {
        let h = Harness::new();
        let (owner, _) = h.register("owner").await;
        let group = h.group(&owner, "Roadmap").await;
        let suggestion = h.suggestion(&owner, group.id, "Dark mode").await;

        let before = h
            .engine
            .fetch_suggestion_details(&owner, suggestion.id)
            .await
            .unwrap()
            .unwrap();
        assert!(!before.has_liked);

        h.engine.toggle_like(&owner, suggestion.id).await.unwrap();
        let after = h
            .engine
            .fetch_suggestion_details(&owner, suggestion.id)
            .await
            .unwrap()
            .unwrap();
        assert!(after.has_liked);
        assert_eq!(after.suggestion.likes_count, 1);

        assert!(h
            .engine
            .fetch_suggestion_details(&owner, Uuid::new_v4())
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_edit_suggestion_owner_only() {
        let h = Harness::new();
        let (owner, _) = h.register("owner").await;
        let (member, _) = h.register("member").await;
        let group = h.group(&owner, "Roadmap").await;
        let suggestion = h.suggestion(&owner, group.id, "Dark mode").await;
        h.engine
            .request_to_join_group(&member, &group.invitation_code)
            .await
            .unwrap();

        let denied = h
            .engine
            .edit_suggestion(
                &member,
                suggestion.id,
                EditSuggestionRequest {
                    status: SuggestionStatus::Rejected,
                    ..edit_request(&suggestion)
                },
            )
            .await;
        assert!(matches!(denied, Err(DomainError::Unauthorized(_))));
        assert_eq!(h.suggestion_row(suggestion.id).await, suggestion);

        let edited = h
            .engine
            .edit_suggestion(
                &owner,
                suggestion.id,
                EditSuggestionRequest {
                    status: SuggestionStatus::Approved,
                    end_goal: 75,
                    ..edit_request(&suggestion)
                },
            )
            .await
            .unwrap();
        assert_eq!(edited.status, SuggestionStatus::Approved);
        assert_eq!(edited.end_goal, 75);
        assert_eq!(edited.title, "Dark mode");
    }

    #[tokio::test]
    async fn test_edit_suggestion_unknown_image_changes_nothing() {
        let h = Harness::new();
        let (owner, _) = h.register("owner").await;
        let group = h.group(&owner, "Roadmap").await;
        let suggestion = h.suggestion(&owner, group.id, "Dark mode").await;

        let result = h
            .engine
            .edit_suggestion(
                &owner,
                suggestion.id,
                EditSuggestionRequest {
                    status: SuggestionStatus::Closed,
                    storage_id: Some("img-missing".to_string()),
                    ..edit_request(&suggestion)
                },
            )
            .await;
        assert!(matches!(result, Err(DomainError::ImageNotFound)));
        assert_eq!(h.suggestion_row(suggestion.id).await, suggestion);
    }

    #[tokio::test]
    async fn test_regenerate_suggestion_code() {
        let h = Harness::new();
        let (owner, _) = h.register("owner").await;
        let (member, _) = h.register("member").await;
        let group = h.group(&owner, "Roadmap").await;
        let suggestion = h.suggestion(&owner, group.id, "Dark mode").await;

        let code = h
            .engine
            .regenerate_suggestion_code(&owner, suggestion.id)
            .await
            .unwrap();
        assert_ne!(code, suggestion.invitation_code);

        assert!(matches!(
            h.engine
                .request_to_join_suggestion(&member, &suggestion.invitation_code)
                .await,
            Err(DomainError::NotFound(_))
        ));
        h.engine
            .request_to_join_suggestion(&member, &code)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_search_suggestion_views() {
        let h = Harness::new();
        let (owner, _) = h.register("owner").await;
        let (member, _) = h.register("member").await;
        let group = h.group(&owner, "Roadmap").await;
        let suggestion = h.suggestion(&owner, group.id, "Dark mode").await;
        h.engine.toggle_like(&owner, suggestion.id).await.unwrap();

        match h
            .engine
            .search_suggestions_by_invitation_code(&member, &suggestion.invitation_code)
            .await
            .unwrap()
        {
            Some(SuggestionSearchView::Masked(masked)) => {
                assert_eq!(masked.title, "Dark mode");
                assert_eq!(masked.likes_count, 0);
                assert_eq!(masked.end_goal, 0);
            }
            other => panic!("expected masked view, got {:?}", other),
        }

        match h
            .engine
            .search_suggestions_by_invitation_code(&owner, &suggestion.invitation_code)
            .await
            .unwrap()
        {
            Some(SuggestionSearchView::Full(full)) => assert_eq!(full.likes_count, 1),
            other => panic!("expected full view, got {:?}", other),
        }

        assert!(h
            .engine
            .search_suggestions_by_invitation_code(&member, "sugAAAAA0000BBBBBS0s")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_edit_suggestion_resolves_image_outside_transaction() {
        let h = Harness::with_lock_checked_blobs();
        let (owner, _) = h.register("owner").await;
        let group = h.group(&owner, "Roadmap").await;
        let suggestion = h.suggestion(&owner, group.id, "Dark mode").await;
        let url = h.blobs.put("img-1");

        let edited = h
            .engine
            .edit_suggestion(
                &owner,
                suggestion.id,
                EditSuggestionRequest {
                    storage_id: Some("img-1".to_string()),
                    ..edit_request(&suggestion)
                },
            )
            .await
            .unwrap();

        assert_eq!(edited.image_url, Some(url));
        assert_eq!(edited.storage_id.as_deref(), Some("img-1"));
    }
}
