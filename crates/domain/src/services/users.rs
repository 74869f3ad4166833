//! User registration and profile operations.

use validator::Validate;

use super::identity::resolve_current_user;
use super::SuggestionBox;
use crate::context::RequestContext;
use crate::error::{DomainError, DomainResult};
use crate::models::{NewUser, RegisterUserRequest, UpdateProfileRequest, User};

impl SuggestionBox {
    /// Registers the caller, or returns their existing record unchanged.
    pub async fn ensure_user(
        &self,
        ctx: &RequestContext,
        request: RegisterUserRequest,
    ) -> DomainResult<User> {
        request.validate()?;
        let identity = ctx.identity().ok_or(DomainError::Unauthenticated)?;

        let mut tx = self.store.begin().await?;
        if let Some(existing) = tx.find_user_by_external_id(&identity.external_id).await? {
            return Ok(existing);
        }

        let user = match tx
            .insert_user(NewUser {
                external_id: identity.external_id.clone(),
                username: request.username,
                fullname: request.fullname,
                email: request.email,
                image: request.image,
            })
            .await?
        {
            Some(user) => user,
            // Registered concurrently under the same identity.
            None => tx
                .find_user_by_external_id(&identity.external_id)
                .await?
                .ok_or(DomainError::UserNotFound)?,
        };
        tx.commit().await?;

        tracing::info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    pub async fn current_user(&self, ctx: &RequestContext) -> DomainResult<User> {
        let mut tx = self.store.begin().await?;
        resolve_current_user(tx.as_mut(), ctx).await
    }

    /// Applies the provided profile fields to the caller's record.
    pub async fn update_profile(
        &self,
        ctx: &RequestContext,
        request: UpdateProfileRequest,
    ) -> DomainResult<User> {
        request.validate()?;

        let mut tx = self.store.begin().await?;
        let mut user = resolve_current_user(tx.as_mut(), ctx).await?;

        if let Some(username) = request.username {
            user.username = username;
        }
        if let Some(fullname) = request.fullname {
            user.fullname = fullname;
        }
        if let Some(image) = request.image {
            user.image = Some(image);
        }

        tx.update_user(&user).await?;
        tx.commit().await?;

        tracing::info!(user_id = %user.id, "Profile updated");
        Ok(user)
    }
}
