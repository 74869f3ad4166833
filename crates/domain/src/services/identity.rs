//! Identity resolution: from the caller's external identity to a user row.

use crate::context::RequestContext;
use crate::error::{DomainError, DomainResult};
use crate::models::User;
use crate::store::StoreTransaction;

/// Resolves the caller's user record inside `tx`.
///
/// Fails with `Unauthenticated` when the request carries no identity and with
/// `UserNotFound` when the identity was never registered.
pub(crate) async fn resolve_current_user(
    tx: &mut dyn StoreTransaction,
    ctx: &RequestContext,
) -> DomainResult<User> {
    let identity = ctx.identity().ok_or(DomainError::Unauthenticated)?;
    tx.find_user_by_external_id(&identity.external_id)
        .await?
        .ok_or(DomainError::UserNotFound)
}
