//! Image handling against the blob store.

use super::identity::resolve_current_user;
use super::SuggestionBox;
use crate::context::RequestContext;
use crate::error::{DomainError, DomainResult};

impl SuggestionBox {
    /// Returns an upload URL for a new image. Requires a registered caller.
    pub async fn generate_upload_url(&self, ctx: &RequestContext) -> DomainResult<String> {
        {
            let mut tx = self.store.begin().await?;
            resolve_current_user(tx.as_mut(), ctx).await?;
        }
        Ok(self.blobs.generate_upload_url().await?)
    }

    /// Resolves `storage_id` to a URL, failing with `ImageNotFound` when the
    /// blob does not exist.
    pub(crate) async fn resolve_image(&self, storage_id: &str) -> DomainResult<String> {
        self.blobs
            .get_url(storage_id)
            .await?
            .ok_or(DomainError::ImageNotFound)
    }

    /// Deletes blobs whose records were removed by a committed transaction.
    /// Failures are logged; the records stay deleted.
    pub(crate) async fn delete_blobs(&self, storage_ids: Vec<String>) {
        for storage_id in storage_ids {
            if let Err(e) = self.blobs.delete(&storage_id).await {
                tracing::warn!(storage_id = %storage_id, error = %e, "Failed to delete blob");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::Harness;
    use super::*;

    #[tokio::test]
    async fn test_upload_url_requires_registered_user() {
        let h = Harness::new();
        let result = h
            .engine
            .generate_upload_url(&RequestContext::authenticated("ext_ghost"))
            .await;
        assert!(matches!(result, Err(DomainError::UserNotFound)));

        let (ctx, _) = h.register("ada").await;
        let url = h.engine.generate_upload_url(&ctx).await.unwrap();
        assert!(url.starts_with("memory://upload/"));
    }

    #[tokio::test]
    async fn test_resolve_image() {
        let h = Harness::new();
        let url = h.blobs.put("img-1");
        assert_eq!(h.engine.resolve_image("img-1").await.unwrap(), url);
        assert!(matches!(
            h.engine.resolve_image("img-missing").await,
            Err(DomainError::ImageNotFound)
        ));
    }
}
