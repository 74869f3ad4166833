//! Object-store seam for group and suggestion images.
//!
//! Images live outside the record store and are referenced by an opaque
//! `storage_id`. The engine resolves ids to URLs when an image is attached and
//! deletes blobs once the records referencing them are gone.

use std::collections::HashMap;
use std::sync::Mutex;

use thiserror::Error;
use uuid::Uuid;

/// Object-store failure.
#[derive(Debug, Error)]
pub enum BlobError {
    #[error("Object store request failed: {0}")]
    Request(String),

    #[error("Object store returned an unexpected response: {0}")]
    UnexpectedResponse(String),
}

/// External blob storage used for images.
#[async_trait::async_trait]
pub trait BlobStore: Send + Sync {
    /// Returns a short-lived URL the client can upload an image to.
    async fn generate_upload_url(&self) -> Result<String, BlobError>;

    /// Resolves a storage id to a retrievable URL. `None` when no such blob exists.
    async fn get_url(&self, storage_id: &str) -> Result<Option<String>, BlobError>;

    /// Removes a blob. Deleting an unknown id is not an error.
    async fn delete(&self, storage_id: &str) -> Result<(), BlobError>;
}

/// In-process blob store for tests and local development.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    blobs: Mutex<HashMap<String, String>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an uploaded blob and returns its URL.
    pub fn put(&self, storage_id: &str) -> String {
        let url = format!("memory://blobs/{}", storage_id);
        self.lock().insert(storage_id.to_string(), url.clone());
        url
    }

    pub fn contains(&self, storage_id: &str) -> bool {
        self.lock().contains_key(storage_id)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        // A poisoned map is still structurally valid.
        self.blobs.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait::async_trait]
impl BlobStore for MemoryBlobStore {
    async fn generate_upload_url(&self) -> Result<String, BlobError> {
        Ok(format!("memory://upload/{}", Uuid::new_v4()))
    }

    async fn get_url(&self, storage_id: &str) -> Result<Option<String>, BlobError> {
        Ok(self.lock().get(storage_id).cloned())
    }

    async fn delete(&self, storage_id: &str) -> Result<(), BlobError> {
        self.lock().remove(storage_id);
        Ok(())
    }
}
