//! Fixtures for engine tests.

use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

use super::SuggestionBox;
use crate::blob::{BlobError, BlobStore, MemoryBlobStore};
use crate::context::RequestContext;
use crate::models::{
    CreateGroupRequest, CreateSuggestionRequest, Group, GroupStatus, RegisterUserRequest,
    Suggestion, SuggestionStatus, User,
};
use crate::store::{MemoryState, MemoryStore, Store};

pub(crate) struct Harness {
    pub engine: SuggestionBox,
    pub store: MemoryStore,
    pub blobs: Arc<MemoryBlobStore>,
}

impl Harness {
    pub fn new() -> Self {
        let store = MemoryStore::new();
        let blobs = Arc::new(MemoryBlobStore::new());
        let engine = SuggestionBox::new(Arc::new(store.clone()), blobs.clone());
        Self {
            engine,
            store,
            blobs,
        }
    }

    /// Harness whose blob lookups fail if the record store is locked while
    /// they run.
    pub fn with_lock_checked_blobs() -> Self {
        let store = MemoryStore::new();
        let blobs = Arc::new(MemoryBlobStore::new());
        let checked = Arc::new(LockCheckedBlobStore {
            store: store.clone(),
            inner: blobs.clone(),
        });
        let engine = SuggestionBox::new(Arc::new(store.clone()), checked);
        Self {
            engine,
            store,
            blobs,
        }
    }

    /// Registers a user and returns a context authenticated as them.
    pub async fn register(&self, name: &str) -> (RequestContext, User) {
        let ctx = RequestContext::authenticated(format!("ext_{}", name));
        let user = self
            .engine
            .ensure_user(
                &ctx,
                RegisterUserRequest {
                    username: name.to_string(),
                    fullname: format!("{} Tester", name),
                    email: format!("{}@example.com", name),
                    image: None,
                },
            )
            .await
            .unwrap();
        (ctx, user)
    }

    pub async fn group(&self, ctx: &RequestContext, name: &str) -> Group {
        self.engine
            .add_group(
                ctx,
                CreateGroupRequest {
                    group_name: name.to_string(),
                    status: GroupStatus::Open,
                },
            )
            .await
            .unwrap()
    }

    pub async fn suggestion(&self, ctx: &RequestContext, group_id: Uuid, title: &str) -> Suggestion {
        self.engine
            .add_suggestion(
                ctx,
                CreateSuggestionRequest {
                    group_id,
                    title: title.to_string(),
                    description: format!("{} please", title),
                    end_goal: 50,
                    status: SuggestionStatus::Open,
                },
            )
            .await
            .unwrap()
    }

    pub async fn state(&self) -> MemoryState {
        self.store.snapshot().await
    }

    pub async fn group_row(&self, id: Uuid) -> Group {
        self.state()
            .await
            .groups
            .into_iter()
            .find(|g| g.id == id)
            .unwrap()
    }

    pub async fn suggestion_row(&self, id: Uuid) -> Suggestion {
        self.state()
            .await
            .suggestions
            .into_iter()
            .find(|s| s.id == id)
            .unwrap()
    }
}

/// Blob store whose `get_url` needs the record store to be free.
struct LockCheckedBlobStore {
    store: MemoryStore,
    inner: Arc<MemoryBlobStore>,
}

#[async_trait::async_trait]
impl BlobStore for LockCheckedBlobStore {
    async fn generate_upload_url(&self) -> Result<String, BlobError> {
        self.inner.generate_upload_url().await
    }

    async fn get_url(&self, storage_id: &str) -> Result<Option<String>, BlobError> {
        match tokio::time::timeout(Duration::from_millis(200), self.store.begin()).await {
            Ok(Ok(_tx)) => self.inner.get_url(storage_id).await,
            _ => Err(BlobError::Request(
                "record store locked during image lookup".to_string(),
            )),
        }
    }

    async fn delete(&self, storage_id: &str) -> Result<(), BlobError> {
        self.inner.delete(storage_id).await
    }
}
