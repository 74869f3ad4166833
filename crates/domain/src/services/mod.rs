//! The suggestion-box engine.
//!
//! [`SuggestionBox`] implements every operation on groups, suggestions,
//! memberships, likes and comments. Each operation runs in exactly one store
//! transaction: it resolves the caller, reads its target, checks access and
//! then writes records and counters before committing. Any error drops the
//! transaction, which rolls back everything the operation wrote.

mod cascade;
mod comments;
mod groups;
mod identity;
pub mod invitation_code;
mod likes;
mod membership;
mod storage;
mod suggestions;
mod users;

#[cfg(test)]
mod test_support;

use std::sync::Arc;

use uuid::Uuid;

use crate::blob::BlobStore;
use crate::store::Store;

pub use membership::GroupAccess;

/// Engine over a record store and a blob store.
#[derive(Clone)]
pub struct SuggestionBox {
    store: Arc<dyn Store>,
    blobs: Arc<dyn BlobStore>,
}

impl SuggestionBox {
    pub fn new(store: Arc<dyn Store>, blobs: Arc<dyn BlobStore>) -> Self {
        Self { store, blobs }
    }

    pub fn store(&self) -> &Arc<dyn Store> {
        &self.store
    }
}

/// Returns `current - 1`, clamped at zero. Clamping means a counter had
/// drifted from its child rows, which is logged.
pub(crate) fn decrement_counter(current: i64, counter: &'static str, record_id: Uuid) -> i64 {
    if current <= 0 {
        tracing::warn!(
            counter,
            record_id = %record_id,
            current,
            "Counter decrement would go negative, clamping at zero"
        );
        return 0;
    }
    current - 1
}
