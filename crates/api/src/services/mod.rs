//! Clients for external services.

pub mod object_store;

pub use object_store::HttpBlobStore;
