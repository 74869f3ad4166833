//! Domain layer for the Suggestion Box backend.
//!
//! This crate contains:
//! - Domain models (User, Group, Suggestion, invitations, Like, Comment)
//! - The storage and blob-store seams plus their in-memory implementations
//! - The `SuggestionBox` engine: access control, invitations and counters
//! - Domain error types

pub mod blob;
pub mod context;
pub mod error;
pub mod models;
pub mod services;
pub mod store;

pub use context::{Identity, RequestContext};
pub use error::DomainError;
pub use services::SuggestionBox;
