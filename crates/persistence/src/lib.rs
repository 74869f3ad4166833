//! Persistence layer for the Suggestion Box backend.
//!
//! This crate contains:
//! - Database connection management and migrations
//! - Entity definitions (database row mappings)
//! - Repository implementations
//! - `PgStore`, the PostgreSQL implementation of the engine's store

pub mod db;
pub mod entities;
pub mod error;
pub mod metrics;
pub mod repositories;
pub mod store;

pub use store::PgStore;
