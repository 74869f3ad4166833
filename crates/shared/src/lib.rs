//! Shared utilities and common types for the Suggestion Box backend.
//!
//! This crate provides common functionality used across all other crates:
//! - Random token and hashing helpers
//! - Identity-token (JWT) verification for the external identity provider
//! - Common validation logic

pub mod crypto;
pub mod identity_token;
pub mod validation;
