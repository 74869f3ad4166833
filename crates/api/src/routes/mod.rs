//! HTTP route handlers.

pub mod comments;
pub mod groups;
pub mod health;
pub mod storage;
pub mod suggestions;
pub mod users;
