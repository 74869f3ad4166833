//! HTTP surface of the Suggestion Box backend.

pub mod app;
pub mod config;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod routes;
pub mod services;
