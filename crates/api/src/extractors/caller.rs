//! Caller extractor.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use domain::RequestContext;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::identity::context_from_headers;

/// The caller of an engine operation.
///
/// Reuses the context stored by `resolve_identity` when that middleware ran,
/// otherwise verifies the `Authorization` header itself.
#[derive(Debug, Clone)]
pub struct Caller(pub RequestContext);

#[async_trait]
impl FromRequestParts<AppState> for Caller {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(ctx) = parts.extensions.get::<RequestContext>() {
            return Ok(Caller(ctx.clone()));
        }

        context_from_headers(&parts.headers, &state.identity).map(Caller)
    }
}
