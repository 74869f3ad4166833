//! Identity-token middleware.
//!
//! Resolves the caller from `Authorization: Bearer <token>` before the
//! handler runs. A missing header yields an anonymous context and the engine
//! decides whether the operation needs an identity; a header that is present
//! but invalid is rejected here with 401.

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use domain::RequestContext;
use shared::identity_token::IdentityTokenVerifier;

use crate::app::AppState;
use crate::error::ApiError;

/// Middleware that stores the caller's `RequestContext` in request extensions.
pub async fn resolve_identity(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    match context_from_headers(req.headers(), &state.identity) {
        Ok(ctx) => {
            req.extensions_mut().insert(ctx);
            next.run(req).await
        }
        Err(e) => e.into_response(),
    }
}

/// Builds the caller context from request headers.
pub fn context_from_headers(
    headers: &HeaderMap,
    verifier: &IdentityTokenVerifier,
) -> Result<RequestContext, ApiError> {
    let Some(value) = headers.get(header::AUTHORIZATION) else {
        return Ok(RequestContext::anonymous());
    };

    let token = value
        .to_str()
        .ok()
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::Unauthorized("Invalid Authorization header format".to_string()))?;

    let claims = verifier.verify(token).map_err(|e| {
        tracing::debug!("Identity token rejected: {}", e);
        ApiError::Unauthorized("Invalid or expired token".to_string())
    })?;

    Ok(RequestContext::authenticated(claims.sub))
}
