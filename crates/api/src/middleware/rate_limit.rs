//! Rate limiting middleware.
//!
//! Provides per-identity rate limiting using governor's keyed GCRA limiter.

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderValue, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use domain::RequestContext;
use governor::{
    clock::{Clock, DefaultClock},
    state::keyed::DefaultKeyedStateStore,
    Quota, RateLimiter,
};
use serde_json::json;
use std::num::NonZeroU32;

use crate::app::AppState;

type KeyedLimiter = RateLimiter<String, DefaultKeyedStateStore<String>, DefaultClock>;

/// Rate limiter state shared across all requests, keyed by external identity.
pub struct RateLimiterState {
    limiter: KeyedLimiter,
    clock: DefaultClock,
    rate_limit_per_minute: u32,
}

impl RateLimiterState {
    /// Limiter allowing `rate_limit_per_minute` requests per identity.
    /// Returns `None` when the limit is 0 (disabled).
    pub fn new(rate_limit_per_minute: u32) -> Option<Self> {
        let per_minute = NonZeroU32::new(rate_limit_per_minute)?;
        Some(Self {
            limiter: RateLimiter::keyed(Quota::per_minute(per_minute)),
            clock: DefaultClock::default(),
            rate_limit_per_minute,
        })
    }

    /// Returns Ok(()) if allowed, or Err with retry_after seconds if rate limited.
    pub fn check(&self, key: &str) -> Result<(), u64> {
        match self.limiter.check_key(&key.to_string()) {
            Ok(_) => Ok(()),
            Err(not_until) => {
                let wait_time = not_until.wait_time_from(self.clock.now());
                Err(wait_time.as_secs().max(1))
            }
        }
    }

    pub fn rate_limit_per_minute(&self) -> u32 {
        self.rate_limit_per_minute
    }
}

impl std::fmt::Debug for RateLimiterState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiterState")
            .field("rate_limit_per_minute", &self.rate_limit_per_minute)
            .field("tracked_identities", &self.limiter.len())
            .finish()
    }
}

/// Middleware that applies rate limiting per caller identity.
///
/// Must run after `resolve_identity`. Anonymous requests pass through; the
/// engine rejects them as unauthenticated.
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let (Some(limiter), Some(identity)) = (
        state.rate_limiter.as_ref(),
        req.extensions()
            .get::<RequestContext>()
            .and_then(|ctx| ctx.identity()),
    ) else {
        return next.run(req).await;
    };

    if let Err(retry_after) = limiter.check(&identity.external_id) {
        tracing::debug!(retry_after = retry_after, "Rate limit exceeded");
        return rate_limited_response(limiter.rate_limit_per_minute(), retry_after);
    }

    next.run(req).await
}

/// Create a rate limited response with proper headers and body.
fn rate_limited_response(limit: u32, retry_after: u64) -> Response {
    let body = json!({
        "error": "rate_limited",
        "message": format!("Rate limit of {} requests/minute exceeded", limit),
    });

    let mut response = (StatusCode::TOO_MANY_REQUESTS, Json(body)).into_response();
    response
        .headers_mut()
        .insert(header::RETRY_AFTER, HeaderValue::from(retry_after));
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_disables_limiter() {
        assert!(RateLimiterState::new(0).is_none());
        assert!(RateLimiterState::new(100).is_some());
    }

    #[test]
    fn test_rate_limiter_exhaustion() {
        let state = RateLimiterState::new(1).unwrap();

        assert!(state.check("user_a").is_ok());
        let result = state.check("user_a");
        assert!(result.is_err());
        assert!(result.unwrap_err() >= 1);
    }

    #[test]
    fn test_identities_limited_independently() {
        let state = RateLimiterState::new(1).unwrap();

        assert!(state.check("user_a").is_ok());
        assert!(state.check("user_b").is_ok());
        assert!(state.check("user_a").is_err());
        assert!(state.check("user_b").is_err());
        assert!(state.check("user_c").is_ok());
    }

    #[test]
    fn test_burst_up_to_quota() {
        let state = RateLimiterState::new(5).unwrap();
        for i in 0..5 {
            assert!(state.check("user_a").is_ok(), "Request {} should be allowed", i);
        }
        assert!(state.check("user_a").is_err());
    }

    #[test]
    fn test_rate_limiter_state_debug() {
        let state = RateLimiterState::new(100).unwrap();
        state.check("user_a").unwrap();
        let debug = format!("{:?}", state);
        assert!(debug.contains("rate_limit_per_minute"));
        assert!(debug.contains("tracked_identities"));
    }

    #[test]
    fn test_rate_limited_response_format() {
        let response = rate_limited_response(100, 60);
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers().get(header::RETRY_AFTER).unwrap(), "60");
    }
}
