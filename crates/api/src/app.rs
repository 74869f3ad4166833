use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{delete, get, post},
    Router,
};
use domain::SuggestionBox;
use shared::identity_token::{IdentityTokenVerifier, TokenError};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{
    metrics_handler, metrics_middleware, rate_limit_middleware, resolve_identity,
    security_headers_middleware, trace_id, RateLimiterState,
};
use crate::routes::{comments, groups, health, storage, suggestions, users};

#[derive(Clone)]
pub struct AppState {
    pub engine: SuggestionBox,
    pub config: Arc<Config>,
    pub identity: Arc<IdentityTokenVerifier>,
    pub rate_limiter: Option<Arc<RateLimiterState>>,
}

/// Builds the HTTP router around an engine.
///
/// Fails only when the identity configuration cannot produce a verifier.
pub fn create_app(config: Config, engine: SuggestionBox) -> Result<Router, TokenError> {
    let config = Arc::new(config);
    let identity = Arc::new(config.identity.verifier()?);
    let rate_limiter = RateLimiterState::new(config.security.rate_limit_per_minute).map(Arc::new);

    let state = AppState {
        engine,
        config: config.clone(),
        identity,
        rate_limiter,
    };

    let cors = if config.security.cors_origins.is_empty() {
        // Development: allow any origin
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Engine routes. Identity resolution runs first (outermost), then the
    // per-identity rate limiter.
    let api_routes = Router::new()
        .route("/api/v1/users", post(users::register_user))
        .route(
            "/api/v1/users/me",
            get(users::get_current_user).patch(users::update_current_user),
        )
        .route(
            "/api/v1/groups",
            get(groups::list_groups).post(groups::create_group),
        )
        .route("/api/v1/groups/search", post(groups::search_by_invitation_code))
        .route("/api/v1/groups/join", post(groups::join_by_invitation_code))
        .route(
            "/api/v1/groups/:group_id",
            get(groups::get_group)
                .patch(groups::update_group)
                .delete(groups::delete_group),
        )
        .route(
            "/api/v1/groups/:group_id/invitation-code",
            post(groups::regenerate_invitation_code),
        )
        .route(
            "/api/v1/groups/:group_id/suggestions",
            get(groups::list_group_suggestions),
        )
        .route("/api/v1/suggestions", post(suggestions::create_suggestion))
        .route(
            "/api/v1/suggestions/search",
            post(suggestions::search_by_invitation_code),
        )
        .route(
            "/api/v1/suggestions/join",
            post(suggestions::join_by_invitation_code),
        )
        .route(
            "/api/v1/suggestions/:suggestion_id",
            get(suggestions::get_suggestion)
                .patch(suggestions::update_suggestion)
                .delete(suggestions::delete_suggestion),
        )
        .route(
            "/api/v1/suggestions/:suggestion_id/invitation-code",
            post(suggestions::regenerate_invitation_code),
        )
        .route(
            "/api/v1/suggestions/:suggestion_id/like",
            post(suggestions::toggle_like),
        )
        .route(
            "/api/v1/suggestions/:suggestion_id/comments",
            get(comments::list_comments).post(comments::create_comment),
        )
        .route("/api/v1/comments/:comment_id", delete(comments::delete_comment))
        .route("/api/v1/storage/upload-url", post(storage::generate_upload_url))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ))
        .route_layer(middleware::from_fn_with_state(state.clone(), resolve_identity));

    // Public routes (no identity)
    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler));

    let app = Router::new()
        .merge(public_routes)
        .merge(api_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            security_headers_middleware,
        ))
        .layer(DefaultBodyLimit::max(config.server.max_body_size))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state);

    Ok(app)
}
