//! Health check endpoint handlers.

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::app::AppState;

/// Health check response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub storage: StorageHealth,
}

/// Record store health status.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct StorageHealth {
    pub backend: String,
    pub connected: bool,
    pub latency_ms: Option<u64>,
}

/// Simple status response for liveness/readiness probes.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: String,
}

/// Full health check endpoint.
///
/// GET /api/health
pub async fn health_check(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let start = std::time::Instant::now();
    let connected = match state.engine.store().ping().await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!("Store health check failed: {}", e);
            false
        }
    };
    let latency_ms = start.elapsed().as_millis() as u64;

    let response = HealthResponse {
        status: if connected { "healthy" } else { "unhealthy" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        storage: StorageHealth {
            backend: state.config.storage.backend.as_str().to_string(),
            connected,
            latency_ms: connected.then_some(latency_ms),
        },
    };

    if connected {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

/// Liveness probe endpoint.
///
/// Returns 200 OK if the process is running.
pub async fn live() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "alive".to_string(),
    })
}

/// Readiness probe endpoint.
///
/// Returns 200 OK if the record store is reachable.
pub async fn ready(State(state): State<AppState>) -> Result<Json<StatusResponse>, StatusCode> {
    match state.engine.store().ping().await {
        Ok(()) => Ok(Json(StatusResponse {
            status: "ready".to_string(),
        })),
        Err(_) => Err(StatusCode::SERVICE_UNAVAILABLE),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unhealthy_response_omits_latency() {
        let response = HealthResponse {
            status: "unhealthy".to_string(),
            version: "0.3.0".to_string(),
            storage: StorageHealth {
                backend: "postgres".to_string(),
                connected: false,
                latency_ms: None,
            },
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["storage"]["connected"], false);
        assert!(json["storage"]["latency_ms"].is_null());
    }
}
