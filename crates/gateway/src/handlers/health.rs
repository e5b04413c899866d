//! Health check handlers

use axum::{extract::State, Json};
use serde::Serialize;
use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Serialize)]
pub struct ReadyResponse {
    pub status: String,
    pub version: String,
    pub checks: ReadyChecks,
}

#[derive(Serialize)]
pub struct ReadyChecks {
    pub source: ProviderCheck,
    pub chat: ProviderCheck,
}

#[derive(Serialize)]
pub struct ProviderCheck {
    pub provider: String,
}

/// Liveness probe - always returns healthy if server is running
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
    })
}

/// Readiness probe - reports the collaborators this instance was wired with.
///
/// Upstream providers are not pinged; a dead provider shows up as 500s on search.
pub async fn ready(State(state): State<AppState>) -> Json<ReadyResponse> {
    Json(ReadyResponse {
        status: "ready".to_string(),
        version: paperscope_common::VERSION.to_string(),
        checks: ReadyChecks {
            source: ProviderCheck {
                provider: state.explorer.source_name().to_string(),
            },
            chat: ProviderCheck {
                provider: state.chat.provider().to_string(),
            },
        },
    })
}
