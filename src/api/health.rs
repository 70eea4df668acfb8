use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub version: String,
    pub issuer_id: String,
}

/// Liveness endpoint. Does not call the wallet API.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        issuer_id: state.settings.issuer_id.clone(),
    })
}
