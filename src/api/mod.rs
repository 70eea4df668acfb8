// API module - HTTP endpoints

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use std::any::Any;
use tower_http::{catch_panic::CatchPanicLayer, services::ServeDir, trace::TraceLayer};

use crate::error::INTERNAL_ERROR_MESSAGE;

pub mod health;
pub mod passes;
pub mod state;

pub use state::AppState;

/// Builds the application router; unmatched paths fall through to `static_dir`
pub fn router(state: AppState, static_dir: &str) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .merge(passes::router())
        .fallback_service(ServeDir::new(static_dir))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn handle_panic(_err: Box<dyn Any + Send + 'static>) -> Response {
    tracing::error!("Request handler panicked");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": INTERNAL_ERROR_MESSAGE })),
    )
        .into_response()
}
