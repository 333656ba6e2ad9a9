//! Selah server library logic.

pub mod api_voice;
pub mod config;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Extension, Json, Router,
};
use selah_voice::{SessionStore, VoiceService};
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Token minting for LiveKit rooms.
    pub voice_service: Arc<VoiceService>,
    /// Active voice sessions (room name -> session).
    pub sessions: Arc<dyn SessionStore>,
}

/// Maximum request body size (64 KiB). Voice API payloads are small JSON
/// objects; anything larger is rejected outright.
const MAX_REQUEST_BODY_BYTES: usize = 64 * 1024;

/// Health check handler.
///
/// Returns `200 OK` with server status and version. Used by load balancers,
/// monitoring, and CI to verify the server is running.
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Builds the application router with all routes.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/voice/start", post(api_voice::start_voice_handler))
        .route("/api/voice/token", get(api_voice::issue_token_handler))
        .route("/api/voice/end", post(api_voice::end_voice_handler))
        .route(
            "/api/voice/test-connection",
            get(api_voice::test_connection_handler),
        )
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_BYTES))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(Extension(Arc::new(state)))
}
