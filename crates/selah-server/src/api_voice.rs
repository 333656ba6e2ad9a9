//! Handlers for the voice session HTTP API.
//!
//! A mobile client drives a conversation through three calls: start
//! (allocate a room name and register the session), token (mint a scoped
//! join token), and end (drop the registry entry). `test-connection`
//! reports credential presence for deploy-time checks.

use std::str::FromStr;
use std::sync::Arc;

use axum::{
    extract::Query,
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use selah_types::api::{
    ConnectionCheckResponse, EndVoiceRequest, EndVoiceResponse, StartVoiceRequest,
    StartVoiceResponse, TokenQuery, TokenResponse,
};
use selah_types::{Persona, VoiceSession};
use selah_voice::{generate_room_name, VoiceError};
use serde_json::json;

use crate::AppState;

/// Structured error returned by the voice handlers.
///
/// Serializes as `{"success": false, "error": <code>, "message": <detail>}`
/// so the client can surface the message verbatim.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl ApiError {
    fn invalid_persona(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            code: "invalid_persona",
            message: message.into(),
        }
    }

    fn invalid_argument(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            code: "invalid_argument",
            message: message.into(),
        }
    }

    fn configuration(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            code: "configuration_error",
            message: message.into(),
        }
    }

    fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            code: "internal_error",
            message: message.into(),
        }
    }
}

impl From<VoiceError> for ApiError {
    fn from(err: VoiceError) -> Self {
        match err {
            VoiceError::InvalidArgument(message) => Self::invalid_argument(message),
            VoiceError::Configuration(message) => Self::configuration(message),
            VoiceError::AccessToken(e) => Self::internal(format!("failed to sign join token: {e}")),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "success": false,
            "error": self.code,
            "message": self.message,
        }));
        (self.status, body).into_response()
    }
}

/// POST /api/voice/start
pub async fn start_voice_handler(
    Extension(state): Extension<Arc<AppState>>,
    Json(payload): Json<StartVoiceRequest>,
) -> Result<Json<StartVoiceResponse>, ApiError> {
    let label = payload
        .persona
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::invalid_persona("persona is required"))?;

    let persona =
        Persona::from_str(label).map_err(|e| ApiError::invalid_persona(e.to_string()))?;

    let room_name = generate_room_name(persona);
    state
        .sessions
        .insert(VoiceSession::new(room_name.clone(), persona));

    tracing::info!(room = %room_name, persona = %persona, "voice session started");

    Ok(Json(StartVoiceResponse {
        success: true,
        room_name,
    }))
}

/// GET /api/voice/token?roomName=..&participantId=..
pub async fn issue_token_handler(
    Extension(state): Extension<Arc<AppState>>,
    Query(query): Query<TokenQuery>,
) -> Result<Json<TokenResponse>, ApiError> {
    let room_name = query
        .room_name
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::invalid_argument("roomName is required"))?;
    let participant_id = query
        .participant_id
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::invalid_argument("participantId is required"))?;

    let token = state
        .voice_service
        .mint_join_token(room_name, participant_id)?;

    // Bind the participant to the registry entry when the room is known.
    // Token issuance itself does not require one: the registry is
    // bookkeeping, not an authorization check.
    if let Some(mut session) = state.sessions.get(room_name) {
        session.participant_identity = Some(participant_id.to_string());
        state.sessions.insert(session);
    }

    tracing::info!(
        room = room_name,
        participant = participant_id,
        "issued voice join token"
    );

    Ok(Json(TokenResponse {
        success: true,
        token,
        url: state.voice_service.url().to_string(),
    }))
}

/// POST /api/voice/end
///
/// Idempotent: ending an unknown or already-ended session still succeeds,
/// so clients can fire it best-effort during teardown.
pub async fn end_voice_handler(
    Extension(state): Extension<Arc<AppState>>,
    Json(payload): Json<EndVoiceRequest>,
) -> Json<EndVoiceResponse> {
    match payload.room_name.as_deref().map(str::trim) {
        Some(room_name) if !room_name.is_empty() => match state.sessions.remove(room_name) {
            Some(session) => {
                tracing::info!(room = room_name, persona = %session.persona, "voice session ended");
            }
            None => {
                tracing::debug!(room = room_name, "end requested for unknown voice session");
            }
        },
        _ => {
            tracing::debug!("end requested without a room name");
        }
    }

    Json(EndVoiceResponse { ok: true })
}

/// GET /api/voice/test-connection
pub async fn test_connection_handler(Extension(state): Extension<Arc<AppState>>) -> Response {
    let presence = state.voice_service.presence();
    let body = ConnectionCheckResponse {
        success: presence.is_complete(),
        url: presence.url,
        api_key: presence.api_key,
        api_secret: presence.api_secret,
    };

    let status = if presence.is_complete() {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };

    (status, Json(body)).into_response()
}
