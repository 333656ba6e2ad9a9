//! JSON wire types for the voice HTTP API.
//!
//! Field names are camelCase on the wire (`roomName`, `participantId`),
//! matching what the mobile client sends and expects. Request fields that
//! the contract requires are still modelled as `Option` so handlers can
//! reject missing values with a structured error instead of a bare
//! deserialization failure.

use serde::{Deserialize, Serialize};

/// Body of `POST /api/voice/start`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartVoiceRequest {
    pub persona: Option<String>,
}

/// Response of `POST /api/voice/start`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartVoiceResponse {
    pub success: bool,
    pub room_name: String,
}

/// Query parameters of `GET /api/voice/token`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenQuery {
    #[serde(default)]
    pub room_name: Option<String>,
    #[serde(default)]
    pub participant_id: Option<String>,
}

/// Response of `GET /api/voice/token`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub success: bool,
    /// Signed join token, opaque to the client.
    pub token: String,
    /// URL of the real-time server the token is valid for.
    pub url: String,
}

/// Body of `POST /api/voice/end`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndVoiceRequest {
    pub room_name: Option<String>,
}

/// Response of `POST /api/voice/end`. Always `ok: true`; ending is
/// idempotent and never fails the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndVoiceResponse {
    pub ok: bool,
}

/// Response of `GET /api/voice/test-connection`: per-credential presence
/// flags (never the values themselves).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionCheckResponse {
    pub success: bool,
    pub url: bool,
    pub api_key: bool,
    pub api_secret: bool,
}

/// Structured error body returned by every failing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub success: bool,
    /// Stable machine-readable code (`invalid_persona`, `configuration_error`, ...).
    pub error: String,
    /// Human-readable detail, surfaced verbatim by the client.
    pub message: String,
}
