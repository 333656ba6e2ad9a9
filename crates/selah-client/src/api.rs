//! HTTP client for the session server's voice endpoints.

use selah_types::api::{
    EndVoiceRequest, EndVoiceResponse, ErrorBody, StartVoiceRequest, StartVoiceResponse,
    TokenResponse,
};
use selah_types::Persona;

use crate::error::ClientError;

/// Client for the session server's three voice round-trips.
#[derive(Debug, Clone)]
pub struct VoiceApi {
    http: reqwest::Client,
    base_url: String,
}

impl VoiceApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    /// Asks the server to start a session and returns the generated room
    /// name.
    pub async fn start_session(&self, persona: Persona) -> Result<String, ClientError> {
        let response = self
            .http
            .post(format!("{}/api/voice/start", self.base_url))
            .json(&StartVoiceRequest {
                persona: Some(persona.to_string()),
            })
            .send()
            .await?;

        let body: StartVoiceResponse = Self::expect_success(response).await?;
        Ok(body.room_name)
    }

    /// Fetches a join token and the real-time server URL for a room.
    pub async fn issue_token(
        &self,
        room_name: &str,
        participant_id: &str,
    ) -> Result<TokenResponse, ClientError> {
        let response = self
            .http
            .get(format!("{}/api/voice/token", self.base_url))
            .query(&[("roomName", room_name), ("participantId", participant_id)])
            .send()
            .await?;

        Self::expect_success(response).await
    }

    /// Notifies the server that a session is over.
    ///
    /// Callers treat failures as best-effort; this method still reports
    /// them so the caller can decide.
    pub async fn end_session(&self, room_name: &str) -> Result<(), ClientError> {
        let response = self
            .http
            .post(format!("{}/api/voice/end", self.base_url))
            .json(&EndVoiceRequest {
                room_name: Some(room_name.to_string()),
            })
            .send()
            .await?;

        Self::expect_success::<EndVoiceResponse>(response).await?;
        Ok(())
    }

    /// Reads the body as `T` on 2xx; otherwise surfaces the server's
    /// structured error message verbatim.
    async fn expect_success<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }

        let message = match response.json::<ErrorBody>().await {
            Ok(body) => body.message,
            Err(_) => format!("request failed with status {status}"),
        };
        Err(ClientError::Server(message))
    }
}
