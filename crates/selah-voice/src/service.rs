use std::time::Duration;

use chrono::Utc;
use livekit_api::access_token::{AccessToken, VideoGrants};
use selah_types::Persona;

use crate::config::{CredentialPresence, LiveKitConfig};
use crate::error::VoiceError;

/// Mints scoped LiveKit join tokens for voice conversations.
#[derive(Debug)]
pub struct VoiceService {
    config: LiveKitConfig,
}

impl VoiceService {
    pub fn new(config: LiveKitConfig) -> Self {
        Self { config }
    }

    /// Returns the LiveKit server URL handed to joining clients.
    pub fn url(&self) -> &str {
        &self.config.url
    }

    /// Reports which credential fields are set.
    pub fn presence(&self) -> CredentialPresence {
        self.config.presence()
    }

    pub fn is_configured(&self) -> bool {
        self.config.is_complete()
    }

    /// Signs a join token for `participant_identity`, scoped to `room_name`.
    ///
    /// The grant set is fixed: join the named room, publish, subscribe, and
    /// publish data. The token expires after the configured TTL. Fails
    /// without issuing anything when the credentials are incomplete.
    pub fn mint_join_token(
        &self,
        room_name: &str,
        participant_identity: &str,
    ) -> Result<String, VoiceError> {
        if room_name.trim().is_empty() {
            return Err(VoiceError::InvalidArgument(
                "room name must not be empty".to_string(),
            ));
        }
        if participant_identity.trim().is_empty() {
            return Err(VoiceError::InvalidArgument(
                "participant identity must not be empty".to_string(),
            ));
        }
        self.config.validate()?;

        let token = AccessToken::with_api_key(&self.config.api_key, &self.config.api_secret)
            .with_identity(participant_identity)
            .with_name(participant_identity)
            .with_grants(VideoGrants {
                room_join: true,
                room: room_name.to_string(),
                can_publish: true,
                can_subscribe: true,
                can_publish_data: true,
                ..Default::default()
            })
            .with_ttl(Duration::from_secs(self.config.token_ttl_seconds));

        token.to_jwt().map_err(VoiceError::AccessToken)
    }
}

/// Generates a room name for a new conversation.
///
/// Uniqueness relies on millisecond timestamps; two starts for the same
/// persona within the same millisecond would collide. No collision check
/// is performed.
pub fn generate_room_name(persona: Persona) -> String {
    format!("voice-{}-{}", persona, Utc::now().timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn room_names_embed_persona_and_timestamp() {
        for persona in Persona::ALL {
            let name = generate_room_name(persona);
            let suffix = name
                .strip_prefix(&format!("voice-{persona}-"))
                .expect("room name prefix");
            suffix.parse::<i64>().expect("numeric suffix");
        }
    }
}
