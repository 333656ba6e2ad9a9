use crate::Persona;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registry entry for an active voice conversation.
///
/// Created when a client asks the server to start a session and removed by
/// the explicit end-session call. Entries live only in process memory; a
/// client that drops without ending its session leaves the entry behind
/// until the process exits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceSession {
    /// Server-generated room name (`voice-{persona}-{millis}`).
    pub room_name: String,
    /// The persona the conversation was started with.
    pub persona: Persona,
    /// Identity of the joining participant, bound when a token is issued.
    pub participant_identity: Option<String>,
    /// When the session was started.
    pub created_at: DateTime<Utc>,
}

impl VoiceSession {
    pub fn new(room_name: impl Into<String>, persona: Persona) -> Self {
        Self {
            room_name: room_name.into(),
            persona,
            participant_identity: None,
            created_at: Utc::now(),
        }
    }
}
