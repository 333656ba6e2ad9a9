use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::VoiceError;

fn default_token_ttl_seconds() -> u64 {
    3600
}

/// LiveKit signing credentials and server location.
#[derive(Clone, Serialize, Deserialize)]
pub struct LiveKitConfig {
    /// URL of the LiveKit server handed to joining clients.
    #[serde(default)]
    pub url: String,
    /// API key the join tokens are signed under.
    #[serde(default)]
    pub api_key: String,
    #[serde(default, skip_serializing)]
    pub api_secret: String,
    /// JWT token TTL in seconds for join tokens. Default: 3600 (1 hour).
    #[serde(default = "default_token_ttl_seconds")]
    pub token_ttl_seconds: u64,
}

impl Default for LiveKitConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            api_key: String::new(),
            api_secret: String::new(),
            token_ttl_seconds: default_token_ttl_seconds(),
        }
    }
}

impl fmt::Debug for LiveKitConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LiveKitConfig")
            .field("url", &self.url)
            .field("api_key", &self.api_key)
            .field("api_secret", &"[REDACTED]")
            .field("token_ttl_seconds", &self.token_ttl_seconds)
            .finish()
    }
}

/// Which of the required credential fields are set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CredentialPresence {
    pub url: bool,
    pub api_key: bool,
    pub api_secret: bool,
}

impl CredentialPresence {
    pub fn is_complete(self) -> bool {
        self.url && self.api_key && self.api_secret
    }
}

impl LiveKitConfig {
    pub fn new(
        url: impl Into<String>,
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            api_key: api_key.into(),
            api_secret: api_secret.into(),
            token_ttl_seconds: default_token_ttl_seconds(),
        }
    }

    /// Reports which required fields are set, without exposing values.
    pub fn presence(&self) -> CredentialPresence {
        CredentialPresence {
            url: !self.url.trim().is_empty(),
            api_key: !self.api_key.trim().is_empty(),
            api_secret: !self.api_secret.trim().is_empty(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.presence().is_complete()
    }

    /// Verifies that every required field is set.
    ///
    /// Missing values are named in the error. They are never substituted
    /// with placeholders.
    pub fn validate(&self) -> Result<(), VoiceError> {
        let presence = self.presence();
        let mut missing = Vec::new();
        if !presence.url {
            missing.push("url");
        }
        if !presence.api_key {
            missing.push("api_key");
        }
        if !presence.api_secret {
            missing.push("api_secret");
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(VoiceError::Configuration(format!(
                "missing LiveKit settings: {}",
                missing.join(", ")
            )))
        }
    }
}
