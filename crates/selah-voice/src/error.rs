use thiserror::Error;

#[derive(Error, Debug)]
pub enum VoiceError {
    #[error("LiveKit access token error: {0}")]
    AccessToken(#[from] livekit_api::access_token::AccessTokenError),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("voice backend not configured: {0}")]
    Configuration(String),
}
