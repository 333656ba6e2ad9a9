use thiserror::Error;

/// Errors surfaced by the session client and its collaborators.
#[derive(Error, Debug)]
pub enum ClientError {
    /// The requested operation is not valid in the current phase.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// Transport-level failure talking to the session server.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Structured error returned by the session server.
    #[error("server error: {0}")]
    Server(String),

    /// The real-time room rejected or lost the connection.
    #[error("room error: {0}")]
    Room(String),

    /// Microphone access was refused or is unavailable.
    #[error("microphone permission denied: {0}")]
    PermissionDenied(String),

    /// A connect attempt was superseded by a disconnect.
    #[error("connect cancelled by disconnect")]
    Cancelled,
}
