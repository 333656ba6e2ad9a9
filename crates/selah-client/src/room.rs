//! The seam between the session client and the real-time media SDK.
//!
//! The concrete SDK is an external collaborator: the client only needs to
//! join a room with a signed token, flip the local microphone, and hear
//! about server-initiated disconnects. Expressing that as traits keeps the
//! state machine testable against a scripted room.

use tokio::sync::mpsc;

use crate::error::ClientError;

/// Lifecycle notification emitted by a joined room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoomEvent {
    /// The connection was closed from the server side (network drop, room
    /// deleted, participant evicted).
    Disconnected { reason: String },
}

/// A live connection to a real-time media room.
pub trait MediaRoom: Send + Sync + 'static {
    /// Enables or disables publication of the local microphone track.
    ///
    /// Enabling may require an OS-level permission grant; refusal surfaces
    /// as [`ClientError::PermissionDenied`].
    fn set_microphone_enabled(
        &self,
        enabled: bool,
    ) -> impl std::future::Future<Output = Result<(), ClientError>> + Send;

    /// Closes the room connection. Infallible by contract: the connection
    /// is gone afterwards regardless of what the server thought of it.
    fn disconnect(&self) -> impl std::future::Future<Output = ()> + Send;
}

/// Establishes room connections from a server URL and a signed join token.
pub trait RoomConnector: Send + Sync + 'static {
    type Room: MediaRoom;

    /// Joins the room the token is scoped to.
    ///
    /// On success, returns the live room handle together with the channel
    /// the room reports lifecycle events on.
    fn connect(
        &self,
        url: &str,
        token: &str,
    ) -> impl std::future::Future<Output = Result<(Self::Room, mpsc::Receiver<RoomEvent>), ClientError>>
           + Send;
}
