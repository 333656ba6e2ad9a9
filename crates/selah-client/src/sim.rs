//! Scripted stand-in for the real-time media SDK.
//!
//! In a production build with the `livekit` client crate available, the
//! [`RoomConnector`] seam would wrap a `livekit::Room` and its local audio
//! track. This module mirrors that surface closely enough for the session
//! state machine: join latency, join rejection, microphone denial, and
//! server-initiated drops are all configurable.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::info;

use crate::error::ClientError;
use crate::room::{MediaRoom, RoomConnector, RoomEvent};

/// Capacity of the per-room lifecycle event channel.
const ROOM_EVENT_CAPACITY: usize = 16;

/// Behavior knobs for [`SimConnector`].
#[derive(Debug, Clone, Default)]
pub struct SimBehavior {
    /// Fail every join attempt with this message.
    pub fail_connect: Option<String>,
    /// Artificial delay before a join attempt resolves.
    pub connect_delay: Duration,
    /// Refuse microphone publication.
    pub deny_microphone: bool,
}

/// Connector producing [`SimRoom`]s.
///
/// Clones share the event link of the most recently joined room, so a test
/// can hold one clone and inject drops into the room the client joined
/// through the other.
#[derive(Clone, Default)]
pub struct SimConnector {
    behavior: SimBehavior,
    link: Arc<Mutex<Option<mpsc::Sender<RoomEvent>>>>,
}

impl SimConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_behavior(behavior: SimBehavior) -> Self {
        Self {
            behavior,
            link: Arc::new(Mutex::new(None)),
        }
    }

    /// Simulates the server dropping the most recently joined room.
    pub async fn drop_link(&self, reason: &str) {
        let sender = self
            .link
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone();
        if let Some(tx) = sender {
            let _ = tx
                .send(RoomEvent::Disconnected {
                    reason: reason.to_string(),
                })
                .await;
        }
    }
}

impl RoomConnector for SimConnector {
    type Room = SimRoom;

    async fn connect(
        &self,
        url: &str,
        token: &str,
    ) -> Result<(SimRoom, mpsc::Receiver<RoomEvent>), ClientError> {
        if !self.behavior.connect_delay.is_zero() {
            tokio::time::sleep(self.behavior.connect_delay).await;
        }

        if let Some(reason) = &self.behavior.fail_connect {
            return Err(ClientError::Room(reason.clone()));
        }

        info!(url, token_len = token.len(), "simulated room join");

        let (tx, rx) = mpsc::channel(ROOM_EVENT_CAPACITY);
        *self.link.lock().unwrap_or_else(|e| e.into_inner()) = Some(tx);

        Ok((
            SimRoom {
                connected: AtomicBool::new(true),
                microphone: AtomicBool::new(false),
                deny_microphone: self.behavior.deny_microphone,
            },
            rx,
        ))
    }
}

/// A simulated room connection.
#[derive(Debug)]
pub struct SimRoom {
    connected: AtomicBool,
    microphone: AtomicBool,
    deny_microphone: bool,
}

impl SimRoom {
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    pub fn microphone_enabled(&self) -> bool {
        self.microphone.load(Ordering::SeqCst)
    }
}

impl MediaRoom for SimRoom {
    async fn set_microphone_enabled(&self, enabled: bool) -> Result<(), ClientError> {
        if !self.connected.load(Ordering::SeqCst) {
            return Err(ClientError::Room("room is closed".to_string()));
        }
        if enabled && self.deny_microphone {
            return Err(ClientError::PermissionDenied(
                "microphone access refused".to_string(),
            ));
        }

        self.microphone.store(enabled, Ordering::SeqCst);
        Ok(())
    }

    async fn disconnect(&self) {
        self.microphone.store(false, Ordering::SeqCst);
        self.connected.store(false, Ordering::SeqCst);
    }
}
