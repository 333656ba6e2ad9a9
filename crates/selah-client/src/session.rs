//! The voice session state machine driven by the UI shell.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use selah_types::Persona;
use tokio::sync::{mpsc, watch};
use tracing::{info, warn};

use crate::api::VoiceApi;
use crate::error::ClientError;
use crate::room::{MediaRoom, RoomConnector, RoomEvent};

/// Connection lifecycle phase, as observed by the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionPhase {
    #[default]
    Disconnected,
    Connecting,
    Connected,
}

impl ConnectionPhase {
    fn name(self) -> &'static str {
        match self {
            ConnectionPhase::Disconnected => "disconnected",
            ConnectionPhase::Connecting => "connecting",
            ConnectionPhase::Connected => "connected",
        }
    }
}

/// Snapshot of the client's observable state.
///
/// Published on a watch channel so the UI re-renders on change instead of
/// polling or blocking on operations.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionSnapshot {
    pub phase: ConnectionPhase,
    pub audio_enabled: bool,
    pub last_error: Option<String>,
    /// Name of the room the active session runs in; set while Connected.
    pub room_name: Option<String>,
}

/// State shared between the client and its per-connection event pump.
struct Shared<R> {
    /// Observable state. Critical sections are plain field updates that
    /// never span an `.await` point, so a synchronous mutex is safe and
    /// cheaper than an async one.
    snapshot: Mutex<SessionSnapshot>,
    watch_tx: watch::Sender<SessionSnapshot>,
    /// Bumped by every connect and disconnect. An in-flight connect whose
    /// generation is stale must not publish its result.
    generation: AtomicU64,
    /// The single live room handle, owned exclusively by the client.
    room: tokio::sync::Mutex<Option<R>>,
}

impl<R> Shared<R> {
    fn current(&self) -> SessionSnapshot {
        self.snapshot
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn update(&self, apply: impl FnOnce(&mut SessionSnapshot)) {
        let mut snapshot = self.snapshot.lock().unwrap_or_else(|e| e.into_inner());
        apply(&mut snapshot);
        self.watch_tx.send_replace(snapshot.clone());
    }
}

/// Drives a single voice conversation against the session server and the
/// real-time media service.
///
/// Holds at most one live room connection. A `connect` while a session is
/// already Connecting or Connected is rejected outright rather than queued;
/// callers disconnect first. Nothing is retried automatically: every retry
/// is a fresh user-initiated `connect`.
pub struct SessionClient<C: RoomConnector> {
    api: VoiceApi,
    connector: C,
    participant_identity: String,
    shared: Arc<Shared<C::Room>>,
}

impl<C: RoomConnector> SessionClient<C> {
    pub fn new(api: VoiceApi, connector: C) -> Self {
        let (watch_tx, _) = watch::channel(SessionSnapshot::default());
        Self {
            api,
            connector,
            participant_identity: format!("user-{}", uuid::Uuid::new_v4()),
            shared: Arc::new(Shared {
                snapshot: Mutex::new(SessionSnapshot::default()),
                watch_tx,
                generation: AtomicU64::new(0),
                room: tokio::sync::Mutex::new(None),
            }),
        }
    }

    /// Identity this client joins rooms under.
    pub fn participant_identity(&self) -> &str {
        &self.participant_identity
    }

    /// Current observable state.
    pub fn snapshot(&self) -> SessionSnapshot {
        self.shared.current()
    }

    /// Subscribes to state transitions.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.shared.watch_tx.subscribe()
    }

    /// Starts a session for `persona` and joins its room.
    ///
    /// On any failure the client is back in Disconnected with the error
    /// recorded and no room handle retained.
    pub async fn connect(&self, persona: Persona) -> Result<(), ClientError> {
        let generation = {
            let mut snapshot = self.shared.snapshot.lock().unwrap_or_else(|e| e.into_inner());
            if snapshot.phase != ConnectionPhase::Disconnected {
                return Err(ClientError::InvalidState(format!(
                    "connect requested while {}",
                    snapshot.phase.name()
                )));
            }
            snapshot.phase = ConnectionPhase::Connecting;
            snapshot.audio_enabled = false;
            snapshot.last_error = None;
            snapshot.room_name = None;
            self.shared.watch_tx.send_replace(snapshot.clone());
            // Claim the attempt while still holding the state lock so a
            // racing disconnect cannot slot in between.
            self.shared.generation.fetch_add(1, Ordering::SeqCst) + 1
        };

        match self.establish(persona, generation).await {
            Ok(()) => Ok(()),
            Err(ClientError::Cancelled) => Err(ClientError::Cancelled),
            Err(err) => {
                // A disconnect that raced us already reset the state; only
                // the generation that owns the attempt reports its failure.
                if self.shared.generation.load(Ordering::SeqCst) == generation {
                    let message = err.to_string();
                    self.shared.update(|s| {
                        s.phase = ConnectionPhase::Disconnected;
                        s.audio_enabled = false;
                        s.last_error = Some(message);
                        s.room_name = None;
                    });
                }
                Err(err)
            }
        }
    }

    async fn establish(&self, persona: Persona, generation: u64) -> Result<(), ClientError> {
        let room_name = self.api.start_session(persona).await?;
        let grant = self
            .api
            .issue_token(&room_name, &self.participant_identity)
            .await?;
        let (room, events) = self.connector.connect(&grant.url, &grant.token).await?;

        let mut slot = self.shared.room.lock().await;
        if self.shared.generation.load(Ordering::SeqCst) != generation {
            // A disconnect won the race: close the room we just joined and
            // release the server-side session instead of publishing state.
            drop(slot);
            room.disconnect().await;
            if let Err(e) = self.api.end_session(&room_name).await {
                warn!(room = %room_name, "failed to end superseded session: {e}");
            }
            return Err(ClientError::Cancelled);
        }
        *slot = Some(room);
        drop(slot);

        self.shared.update(|s| {
            s.phase = ConnectionPhase::Connected;
            s.audio_enabled = false;
            s.room_name = Some(room_name.clone());
        });

        tokio::spawn(pump_events(Arc::clone(&self.shared), events, generation));

        info!(room = %room_name, persona = %persona, "voice session connected");
        Ok(())
    }

    /// Flips microphone publication for the connected session.
    ///
    /// Enabling requires the room to accept the local microphone track; a
    /// refusal leaves `audio_enabled` unchanged with the error recorded.
    /// Outside of Connected this fails without touching `audio_enabled`.
    pub async fn toggle_audio(&self) -> Result<bool, ClientError> {
        let target = {
            let snapshot = self.shared.snapshot.lock().unwrap_or_else(|e| e.into_inner());
            if snapshot.phase != ConnectionPhase::Connected {
                let phase = snapshot.phase;
                drop(snapshot);
                return Err(self.record_error(ClientError::InvalidState(format!(
                    "toggle_audio requested while {}",
                    phase.name()
                ))));
            }
            !snapshot.audio_enabled
        };

        let slot = self.shared.room.lock().await;
        let Some(room) = slot.as_ref() else {
            // Phase said Connected but the handle is gone: a drop raced us.
            drop(slot);
            return Err(self.record_error(ClientError::InvalidState(
                "no live room connection".to_string(),
            )));
        };

        match room.set_microphone_enabled(target).await {
            Ok(()) => {
                drop(slot);
                self.shared.update(|s| s.audio_enabled = target);
                Ok(target)
            }
            Err(err) => {
                drop(slot);
                Err(self.record_error(err))
            }
        }
    }

    /// Tears down the current session, if any.
    ///
    /// Safe to call from any phase. Invalidates an in-flight connect,
    /// closes the room, then notifies the server. The notification is
    /// best-effort: a failure is logged and never keeps the client out of
    /// Disconnected.
    pub async fn disconnect(&self) {
        self.shared.generation.fetch_add(1, Ordering::SeqCst);

        let room = self.shared.room.lock().await.take();
        if let Some(room) = room {
            room.disconnect().await;
        }

        let room_name = {
            let mut snapshot = self.shared.snapshot.lock().unwrap_or_else(|e| e.into_inner());
            let room_name = snapshot.room_name.take();
            snapshot.phase = ConnectionPhase::Disconnected;
            snapshot.audio_enabled = false;
            snapshot.last_error = None;
            self.shared.watch_tx.send_replace(snapshot.clone());
            room_name
        };

        if let Some(room_name) = room_name {
            if let Err(e) = self.api.end_session(&room_name).await {
                warn!(room = %room_name, "failed to notify session end: {e}");
            } else {
                info!(room = %room_name, "voice session ended");
            }
        }
    }

    fn record_error(&self, err: ClientError) -> ClientError {
        let message = err.to_string();
        self.shared.update(|s| s.last_error = Some(message));
        err
    }
}

/// Applies room lifecycle events for one connection.
///
/// Generation-guarded: events from a superseded connection are ignored so
/// a reconnect cannot be clobbered by its predecessor's drop notification.
async fn pump_events<R: MediaRoom>(
    shared: Arc<Shared<R>>,
    mut events: mpsc::Receiver<RoomEvent>,
    generation: u64,
) {
    while let Some(event) = events.recv().await {
        match event {
            RoomEvent::Disconnected { reason } => {
                let mut slot = shared.room.lock().await;
                if shared.generation.load(Ordering::SeqCst) != generation {
                    return;
                }
                if let Some(room) = slot.take() {
                    room.disconnect().await;
                }
                drop(slot);

                warn!(reason = %reason, "room connection dropped by server");
                shared.update(|s| {
                    s.phase = ConnectionPhase::Disconnected;
                    s.audio_enabled = false;
                    s.last_error = Some(reason);
                    s.room_name = None;
                });
                return;
            }
        }
    }
}
