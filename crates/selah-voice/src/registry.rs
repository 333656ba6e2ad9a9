use std::collections::HashMap;
use std::sync::Mutex;

use selah_types::VoiceSession;

/// Storage for active voice sessions, keyed by room name.
///
/// Kept behind a trait so the in-process map can be swapped for a
/// persistent or distributed store without touching the HTTP contract.
pub trait SessionStore: Send + Sync {
    /// Records a session, replacing any previous entry for the same room.
    fn insert(&self, session: VoiceSession);

    /// Looks up the session for a room.
    fn get(&self, room_name: &str) -> Option<VoiceSession>;

    /// Removes and returns the session for a room. Removing an unknown
    /// room is not an error.
    fn remove(&self, room_name: &str) -> Option<VoiceSession>;

    /// Number of sessions currently registered.
    fn active_count(&self) -> usize;
}

/// Process-local session store. Entries do not survive a restart, and no
/// expiry sweep runs: sessions never ended by their client stay registered
/// until process exit.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    // Lock acquisitions are brief HashMap operations that never span
    // `.await` points, so a synchronous mutex is sufficient.
    sessions: Mutex<HashMap<String, VoiceSession>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for InMemorySessionStore {
    fn insert(&self, session: VoiceSession) {
        self.sessions
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(session.room_name.clone(), session);
    }

    fn get(&self, room_name: &str) -> Option<VoiceSession> {
        self.sessions
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(room_name)
            .cloned()
    }

    fn remove(&self, room_name: &str) -> Option<VoiceSession> {
        self.sessions
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(room_name)
    }

    fn active_count(&self) -> usize {
        self.sessions
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use selah_types::Persona;

    #[test]
    fn insert_get_remove_round_trip() {
        let store = InMemorySessionStore::new();
        store.insert(VoiceSession::new("voice-adina-1", Persona::Adina));

        let session = store.get("voice-adina-1").expect("session present");
        assert_eq!(session.persona, Persona::Adina);
        assert!(session.participant_identity.is_none());
        assert_eq!(store.active_count(), 1);

        let removed = store.remove("voice-adina-1").expect("session removed");
        assert_eq!(removed.room_name, "voice-adina-1");
        assert_eq!(store.active_count(), 0);
    }

    #[test]
    fn removing_an_unknown_room_is_a_no_op() {
        let store = InMemorySessionStore::new();
        assert!(store.remove("voice-rafa-42").is_none());
        // Twice, same answer.
        assert!(store.remove("voice-rafa-42").is_none());
    }

    #[test]
    fn insert_replaces_an_existing_entry() {
        let store = InMemorySessionStore::new();
        store.insert(VoiceSession::new("voice-adina-1", Persona::Adina));

        let mut updated = store.get("voice-adina-1").unwrap();
        updated.participant_identity = Some("user-1".to_string());
        store.insert(updated);

        assert_eq!(store.active_count(), 1);
        assert_eq!(
            store.get("voice-adina-1").unwrap().participant_identity,
            Some("user-1".to_string())
        );
    }
}
