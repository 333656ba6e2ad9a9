//! LiveKit integration for the Selah voice backend.
//!
//! Issues signed, capability-scoped join tokens for real-time voice rooms,
//! generates per-conversation room names, and tracks active sessions in a
//! pluggable registry. Humans join the room over WebRTC with the minted
//! token; the platform's agent side joins the same room out of band.

pub mod config;
pub mod error;
pub mod registry;
pub mod service;

pub use config::{CredentialPresence, LiveKitConfig};
pub use error::VoiceError;
pub use registry::{InMemorySessionStore, SessionStore};
pub use service::{generate_room_name, VoiceService};
