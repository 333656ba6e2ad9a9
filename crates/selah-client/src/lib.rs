//! Client-side session management for the Selah voice companion.
//!
//! [`SessionClient`] owns the single real-time room connection for a
//! conversation and exposes the three operations the UI shell drives:
//! connect to a persona, toggle the microphone, and disconnect. State is
//! published as snapshots on a watch channel so the UI follows transitions
//! instead of blocking on network calls.
//!
//! The real-time media SDK sits behind the [`RoomConnector`] seam; the
//! crate ships a scripted [`SimConnector`] for tests and local development.

pub mod api;
pub mod error;
pub mod room;
pub mod session;
pub mod sim;

pub use api::VoiceApi;
pub use error::ClientError;
pub use room::{MediaRoom, RoomConnector, RoomEvent};
pub use session::{ConnectionPhase, SessionClient, SessionSnapshot};
pub use sim::{SimBehavior, SimConnector, SimRoom};
