//! Shared types for the Selah voice backend.
//!
//! This crate provides the domain types used across all Selah crates:
//! the conversational [`Persona`] set, the [`VoiceSession`] registry entry,
//! and the JSON wire types for the voice HTTP API.
//!
//! No crate in the workspace depends on anything *except* `selah-types`
//! for cross-cutting type definitions. This keeps the dependency graph
//! clean and prevents circular dependencies.

pub mod api;
pub mod persona;
pub mod session;

pub use persona::{ParsePersonaError, Persona};
pub use session::VoiceSession;
