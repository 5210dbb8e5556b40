//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces that the core domain expects from
//! infrastructure. They contain no implementation details and use only
//! domain types.
//!
//! # Design Rules
//!
//! - No audio/HTTP types in any signature
//! - Conversion from `parla-voice` native errors happens inside
//!   `parla-voice`, never here — the dependency arrow stays one-way

pub mod event_emitter;
pub mod speech;

pub use event_emitter::{AppEventEmitter, NoopEmitter};
pub use speech::{SpeechPort, SpeechPortError, SpeechStatusDto};
