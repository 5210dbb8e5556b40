//! Core domain types and port definitions for parla.
//!
//! This crate holds the transport-agnostic surface of the speech playback
//! system: the canonical event union, the event emitter port, and the
//! [`SpeechPort`](ports::speech::SpeechPort) trait that adapters consume.
//! It depends on no audio, HTTP, or runtime crates.

pub mod events;
pub mod ports;

// Re-export commonly used types for convenience
pub use events::AppEvent;
pub use ports::{
    AppEventEmitter, NoopEmitter, SpeechPort, SpeechPortError, SpeechStatusDto,
};
