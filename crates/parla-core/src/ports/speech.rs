//! Speech pipeline port — trait abstraction for the caller-facing speech API.
//!
//! # Design Rules
//!
//! - DTOs here are transport-agnostic wire shapes (no `parla-voice` types).
//! - Conversion from `parla-voice` native errors happens inside
//!   `parla-voice`, never here. This keeps `parla-core` free of any
//!   dependency on `parla-voice`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ── DTOs ─────────────────────────────────────────────────────────────────────

/// Current status of the speech pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeechStatusDto {
    /// Whether audio is currently being synthesized or played.
    pub is_speaking: bool,
    /// State machine label (`"idle"`, `"synthesizing"`, `"playing"`).
    pub state: String,
    /// Currently configured synthesis voice, if any.
    pub voice: Option<String>,
}

// ── Error ─────────────────────────────────────────────────────────────────────

/// Errors returned by [`SpeechPort`] operations.
///
/// The split between `Synthesis` and `Playback` is deliberate: callers show
/// a "could not fetch/generate audio" message for the former and a generic
/// playback failure for everything else.
#[derive(Debug, Error)]
pub enum SpeechPortError {
    /// A speech request is already in progress; callers must stop it first.
    #[error("Speech playback is already in progress")]
    AlreadySpeaking,

    /// The remote synthesis call failed or returned no audio.
    #[error("Synthesis error: {0}")]
    Synthesis(String),

    /// Decoding or audio output failed.
    #[error("Playback error: {0}")]
    Playback(String),

    /// Unexpected internal error.
    #[error("Internal speech error: {0}")]
    Internal(String),
}

// ── Port trait ────────────────────────────────────────────────────────────────

/// Port trait for speech playback operations.
///
/// Implemented by `SpeechService` in `parla-voice`. Consumed by UI adapters.
///
/// # Scope
///
/// Exactly the caller-facing surface: submit text to be spoken, stop
/// playback, and observe whether the pipeline is speaking. No errors here
/// are fatal — the pipeline remains usable after any failure.
#[async_trait]
pub trait SpeechPort: Send + Sync {
    /// Speak `text` in the given language.
    ///
    /// The text is segmented internally; playback is strictly sequential.
    /// Resolves once playback has finished, was stopped, or failed.
    async fn speak(&self, text: &str, language: &str) -> Result<(), SpeechPortError>;

    /// Stop any active playback immediately. Idempotent.
    async fn stop_speaking(&self) -> Result<(), SpeechPortError>;

    /// Return the current pipeline status.
    async fn status(&self) -> Result<SpeechStatusDto, SpeechPortError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_dto_uses_camel_case() {
        let dto = SpeechStatusDto {
            is_speaking: true,
            state: "playing".to_owned(),
            voice: Some("Kore".to_owned()),
        };
        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(json["isSpeaking"], true);
        assert_eq!(json["state"], "playing");
        assert_eq!(json["voice"], "Kore");
    }

    #[test]
    fn error_messages_distinguish_synthesis_from_playback() {
        let synth = SpeechPortError::Synthesis("timeout".to_owned());
        let play = SpeechPortError::Playback("no device".to_owned());
        assert!(synth.to_string().contains("Synthesis"));
        assert!(play.to_string().contains("Playback"));
    }
}
