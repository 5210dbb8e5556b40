//! Synthesis backend trait — engine-agnostic interface to the speech service.
//!
//! The [`SpeechPipeline`](crate::pipeline::SpeechPipeline) operates on a
//! trait object (`Box<dyn SynthesisBackend>`) so that the remote service can
//! be swapped for mocks in tests without touching the pipeline logic.

pub mod remote;

use crate::error::SpeechError;

// ── Shared types ───────────────────────────────────────────────────

/// Transport-encoded audio returned by a synthesis call.
///
/// The payload is Base64 text wrapping raw PCM bytes; it stays opaque until
/// [`decode_segment`](crate::decode::decode_segment) turns it into samples.
#[derive(Debug, Clone)]
pub struct EncodedAudio(String);

impl EncodedAudio {
    /// Wrap a Base64 payload.
    #[must_use]
    pub fn new(payload: impl Into<String>) -> Self {
        Self(payload.into())
    }

    /// Borrow the Base64 text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the payload carries no audio at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// ── Synthesis backend trait ────────────────────────────────────────

/// Backend-agnostic speech synthesis engine.
///
/// Implementations must be `Send + Sync` so the pipeline can hold them
/// across `.await` points. `synthesize` is async (via [`async_trait`])
/// because the production backend is a remote HTTP call.
#[async_trait::async_trait]
pub trait SynthesisBackend: Send + Sync {
    /// Synthesize one text segment to transport-encoded audio.
    ///
    /// # Arguments
    /// * `text` — a single segment (the pipeline handles segmentation).
    /// * `language` — language name or tag forwarded to the service.
    ///
    /// # Errors
    /// [`SpeechError::Synthesis`] when the call fails or returns no payload.
    async fn synthesize(&self, text: &str, language: &str)
    -> Result<EncodedAudio, SpeechError>;

    /// Get the configured voice identifier.
    fn voice(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encoded_audio_reports_emptiness() {
        assert!(EncodedAudio::new("").is_empty());
        assert!(!EncodedAudio::new("AAAA").is_empty());
    }
}
