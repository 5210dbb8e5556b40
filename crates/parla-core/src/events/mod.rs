//! Canonical event union for all cross-adapter events.
//!
//! This module is the single source of truth for events forwarded to UI
//! listeners (Tauri events, SSE, test collectors).
//!
//! # Wire Format
//!
//! Events are serialized with a `type` tag for TypeScript compatibility:
//!
//! ```json
//! { "type": "speech_state_changed", "state": "synthesizing" }
//! ```

use serde::{Deserialize, Serialize};

/// Canonical event types for all adapters.
///
/// Each variant includes all necessary context for the event to be
/// self-describing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AppEvent {
    /// The speech pipeline moved to a new state.
    SpeechStateChanged {
        /// State machine label (`"idle"`, `"synthesizing"`, `"playing"`).
        state: String,
    },

    /// Audio playback of a speech request has started.
    SpeakingStarted,

    /// Audio playback has finished (natural completion, stop, or error).
    SpeakingFinished,

    /// The speech pipeline surfaced an error.
    SpeechError {
        /// User-visible error description.
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_changed_serializes_with_type_tag() {
        let event = AppEvent::SpeechStateChanged {
            state: "playing".to_owned(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "speech_state_changed");
        assert_eq!(json["state"], "playing");
    }

    #[test]
    fn unit_variants_round_trip() {
        for event in [AppEvent::SpeakingStarted, AppEvent::SpeakingFinished] {
            let json = serde_json::to_string(&event).unwrap();
            let back: AppEvent = serde_json::from_str(&json).unwrap();
            assert_eq!(back, event);
        }
    }
}
