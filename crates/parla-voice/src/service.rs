//! `SpeechService` — the adapter that implements `SpeechPort`.
//!
//! This module is the single place where `parla-voice` native types are
//! converted to the transport-agnostic DTOs and errors defined in
//! `parla-core`. Nothing outside this file should need `SpeechError` to
//! talk to an adapter.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;

use parla_core::events::AppEvent;
use parla_core::ports::event_emitter::AppEventEmitter;
use parla_core::ports::speech::{SpeechPort, SpeechPortError, SpeechStatusDto};

use crate::audio_io::AudioSink;
use crate::backend::SynthesisBackend;
use crate::error::SpeechError;
use crate::pipeline::{SpeechEvent, SpeechPipeline, SpeechPipelineConfig, SpeechState};
use crate::segment;

// ── Service struct ────────────────────────────────────────────────────────────

/// Implements [`SpeechPort`] by wrapping a shared [`SpeechPipeline`].
///
/// The pipeline sits behind an `Arc` so that `stop_speaking` can interrupt
/// a `speak` call that another task is currently awaiting.
pub struct SpeechService {
    pipeline: Arc<SpeechPipeline>,
}

impl SpeechService {
    /// Create a service over the given backend and sink, bridging pipeline
    /// events to `emitter`.
    pub fn new(
        backend: Box<dyn SynthesisBackend>,
        sink: Box<dyn AudioSink>,
        config: &SpeechPipelineConfig,
        emitter: Arc<dyn AppEventEmitter>,
    ) -> Self {
        let (pipeline, event_rx) = SpeechPipeline::new(backend, sink, config);
        spawn_event_bridge(event_rx, emitter);

        Self {
            pipeline: Arc::new(pipeline),
        }
    }

    /// Shared handle to the underlying pipeline.
    #[must_use]
    pub fn pipeline(&self) -> Arc<SpeechPipeline> {
        Arc::clone(&self.pipeline)
    }
}

// ── Event bridge ─────────────────────────────────────────────────────────────

/// Bridge `SpeechEvent` → `AppEvent`, forwarding each event to `emitter`.
///
/// The spawned task self-terminates when the pipeline's sender is dropped:
/// `recv()` returns `None` and the loop exits.
pub fn spawn_event_bridge(
    mut event_rx: mpsc::UnboundedReceiver<SpeechEvent>,
    emitter: Arc<dyn AppEventEmitter>,
) {
    tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            match event {
                SpeechEvent::StateChanged(state) => {
                    emitter.emit(AppEvent::SpeechStateChanged {
                        state: state_label(state).to_owned(),
                    });
                }
                SpeechEvent::SpeakingStarted => {
                    emitter.emit(AppEvent::SpeakingStarted);
                }
                SpeechEvent::SpeakingFinished => {
                    emitter.emit(AppEvent::SpeakingFinished);
                }
                SpeechEvent::Error(message) => {
                    emitter.emit(AppEvent::SpeechError { message });
                }
            }
        }
        // event_rx returned None: pipeline sender dropped — task exits.
    });
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Convert a `SpeechError` into its closest `SpeechPortError` equivalent.
///
/// This conversion lives here, in `parla-voice`, so that `parla-core`
/// never needs to import `parla-voice`. The dependency arrow stays one-way.
fn to_port_err(e: SpeechError) -> SpeechPortError {
    match e {
        SpeechError::AlreadySpeaking => SpeechPortError::AlreadySpeaking,
        SpeechError::Synthesis(msg) => SpeechPortError::Synthesis(msg),
        SpeechError::Decode(msg) | SpeechError::Output(msg) => SpeechPortError::Playback(msg),
        other @ SpeechError::AudioThreadDied => SpeechPortError::Internal(other.to_string()),
    }
}

const fn state_label(s: SpeechState) -> &'static str {
    match s {
        SpeechState::Idle => "idle",
        SpeechState::Synthesizing => "synthesizing",
        SpeechState::Playing => "playing",
    }
}

// ── SpeechPort implementation ────────────────────────────────────────────────

#[async_trait]
impl SpeechPort for SpeechService {
    async fn speak(&self, text: &str, language: &str) -> Result<(), SpeechPortError> {
        let segments = segment::split_segments(text);
        if segments.is_empty() {
            return Ok(());
        }
        self.pipeline
            .speak(segments, language)
            .await
            .map_err(to_port_err)
    }

    async fn stop_speaking(&self) -> Result<(), SpeechPortError> {
        self.pipeline.stop();
        Ok(())
    }

    async fn status(&self) -> Result<SpeechStatusDto, SpeechPortError> {
        Ok(SpeechStatusDto {
            is_speaking: self.pipeline.is_speaking(),
            state: state_label(self.pipeline.state()).to_owned(),
            voice: Some(self.pipeline.voice().to_owned()),
        })
    }
}
