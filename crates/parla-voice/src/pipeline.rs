//! Speech pipeline orchestrator — sequential synthesis and playback.
//!
//! The pipeline turns an ordered list of text segments into continuous
//! audio output, one segment at a time:
//!
//! ```text
//!   Idle → Synthesizing → Playing → Synthesizing → … → Idle
//!            │                │
//!            └── stop/error ──┴──────────────────────→ Idle
//! ```
//!
//! Ordering guarantee: segment *N+1* is never submitted for synthesis
//! before segment *N* has finished playing — no prefetch, at most one
//! synthesis call in flight. Cancellation is cooperative and immediate:
//! [`stop`](SpeechPipeline::stop) is checked at the top of every step and
//! interrupts both suspension points (awaiting synthesis, awaiting playback
//! completion), discarding any in-flight result.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot, watch};

use crate::audio_io::AudioSink;
use crate::backend::SynthesisBackend;
use crate::decode;
use crate::error::SpeechError;

// ── Speech state machine ───────────────────────────────────────────

/// Current state of the speech pipeline.
///
/// The transient "stopping" phase collapses to `Idle` immediately, so it is
/// not a distinct variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeechState {
    /// No playback session active.
    Idle,

    /// Awaiting remote audio for the current segment.
    Synthesizing,

    /// The output resource is actively producing sound.
    Playing,
}

// ── Events emitted by the pipeline ─────────────────────────────────

/// Events emitted by the speech pipeline to the application layer.
#[derive(Debug, Clone)]
pub enum SpeechEvent {
    /// Pipeline state changed.
    StateChanged(SpeechState),

    /// A playback session started.
    SpeakingStarted,

    /// The playback session ended (natural completion, stop, or error).
    SpeakingFinished,

    /// An error aborted the session.
    Error(String),
}

// ── Pipeline configuration ─────────────────────────────────────────

/// Configuration for the speech pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeechPipelineConfig {
    /// Output volume (0.0–1.0).
    pub volume: f32,

    /// Playback speed multiplier.
    pub speed: f32,
}

impl Default for SpeechPipelineConfig {
    fn default() -> Self {
        Self {
            volume: 1.0,
            speed: 1.0,
        }
    }
}

// ── Playback session ───────────────────────────────────────────────

/// Per-request state: the segment queue and the session language.
///
/// Created by [`SpeechPipeline::speak`], consumed destructively in FIFO
/// order, and dropped on completion, stop, or error. Nothing about a
/// session outlives the `speak` call that created it.
struct PlaybackSession {
    queue: VecDeque<String>,
    language: String,
}

impl PlaybackSession {
    fn new(segments: Vec<String>, language: &str) -> Self {
        Self {
            queue: segments.into(),
            language: language.to_owned(),
        }
    }
}

// ── Speech pipeline ────────────────────────────────────────────────

/// The speech playback pipeline.
///
/// All methods take `&self`; callers share the pipeline behind an `Arc` so
/// that [`stop`](Self::stop) can interrupt a concurrently awaited
/// [`speak`](Self::speak). Emits [`SpeechEvent`]s via a channel for the
/// application layer to consume.
pub struct SpeechPipeline {
    /// Synthesis service (remote in production, mocked in tests).
    backend: Box<dyn SynthesisBackend>,

    /// Audio output device.
    sink: Box<dyn AudioSink>,

    /// Current state. Std mutex — never held across an `.await` point.
    state: Mutex<SpeechState>,

    /// Whether a playback session is active (the `isSpeaking` observable).
    is_speaking: AtomicBool,

    /// Manual-stop flag, checked at the top of every pipeline step.
    stop_flag: AtomicBool,

    /// Cancel signal waking the session's suspension points. `true` means
    /// "stop requested"; reset to `false` when a new session starts.
    cancel_tx: watch::Sender<bool>,

    /// Event sender channel.
    event_tx: mpsc::UnboundedSender<SpeechEvent>,
}

impl SpeechPipeline {
    /// Create a new pipeline over the given backend and sink.
    ///
    /// Returns the pipeline and a receiver for [`SpeechEvent`]s.
    #[must_use]
    pub fn new(
        backend: Box<dyn SynthesisBackend>,
        sink: Box<dyn AudioSink>,
        config: &SpeechPipelineConfig,
    ) -> (Self, mpsc::UnboundedReceiver<SpeechEvent>) {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (cancel_tx, _) = watch::channel(false);

        sink.set_volume(config.volume);
        sink.set_speed(config.speed);

        let pipeline = Self {
            backend,
            sink,
            state: Mutex::new(SpeechState::Idle),
            is_speaking: AtomicBool::new(false),
            stop_flag: AtomicBool::new(false),
            cancel_tx,
            event_tx,
        };

        (pipeline, event_rx)
    }

    /// Get the current pipeline state.
    #[must_use]
    pub fn state(&self) -> SpeechState {
        *self.state.lock().expect("state lock poisoned")
    }

    /// Check whether a playback session is active.
    #[must_use]
    pub fn is_speaking(&self) -> bool {
        self.is_speaking.load(Ordering::SeqCst)
    }

    /// Get the configured synthesis voice.
    #[must_use]
    pub fn voice(&self) -> &str {
        self.backend.voice()
    }

    // ── Playback ───────────────────────────────────────────────────

    /// Speak the given segments, in order, in the given language.
    ///
    /// Replaces the playback queue, clears the manual-stop flag, and drives
    /// playback strictly FIFO. Resolves once every segment has played, the
    /// session was stopped, or an error aborted it.
    ///
    /// # Errors
    ///
    /// - [`SpeechError::AlreadySpeaking`] if a session is in progress —
    ///   callers must [`stop`](Self::stop) first.
    /// - Any synthesis/decode/output error ends the session immediately;
    ///   remaining segments are not attempted and the error is surfaced
    ///   exactly once (return value and `SpeechEvent::Error`). The pipeline
    ///   remains usable for a subsequent call.
    pub async fn speak(&self, segments: Vec<String>, language: &str) -> Result<(), SpeechError> {
        let segments: Vec<String> = segments
            .into_iter()
            .map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty())
            .collect();
        if segments.is_empty() {
            return Ok(());
        }

        // Claim the single session slot.
        if self
            .is_speaking
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(SpeechError::AlreadySpeaking);
        }

        self.stop_flag.store(false, Ordering::SeqCst);
        let _ = self.cancel_tx.send(false);

        tracing::debug!(
            segments = segments.len(),
            language,
            "Starting playback session"
        );
        self.emit(SpeechEvent::SpeakingStarted);

        let mut session = PlaybackSession::new(segments, language);
        let result = match self.sink.begin_session() {
            Ok(()) => self.run_session(&mut session).await,
            Err(e) => Err(e),
        };

        self.finish_session(result.as_ref().err());
        result
    }

    /// Stop any active playback immediately. Idempotent; safe to call from
    /// any state and any task.
    ///
    /// Sets the manual-stop flag, wakes the session's suspension points,
    /// and halts + releases the output resource. The awaited `speak` call
    /// observes the flag, drops the remaining queue, and returns `Ok`.
    pub fn stop(&self) {
        self.stop_flag.store(true, Ordering::SeqCst);
        let _ = self.cancel_tx.send(true);
        self.sink.stop();
        tracing::debug!("Speech stop requested");
    }

    // ── Internal steps ─────────────────────────────────────────────

    /// Drain the session queue, one segment at a time.
    ///
    /// Each iteration is one `advance` step: check the stop flag, dequeue,
    /// synthesize, decode, play, await completion. Returning `Ok` covers
    /// both natural completion and cooperative stop; the caller cannot
    /// observe which (matching `stop()`'s contract that a stopped session
    /// is not an error).
    async fn run_session(&self, session: &mut PlaybackSession) -> Result<(), SpeechError> {
        let mut cancel_rx = self.cancel_tx.subscribe();

        loop {
            if self.stop_flag.load(Ordering::SeqCst) {
                tracing::debug!("Session terminated by stop request");
                return Ok(());
            }
            let Some(text) = session.queue.pop_front() else {
                tracing::debug!("Session queue drained");
                return Ok(());
            };

            self.set_state(SpeechState::Synthesizing);
            let encoded = tokio::select! {
                biased;
                _ = cancel_rx.wait_for(|stop| *stop) => {
                    // A stop raced the in-flight synthesis; its result (if
                    // it ever resolves) is discarded, never played.
                    tracing::debug!("Synthesis interrupted by stop request");
                    return Ok(());
                }
                result = self.backend.synthesize(&text, &session.language) => result?,
            };

            let audio = decode::decode_segment(&encoded)?;
            tracing::debug!(
                samples = audio.samples.len(),
                duration_ms = audio.duration.as_millis(),
                "Segment decoded"
            );

            self.sink.play(audio.samples, audio.sample_rate)?;
            let (done_tx, done_rx) = oneshot::channel();
            self.sink.on_playback_complete(Box::new(move || {
                let _ = done_tx.send(());
            }));

            self.set_state(SpeechState::Playing);
            tokio::select! {
                biased;
                _ = cancel_rx.wait_for(|stop| *stop) => {
                    tracing::debug!("Playback interrupted by stop request");
                    return Ok(());
                }
                // A dropped (detached) callback also resolves this arm, so a
                // stopped sink can never wedge the session.
                _ = done_rx => {}
            }
        }
    }

    /// Tear down the session on every exit path: release the output
    /// resource, reset the flags, and report the terminal transition.
    fn finish_session(&self, error: Option<&SpeechError>) {
        self.sink.stop();
        self.stop_flag.store(false, Ordering::SeqCst);
        self.is_speaking.store(false, Ordering::SeqCst);

        if let Some(e) = error {
            tracing::warn!(error = %e, "Playback session aborted");
            self.emit(SpeechEvent::Error(e.to_string()));
        }

        self.set_state(SpeechState::Idle);
        self.emit(SpeechEvent::SpeakingFinished);
    }

    // ── Configuration ──────────────────────────────────────────────

    /// Set output volume (0.0 = muted, 1.0 = full).
    pub fn set_volume(&self, volume: f32) {
        self.sink.set_volume(volume);
    }

    /// Set playback speed multiplier (1.0 = normal).
    pub fn set_speed(&self, speed: f32) {
        self.sink.set_speed(speed);
    }

    // ── Internal helpers ───────────────────────────────────────────

    /// Transition to a new state and emit a state-change event.
    fn set_state(&self, new_state: SpeechState) {
        let mut state = self.state.lock().expect("state lock poisoned");
        if *state != new_state {
            tracing::debug!(old = ?*state, new = ?new_state, "Speech state transition");
            *state = new_state;
            drop(state);
            self.emit(SpeechEvent::StateChanged(new_state));
        }
    }

    /// Emit an event (best-effort — if the receiver is dropped, log and
    /// move on).
    fn emit(&self, event: SpeechEvent) {
        if self.event_tx.send(event).is_err() {
            tracing::warn!("Speech event receiver dropped");
        }
    }
}

impl Drop for SpeechPipeline {
    fn drop(&mut self) {
        // Teardown hook: a pipeline dropped mid-playback must not leak the
        // output resource or keep playing.
        self.stop();
    }
}
