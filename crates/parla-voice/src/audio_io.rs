//! `AudioSink` trait abstraction for speech playback output.
//!
//! This trait decouples the [`SpeechPipeline`](crate::pipeline::SpeechPipeline)
//! from any specific audio backend:
//!
//! | Implementor | Where used |
//! |---|---|
//! | [`LocalAudioSink`](crate::audio_thread::LocalAudioSink) | Desktop — rodio playback on a dedicated OS thread |
//! | test mocks | Integration tests — recorded calls, scripted completion |
//!
//! The trait is **object-safe** (`Box<dyn AudioSink>`). All methods take
//! `&self`; interior mutability (channels, atomic flags) handles state
//! changes inside each implementation.

use crate::error::SpeechError;

/// Callback invoked when the sink drains naturally.
///
/// Never invoked after [`AudioSink::stop`] — a stop detaches any pending
/// completion callback so it cannot trigger further queue progress.
pub type PlaybackDoneCallback = Box<dyn FnOnce() + Send + 'static>;

/// Abstraction over an audio output device.
///
/// At most one output resource is live per sink; [`begin_session`] acquires
/// or refreshes it and [`stop`] releases it. All acquire/release flows
/// through these two methods.
///
/// [`begin_session`]: AudioSink::begin_session
/// [`stop`]: AudioSink::stop
pub trait AudioSink: Send + Sync {
    /// Acquire a fresh output resource for a playback session.
    ///
    /// Stops and releases any previous resource first, so a suspended or
    /// stale device handle is never reused across sessions.
    fn begin_session(&self) -> Result<(), SpeechError>;

    /// Queue decoded samples on the session's output resource.
    fn play(&self, samples: Vec<f32>, sample_rate: u32) -> Result<(), SpeechError>;

    /// Halt output immediately and release the resource. Idempotent.
    fn stop(&self);

    /// Whether audio is currently audible.
    fn is_playing(&self) -> bool;

    /// Register a one-shot callback fired when all queued audio drains.
    ///
    /// `callback` must be `Send + 'static` because it is dispatched from a
    /// background watcher thread. Implementations drop the callback without
    /// invoking it if playback is stopped before the queue drains.
    fn on_playback_complete(&self, callback: PlaybackDoneCallback);

    /// Set output volume (0.0 = muted, 1.0 = full).
    fn set_volume(&self, volume: f32);

    /// Set playback speed multiplier (1.0 = normal).
    fn set_speed(&self, speed: f32);
}
