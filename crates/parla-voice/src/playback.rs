//! Audio playback — speech output via `rodio`.
//!
//! Owns the rodio output stream and the per-session sink. Lives on the
//! dedicated audio thread (see [`crate::audio_thread`]) because
//! `rodio::OutputStream` is `!Send` on some platforms.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use rodio::{OutputStream, OutputStreamHandle, Sink};

use crate::audio_io::PlaybackDoneCallback;
use crate::error::SpeechError;

/// Audio playback handle for speech output.
///
/// At most one sink (the session's output resource) is alive at a time;
/// [`begin_session`](Self::begin_session) replaces it and [`stop`](Self::stop)
/// releases it.
pub struct AudioPlayback {
    /// rodio output stream (must be kept alive).
    _stream: OutputStream,

    /// Handle used to create sinks.
    stream_handle: OutputStreamHandle,

    /// Current session sink (if any).
    sink: Option<Arc<Sink>>,

    /// Set by `stop()`; completion watchers for this session check it and
    /// skip their callback, so a stop never triggers queue continuation.
    stopped: Arc<AtomicBool>,

    /// Volume applied to each new session sink.
    volume: f32,

    /// Speed applied to each new session sink.
    speed: f32,
}

impl AudioPlayback {
    /// Create a new playback instance on the default output device.
    pub fn new() -> Result<Self, SpeechError> {
        let (stream, stream_handle) = OutputStream::try_default()
            .map_err(|e| SpeechError::Output(e.to_string()))?;

        tracing::info!("Audio playback initialized on default output device");

        Ok(Self {
            _stream: stream,
            stream_handle,
            sink: None,
            stopped: Arc::new(AtomicBool::new(false)),
            volume: 1.0,
            speed: 1.0,
        })
    }

    /// Acquire a fresh sink for a playback session.
    ///
    /// Any previous session's sink is stopped and released first, so at most
    /// one output resource exists per instance.
    pub fn begin_session(&mut self) -> Result<(), SpeechError> {
        self.stop();

        let sink = Sink::try_new(&self.stream_handle)
            .map_err(|e| SpeechError::Output(e.to_string()))?;
        sink.set_volume(self.volume);
        sink.set_speed(self.speed);

        self.sink = Some(Arc::new(sink));
        // Fresh flag per session: watchers of an older, stopped session keep
        // their own (already true) instance.
        self.stopped = Arc::new(AtomicBool::new(false));

        tracing::debug!("Playback session sink created");
        Ok(())
    }

    /// Queue decoded samples on the current session sink.
    pub fn play(&mut self, samples: Vec<f32>, sample_rate: u32) -> Result<(), SpeechError> {
        let sink = self
            .sink
            .as_ref()
            .ok_or_else(|| SpeechError::Output("no playback session active".to_owned()))?;

        let source = rodio::buffer::SamplesBuffer::new(1, sample_rate, samples);
        sink.append(source);

        tracing::debug!(sample_rate, "Audio queued for playback");
        Ok(())
    }

    /// Spawn a background thread that blocks until the sink drains or
    /// playback is stopped externally. On natural completion, invokes
    /// `on_done`; after a stop, the callback is dropped unfired.
    pub fn on_playback_complete(&self, on_done: PlaybackDoneCallback) {
        let Some(sink) = self.sink.clone() else {
            // No resource — nothing will ever drain. Dropping the callback
            // lets the pipeline's completion future resolve immediately.
            return;
        };

        let stopped = Arc::clone(&self.stopped);

        // `Sink` is Send in rodio 0.20+, so it can move into the watcher
        // thread. `sleep_until_end()` returns when the queue drains or when
        // `stop()` drops the internal sources.
        std::thread::spawn(move || {
            sink.sleep_until_end();

            if stopped.load(Ordering::SeqCst) {
                // stop() detached this watcher — never continue the queue.
                return;
            }

            tracing::debug!("Playback segment finished naturally");
            on_done();
        });
    }

    /// Stop playback immediately and release the session sink. Idempotent.
    pub fn stop(&mut self) {
        self.stopped.store(true, Ordering::SeqCst);
        if let Some(sink) = self.sink.take() {
            sink.stop();
            tracing::debug!("Audio playback stopped");
        }
    }

    /// Check whether audio is currently queued or audible.
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.sink.as_ref().is_some_and(|sink| !sink.empty())
    }

    /// Set playback volume (0.0 = muted, 1.0 = full).
    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
        if let Some(ref sink) = self.sink {
            sink.set_volume(self.volume);
        }
    }

    /// Set playback speed multiplier (1.0 = normal).
    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed.max(0.1);
        if let Some(ref sink) = self.sink {
            sink.set_speed(self.speed);
        }
    }
}
