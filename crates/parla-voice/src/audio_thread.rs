//! Dedicated audio output thread — isolates `!Send` audio resources.
//!
//! `rodio::OutputStream` is `!Send` on some platforms. Rather than using
//! `unsafe impl Send/Sync` anywhere, playback is confined to a single OS
//! thread and every operation is routed through an [`AudioCommand`] channel.
//!
//! [`AudioThreadHandle`] is the `Send + Sync` proxy; [`LocalAudioSink`]
//! wraps it into the [`AudioSink`] trait the pipeline consumes.

use std::sync::mpsc;
use std::thread;

use crate::audio_io::{AudioSink, PlaybackDoneCallback};
use crate::error::SpeechError;
use crate::playback::AudioPlayback;

// ── Commands ───────────────────────────────────────────────────────

/// A command sent from the pipeline to the audio thread.
enum AudioCommand {
    /// Acquire a fresh sink for a playback session.
    BeginSession {
        reply: mpsc::Sender<Result<(), SpeechError>>,
    },

    /// Queue decoded samples on the session sink.
    Play {
        samples: Vec<f32>,
        sample_rate: u32,
        reply: mpsc::Sender<Result<(), SpeechError>>,
    },

    /// Stop playback immediately (fire-and-forget).
    Stop,

    /// Query whether audio is currently playing.
    IsPlaying { reply: mpsc::Sender<bool> },

    /// Register a watcher that fires `callback` when the sink drains.
    OnPlaybackComplete { callback: PlaybackDoneCallback },

    /// Set output volume.
    SetVolume { volume: f32 },

    /// Set playback speed.
    SetSpeed { speed: f32 },

    /// Shut down the audio thread, releasing all resources.
    Shutdown,
}

// ── Handle (Send + Sync proxy) ─────────────────────────────────────

/// `Send + Sync` handle to the dedicated audio output thread.
///
/// All methods take `&self` — the underlying `mpsc::Sender` supports shared
/// access. Request–reply methods block the caller until the audio thread
/// responds; this latency is microseconds of local channel I/O plus the
/// audio operation itself.
pub struct AudioThreadHandle {
    cmd_tx: mpsc::Sender<AudioCommand>,
    thread: Option<thread::JoinHandle<()>>,
}

impl AudioThreadHandle {
    /// Spawn the audio thread, initialise playback, and return the handle.
    ///
    /// Errors from [`AudioPlayback::new`] are propagated back to the caller
    /// via a one-shot init channel.
    pub fn spawn() -> Result<Self, SpeechError> {
        let (cmd_tx, cmd_rx) = mpsc::channel::<AudioCommand>();
        let (init_tx, init_rx) = mpsc::channel::<Result<(), SpeechError>>();

        let thread = thread::Builder::new()
            .name("parla-audio".into())
            .spawn(move || {
                Self::run(cmd_rx, &init_tx);
            })
            .map_err(|e| SpeechError::Output(format!("failed to spawn audio thread: {e}")))?;

        // Wait for the audio thread to finish initialisation.
        init_rx.recv().map_err(|_| SpeechError::AudioThreadDied)??;

        Ok(Self {
            cmd_tx,
            thread: Some(thread),
        })
    }

    /// Acquire a fresh sink for a playback session.
    pub fn begin_session(&self) -> Result<(), SpeechError> {
        self.send_and_recv(|reply| AudioCommand::BeginSession { reply })
    }

    /// Queue decoded samples on the session sink.
    pub fn play(&self, samples: Vec<f32>, sample_rate: u32) -> Result<(), SpeechError> {
        self.send_and_recv(|reply| AudioCommand::Play {
            samples,
            sample_rate,
            reply,
        })
    }

    /// Stop playback immediately (fire-and-forget).
    pub fn stop(&self) {
        let _ = self.cmd_tx.send(AudioCommand::Stop);
    }

    /// Check whether audio is currently playing.
    pub fn is_playing(&self) -> bool {
        self.query(|reply| AudioCommand::IsPlaying { reply })
            .unwrap_or(false)
    }

    /// Register a watcher that fires `callback` when the sink drains.
    pub fn on_playback_complete(&self, callback: PlaybackDoneCallback) {
        let _ = self
            .cmd_tx
            .send(AudioCommand::OnPlaybackComplete { callback });
    }

    /// Set output volume (fire-and-forget).
    pub fn set_volume(&self, volume: f32) {
        let _ = self.cmd_tx.send(AudioCommand::SetVolume { volume });
    }

    /// Set playback speed (fire-and-forget).
    pub fn set_speed(&self, speed: f32) {
        let _ = self.cmd_tx.send(AudioCommand::SetSpeed { speed });
    }

    // ── Internal helpers ───────────────────────────────────────────

    /// Send a command that expects a `Result<T, SpeechError>` reply and
    /// block until the audio thread responds. Channel failures map to
    /// [`SpeechError::AudioThreadDied`].
    fn send_and_recv<T>(
        &self,
        build: impl FnOnce(mpsc::Sender<Result<T, SpeechError>>) -> AudioCommand,
    ) -> Result<T, SpeechError> {
        let (tx, rx) = mpsc::channel();
        self.cmd_tx
            .send(build(tx))
            .map_err(|_| SpeechError::AudioThreadDied)?;
        rx.recv().map_err(|_| SpeechError::AudioThreadDied)?
    }

    /// Like `send_and_recv` but for queries returning a bare value.
    /// Returns `None` if the thread is dead.
    fn query<T>(&self, build: impl FnOnce(mpsc::Sender<T>) -> AudioCommand) -> Option<T> {
        let (tx, rx) = mpsc::channel();
        self.cmd_tx.send(build(tx)).ok()?;
        rx.recv().ok()
    }

    // ── Audio thread event loop ────────────────────────────────────

    /// Body of the dedicated audio thread. Owns [`AudioPlayback`] for its
    /// entire lifetime — it never crosses a thread boundary.
    fn run(cmd_rx: mpsc::Receiver<AudioCommand>, init_tx: &mpsc::Sender<Result<(), SpeechError>>) {
        let mut playback = match AudioPlayback::new() {
            Ok(p) => p,
            Err(e) => {
                let _ = init_tx.send(Err(e));
                return;
            }
        };

        if init_tx.send(Ok(())).is_err() {
            // Caller dropped — nothing to do.
            return;
        }

        while let Ok(cmd) = cmd_rx.recv() {
            match cmd {
                AudioCommand::BeginSession { reply } => {
                    let _ = reply.send(playback.begin_session());
                }

                AudioCommand::Play {
                    samples,
                    sample_rate,
                    reply,
                } => {
                    let _ = reply.send(playback.play(samples, sample_rate));
                }

                AudioCommand::Stop => {
                    playback.stop();
                }

                AudioCommand::IsPlaying { reply } => {
                    let _ = reply.send(playback.is_playing());
                }

                AudioCommand::OnPlaybackComplete { callback } => {
                    playback.on_playback_complete(callback);
                }

                AudioCommand::SetVolume { volume } => {
                    playback.set_volume(volume);
                }

                AudioCommand::SetSpeed { speed } => {
                    playback.set_speed(speed);
                }

                AudioCommand::Shutdown => break,
            }
        }

        // `playback` is dropped here, on the audio thread.
        tracing::debug!("Audio thread shutting down");
    }
}

impl Drop for AudioThreadHandle {
    fn drop(&mut self) {
        // Best-effort shutdown — the thread may already be dead.
        let _ = self.cmd_tx.send(AudioCommand::Shutdown);
        if let Some(handle) = self.thread.take() {
            let _ = handle.join();
        }
    }
}

// ── AudioSink adapter ──────────────────────────────────────────────

/// [`AudioSink`] implementation backed by the dedicated audio thread.
pub struct LocalAudioSink {
    handle: AudioThreadHandle,
}

impl LocalAudioSink {
    /// Spawn the audio thread and wrap it as a sink.
    pub fn new() -> Result<Self, SpeechError> {
        Ok(Self {
            handle: AudioThreadHandle::spawn()?,
        })
    }
}

impl AudioSink for LocalAudioSink {
    fn begin_session(&self) -> Result<(), SpeechError> {
        self.handle.begin_session()
    }

    fn play(&self, samples: Vec<f32>, sample_rate: u32) -> Result<(), SpeechError> {
        self.handle.play(samples, sample_rate)
    }

    fn stop(&self) {
        self.handle.stop();
    }

    fn is_playing(&self) -> bool {
        self.handle.is_playing()
    }

    fn on_playback_complete(&self, callback: PlaybackDoneCallback) {
        self.handle.on_playback_complete(callback);
    }

    fn set_volume(&self, volume: f32) {
        self.handle.set_volume(volume);
    }

    fn set_speed(&self, speed: f32) {
        self.handle.set_speed(speed);
    }
}
