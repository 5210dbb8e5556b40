//! Sequential speech playback pipeline.
//!
//! Turns ordered text segments into continuous audio: each segment is sent
//! to a remote synthesis service, the Base64-wrapped PCM reply is decoded
//! at 24 kHz mono, and the buffers play strictly back-to-back with
//! cooperative, immediate-effect cancellation.
//!
//! The two external collaborators — the synthesis service and the audio
//! output device — sit behind the [`SynthesisBackend`] and
//! [`audio_io::AudioSink`] traits, so the pipeline itself never touches
//! HTTP or hardware directly.

pub mod audio_io;
pub mod audio_thread;
pub mod backend;
pub mod decode;
pub mod error;
pub mod pipeline;
pub mod playback;
pub mod segment;
pub mod service;

// Re-export key types for convenience
pub use audio_thread::LocalAudioSink;
pub use backend::remote::{RemoteSynthConfig, RemoteSynthesizer};
pub use backend::{EncodedAudio, SynthesisBackend};
pub use decode::{SAMPLE_RATE, SpeechAudio};
pub use error::SpeechError;
pub use pipeline::{SpeechEvent, SpeechPipeline, SpeechPipelineConfig, SpeechState};
pub use service::SpeechService;
