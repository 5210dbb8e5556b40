//! Speech pipeline error types.

/// Errors that can occur in the speech playback pipeline.
///
/// The first three variants form the user-visible taxonomy: synthesis
/// (remote call failed or returned nothing), decode (payload could not be
/// turned into playable audio), and output (audio device unavailable or in
/// an unusable state). Any of them aborts the current playback session;
/// none of them poisons the pipeline for later requests.
#[derive(Debug, thiserror::Error)]
pub enum SpeechError {
    /// Remote synthesis call failed or returned an empty payload.
    #[error("Speech synthesis failed: {0}")]
    Synthesis(String),

    /// Encoded audio could not be decoded into a playable buffer.
    #[error("Audio decode failed: {0}")]
    Decode(String),

    /// Audio output device unavailable or in an unusable state.
    #[error("Audio output failed: {0}")]
    Output(String),

    /// A playback session is already in progress.
    #[error("Speech pipeline is already speaking")]
    AlreadySpeaking,

    /// The dedicated audio thread is no longer running.
    #[error("Audio thread died")]
    AudioThreadDied,
}
