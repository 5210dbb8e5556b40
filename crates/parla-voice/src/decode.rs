//! Audio decoding — Base64 transport payloads into playable PCM buffers.
//!
//! The synthesis service returns raw 16-bit little-endian PCM wrapped in a
//! Base64 transport encoding. Both steps here are deterministic, pure
//! transformations; failures surface as [`SpeechError::Decode`].

use std::time::Duration;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use crate::backend::EncodedAudio;
use crate::error::SpeechError;

/// Output sample rate of the synthesis service (Hz).
pub const SAMPLE_RATE: u32 = 24_000;

/// Output channel count of the synthesis service (mono).
pub const CHANNELS: u16 = 1;

/// A decoded, playable audio buffer.
#[derive(Debug, Clone)]
pub struct SpeechAudio {
    /// PCM f32 samples in `[-1.0, 1.0]`.
    pub samples: Vec<f32>,

    /// Sample rate of the audio.
    pub sample_rate: u32,

    /// Duration of the audio.
    pub duration: Duration,
}

/// Decode a full synthesis payload into a playable buffer.
pub fn decode_segment(payload: &EncodedAudio) -> Result<SpeechAudio, SpeechError> {
    let bytes = decode_transport(payload.as_str())?;
    decode_pcm(&bytes)
}

/// Strip the Base64 transport encoding, yielding raw PCM bytes.
pub fn decode_transport(payload: &str) -> Result<Vec<u8>, SpeechError> {
    if payload.is_empty() {
        return Err(SpeechError::Decode("empty audio payload".to_owned()));
    }
    STANDARD
        .decode(payload.trim())
        .map_err(|e| SpeechError::Decode(format!("invalid base64 payload: {e}")))
}

/// Convert raw 16-bit LE PCM bytes into f32 samples at the fixed
/// [`SAMPLE_RATE`] / [`CHANNELS`] the synthesis service produces.
pub fn decode_pcm(bytes: &[u8]) -> Result<SpeechAudio, SpeechError> {
    if bytes.is_empty() {
        return Err(SpeechError::Decode("empty PCM buffer".to_owned()));
    }
    if bytes.len() % 2 != 0 {
        return Err(SpeechError::Decode(format!(
            "odd PCM byte count: {}",
            bytes.len()
        )));
    }

    let samples: Vec<f32> = bytes
        .chunks_exact(2)
        .map(|pair| f32::from(i16::from_le_bytes([pair[0], pair[1]])) / 32768.0)
        .collect();

    let duration = Duration::from_secs_f64(samples.len() as f64 / f64::from(SAMPLE_RATE));

    Ok(SpeechAudio {
        samples,
        sample_rate: SAMPLE_RATE,
        duration,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(bytes: &[u8]) -> EncodedAudio {
        EncodedAudio::new(STANDARD.encode(bytes))
    }

    #[test]
    fn decodes_known_samples() {
        // i16 LE: 0, 16384 (0.5), -32768 (-1.0)
        let bytes = [0u8, 0, 0, 64, 0, 128];
        let audio = decode_pcm(&bytes).unwrap();
        assert_eq!(audio.samples.len(), 3);
        assert!((audio.samples[0] - 0.0).abs() < f32::EPSILON);
        assert!((audio.samples[1] - 0.5).abs() < 1e-6);
        assert!((audio.samples[2] + 1.0).abs() < 1e-6);
        assert_eq!(audio.sample_rate, SAMPLE_RATE);
    }

    #[test]
    fn duration_matches_sample_count() {
        // 24 000 samples at 24 kHz mono = exactly one second
        let bytes = vec![0u8; 48_000];
        let audio = decode_pcm(&bytes).unwrap();
        assert_eq!(audio.duration, Duration::from_secs(1));
    }

    #[test]
    fn odd_byte_count_is_a_decode_error() {
        let err = decode_pcm(&[0u8, 0, 0]).unwrap_err();
        assert!(matches!(err, SpeechError::Decode(_)));
    }

    #[test]
    fn empty_payload_is_a_decode_error() {
        assert!(matches!(
            decode_transport("").unwrap_err(),
            SpeechError::Decode(_)
        ));
        assert!(matches!(
            decode_pcm(&[]).unwrap_err(),
            SpeechError::Decode(_)
        ));
    }

    #[test]
    fn invalid_base64_is_a_decode_error() {
        let err = decode_transport("not base64 !!!").unwrap_err();
        assert!(matches!(err, SpeechError::Decode(_)));
    }

    #[test]
    fn full_segment_round_trip() {
        let payload = encode(&[0u8, 0, 255, 127]);
        let audio = decode_segment(&payload).unwrap();
        assert_eq!(audio.samples.len(), 2);
        assert!(audio.samples[1] > 0.99);
    }
}
