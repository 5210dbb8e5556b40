//! Remote synthesis backend — HTTP adapter for the speech synthesis service.
//!
//! The service is an opaque request/response endpoint: one POST per segment,
//! JSON in, Base64-wrapped PCM out. No batching — each segment is requested
//! independently so the first one can start playing while later segments
//! have not even been submitted yet.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::backend::{EncodedAudio, SynthesisBackend};
use crate::error::SpeechError;

/// Default request timeout for a single synthesis call.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for the remote synthesis service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteSynthConfig {
    /// Endpoint URL of the synthesis service.
    pub endpoint: String,

    /// Optional bearer token sent with each request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Voice identifier forwarded to the service.
    pub voice: String,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for RemoteSynthConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            api_key: None,
            voice: "Kore".to_owned(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Request body sent to the synthesis service.
#[derive(Debug, Serialize)]
struct SynthRequest<'a> {
    input: &'a str,
    language: &'a str,
    voice: &'a str,
}

/// Response body returned by the synthesis service.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SynthResponse {
    /// Base64-wrapped PCM audio; absent or empty when synthesis produced
    /// nothing.
    audio_content: Option<String>,
}

/// [`SynthesisBackend`] implementation over HTTP.
pub struct RemoteSynthesizer {
    client: reqwest::Client,
    config: RemoteSynthConfig,
}

impl RemoteSynthesizer {
    /// Build a client for the given service configuration.
    pub fn new(config: RemoteSynthConfig) -> Result<Self, SpeechError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SpeechError::Synthesis(format!("failed to build HTTP client: {e}")))?;

        tracing::info!(endpoint = %config.endpoint, voice = %config.voice, "Remote synthesizer initialized");

        Ok(Self { client, config })
    }
}

#[async_trait::async_trait]
impl SynthesisBackend for RemoteSynthesizer {
    async fn synthesize(
        &self,
        text: &str,
        language: &str,
    ) -> Result<EncodedAudio, SpeechError> {
        let body = SynthRequest {
            input: text,
            language,
            voice: &self.config.voice,
        };

        let mut request = self.client.post(&self.config.endpoint).json(&body);
        if let Some(ref key) = self.config.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| SpeechError::Synthesis(format!("request failed: {e}")))?
            .error_for_status()
            .map_err(|e| SpeechError::Synthesis(format!("service returned error: {e}")))?
            .json::<SynthResponse>()
            .await
            .map_err(|e| SpeechError::Synthesis(format!("malformed response: {e}")))?;

        let payload = response
            .audio_content
            .filter(|content| !content.is_empty())
            .ok_or_else(|| SpeechError::Synthesis("no audio data received".to_owned()))?;

        tracing::debug!(
            text_len = text.len(),
            payload_len = payload.len(),
            "Segment synthesized"
        );

        Ok(EncodedAudio::new(payload))
    }

    fn voice(&self) -> &str {
        &self.config.voice
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_sane_timeout() {
        let config = RemoteSynthConfig::default();
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert!(config.api_key.is_none());
    }

    #[test]
    fn response_parses_audio_content() {
        let response: SynthResponse =
            serde_json::from_str(r#"{"audioContent":"AAAA"}"#).unwrap();
        assert_eq!(response.audio_content.as_deref(), Some("AAAA"));
    }

    #[test]
    fn response_tolerates_missing_payload() {
        let response: SynthResponse = serde_json::from_str("{}").unwrap();
        assert!(response.audio_content.is_none());
    }

    #[test]
    fn synthesizer_exposes_configured_voice() {
        let synth = RemoteSynthesizer::new(RemoteSynthConfig {
            voice: "Puck".to_owned(),
            ..RemoteSynthConfig::default()
        })
        .unwrap();
        assert_eq!(synth.voice(), "Puck");
    }
}
