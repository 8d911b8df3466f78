use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use futures::StreamExt;
use log::{error, info, warn};
use reqwest::{Client as HttpClient, header::{HeaderMap, HeaderValue}};
use serde::Serialize;
use thiserror::Error;

use super::SpeechSynthesizer;
use crate::cli::Args;
use crate::models::Outcome;

#[derive(Debug, Clone)]
pub struct ElevenLabsConfig {
    pub api_key: String,
    pub base_url: String,
    pub voice_id: String,
    pub model_id: String,
    pub output_format: String,
}

impl ElevenLabsConfig {
    pub fn from_args(args: &Args) -> Self {
        Self {
            api_key: args.eleven_api_key.clone(),
            base_url: args.tts_base_url.clone(),
            voice_id: args.tts_voice_id.clone(),
            model_id: args.tts_model_id.clone(),
            output_format: args.tts_output_format.clone(),
        }
    }
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct VoiceSettings {
    pub stability: f32,
    pub similarity_boost: f32,
    pub style: f32,
    pub use_speaker_boost: bool,
}

/// Voice shaping for the excitable dog persona.
pub const PET_VOICE: VoiceSettings = VoiceSettings {
    stability: 0.3,
    similarity_boost: 0.75,
    style: 0.2,
    use_speaker_boost: true,
};

#[derive(Serialize)]
struct SpeechRequest<'a> {
    text: &'a str,
    model_id: &'a str,
    voice_settings: VoiceSettings,
}

#[derive(Debug, Error)]
enum TtsError {
    #[error("ElevenLabs API error: {0}")]
    Api(#[from] reqwest::Error),
    #[error("ElevenLabs TTS returned no audio data")]
    NoAudio,
}

pub struct ElevenLabsClient {
    http: HttpClient,
    config: ElevenLabsConfig,
}

impl ElevenLabsClient {
    pub fn new(config: ElevenLabsConfig) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "xi-api-key",
            HeaderValue::from_str(&config.api_key).map_err(|e|
                format!("Invalid ElevenLabs API key format: {}", e)
            )?
        );
        let http = HttpClient::builder().default_headers(headers).build()?;
        Ok(Self { http, config })
    }

    async fn convert(&self, text: &str) -> Result<Vec<u8>, TtsError> {
        let url = format!(
            "{}/v1/text-to-speech/{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.voice_id
        );
        let req = SpeechRequest {
            text,
            model_id: &self.config.model_id,
            voice_settings: PET_VOICE,
        };

        let resp = self.http
            .post(&url)
            .query(&[("output_format", self.config.output_format.as_str())])
            .json(&req)
            .send()
            .await?
            .error_for_status()?;

        let mut audio = Vec::new();
        let mut chunks = resp.bytes_stream();
        while let Some(chunk) = chunks.next().await {
            audio.extend_from_slice(&chunk?);
        }

        if audio.is_empty() {
            return Err(TtsError::NoAudio);
        }
        Ok(audio)
    }
}

#[async_trait]
impl SpeechSynthesizer for ElevenLabsClient {
    async fn synthesize(&self, text: &str) -> Outcome<String> {
        if text.is_empty() {
            warn!("TTS called with empty text.");
            return Outcome::Fallback(None);
        }

        match self.convert(text).await {
            Ok(audio) => {
                info!("Synthesized {} bytes of audio", audio.len());
                Outcome::Value(STANDARD.encode(audio))
            }
            Err(e) => {
                error!("{}", e);
                Outcome::Fallback(None)
            }
        }
    }
}
