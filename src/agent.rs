use crate::cli::Args;
use crate::config::persona::{self, Persona};
use crate::gif::{GifProvider, GiphyClient, FALLBACK_GIF_URL};
use crate::llm::LlmConfig;
use crate::llm::chat::{ChatClient, new_client as new_chat_client};
use crate::models::Outcome;
use crate::models::api::RoastResponse;
use crate::models::chat::ChatMessage;
use crate::roast::split_response;
use crate::stt::{
    Device,
    DevicePreference,
    TempAudioFile,
    Transcriber,
    Transcription,
    WhisperCppConfig,
    WhisperCppTranscriber,
};
use crate::tts::{ElevenLabsClient, ElevenLabsConfig, SpeechSynthesizer};

use log::{info, warn, error};
use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum AgentError {
    #[error("chat completion failed: {0}")]
    ChatFailed(String),
    #[error("transcription service is not loaded")]
    TranscriberUnavailable,
    #[error("{0}")]
    Transcription(String),
}

/// Holds the outbound clients and composes them into the two request pipelines.
#[derive(Clone)]
pub struct PetAgent {
    chat_client: Arc<dyn ChatClient>,
    gif_provider: Arc<dyn GifProvider>,
    synthesizer: Arc<dyn SpeechSynthesizer>,
    transcriber: Option<Arc<dyn Transcriber>>,
    persona: Persona,
    temp_dir: PathBuf,
}

impl PetAgent {
    pub fn new(
        chat_client: Arc<dyn ChatClient>,
        gif_provider: Arc<dyn GifProvider>,
        synthesizer: Arc<dyn SpeechSynthesizer>,
        persona: Persona
    ) -> Self {
        Self {
            chat_client,
            gif_provider,
            synthesizer,
            transcriber: None,
            persona,
            temp_dir: std::env::temp_dir(),
        }
    }

    pub fn with_transcriber(mut self, transcriber: Option<Arc<dyn Transcriber>>) -> Self {
        self.transcriber = transcriber;
        self
    }

    pub fn with_temp_dir(mut self, temp_dir: PathBuf) -> Self {
        self.temp_dir = temp_dir;
        self
    }

    /// Builds every client from configuration. Only the recognizer may fail
    /// softly; it is then left unloaded and transcription reports unavailable.
    pub async fn initialize(args: &Args) -> Result<Self, Box<dyn Error + Send + Sync>> {
        let persona = persona::load_persona(&args.persona_path)?;

        let chat_config = LlmConfig::from_args(args);
        let chat_client = new_chat_client(&chat_config)?;
        info!(
            "Chat client configured: Model={}, BaseURL={}",
            chat_client.get_model(),
            chat_config.base_url
        );

        let gif_provider = Arc::new(
            GiphyClient::new(args.giphy_api_key.clone(), args.gif_base_url.clone())?
        );
        let synthesizer = Arc::new(ElevenLabsClient::new(ElevenLabsConfig::from_args(args))?);

        let preference: DevicePreference = args.whisper_device.parse()?;
        let whisper_config = WhisperCppConfig {
            executable: args.whisper_executable.clone(),
            model_path: args.whisper_model_path.clone(),
            device: Device::select(preference),
            language: args.whisper_language.clone(),
            threads: args.whisper_threads,
        };
        let transcriber: Option<Arc<dyn Transcriber>> = match
            WhisperCppTranscriber::load(whisper_config).await
        {
            Ok(t) => {
                info!("Whisper model loaded successfully.");
                Some(Arc::new(t) as Arc<dyn Transcriber>)
            }
            Err(e) => {
                error!("Failed to load Whisper model: {}", e);
                None
            }
        };

        let temp_dir = args.temp_dir.clone().unwrap_or_else(std::env::temp_dir);

        Ok(
            Self::new(chat_client, gif_provider, synthesizer, persona)
                .with_transcriber(transcriber)
                .with_temp_dir(temp_dir)
        )
    }

    /// Asks the chat model for a persona reply to `user_text`.
    pub async fn respond(&self, user_text: &str) -> Outcome<String> {
        let messages = [
            ChatMessage::system(self.persona.system_prompt.as_str()),
            ChatMessage::user(user_text),
        ];
        match self.chat_client.complete(&messages).await {
            Ok(completion) => Outcome::Value(completion.response),
            Err(e) => {
                error!("Error getting bot response: {}", e);
                Outcome::HardFailure(e.to_string())
            }
        }
    }

    /// Chat, split, GIF, speech, in that order. Only the chat stage can abort.
    pub async fn roast(&self, user_text: &str) -> Result<RoastResponse, AgentError> {
        let raw = match self.respond(user_text).await {
            Outcome::Value(raw) | Outcome::Fallback(Some(raw)) => raw,
            Outcome::Fallback(None) => {
                return Err(AgentError::ChatFailed("no completion".to_string()));
            }
            Outcome::HardFailure(reason) => {
                return Err(AgentError::ChatFailed(reason));
            }
        };

        let split = split_response(&raw);

        let gif = match self.gif_provider.fetch_gif(&split.gif_phrase).await {
            Outcome::Value(url) => url,
            Outcome::Fallback(url) => url.unwrap_or_else(|| FALLBACK_GIF_URL.to_string()),
            Outcome::HardFailure(reason) => {
                warn!("GIF lookup failed ({}), using fallback.", reason);
                FALLBACK_GIF_URL.to_string()
            }
        };

        let speech = self.synthesizer.synthesize(&split.spoken).await;
        match &speech {
            Outcome::Value(_) => {}
            Outcome::Fallback(_) => {
                warn!("Audio generation failed, returning response without audio.");
            }
            Outcome::HardFailure(reason) => {
                warn!("Audio generation failed ({}), returning response without audio.", reason);
            }
        }
        let audio = speech.into_option();

        Ok(RoastResponse { roast: split.spoken, gif, audio })
    }

    pub fn transcription_available(&self) -> bool {
        self.transcriber.is_some()
    }

    /// Stages the upload on disk, runs recognition, and removes the file again.
    pub async fn transcribe_upload(
        &self,
        file_name: &str,
        bytes: &[u8]
    ) -> Result<Transcription, AgentError> {
        let transcriber = self.transcriber.as_ref().ok_or(AgentError::TranscriberUnavailable)?;

        let staged = TempAudioFile::persist(&self.temp_dir, file_name, bytes).await.map_err(|e| {
            error!("Failed to stage uploaded audio: {}", e);
            AgentError::Transcription(e.to_string())
        })?;
        info!("Transcribing audio file: {}", staged.path().display());

        let result = transcriber.transcribe(staged.path()).await;
        drop(staged);

        result.map_err(|e| {
            error!("Error during transcription: {}", e);
            AgentError::Transcription(e.to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roast::DEFAULT_GIF_PHRASE;
    use crate::test_support::{dir_is_empty, FakeGif, FakeTranscriber, FakeTts, Fakes};

    #[tokio::test]
    async fn roast_composes_all_stages() {
        let fakes = Fakes::happy("Woof woof! Treats? GIF: dog zoomies");
        let resp = fakes.agent().roast("hi pup").await.unwrap();

        assert_eq!(resp.roast, "Woof woof! Treats?");
        assert_eq!(resp.gif, "https://gifs.test/dog.gif");
        assert_eq!(resp.audio.as_deref(), Some("QVVESU8="));
        assert_eq!(*fakes.gif.terms.lock().unwrap(), vec!["dog zoomies".to_string()]);
        assert_eq!(*fakes.tts.texts.lock().unwrap(), vec!["Woof woof! Treats?".to_string()]);
    }

    #[tokio::test]
    async fn persona_is_sent_as_system_message() {
        let fakes = Fakes::happy("Bork GIF: ball");
        fakes.agent().roast("who is a good boy").await.unwrap();

        let messages = fakes.chat.last_messages.lock().unwrap().clone();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0], ChatMessage::system(Persona::default().system_prompt));
        assert_eq!(messages[1], ChatMessage::user("who is a good boy"));
    }

    #[tokio::test]
    async fn missing_marker_searches_default_phrase() {
        let fakes = Fakes::happy("I forgot the gif part");
        fakes.agent().roast("hello").await.unwrap();
        assert_eq!(*fakes.gif.terms.lock().unwrap(), vec![DEFAULT_GIF_PHRASE.to_string()]);
    }

    #[tokio::test]
    async fn enrichment_failures_do_not_abort() {
        let mut fakes = Fakes::happy("Woof GIF: tail");
        fakes.gif = FakeGif::returning(Outcome::HardFailure("boom".to_string()));
        fakes.tts = FakeTts::returning(Outcome::Fallback(None));

        let resp = fakes.agent().roast("hello").await.unwrap();
        assert_eq!(resp.gif, FALLBACK_GIF_URL);
        assert_eq!(resp.audio, None);
    }

    #[tokio::test]
    async fn speech_hard_failure_drops_audio_only() {
        let mut fakes = Fakes::happy("Woof GIF: tail");
        fakes.tts = FakeTts::returning(Outcome::HardFailure("quota".to_string()));

        let resp = fakes.agent().roast("hello").await.unwrap();
        assert_eq!(resp.roast, "Woof");
        assert_eq!(resp.gif, "https://gifs.test/dog.gif");
        assert_eq!(resp.audio, None);
    }

    #[tokio::test]
    async fn whitespace_completion_still_roasts() {
        let fakes = Fakes::happy("  \n");
        let resp = fakes.agent().roast("hello").await.unwrap();

        assert_eq!(resp.roast, "");
        assert_eq!(*fakes.gif.terms.lock().unwrap(), vec![DEFAULT_GIF_PHRASE.to_string()]);
    }

    #[tokio::test]
    async fn chat_failure_skips_remaining_stages() {
        let mut fakes = Fakes::happy("");
        fakes.chat = crate::test_support::FakeChat::failing();

        let err = fakes.agent().roast("hello").await.unwrap_err();
        assert!(matches!(err, AgentError::ChatFailed(_)));
        assert_eq!(fakes.gif.calls(), 0);
        assert_eq!(fakes.tts.calls(), 0);
    }

    #[tokio::test]
    async fn transcription_removes_staged_file() {
        let fakes = Fakes::happy("");
        let transcription = fakes.agent().transcribe_upload("clip.webm", b"webm").await.unwrap();
        assert_eq!(transcription.text, "hello doggo");

        let (path, existed) = fakes.transcriber.as_ref().unwrap().seen().unwrap();
        assert!(existed);
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("webm"));
        assert!(!path.exists());
        assert!(dir_is_empty(fakes.temp_dir.path()));
    }

    #[tokio::test]
    async fn failed_transcription_still_removes_staged_file() {
        let mut fakes = Fakes::happy("");
        fakes.transcriber = Some(FakeTranscriber::failing("decoder exploded"));

        let err = fakes.agent().transcribe_upload("clip", b"data").await.unwrap_err();
        assert_eq!(err.to_string(), "decoder exploded");

        let (path, _) = fakes.transcriber.as_ref().unwrap().seen().unwrap();
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("wav"));
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn unloaded_transcriber_is_unavailable() {
        let mut fakes = Fakes::happy("");
        fakes.transcriber = None;
        let agent = fakes.agent();

        assert!(!agent.transcription_available());
        let err = agent.transcribe_upload("clip.wav", b"RIFF").await.unwrap_err();
        assert!(matches!(err, AgentError::TranscriberUnavailable));
        assert!(dir_is_empty(fakes.temp_dir.path()));
    }
}
