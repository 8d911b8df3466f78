//! Fakes for the injected clients, shared by agent and HTTP tests.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

use crate::agent::PetAgent;
use crate::config::persona::Persona;
use crate::llm::chat::{ChatClient, ChatError, CompletionResponse};
use crate::models::chat::ChatMessage;
use crate::models::Outcome;
use crate::gif::GifProvider;
use crate::stt::{SttError, Transcriber, Transcription};
use crate::tts::SpeechSynthesizer;

pub struct FakeChat {
    reply: Option<String>,
    calls: AtomicUsize,
    pub last_messages: Mutex<Vec<ChatMessage>>,
}

impl FakeChat {
    pub fn replying(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Some(reply.to_string()),
            calls: AtomicUsize::new(0),
            last_messages: Mutex::new(Vec::new()),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self { reply: None, calls: AtomicUsize::new(0), last_messages: Mutex::new(Vec::new()) })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChatClient for FakeChat {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<CompletionResponse, ChatError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_messages.lock().unwrap() = messages.to_vec();
        match &self.reply {
            Some(reply) => Ok(CompletionResponse { response: reply.clone() }),
            None => Err(ChatError::EmptyResponse),
        }
    }

    fn get_model(&self) -> String {
        "fake-model".to_string()
    }
}

pub struct FakeGif {
    outcome: Outcome<String>,
    pub terms: Mutex<Vec<String>>,
}

impl FakeGif {
    pub fn returning(outcome: Outcome<String>) -> Arc<Self> {
        Arc::new(Self { outcome, terms: Mutex::new(Vec::new()) })
    }

    pub fn calls(&self) -> usize {
        self.terms.lock().unwrap().len()
    }
}

#[async_trait]
impl GifProvider for FakeGif {
    async fn fetch_gif(&self, search_term: &str) -> Outcome<String> {
        self.terms.lock().unwrap().push(search_term.to_string());
        self.outcome.clone()
    }
}

pub struct FakeTts {
    outcome: Outcome<String>,
    pub texts: Mutex<Vec<String>>,
}

impl FakeTts {
    pub fn returning(outcome: Outcome<String>) -> Arc<Self> {
        Arc::new(Self { outcome, texts: Mutex::new(Vec::new()) })
    }

    pub fn calls(&self) -> usize {
        self.texts.lock().unwrap().len()
    }
}

#[async_trait]
impl SpeechSynthesizer for FakeTts {
    async fn synthesize(&self, text: &str) -> Outcome<String> {
        self.texts.lock().unwrap().push(text.to_string());
        self.outcome.clone()
    }
}

/// Records the staged path and whether the file was on disk while transcribing.
pub struct FakeTranscriber {
    result: Result<String, String>,
    seen: Mutex<Option<(PathBuf, bool)>>,
}

impl FakeTranscriber {
    pub fn returning(text: &str) -> Arc<Self> {
        Arc::new(Self { result: Ok(text.to_string()), seen: Mutex::new(None) })
    }

    pub fn failing(reason: &str) -> Arc<Self> {
        Arc::new(Self { result: Err(reason.to_string()), seen: Mutex::new(None) })
    }

    pub fn seen(&self) -> Option<(PathBuf, bool)> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transcriber for FakeTranscriber {
    async fn transcribe(&self, audio_path: &Path) -> Result<Transcription, SttError> {
        *self.seen.lock().unwrap() = Some((audio_path.to_path_buf(), audio_path.exists()));
        match &self.result {
            Ok(text) => Ok(Transcription { text: text.clone() }),
            Err(reason) => Err(SttError::Failed(reason.clone())),
        }
    }
}

pub fn dir_is_empty(dir: &Path) -> bool {
    std::fs::read_dir(dir).unwrap().next().is_none()
}

pub struct Fakes {
    pub chat: Arc<FakeChat>,
    pub gif: Arc<FakeGif>,
    pub tts: Arc<FakeTts>,
    pub transcriber: Option<Arc<FakeTranscriber>>,
    /// Fresh, empty directory for staging uploads; removed with the fakes.
    pub temp_dir: TempDir,
}

impl Fakes {
    pub fn happy(reply: &str) -> Self {
        Self {
            chat: FakeChat::replying(reply),
            gif: FakeGif::returning(Outcome::Value("https://gifs.test/dog.gif".to_string())),
            tts: FakeTts::returning(Outcome::Value("QVVESU8=".to_string())),
            transcriber: Some(FakeTranscriber::returning("hello doggo")),
            temp_dir: tempfile::tempdir().unwrap(),
        }
    }

    pub fn agent(&self) -> PetAgent {
        let transcriber = self.transcriber
            .clone()
            .map(|t| t as Arc<dyn Transcriber>);
        PetAgent::new(self.chat.clone(), self.gif.clone(), self.tts.clone(), Persona::default())
            .with_transcriber(transcriber)
            .with_temp_dir(self.temp_dir.path().to_path_buf())
    }
}
