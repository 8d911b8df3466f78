pub mod device;
pub mod temp_file;
pub mod whisper_cpp;

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub use self::device::{Device, DevicePreference};
pub use self::temp_file::TempAudioFile;
pub use self::whisper_cpp::{WhisperCppConfig, WhisperCppTranscriber};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcription {
    pub text: String,
}

#[derive(Debug, Error)]
pub enum SttError {
    #[error("Whisper model file not found at '{0}'")]
    ModelNotFound(PathBuf),
    #[error("Speech recognizer not available: {0}")]
    NotAvailable(String),
    #[error("{0}")]
    Failed(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Speech recognition over an audio file on disk.
#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(&self, audio_path: &Path) -> Result<Transcription, SttError>;
}
