//! Local speech recognition through the whisper.cpp command line tool.
//!
//! The executable (`whisper-cli` in current whisper.cpp builds) and a GGML
//! model file must be present when the server starts; otherwise transcription
//! is reported as unavailable for the lifetime of the process.

use async_trait::async_trait;
use log::{debug, error, info};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

use super::{Device, SttError, Transcriber, Transcription};

#[derive(Debug, Clone)]
pub struct WhisperCppConfig {
    pub executable: PathBuf,
    pub model_path: PathBuf,
    pub device: Device,
    pub language: String,
    pub threads: u16,
}

#[derive(Debug)]
pub struct WhisperCppTranscriber {
    config: WhisperCppConfig,
}

impl WhisperCppTranscriber {
    /// Checks the model file and executable, so a broken setup is caught at startup.
    pub async fn load(config: WhisperCppConfig) -> Result<Self, SttError> {
        if !config.model_path.is_file() {
            return Err(SttError::ModelNotFound(config.model_path.clone()));
        }

        Command::new(&config.executable)
            .arg("--help")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status().await
            .map_err(|e| {
                if e.kind() == ErrorKind::NotFound {
                    SttError::NotAvailable(
                        format!("whisper.cpp not found at '{}'", config.executable.display())
                    )
                } else {
                    SttError::NotAvailable(
                        format!("failed to run '{}': {}", config.executable.display(), e)
                    )
                }
            })?;

        info!("Using device: {} for Whisper model", config.device);
        Ok(Self { config })
    }

    fn command(&self, audio_path: &Path) -> Command {
        let mut cmd = Command::new(&self.config.executable);
        cmd.arg("-m").arg(&self.config.model_path)
            .arg("-f").arg(audio_path)
            .arg("-l").arg(&self.config.language)
            .arg("-t").arg(self.config.threads.to_string())
            .arg("--no-timestamps")
            .arg("--no-prints");
        if self.config.device == Device::Cpu {
            cmd.arg("--no-gpu");
        }
        cmd.stdin(Stdio::null()).stdout(Stdio::piped()).stderr(Stdio::piped());
        cmd
    }
}

/// whisper.cpp prints one segment per line; the transcript is the segments joined.
fn transcript_from_stdout(stdout: &[u8]) -> String {
    String::from_utf8_lossy(stdout)
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[async_trait]
impl Transcriber for WhisperCppTranscriber {
    async fn transcribe(&self, audio_path: &Path) -> Result<Transcription, SttError> {
        let mut cmd = self.command(audio_path);
        debug!("Running whisper.cpp: {:?}", cmd);

        let output = cmd.output().await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            error!("whisper.cpp failed: {}", stderr.trim());
            return Err(
                SttError::Failed(format!("whisper.cpp exited with {}: {}", output.status, stderr.trim()))
            );
        }

        Ok(Transcription { text: transcript_from_stdout(&output.stdout) })
    }
}
