use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    // --- Required API Keys ---
    /// API key for the Groq chat completion API.
    #[arg(long, env = "GROQ_API_KEY", hide_env_values = true)]
    pub groq_api_key: String,

    /// API key for the ElevenLabs text-to-speech API.
    #[arg(long, env = "ELEVEN_API_KEY", hide_env_values = true)]
    pub eleven_api_key: String,

    /// API key for the Giphy search API.
    #[arg(long, env = "GIPHY_API_KEY", hide_env_values = true)]
    pub giphy_api_key: String,

    // --- Chat LLM Args ---
    /// Base URL for the Groq API.
    #[arg(long, env = "CHAT_BASE_URL", default_value = "https://api.groq.com")]
    pub chat_base_url: String,

    /// Model name for chat completion.
    #[arg(long, env = "CHAT_MODEL", default_value = "llama3-70b-8192")]
    pub chat_model: String,

    /// Sampling temperature for chat completion.
    #[arg(long, env = "CHAT_TEMPERATURE", default_value = "1.0")]
    pub chat_temperature: f32,

    /// Maximum number of tokens the chat model may generate.
    #[arg(long, env = "CHAT_MAX_TOKENS", default_value = "250")]
    pub chat_max_tokens: u32,

    /// Optional JSON file overriding the built-in persona prompt.
    #[arg(long, env = "PERSONA_PATH", default_value = "json/persona.json")]
    pub persona_path: String,

    // --- Text-to-Speech Args ---
    /// Base URL for the ElevenLabs API.
    #[arg(long, env = "TTS_BASE_URL", default_value = "https://api.elevenlabs.io")]
    pub tts_base_url: String,

    /// ElevenLabs voice id.
    #[arg(long, env = "TTS_VOICE_ID", default_value = "pNInz6obpgDQGcFmaJgB")]
    pub tts_voice_id: String,

    /// ElevenLabs model id.
    #[arg(long, env = "TTS_MODEL_ID", default_value = "eleven_turbo_v2_5")]
    pub tts_model_id: String,

    /// ElevenLabs output format (codec_samplerate_bitrate).
    #[arg(long, env = "TTS_OUTPUT_FORMAT", default_value = "mp3_22050_32")]
    pub tts_output_format: String,

    // --- GIF Search Args ---
    /// Base URL for the Giphy API.
    #[arg(long, env = "GIF_BASE_URL", default_value = "https://api.giphy.com")]
    pub gif_base_url: String,

    // --- Speech Recognition Args ---
    /// Path or name of the whisper.cpp CLI executable.
    #[arg(long, env = "WHISPER_EXECUTABLE", default_value = "whisper-cli")]
    pub whisper_executable: PathBuf,

    /// Path to the GGML whisper model file.
    #[arg(long, env = "WHISPER_MODEL_PATH", default_value = "models/ggml-base.bin")]
    pub whisper_model_path: PathBuf,

    /// Inference device (auto, cpu, gpu). `auto` uses the GPU when one is detected.
    #[arg(long, env = "WHISPER_DEVICE", default_value = "auto")]
    pub whisper_device: String,

    /// Language hint passed to whisper.cpp.
    #[arg(long, env = "WHISPER_LANGUAGE", default_value = "en")]
    pub whisper_language: String,

    /// Number of threads whisper.cpp may use.
    #[arg(long, env = "WHISPER_THREADS", default_value = "4")]
    pub whisper_threads: u16,

    /// Directory for staging uploaded audio. Defaults to the system temp dir.
    #[arg(long, env = "TEMP_DIR")]
    pub temp_dir: Option<PathBuf>,

    // --- Server Args ---
    /// Host address and port for the server to listen on.
    #[arg(long, env = "SERVER_ADDR", default_value = "0.0.0.0:5000")]
    pub server_addr: String,

    /// Maximum accepted request body size for audio uploads, in bytes.
    #[arg(long, env = "MAX_UPLOAD_BYTES", default_value = "26214400")] // 25 MiB
    pub max_upload_bytes: usize,

    /// Optional path to the TLS certificate file (PEM format). Requires --tls-key-path.
    #[arg(long, env = "TLS_CERT_PATH")]
    pub tls_cert_path: Option<String>,

    /// Optional path to the TLS private key file (PEM format). Requires --tls-cert-path.
    #[arg(long, env = "TLS_KEY_PATH")]
    pub tls_key_path: Option<String>,

    #[arg(long, env = "ENABLE_TLS", default_value = "false")]
    pub enable_tls: bool,
}

impl Args {
    /// Rejects configurations clap accepts but the service cannot run with.
    pub fn validate(&self) -> Result<(), crate::config::ConfigError> {
        use crate::config::ConfigError;

        for (name, value) in [
            ("GROQ_API_KEY", &self.groq_api_key),
            ("ELEVEN_API_KEY", &self.eleven_api_key),
            ("GIPHY_API_KEY", &self.giphy_api_key),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::MissingApiKey(name));
            }
        }
        if self.enable_tls && (self.tls_cert_path.is_none() || self.tls_key_path.is_none()) {
            return Err(ConfigError::IncompleteTls);
        }
        Ok(())
    }
}
