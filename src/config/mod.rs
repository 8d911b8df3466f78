pub mod persona;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} is missing or empty; set it in the environment or .env file")]
    MissingApiKey(&'static str),
    #[error("Both --tls-cert-path and --tls-key-path must be provided to enable TLS")]
    IncompleteTls,
    #[error("Unsupported whisper device '{0}' (expected auto, cpu or gpu)")]
    InvalidDevice(String),
    #[error("Failed to read persona file '{path}': {source}")]
    PersonaIo {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse persona file '{path}': {source}")]
    PersonaJson {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Persona file '{0}' has an empty system_prompt")]
    EmptyPersona(String),
}
