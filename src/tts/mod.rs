pub mod elevenlabs;

use async_trait::async_trait;

use crate::models::Outcome;

pub use self::elevenlabs::{ElevenLabsClient, ElevenLabsConfig};

#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Base64-encoded audio for `text`. Any failure is `Outcome::Fallback(None)`:
    /// the caller proceeds without audio.
    async fn synthesize(&self, text: &str) -> Outcome<String>;
}
