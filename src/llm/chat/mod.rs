pub mod groq;

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

use super::LlmConfig;
use self::groq::GroqChatClient;
use crate::models::chat::ChatMessage;

#[derive(Debug, Clone)]
pub struct CompletionResponse {
    pub response: String,
}

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("Invalid chat client configuration: {0}")]
    Config(String),
    #[error("Chat API request error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Chat API returned no content")]
    EmptyResponse,
}

#[async_trait]
pub trait ChatClient: Send + Sync {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<CompletionResponse, ChatError>;

    fn get_model(&self) -> String;
}

pub fn new_client(config: &LlmConfig) -> Result<Arc<dyn ChatClient>, ChatError> {
    let client: Arc<dyn ChatClient> = Arc::new(GroqChatClient::from_config(config)?);
    Ok(client)
}
