pub mod agent;
pub mod cli;
pub mod config;
pub mod gif;
pub mod llm;
pub mod models;
pub mod roast;
pub mod server;
pub mod stt;
pub mod tts;

#[cfg(test)]
mod test_support;

use agent::PetAgent;
use cli::Args;
use log::info;
use server::Server;
use std::error::Error;
use std::sync::Arc;

pub async fn run(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    args.validate()?;

    info!("--- Core Configuration ---");
    info!("Server Address: {}", args.server_addr);
    info!("Chat Model: {}", args.chat_model);
    info!("Chat Base URL: {}", args.chat_base_url);
    info!("Persona Path: {}", args.persona_path);
    info!("TTS Voice: {} ({})", args.tts_voice_id, args.tts_model_id);
    info!("GIF Base URL: {}", args.gif_base_url);
    info!("Whisper Executable: {}", args.whisper_executable.display());
    info!("Whisper Model: {}", args.whisper_model_path.display());
    info!("Whisper Device: {}", args.whisper_device);
    info!("TLS Enabled: {}", args.enable_tls);
    info!("-------------------------");

    let agent = Arc::new(PetAgent::initialize(&args).await?);
    let addr = args.server_addr.clone();
    info!("Starting server on: {}", addr);
    let server = Server::new(addr, agent, args);
    server.run().await?;

    Ok(())
}
