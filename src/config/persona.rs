use serde::Deserialize;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use log::{info, warn};

use super::ConfigError;

pub const DEFAULT_SYSTEM_PROMPT: &str =
    "You are a very happy, slightly clueless, and extremely enthusiastic Golden Retriever. \
You love everyone and everything! You try your best to understand, but sometimes you get things adorably wrong. \
Respond with pure joy and perhaps a bit of silly confusion. \
Always end your response with 'GIF:' followed by a 2-3 word search term for a happy or playful GIF (like 'dog wagging tail' or 'happy dance').";

/// The instruction that conditions the chat model's tone.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Persona {
    pub system_prompt: String,
}

impl Default for Persona {
    fn default() -> Self {
        Self { system_prompt: DEFAULT_SYSTEM_PROMPT.to_string() }
    }
}

/// Loads the persona override at `path`, or the built-in persona when no file exists.
pub fn load_persona<P: AsRef<Path>>(path: P) -> Result<Persona, ConfigError> {
    let path = path.as_ref();
    let display = path.display().to_string();

    let file_content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            info!("No persona file at '{}', using built-in persona", display);
            return Ok(Persona::default());
        }
        Err(source) => {
            return Err(ConfigError::PersonaIo { path: display, source });
        }
    };

    let persona: Persona = serde_json
        ::from_str(&file_content)
        .map_err(|source| ConfigError::PersonaJson { path: display.clone(), source })?;

    if persona.system_prompt.trim().is_empty() {
        return Err(ConfigError::EmptyPersona(display));
    }
    if !persona.system_prompt.contains(crate::roast::GIF_MARKER) {
        warn!(
            "Persona in '{}' never mentions '{}'; every reply will use the default GIF phrase",
            display,
            crate::roast::GIF_MARKER
        );
    }

    info!("Loaded persona from '{}'", display);
    Ok(persona)
}
