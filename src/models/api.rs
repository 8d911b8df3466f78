use serde::{Serialize, Deserialize};

/// Body of `POST /roast`. `text` stays optional so a missing field is a 400, not a parse error.
#[derive(Deserialize, Debug, Default)]
pub struct RoastRequest {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RoastResponse {
    pub roast: String,
    pub gif: String,
    pub audio: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TranscriptionResponse {
    pub transcription: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ErrorResponse {
    pub error: String,
}
