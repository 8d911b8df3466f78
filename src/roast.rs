use log::warn;

/// Separates the spoken reply from the GIF search phrase in model output.
pub const GIF_MARKER: &str = "GIF:";

/// Search phrase used when the model forgot the marker.
pub const DEFAULT_GIF_PHRASE: &str = "happy dog";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitResponse {
    pub spoken: String,
    pub gif_phrase: String,
}

/// Splits raw model output at the first marker. Without a marker the whole
/// text is spoken and the default phrase is used.
pub fn split_response(raw: &str) -> SplitResponse {
    match raw.split_once(GIF_MARKER) {
        Some((spoken, phrase)) => SplitResponse {
            spoken: spoken.trim().to_string(),
            gif_phrase: phrase.trim().to_string(),
        },
        None => {
            warn!("{} marker not found in chat response. Using default GIF prompt.", GIF_MARKER);
            SplitResponse {
                spoken: raw.trim().to_string(),
                gif_phrase: DEFAULT_GIF_PHRASE.to_string(),
            }
        }
    }
}
