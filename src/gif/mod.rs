pub mod giphy;

use async_trait::async_trait;

use crate::models::Outcome;

pub use self::giphy::GiphyClient;

/// Returned whenever a search yields nothing usable.
pub const FALLBACK_GIF_URL: &str = "https://media.giphy.com/media/RBeddeaQ5Xo0E/giphy.gif";

#[async_trait]
pub trait GifProvider: Send + Sync {
    /// Never fails: unusable searches resolve to `Outcome::Fallback` with the fallback URL.
    async fn fetch_gif(&self, search_term: &str) -> Outcome<String>;
}

pub(crate) fn fallback() -> Outcome<String> {
    Outcome::Fallback(Some(FALLBACK_GIF_URL.to_string()))
}
