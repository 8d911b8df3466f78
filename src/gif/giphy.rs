use async_trait::async_trait;
use log::{error, info, warn};
use rand::seq::SliceRandom;
use reqwest::Client as HttpClient;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

use super::{fallback, GifProvider};
use crate::models::Outcome;

const SEARCH_ROUTE: &str = "/v1/gifs/search";
const SEARCH_LIMIT: u32 = 10;
const SEARCH_RATING: &str = "g";
const SEARCH_LANG: &str = "en";
const SEARCH_TIMEOUT: Duration = Duration::from_secs(10);

pub struct GiphyClient {
    http: HttpClient,
    api_key: String,
    base_url: String,
}

const ORIGINAL_URL_POINTER: &str = "/images/original/url";

// Entries stay untyped so one odd result does not spoil the whole page.
#[derive(Deserialize)]
struct SearchResponse {
    data: Vec<Value>,
}

impl GiphyClient {
    pub fn new(api_key: String, base_url: String) -> Result<Self, reqwest::Error> {
        let http = HttpClient::builder()
            .timeout(SEARCH_TIMEOUT)
            .build()?;
        Ok(Self { http, api_key, base_url })
    }

    async fn search(&self, search_term: &str) -> Result<Vec<Value>, reqwest::Error> {
        let url = format!("{}{}", self.base_url.trim_end_matches('/'), SEARCH_ROUTE);
        let limit = SEARCH_LIMIT.to_string();

        let resp = self.http
            .get(&url)
            .query(
                &[
                    ("api_key", self.api_key.as_str()),
                    ("q", search_term),
                    ("limit", limit.as_str()),
                    ("rating", SEARCH_RATING),
                    ("lang", SEARCH_LANG),
                ]
            )
            .send()
            .await?
            .error_for_status()?
            .json::<SearchResponse>()
            .await?;

        Ok(resp.data)
    }
}

fn pick_random(results: &[Value]) -> Option<&Value> {
    results.choose(&mut rand::thread_rng())
}

fn original_url(gif: &Value) -> Option<String> {
    gif.pointer(ORIGINAL_URL_POINTER)
        .and_then(Value::as_str)
        .map(str::to_owned)
}

#[async_trait]
impl GifProvider for GiphyClient {
    async fn fetch_gif(&self, search_term: &str) -> Outcome<String> {
        if search_term.trim().is_empty() {
            warn!("Fetch GIF called with empty search term, using fallback.");
            return fallback();
        }

        match self.search(search_term).await {
            Ok(results) =>
                match pick_random(&results) {
                    Some(gif) =>
                        match original_url(gif) {
                            Some(url) => {
                                info!("Found {} GIFs for '{}'", results.len(), search_term);
                                Outcome::Value(url)
                            }
                            None => {
                                error!(
                                    "Giphy result for '{}' has no original URL, using fallback.",
                                    search_term
                                );
                                fallback()
                            }
                        }
                    None => {
                        warn!("No GIFs found for term: '{}', using fallback.", search_term);
                        fallback()
                    }
                }
            Err(e) if e.is_decode() => {
                error!("Error processing Giphy response: {}", e);
                fallback()
            }
            Err(e) => {
                error!("Giphy API request error: {}", e);
                fallback()
            }
        }
    }
}
