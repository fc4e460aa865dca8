//! Lyrics lookup behind the token exchange service's `GET /lyrics`.
//!
//! The provider is searched by artist and track name; the first hit with
//! plain lyrics wins. The player never talks to the provider directly.

use std::time::Duration;

use reqwest::Client;

use crate::{config, error::ExchangeError, types::LyricsHit};

pub const LYRICS_NOT_FOUND: &str = "Lyrics not found.";
pub const LYRICS_UNAVAILABLE: &str = "Error fetching lyrics.";

pub struct LyricsClient {
    client: Client,
    base_url: String,
}

impl LyricsClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ExchangeError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Builds the client from `LYRICS_API_URL` and `HTTP_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self, ExchangeError> {
        Self::new(config::lyrics_api_url(), config::http_timeout()?)
    }

    /// Returns the cleaned lyrics of the first matching song, `None` when
    /// the provider knows no lyrics for it.
    pub async fn find(&self, artist: &str, track: &str) -> Result<Option<String>, ExchangeError> {
        let res = self
            .client
            .get(format!("{}/search", self.base_url))
            .query(&[("artist_name", artist), ("track_name", track)])
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            return Err(ExchangeError::Status(status.as_u16()));
        }

        let hits: Vec<LyricsHit> = res.json().await?;
        Ok(hits
            .into_iter()
            .filter_map(|hit| hit.plain_lyrics)
            .map(|raw| clean_lyrics(&raw))
            .find(|lyrics| !lyrics.is_empty()))
    }
}

/// Drops anything before the first `[Section]` marker, then trims.
///
/// Text without a marker is only trimmed.
pub fn clean_lyrics(raw: &str) -> String {
    let start = raw.match_indices('[').map(|(i, _)| i).find(|&i| {
        raw[i..]
            .lines()
            .next()
            .is_some_and(|line| line.contains(']'))
    });
    match start {
        Some(i) => raw[i..].trim().to_string(),
        None => raw.trim().to_string(),
    }
}
