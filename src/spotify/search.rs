use reqwest::Client;

use crate::{
    config,
    error::ExchangeError,
    types::{SearchResponse, TrackResult},
    utils,
};

/// Searches tracks with the current access token.
///
/// # Arguments
///
/// * `api_url` - Base URL of the Web API, e.g. `https://api.spotify.com/v1`
/// * `token` - Access token from the session manager
/// * `query` - Free text query
/// * `limit` - Maximum number of tracks (1-50)
///
/// # Errors
///
/// A `401` answer surfaces as `ExchangeError::Status(401)`; the session
/// manager is the only party that renews tokens, so the caller should not
/// retry with the same token.
pub async fn search_tracks(
    api_url: &str,
    token: &str,
    query: &str,
    limit: u32,
) -> Result<Vec<TrackResult>, ExchangeError> {
    let limit = limit.clamp(1, 50).to_string();
    let res = Client::builder()
        .timeout(config::http_timeout()?)
        .build()?
        .get(format!("{}/search", api_url.trim_end_matches('/')))
        .bearer_auth(token)
        .query(&[("q", query), ("type", "track"), ("limit", limit.as_str())])
        .send()
        .await?;

    let status = res.status();
    if !status.is_success() {
        return Err(ExchangeError::Status(status.as_u16()));
    }

    let body: SearchResponse = res.json().await?;
    Ok(body.tracks.items.iter().map(utils::to_track_result).collect())
}
