use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tokio::time::sleep;

use crate::{
    config,
    error::ExchangeError,
    types::{Playlist, PlaylistPage, PlaylistSummary, PlaylistTrackPage, TrackResult},
    utils,
};

const PAGE_LIMIT: u32 = 50;
const BAD_GATEWAY_RETRIES: u32 = 3;

fn client() -> Result<Client, ExchangeError> {
    Ok(Client::builder().timeout(config::http_timeout()?).build()?)
}

/// GETs a Web API resource, retrying a `502 Bad Gateway` a few times with a
/// pause in between. Any other non-2xx answer is returned as
/// `ExchangeError::Status`.
async fn get_json<T: DeserializeOwned>(
    client: &Client,
    url: &str,
    token: &str,
) -> Result<T, ExchangeError> {
    let mut attempt = 0;
    loop {
        let res = client.get(url).bearer_auth(token).send().await?;
        let status = res.status();
        if status == StatusCode::BAD_GATEWAY && attempt < BAD_GATEWAY_RETRIES {
            attempt += 1;
            sleep(Duration::from_secs(2)).await;
            continue;
        }
        if !status.is_success() {
            return Err(ExchangeError::Status(status.as_u16()));
        }
        return Ok(res.json::<T>().await?);
    }
}

/// Retrieves one page of the current user's playlists.
///
/// Returns the playlists and the URL of the next page, if any.
pub async fn get_playlists_page(
    api_url: &str,
    token: &str,
    limit: u32,
    offset: u32,
) -> Result<(Vec<PlaylistSummary>, Option<String>), ExchangeError> {
    let url = format!(
        "{uri}/me/playlists?limit={limit}&offset={offset}",
        uri = api_url.trim_end_matches('/'),
        limit = limit.clamp(1, 50),
    );
    let page: PlaylistPage = get_json(&client()?, &url, token).await?;
    Ok((page.items, page.next))
}

/// Retrieves every playlist of the current user by following `next` links.
pub async fn get_all_playlists(
    api_url: &str,
    token: &str,
) -> Result<Vec<PlaylistSummary>, ExchangeError> {
    let (mut playlists, mut next) = get_playlists_page(api_url, token, PAGE_LIMIT, 0).await?;
    let client = client()?;
    while let Some(url) = next {
        let page: PlaylistPage = get_json(&client, &url, token).await?;
        playlists.extend(page.items);
        next = page.next;
    }
    Ok(playlists)
}

/// Retrieves a playlist and all of its tracks.
///
/// Tracks that are no longer available come back as `null` and are skipped.
pub async fn get_playlist(
    api_url: &str,
    token: &str,
    id: &str,
) -> Result<(Playlist, Vec<TrackResult>), ExchangeError> {
    let client = client()?;
    let url = format!("{}/playlists/{}", api_url.trim_end_matches('/'), id);
    let playlist: Playlist = get_json(&client, &url, token).await?;

    let mut tracks: Vec<TrackResult> = playlist
        .tracks
        .items
        .iter()
        .filter_map(|item| item.track.as_ref())
        .map(utils::to_track_result)
        .collect();

    let mut next = playlist.tracks.next.clone();
    while let Some(url) = next {
        let page: PlaylistTrackPage = get_json(&client, &url, token).await?;
        tracks.extend(
            page.items
                .iter()
                .filter_map(|item| item.track.as_ref())
                .map(utils::to_track_result),
        );
        next = page.next;
    }

    Ok((playlist, tracks))
}
