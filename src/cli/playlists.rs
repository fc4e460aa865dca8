use colored::Colorize;
use tabled::Table;

use crate::{
    config, error, spotify,
    types::{PlaylistTableRow, TrackTableRow},
    warning,
};

/// Lists the user's playlists, or the tracks of one playlist when `id` is
/// given.
pub async fn playlists(id: Option<String>) {
    let session = match super::open_session() {
        Ok(session) => session,
        Err(e) => error!("Cannot set up session: {}", e),
    };

    let token = match super::restored_token(&session).await {
        Ok(token) => token,
        Err(e) => error!("{}", e),
    };

    let api_url = config::spotify_apiurl();
    match id {
        None => {
            let pb = super::spinner("Fetching playlists...");
            let result = spotify::playlists::get_all_playlists(&api_url, &token).await;
            pb.finish_and_clear();
            session.shutdown().await;

            let playlists = match result {
                Ok(playlists) => playlists,
                Err(e) => error!("Could not load playlists: {}", e),
            };
            if playlists.is_empty() {
                warning!("No playlists found. Create some on Spotify!");
                return;
            }

            let rows: Vec<PlaylistTableRow> = playlists
                .into_iter()
                .map(|p| PlaylistTableRow {
                    tracks: p
                        .tracks
                        .map(|t| t.total.to_string())
                        .unwrap_or_default(),
                    id: p.id,
                    name: p.name,
                })
                .collect();
            println!("{}", Table::new(rows));
        }
        Some(id) => {
            let pb = super::spinner("Fetching playlist...");
            let result = spotify::playlists::get_playlist(&api_url, &token, &id).await;
            pb.finish_and_clear();
            session.shutdown().await;

            let (playlist, tracks) = match result {
                Ok(found) => found,
                Err(e) => error!("Could not load playlist {}: {}", id, e),
            };

            println!("{} ({} songs)", playlist.name.bold(), tracks.len());
            if tracks.is_empty() {
                return;
            }
            let rows: Vec<TrackTableRow> = tracks
                .into_iter()
                .map(|t| TrackTableRow {
                    artist: t.artist,
                    title: t.title,
                    uri: t.uri,
                    album_image: t.album_url.unwrap_or_default(),
                })
                .collect();
            println!("{}", Table::new(rows));
        }
    }
}
