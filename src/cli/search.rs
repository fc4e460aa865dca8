use tabled::Table;

use crate::{config, error, spotify, types::TrackTableRow, warning};

pub async fn search(query: String, limit: u32) {
    let session = match super::open_session() {
        Ok(session) => session,
        Err(e) => error!("Cannot set up session: {}", e),
    };

    let token = match super::restored_token(&session).await {
        Ok(token) => token,
        Err(e) => error!("{}", e),
    };

    let pb = super::spinner("Searching tracks...");
    let result = spotify::search::search_tracks(&config::spotify_apiurl(), &token, &query, limit).await;
    pb.finish_and_clear();
    session.shutdown().await;

    let tracks = match result {
        Ok(tracks) => tracks,
        Err(e) => error!("Search failed: {}", e),
    };
    if tracks.is_empty() {
        warning!("No tracks found for \"{}\".", query);
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
