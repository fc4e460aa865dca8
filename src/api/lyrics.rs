use std::sync::Arc;

use axum::{Extension, Json, extract::Query};

use crate::{
    lyrics::{LYRICS_NOT_FOUND, LYRICS_UNAVAILABLE, LyricsClient},
    types::{LyricsQuery, LyricsResponse},
    warning,
};

/// `GET /lyrics?artist=...&track=...`: lyrics for the playing track.
///
/// Always answers `200` with a displayable text once both parameters are
/// present; a missing parameter is rejected with `400`.
pub async fn lyrics(
    Extension(client): Extension<Arc<LyricsClient>>,
    Query(query): Query<LyricsQuery>,
) -> Json<LyricsResponse> {
    let lyrics = match client.find(&query.artist, &query.track).await {
        Ok(Some(lyrics)) => lyrics,
        Ok(None) => LYRICS_NOT_FOUND.to_string(),
        Err(e) => {
            warning!("Lyrics lookup failed: {}", e);
            LYRICS_UNAVAILABLE.to_string()
        }
    };
    Json(LyricsResponse { lyrics })
}
