use std::{collections::HashMap, net::SocketAddr};

use axum::{
    Json, Router,
    extract::{Path, Query},
    http::{HeaderMap, StatusCode},
    routing::get,
};
use serde_json::{Value, json};
use spotlyr::{error::ExchangeError, spotify::playlists};
use tokio::net::TcpListener;

const TOKEN: &str = "BQC-test";

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {TOKEN}"))
}

fn track(name: &str, artist: &str) -> Value {
    json!({
        "name": name,
        "uri": format!("spotify:track:{}", name.to_lowercase()),
        "artists": [{ "name": artist }],
        "album": { "images": [
            { "url": format!("{name}-640"), "height": 640, "width": 640 },
            { "url": format!("{name}-64"), "height": 64, "width": 64 }
        ]}
    })
}

// Web API stand-in: two pages of playlists, one playlist with a second page
// of tracks and an unavailable track.
async fn spawn_web_api() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    let base = format!("http://{addr}");

    let playlists_base = base.clone();
    let tracks_base = base.clone();
    let app = Router::new()
        .route(
            "/me/playlists",
            get(
                move |headers: HeaderMap, Query(q): Query<HashMap<String, String>>| async move {
                    if !authorized(&headers) {
                        return (StatusCode::UNAUTHORIZED, Json(json!({})));
                    }
                    let page = match q.get("offset").map(String::as_str) {
                        Some("0") | None => json!({
                            "items": [
                                { "id": "p1", "name": "Road trip", "images": [], "tracks": { "total": 3 } },
                                { "id": "p2", "name": "Focus", "images": null, "tracks": { "total": 0 } }
                            ],
                            "next": format!("{playlists_base}/me/playlists?offset=2&limit=2"),
                            "total": 3
                        }),
                        _ => json!({
                            "items": [{ "id": "p3", "name": "Late night" }],
                            "next": null,
                            "total": 3
                        }),
                    };
                    (StatusCode::OK, Json(page))
                },
            ),
        )
        .route(
            "/playlists/{id}",
            get(move |headers: HeaderMap, Path(id): Path<String>| async move {
                if !authorized(&headers) {
                    return (StatusCode::UNAUTHORIZED, Json(json!({})));
                }
                if id != "p1" {
                    return (StatusCode::NOT_FOUND, Json(json!({})));
                }
                (
                    StatusCode::OK,
                    Json(json!({
                        "id": "p1",
                        "name": "Road trip",
                        "tracks": {
                            "items": [
                                { "track": track("Digital", "Daft Punk") },
                                { "track": null }
                            ],
                            "next": format!("{tracks_base}/playlists/p1/tracks?offset=2"),
                            "total": 3
                        }
                    })),
                )
            }),
        )
        .route(
            "/playlists/{id}/tracks",
            get(|headers: HeaderMap| async move {
                if !authorized(&headers) {
                    return (StatusCode::UNAUTHORIZED, Json(json!({})));
                }
                (
                    StatusCode::OK,
                    Json(json!({
                        "items": [{ "track": track("Veridis", "Daft Punk") }],
                        "next": null,
                        "total": 3
                    })),
                )
            }),
        );

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    base
}

#[tokio::test]
async fn test_first_page_returns_next_link() {
    let api = spawn_web_api().await;

    let (items, next) = playlists::get_playlists_page(&api, TOKEN, 2, 0).await.unwrap();

    assert_eq!(items.len(), 2);
    assert_eq!(items[0].id, "p1");
    assert_eq!(items[0].tracks.as_ref().map(|t| t.total), Some(3));
    assert!(next.unwrap().ends_with("/me/playlists?offset=2&limit=2"));
}

#[tokio::test]
async fn test_all_playlists_follow_next_links() {
    let api = spawn_web_api().await;

    let all = playlists::get_all_playlists(&api, TOKEN).await.unwrap();

    let ids: Vec<&str> = all.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, ["p1", "p2", "p3"]);
    assert!(all[2].tracks.is_none());
}

#[tokio::test]
async fn test_playlist_tracks_across_pages_skip_unavailable() {
    let api = spawn_web_api().await;

    let (playlist, tracks) = playlists::get_playlist(&api, TOKEN, "p1").await.unwrap();

    assert_eq!(playlist.name, "Road trip");
    let titles: Vec<&str> = tracks.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, ["Digital", "Veridis"]);
    assert_eq!(tracks[0].artist, "Daft Punk");
    assert_eq!(tracks[0].album_url.as_deref(), Some("Digital-64"));
}

#[tokio::test]
async fn test_rejected_token_and_unknown_playlist_surface_status() {
    let api = spawn_web_api().await;

    assert!(matches!(
        playlists::get_all_playlists(&api, "expired").await,
        Err(ExchangeError::Status(401))
    ));
    assert!(matches!(
        playlists::get_playlist(&api, TOKEN, "missing").await,
        Err(ExchangeError::Status(404))
    ));
}
