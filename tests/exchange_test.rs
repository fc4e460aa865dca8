use std::{collections::HashMap, net::SocketAddr, sync::Arc, time::Duration};

use axum::{
    Form, Json, Router,
    extract::Query,
    http::{HeaderMap, StatusCode},
    routing::{get, post},
};
use base64::{Engine, engine::general_purpose::STANDARD};
use serde_json::{Value, json};
use spotlyr::{
    api::CallbackState,
    error::ExchangeError,
    exchange::{HttpTokenExchange, TokenExchange},
    lyrics::{LYRICS_NOT_FOUND, LYRICS_UNAVAILABLE, LyricsClient},
    management::*,
    server,
    spotify::auth::ProviderClient,
    types::{SessionState, TokenPair},
};
use tokio::net::TcpListener;

const CLIENT_ID: &str = "test-client";
const CLIENT_SECRET: &str = "test-secret";

async fn spawn(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

// Stand-in for the Spotify accounts token endpoint: accepts the code "good"
// and the refresh token "r1", and checks the client credentials.
async fn fake_token_endpoint(
    headers: HeaderMap,
    Form(form): Form<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    let expected = format!("Basic {}", STANDARD.encode(format!("{CLIENT_ID}:{CLIENT_SECRET}")));
    let authorized = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == expected);
    if !authorized {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "invalid_client" })),
        );
    }

    let grant = form.get("grant_type").map(String::as_str);
    match grant {
        Some("authorization_code") if form.get("code").map(String::as_str) == Some("good") => (
            StatusCode::OK,
            Json(json!({
                "access_token": "a1",
                "token_type": "Bearer",
                "scope": "streaming",
                "expires_in": 3600,
                "refresh_token": "r1"
            })),
        ),
        Some("refresh_token") if form.get("refresh_token").map(String::as_str) == Some("r1") => (
            StatusCode::OK,
            Json(json!({
                "access_token": "a2",
                "token_type": "Bearer",
                "expires_in": 3600,
                "refresh_token": "rotated"
            })),
        ),
        _ => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "invalid_grant" })),
        ),
    }
}

// Stand-in for the lyrics provider search: knows one song, fails for the
// artist "broken".
async fn fake_lyrics_search(
    Query(query): Query<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    let artist = query.get("artist_name").map(String::as_str);
    let track = query.get("track_name").map(String::as_str);
    match (artist, track) {
        (Some("broken"), _) => (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({}))),
        (Some("Daft Punk"), Some("Digital Love")) => (
            StatusCode::OK,
            Json(json!([
                { "plainLyrics": null },
                { "plainLyrics": "Digital Love Lyrics\n[Verse 1]\nLast night I had a dream about you\n" }
            ])),
        ),
        _ => (StatusCode::OK, Json(json!([]))),
    }
}

/// Fake providers plus the real token exchange service in front of them.
async fn spawn_exchange_service() -> SocketAddr {
    let provider_addr = spawn(Router::new().route("/api/token", post(fake_token_endpoint))).await;
    let lyrics_addr = spawn(Router::new().route("/search", get(fake_lyrics_search))).await;
    let provider = ProviderClient::new(
        format!("http://{provider_addr}/api/token"),
        CLIENT_ID,
        CLIENT_SECRET,
        "http://127.0.0.1:8888/callback",
        Duration::from_secs(5),
    )
    .unwrap();
    let lyrics = LyricsClient::new(format!("http://{lyrics_addr}"), Duration::from_secs(5)).unwrap();
    spawn(server::exchange_router(Arc::new(provider), Arc::new(lyrics))).await
}

fn exchange_client(addr: SocketAddr) -> HttpTokenExchange {
    HttpTokenExchange::new(format!("http://{addr}/"), Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_service_login_returns_token_pair() {
    let addr = spawn_exchange_service().await;

    let res = reqwest::Client::new()
        .post(format!("http://{addr}/login"))
        .json(&json!({ "code": "good" }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(
        body,
        json!({ "accessToken": "a1", "refreshToken": "r1", "expiresIn": 3600 })
    );
}

#[tokio::test]
async fn test_service_login_rejects_bad_code_with_400() {
    let addr = spawn_exchange_service().await;

    let res = reqwest::Client::new()
        .post(format!("http://{addr}/login"))
        .json(&json!({ "code": "used-already" }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 400);
}

#[tokio::test]
async fn test_service_refresh_does_not_forward_rotated_token() {
    let addr = spawn_exchange_service().await;

    let res = reqwest::Client::new()
        .post(format!("http://{addr}/refresh"))
        .json(&json!({ "refreshToken": "r1" }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "accessToken": "a2", "expiresIn": 3600 }));
}

#[tokio::test]
async fn test_service_refresh_rejects_revoked_token_with_400() {
    let addr = spawn_exchange_service().await;

    let res = reqwest::Client::new()
        .post(format!("http://{addr}/refresh"))
        .json(&json!({ "refreshToken": "revoked" }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 400);
}

#[tokio::test]
async fn test_service_health() {
    let addr = spawn_exchange_service().await;

    let body: Value = reqwest::get(format!("http://{addr}/health"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "spotlyr");
}

#[tokio::test]
async fn test_http_exchange_client_login_and_refresh() {
    let client = exchange_client(spawn_exchange_service().await);

    let pair = client.login("good").await.unwrap();
    assert_eq!(
        pair,
        TokenPair {
            access_token: "a1".into(),
            refresh_token: "r1".into(),
            expires_in: 3600,
        }
    );

    let refreshed = client.refresh("r1").await.unwrap();
    assert_eq!(refreshed.access_token, "a2");
    assert_eq!(refreshed.expires_in, 3600);
    assert_eq!(refreshed.refresh_token, None);
}

#[tokio::test]
async fn test_http_exchange_client_surfaces_status() {
    let client = exchange_client(spawn_exchange_service().await);

    assert!(matches!(
        client.login("bad").await,
        Err(ExchangeError::Status(400))
    ));
    assert!(matches!(
        client.refresh("revoked").await,
        Err(ExchangeError::Status(400))
    ));
}

#[tokio::test]
async fn test_http_exchange_client_unreachable_service() {
    // bind then drop to get a port nobody listens on
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = exchange_client(addr);
    assert!(matches!(
        client.login("good").await,
        Err(ExchangeError::Http(_))
    ));
}

#[tokio::test]
async fn test_service_lyrics_are_cleaned() {
    let addr = spawn_exchange_service().await;

    let body: Value = reqwest::get(format!(
        "http://{addr}/lyrics?artist=Daft%20Punk&track=Digital%20Love"
    ))
    .await
    .unwrap()
    .json()
    .await
    .unwrap();

    assert_eq!(
        body,
        json!({ "lyrics": "[Verse 1]\nLast night I had a dream about you" })
    );
}

#[tokio::test]
async fn test_service_lyrics_fallbacks() {
    let client = exchange_client(spawn_exchange_service().await);

    assert_eq!(
        client.lyrics("Nobody", "Nothing").await.unwrap(),
        LYRICS_NOT_FOUND
    );
    assert_eq!(
        client.lyrics("broken", "Anything").await.unwrap(),
        LYRICS_UNAVAILABLE
    );
}

#[tokio::test]
async fn test_service_lyrics_requires_artist_and_track() {
    let addr = spawn_exchange_service().await;

    let res = reqwest::get(format!("http://{addr}/lyrics?artist=Daft%20Punk"))
        .await
        .unwrap();

    assert_eq!(res.status(), 400);
}

struct SilentEntry;

impl EntryPoint for SilentEntry {
    fn redirect(&self, _cause: &ExitCause) {}
}

async fn spawn_callback(session: SessionManager) -> SocketAddr {
    let state = Arc::new(CallbackState {
        expected_state: "xyz".into(),
        session,
    });
    spawn(server::callback_router(state)).await
}

#[tokio::test]
async fn test_callback_exchanges_code_through_service() {
    let service = spawn_exchange_service().await;
    let store = Arc::new(MemoryCredentialStore::new());
    let session = SessionManager::new(
        Arc::new(exchange_client(service)),
        store.clone(),
        Arc::new(SilentEntry),
    );
    let callback = spawn_callback(session.clone()).await;

    let res = reqwest::get(format!("http://{callback}/callback?code=good&state=xyz"))
        .await
        .unwrap();
    assert_eq!(res.status(), 200);

    assert_eq!(session.state(), SessionState::Authenticated);
    assert_eq!(session.access_token().as_deref(), Some("a1"));
    let stored = store.snapshot().await;
    assert_eq!(stored.get(REFRESH_TOKEN_KEY).map(String::as_str), Some("r1"));

    // a repeated redirect is absorbed
    let again = reqwest::get(format!("http://{callback}/callback?code=good&state=xyz"))
        .await
        .unwrap();
    assert_eq!(again.status(), 200);
    assert_eq!(session.access_token().as_deref(), Some("a1"));
    session.shutdown().await;
}

#[tokio::test]
async fn test_callback_rejects_state_mismatch_and_missing_code() {
    let service = spawn_exchange_service().await;
    let session = SessionManager::new(
        Arc::new(exchange_client(service)),
        Arc::new(MemoryCredentialStore::new()),
        Arc::new(SilentEntry),
    );
    let callback = spawn_callback(session.clone()).await;

    let forged = reqwest::get(format!("http://{callback}/callback?code=good&state=other"))
        .await
        .unwrap();
    assert_eq!(forged.status(), 400);

    let missing = reqwest::get(format!("http://{callback}/callback?state=xyz"))
        .await
        .unwrap();
    assert_eq!(missing.status(), 400);

    let denied = reqwest::get(format!(
        "http://{callback}/callback?error=access_denied&state=xyz"
    ))
    .await
    .unwrap();
    assert_eq!(denied.status(), 403);

    assert_eq!(session.state(), SessionState::Unauthenticated);
}

#[tokio::test]
async fn test_callback_with_rejected_code_fails_session() {
    let service = spawn_exchange_service().await;
    let session = SessionManager::new(
        Arc::new(exchange_client(service)),
        Arc::new(MemoryCredentialStore::new()),
        Arc::new(SilentEntry),
    );
    let callback = spawn_callback(session.clone()).await;

    let res = reqwest::get(format!("http://{callback}/callback?code=expired&state=xyz"))
        .await
        .unwrap();

    assert_eq!(res.status(), 400);
    assert_eq!(session.state(), SessionState::Failed);
    assert_eq!(session.access_token(), None);
}
