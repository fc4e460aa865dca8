use std::time::Duration;

use spotlyr::lyrics::clean_lyrics;
use spotlyr::management::{REFRESH_MARGIN_SECS, refresh_delay, restored_refresh_delay};
use spotlyr::spotify::auth::authorize_url;
use spotlyr::types::{Image, Track, TrackAlbum, TrackArtist};
use spotlyr::utils::*;

// Helper function to create a test image
fn image(url: &str, height: Option<u32>) -> Image {
    Image {
        url: url.to_string(),
        height,
        width: height,
    }
}

// Helper function to create a test track
fn track(name: &str, artists: &[&str], images: Vec<Image>) -> Track {
    Track {
        name: name.to_string(),
        uri: format!("spotify:track:{}", name.to_lowercase()),
        artists: artists
            .iter()
            .map(|a| TrackArtist {
                name: a.to_string(),
            })
            .collect(),
        album: TrackAlbum { images },
    }
}

#[test]
fn test_generate_state() {
    let state = generate_state();

    // 32 random bytes, base64url without padding
    assert_eq!(state.len(), 43);
    assert!(
        state
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    );

    // Two generated values should be different
    assert_ne!(state, generate_state());
}

#[test]
fn test_token_fingerprint() {
    let fp = token_fingerprint("BQC-access-token");

    assert_eq!(fp.len(), 12);
    assert!(fp.chars().all(|c| c.is_ascii_hexdigit()));
    // deterministic and does not leak the token
    assert_eq!(fp, token_fingerprint("BQC-access-token"));
    assert_ne!(fp, token_fingerprint("BQC-other-token"));
    assert!(!fp.contains("BQC"));

    // sha256("") starts with e3b0c44298fc
    assert_eq!(token_fingerprint(""), "e3b0c44298fc");
}

#[test]
fn test_refresh_delay_applies_sixty_second_margin() {
    assert_eq!(REFRESH_MARGIN_SECS, 60);
    assert_eq!(refresh_delay(3600), Duration::from_secs(3540));
    assert_eq!(refresh_delay(61), Duration::from_secs(1));
    // short TTLs refresh right away instead of underflowing
    assert_eq!(refresh_delay(60), Duration::ZERO);
    assert_eq!(refresh_delay(10), Duration::ZERO);
}

#[test]
fn test_restored_refresh_delay() {
    let now = 1_700_000_000;

    // without an issue time the TTL is taken at face value
    assert_eq!(
        restored_refresh_delay(3600, None, now),
        Duration::from_secs(3540)
    );
    // issued ten minutes ago
    assert_eq!(
        restored_refresh_delay(3600, Some(now - 600), now),
        Duration::from_secs(2940)
    );
    // exactly at the refresh point
    assert_eq!(
        restored_refresh_delay(3600, Some(now - 3540), now),
        Duration::ZERO
    );
    // expired between runs
    assert_eq!(
        restored_refresh_delay(3600, Some(now - 86_400), now),
        Duration::ZERO
    );
    // a TTL past i64::MAX saturates instead of wrapping into the past
    assert!(restored_refresh_delay(u64::MAX, Some(now), now) > Duration::from_secs(86_400 * 365));
}

#[test]
fn test_smallest_image() {
    let images = vec![
        image("640", Some(640)),
        image("64", Some(64)),
        image("300", Some(300)),
    ];
    assert_eq!(smallest_image(&images).unwrap().url, "64");

    // missing heights fall back to the first image
    let unsized_images = vec![image("first", None), image("second", None)];
    assert_eq!(smallest_image(&unsized_images).unwrap().url, "first");

    assert!(smallest_image(&[]).is_none());
}

#[test]
fn test_to_track_result() {
    let t = track(
        "Digital",
        &["Daft Punk", "Guest"],
        vec![image("big", Some(640)), image("small", Some(64))],
    );

    let result = to_track_result(&t);

    assert_eq!(result.artist, "Daft Punk");
    assert_eq!(result.title, "Digital");
    assert_eq!(result.uri, "spotify:track:digital");
    assert_eq!(result.album_url.as_deref(), Some("small"));

    let bare = to_track_result(&track("Untitled", &[], vec![]));
    assert_eq!(bare.artist, "");
    assert_eq!(bare.album_url, None);
}

#[test]
fn test_format_duration() {
    assert_eq!(format_duration(Duration::from_secs(0)), "0s");
    assert_eq!(format_duration(Duration::from_secs(59)), "59s");
    assert_eq!(format_duration(Duration::from_secs(3540)), "59m 0s");
    assert_eq!(format_duration(Duration::from_secs(3661)), "1h 1m 1s");
}

#[test]
fn test_format_timestamp() {
    assert_eq!(format_timestamp(0), "1970-01-01 00:00:00 UTC");
    assert_eq!(format_timestamp(1_700_000_000), "2023-11-14 22:13:20 UTC");
}

#[test]
fn test_authorize_url() {
    let url = authorize_url(
        "https://accounts.spotify.com/authorize",
        "client-id",
        "http://127.0.0.1:8888/callback",
        "streaming user-read-email",
        "state-123",
    )
    .unwrap();

    assert_eq!(url.host_str(), Some("accounts.spotify.com"));
    assert_eq!(url.path(), "/authorize");

    let query: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    let get = |key: &str| {
        query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    };
    assert_eq!(get("client_id"), Some("client-id"));
    assert_eq!(get("response_type"), Some("code"));
    assert_eq!(get("redirect_uri"), Some("http://127.0.0.1:8888/callback"));
    assert_eq!(get("scope"), Some("streaming user-read-email"));
    assert_eq!(get("state"), Some("state-123"));
}

#[test]
fn test_authorize_url_rejects_invalid_base() {
    assert!(authorize_url("not a url", "id", "uri", "scope", "state").is_err());
}

#[test]
fn test_clean_lyrics() {
    // header text before the first section marker is dropped
    assert_eq!(
        clean_lyrics("12 Contributors Song Lyrics\n[Intro]\nla la\n\n[Chorus]\noh\n"),
        "[Intro]\nla la\n\n[Chorus]\noh"
    );
    // no marker, only trimmed
    assert_eq!(clean_lyrics("  line one\nline two \n"), "line one\nline two");
    // a bracket without its closing half on the same line is not a marker
    assert_eq!(clean_lyrics("a [b\nc] d"), "a [b\nc] d");
    assert_eq!(clean_lyrics("   "), "");
}
