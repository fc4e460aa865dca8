use std::time::Duration;

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, Utc};
use rand::RngCore;
use sha2::{Digest, Sha256};

use crate::types::{Image, Track, TrackResult};

/// Generates the opaque `state` value sent with the authorization request.
pub fn generate_state() -> String {
    let mut bytes = [0u8; 32];
    rand::rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Short SHA-256 fingerprint of a token, safe to print.
pub fn token_fingerprint(token: &str) -> String {
    let hash = Sha256::digest(token.as_bytes());
    hash.iter().take(6).map(|b| format!("{b:02x}")).collect()
}

pub fn now_timestamp() -> i64 {
    Utc::now().timestamp()
}

pub fn format_timestamp(timestamp: i64) -> String {
    match DateTime::<Utc>::from_timestamp(timestamp, 0) {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        None => timestamp.to_string(),
    }
}

pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    let (h, m, s) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    if h > 0 {
        format!("{h}h {m}m {s}s")
    } else if m > 0 {
        format!("{m}m {s}s")
    } else {
        format!("{s}s")
    }
}

/// Picks the image with the smallest height, falling back to the first one
/// when heights are missing.
pub fn smallest_image(images: &[Image]) -> Option<&Image> {
    let first = images.first()?;
    Some(images.iter().fold(first, |smallest, image| {
        match (image.height, smallest.height) {
            (Some(h), Some(s)) if h < s => image,
            _ => smallest,
        }
    }))
}

pub fn to_track_result(track: &Track) -> TrackResult {
    TrackResult {
        artist: track
            .artists
            .first()
            .map(|a| a.name.clone())
            .unwrap_or_default(),
        title: track.name.clone(),
        uri: track.uri.clone(),
        album_url: smallest_image(&track.album.images).map(|i| i.url.clone()),
    }
}
