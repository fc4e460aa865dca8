//! Configuration management for spotlyr.
//!
//! This module handles loading and accessing configuration values from environment
//! variables and `.env` files. Values are resolved in this order:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults (where applicable)
//!
//! Accessors return a [`ConfigError`] instead of panicking so that the CLI can
//! report which key is missing.

use std::{env, path::PathBuf, time::Duration};

use crate::error::ConfigError;

pub const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_SCOPE: &str = "streaming user-read-email user-read-private user-library-read user-library-modify user-read-playback-state user-modify-playback-state";
pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:8888";
pub const DEFAULT_EXCHANGE_SERVICE_URL: &str = "http://127.0.0.1:3001";
pub const DEFAULT_EXCHANGE_SERVER_ADDRESS: &str = "127.0.0.1:3001";
pub const DEFAULT_LYRICS_API_URL: &str = "https://lrclib.net/api";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_LOGIN_TIMEOUT_SECS: u64 = 120;

/// Returns the application's directory inside the platform local data directory.
///
/// - Linux: `~/.local/share/spotlyr`
/// - macOS: `~/Library/Application Support/spotlyr`
/// - Windows: `%LOCALAPPDATA%/spotlyr`
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("spotlyr");
    path
}

/// Loads environment variables from `spotlyr/.env` in the local data directory.
///
/// Creates the directory if it does not exist. A missing `.env` file is not an
/// error, variables may come from the process environment alone. Variables
/// already present in the environment are not overridden.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or the file exists but
/// cannot be parsed.
pub async fn load_env() -> Result<(), ConfigError> {
    let dir = data_dir();
    async_fs::create_dir_all(&dir)
        .await
        .map_err(|e| ConfigError::EnvFile(e.to_string()))?;

    let path = dir.join(".env");
    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| ConfigError::EnvFile(e.to_string()))?;
    }
    Ok(())
}

fn required(key: &'static str) -> Result<String, ConfigError> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::Missing(key)),
    }
}

fn optional(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn seconds(key: &'static str, default: u64) -> Result<Duration, ConfigError> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => value
            .trim()
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|_| ConfigError::Invalid { key, value }),
        _ => Ok(Duration::from_secs(default)),
    }
}

/// Returns the Spotify application client ID (`SPOTIFY_API_AUTH_CLIENT_ID`).
pub fn spotify_client_id() -> Result<String, ConfigError> {
    required("SPOTIFY_API_AUTH_CLIENT_ID")
}

/// Returns the Spotify client secret (`SPOTIFY_API_AUTH_CLIENT_SECRET`).
///
/// Only the token exchange service reads this. The player client never holds
/// the secret.
pub fn spotify_client_secret() -> Result<String, ConfigError> {
    required("SPOTIFY_API_AUTH_CLIENT_SECRET")
}

/// Returns the OAuth redirect URI (`SPOTIFY_API_REDIRECT_URI`).
///
/// This must match the redirect URI registered in the Spotify application
/// settings and point at the local callback listener.
///
/// # Example
///
/// ```
/// let redirect_uri = spotify_redirect_uri()?; // e.g., "http://127.0.0.1:8888/callback"
/// ```
pub fn spotify_redirect_uri() -> Result<String, ConfigError> {
    required("SPOTIFY_API_REDIRECT_URI")
}

/// Returns the space separated scope set requested at authorization.
pub fn spotify_scope() -> String {
    optional("SPOTIFY_API_AUTH_SCOPE", DEFAULT_SCOPE)
}

pub fn spotify_apiauth_url() -> String {
    optional("SPOTIFY_API_AUTH_URL", DEFAULT_AUTH_URL)
}

pub fn spotify_apitoken_url() -> String {
    optional("SPOTIFY_API_TOKEN_URL", DEFAULT_TOKEN_URL)
}

pub fn spotify_apiurl() -> String {
    optional("SPOTIFY_API_URL", DEFAULT_API_URL)
}

/// Returns the address the redirect callback listener binds to (`SERVER_ADDRESS`).
pub fn server_addr() -> String {
    optional("SERVER_ADDRESS", DEFAULT_SERVER_ADDRESS)
}

/// Returns the base URL of the token exchange service (`EXCHANGE_SERVICE_URL`).
pub fn exchange_service_url() -> String {
    optional("EXCHANGE_SERVICE_URL", DEFAULT_EXCHANGE_SERVICE_URL)
}

/// Returns the address `spotlyr serve` binds to (`EXCHANGE_SERVER_ADDRESS`).
pub fn exchange_server_addr() -> String {
    optional("EXCHANGE_SERVER_ADDRESS", DEFAULT_EXCHANGE_SERVER_ADDRESS)
}

/// Returns the base URL of the lyrics provider queried by the token exchange
/// service (`LYRICS_API_URL`).
pub fn lyrics_api_url() -> String {
    optional("LYRICS_API_URL", DEFAULT_LYRICS_API_URL)
}

/// Returns the timeout applied to every outgoing HTTP request (`HTTP_TIMEOUT_SECS`).
pub fn http_timeout() -> Result<Duration, ConfigError> {
    seconds("HTTP_TIMEOUT_SECS", DEFAULT_HTTP_TIMEOUT_SECS)
}

/// Returns how long `spotlyr login` waits for the redirect (`LOGIN_TIMEOUT_SECS`).
pub fn login_timeout() -> Result<Duration, ConfigError> {
    seconds("LOGIN_TIMEOUT_SECS", DEFAULT_LOGIN_TIMEOUT_SECS)
}
