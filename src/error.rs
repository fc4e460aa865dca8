//! Error types shared by the session manager, its collaborators and the
//! configuration layer.

use thiserror::Error;

/// Failures that end a session or prevent it from being written through.
///
/// `ExchangeFailed` and `RefreshFailed` are terminal for the current session:
/// the manager clears it and hands the error to the entry point. Neither is
/// retried.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("authorization code exchange failed: {0}")]
    ExchangeFailed(String),
    #[error("token refresh failed: {0}")]
    RefreshFailed(String),
    #[error("credential store error: {0}")]
    Storage(#[from] StoreError),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed credential file: {0}")]
    Serde(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{key} has an invalid value: {value}")]
    Invalid { key: &'static str, value: String },
    #[error("cannot load environment file: {0}")]
    EnvFile(String),
}

/// Errors from talking to the token exchange service or the provider.
#[derive(Debug, Error)]
pub enum ExchangeError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected status {0}")]
    Status(u16),
    #[error(transparent)]
    Config(#[from] ConfigError),
}
