//! Client side of the token exchange service.
//!
//! The service owns the confidential client secret and performs the provider
//! calls. This module speaks its endpoints:
//!
//! - `POST /login {code}` returns `{accessToken, refreshToken, expiresIn}`
//! - `POST /refresh {refreshToken}` returns `{accessToken, expiresIn}`
//! - `GET /lyrics?artist&track` returns `{lyrics}`
//!
//! The token endpoints answer `400` when the code or refresh token is
//! rejected.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Serialize, de::DeserializeOwned};

use crate::{
    config,
    error::ExchangeError,
    types::{LoginRequest, LyricsResponse, RefreshRequest, RefreshedToken, TokenPair},
};

/// Turns an authorization code or a refresh token into tokens.
#[async_trait]
pub trait TokenExchange: Send + Sync {
    async fn login(&self, code: &str) -> Result<TokenPair, ExchangeError>;
    async fn refresh(&self, refresh_token: &str) -> Result<RefreshedToken, ExchangeError>;
}

pub struct HttpTokenExchange {
    client: Client,
    base_url: String,
}

impl HttpTokenExchange {
    /// # Errors
    ///
    /// Fails when the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ExchangeError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Builds the client from `EXCHANGE_SERVICE_URL` and `HTTP_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self, ExchangeError> {
        Self::new(config::exchange_service_url(), config::http_timeout()?)
    }

    /// Asks the service for the lyrics of a track.
    pub async fn lyrics(&self, artist: &str, track: &str) -> Result<String, ExchangeError> {
        let res = self
            .client
            .get(format!("{}/lyrics", self.base_url))
            .query(&[("artist", artist), ("track", track)])
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            return Err(ExchangeError::Status(status.as_u16()));
        }

        Ok(res.json::<LyricsResponse>().await?.lyrics)
    }

    async fn post<B, R>(&self, path: &str, body: &B) -> Result<R, ExchangeError>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let res = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .json(body)
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            return Err(ExchangeError::Status(status.as_u16()));
        }

        Ok(res.json::<R>().await?)
    }
}

#[async_trait]
impl TokenExchange for HttpTokenExchange {
    async fn login(&self, code: &str) -> Result<TokenPair, ExchangeError> {
        let body = LoginRequest {
            code: code.to_string(),
        };
        self.post("/login", &body).await
    }

    async fn refresh(&self, refresh_token: &str) -> Result<RefreshedToken, ExchangeError> {
        let body = RefreshRequest {
            refresh_token: refresh_token.to_string(),
        };
        self.post("/refresh", &body).await
    }
}
