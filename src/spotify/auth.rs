use std::time::Duration;

use reqwest::{Client, Url};

use crate::{
    config,
    error::{ConfigError, ExchangeError},
    types::ProviderToken,
};

/// Builds the URL the user is sent to for authorization.
///
/// The provider redirects back to `redirect_uri` with `code` and the same
/// `state` as query parameters.
///
/// # Example
///
/// ```
/// let url = authorize_url(
///     "https://accounts.spotify.com/authorize",
///     "client-id",
///     "http://127.0.0.1:8888/callback",
///     "streaming user-read-email",
///     "f7Qm...",
/// )?;
/// ```
pub fn authorize_url(
    auth_url: &str,
    client_id: &str,
    redirect_uri: &str,
    scope: &str,
    state: &str,
) -> Result<Url, ConfigError> {
    Url::parse_with_params(
        auth_url,
        &[
            ("client_id", client_id),
            ("response_type", "code"),
            ("redirect_uri", redirect_uri),
            ("scope", scope),
            ("state", state),
        ],
    )
    .map_err(|_| ConfigError::Invalid {
        key: "SPOTIFY_API_AUTH_URL",
        value: auth_url.to_string(),
    })
}

/// Confidential client for the Spotify accounts token endpoint.
///
/// Holds the client secret, so it only ever runs inside the token exchange
/// service.
pub struct ProviderClient {
    client: Client,
    token_url: String,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
}

impl ProviderClient {
    pub fn new(
        token_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_uri: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ExchangeError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            token_url: token_url.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            redirect_uri: redirect_uri.into(),
        })
    }

    pub fn from_env() -> Result<Self, ExchangeError> {
        Self::new(
            config::spotify_apitoken_url(),
            config::spotify_client_id()?,
            config::spotify_client_secret()?,
            config::spotify_redirect_uri()?,
            config::http_timeout()?,
        )
    }

    /// Exchanges an authorization code for a token pair.
    ///
    /// # Errors
    ///
    /// Fails on network errors and on any non-2xx answer, which is what the
    /// provider returns for an expired or already used code.
    pub async fn authorization_code_grant(&self, code: &str) -> Result<ProviderToken, ExchangeError> {
        self.token_request(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", &self.redirect_uri),
        ])
        .await
    }

    /// Mints a new access token from a refresh token.
    pub async fn refresh_access_token(
        &self,
        refresh_token: &str,
    ) -> Result<ProviderToken, ExchangeError> {
        self.token_request(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ])
        .await
    }

    async fn token_request(&self, form: &[(&str, &str)]) -> Result<ProviderToken, ExchangeError> {
        let res = self
            .client
            .post(&self.token_url)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(form)
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            return Err(ExchangeError::Status(status.as_u16()));
        }

        Ok(res.json::<ProviderToken>().await?)
    }
}
