use std::sync::Arc;

use axum::{Extension, Json, http::StatusCode};

use crate::{
    spotify::auth::ProviderClient,
    types::{LoginRequest, RefreshRequest, RefreshedToken, TokenPair},
    warning,
};

/// `POST /login`: trades an authorization code for a token pair.
///
/// Every failure answers `400`; the player treats it as terminal and sends
/// the user back through authorization.
pub async fn login(
    Extension(provider): Extension<Arc<ProviderClient>>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<TokenPair>, StatusCode> {
    let token = match provider.authorization_code_grant(&body.code).await {
        Ok(token) => token,
        Err(e) => {
            warning!("Login failed: {}", e);
            return Err(StatusCode::BAD_REQUEST);
        }
    };

    let Some(refresh_token) = token.refresh_token else {
        warning!("Login failed: provider returned no refresh token");
        return Err(StatusCode::BAD_REQUEST);
    };

    Ok(Json(TokenPair {
        access_token: token.access_token,
        refresh_token,
        expires_in: token.expires_in,
    }))
}

/// `POST /refresh`: mints a new access token.
///
/// A rotated refresh token from the provider is not forwarded; the player
/// keeps the one it was issued at login.
pub async fn refresh(
    Extension(provider): Extension<Arc<ProviderClient>>,
    Json(body): Json<RefreshRequest>,
) -> Result<Json<RefreshedToken>, StatusCode> {
    match provider.refresh_access_token(&body.refresh_token).await {
        Ok(token) => Ok(Json(RefreshedToken {
            access_token: token.access_token,
            expires_in: token.expires_in,
            refresh_token: None,
        })),
        Err(e) => {
            warning!("Refresh failed: {}", e);
            Err(StatusCode::BAD_REQUEST)
        }
    }
}
