use std::{net::SocketAddr, str::FromStr, sync::Arc};

use axum::{
    Extension, Router,
    routing::{get, post},
};
use tokio::net::TcpListener;

use crate::{
    Res,
    api::{self, CallbackState},
    lyrics::LyricsClient,
    spotify::auth::ProviderClient,
};

/// Routes of the redirect callback listener used by `spotlyr login`.
pub fn callback_router(state: Arc<CallbackState>) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .route("/callback", get(api::callback).layer(Extension(state)))
}

/// Routes of the token exchange service.
pub fn exchange_router(provider: Arc<ProviderClient>, lyrics: Arc<LyricsClient>) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .route("/login", post(api::login))
        .route("/refresh", post(api::refresh))
        .route("/lyrics", get(api::lyrics))
        .layer(Extension(provider))
        .layer(Extension(lyrics))
}

pub async fn bind(addr: &str) -> Res<TcpListener> {
    let addr = SocketAddr::from_str(addr)
        .map_err(|e| format!("Failed to parse server address {addr}: {e}"))?;
    Ok(TcpListener::bind(&addr).await?)
}

pub async fn serve(listener: TcpListener, app: Router) -> Res<()> {
    axum::serve(listener, app).await?;
    Ok(())
}
