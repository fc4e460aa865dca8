//! # CLI Module
//!
//! User-facing commands. Every command that needs a token builds a
//! [`SessionManager`] over the file credential store and the HTTP token
//! exchange client, restores the persisted session and then acts as a
//! consumer of its current access token.
//!
//! - [`login`] - authorization redirect flow, then code exchange
//! - [`logout`] - clears the persisted session
//! - [`status`] - state, TTL and time until the next refresh
//! - [`token`] - prints the current access token
//! - [`search`] - track search with the current access token
//! - [`playlists`] - the user's playlists and their tracks
//! - [`lyrics`] - lyrics of a track through the token exchange service
//! - [`watch`] - keeps the session alive and reports every refresh
//! - [`serve`] - runs the token exchange service
//!
//! ```bash
//! spotlyr serve &                 # token exchange service, holds the secret
//! spotlyr login                   # browser sign-in
//! spotlyr search "daft punk"
//! spotlyr playlists               # then: spotlyr playlists <id>
//! spotlyr watch                   # refreshes one minute before expiry
//! ```

mod login;
mod logout;
mod lyrics;
mod playlists;
mod search;
mod serve;
mod status;
mod token;
mod watch;

use std::{sync::Arc, time::Duration};

use indicatif::{ProgressBar, ProgressStyle};
use tokio::time::timeout;

use crate::{
    Res, config,
    exchange::HttpTokenExchange,
    management::{ConsoleEntryPoint, FileCredentialStore, RestoreOutcome, SessionManager},
};

pub use login::login;
pub use logout::logout;
pub use lyrics::lyrics;
pub use playlists::playlists;
pub use search::search;
pub use serve::serve;
pub use status::status;
pub use token::token;
pub use watch::watch;

fn open_session() -> Res<SessionManager> {
    Ok(SessionManager::new(
        Arc::new(HttpTokenExchange::from_env()?),
        Arc::new(FileCredentialStore::default_location()),
        Arc::new(ConsoleEntryPoint),
    ))
}

/// Restores the session and returns a usable access token.
///
/// A restored token that is already past its refresh point is refreshed
/// right away; this waits for that refresh to land.
async fn restored_token(session: &SessionManager) -> Res<String> {
    let refresh_in = match session.restore().await {
        RestoreOutcome::Restored { refresh_in } => refresh_in,
        _ => return Err("Not logged in. Run spotlyr login.".into()),
    };

    let restored = session.access_token();
    if !refresh_in.is_zero() {
        return restored.ok_or_else(|| "Not logged in. Run spotlyr login.".into());
    }

    let mut rx = session.subscribe();
    let wait = timeout(
        config::http_timeout()? + Duration::from_secs(5),
        rx.wait_for(|token| *token != restored),
    );
    let current = match wait.await {
        Ok(Ok(token)) => token.clone(),
        _ => None,
    };
    current.ok_or_else(|| "Session ended. Run spotlyr login.".into())
}

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }
    pb
}
