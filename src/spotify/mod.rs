//! # Spotify Integration Module
//!
//! Calls against Spotify's two surfaces:
//!
//! - [`auth`] - the accounts service. Builds the authorization URL for the
//!   redirect flow and, inside the token exchange service only, performs the
//!   `authorization_code` and `refresh_token` grants with the confidential
//!   client secret.
//! - [`search`] and [`playlists`] - the Web API, as consumers of the
//!   session's access token.
//!
//! ```text
//! CLI / feature consumers
//!          ↓ current access token
//! SessionManager ── TokenExchange ──> token exchange service (spotlyr serve)
//!                                              ↓ client secret
//!                                     Spotify accounts service
//! ```
//!
//! All requests go through `reqwest` with an explicit timeout taken from
//! `HTTP_TIMEOUT_SECS`.

pub mod auth;
pub mod playlists;
pub mod search;
