//! # API Module
//!
//! HTTP handlers served by spotlyr's two local servers.
//!
//! ## Redirect callback listener
//!
//! - [`callback`] - receives `?code=...&state=...` on the registered redirect
//!   URI during `spotlyr login`, checks the state and hands the code to the
//!   [`SessionManager`](crate::management::SessionManager).
//!
//! ## Token exchange service
//!
//! - [`login`] - `POST /login {code}` to `{accessToken, refreshToken, expiresIn}`
//! - [`refresh`] - `POST /refresh {refreshToken}` to `{accessToken, expiresIn}`
//! - [`lyrics`] - `GET /lyrics?artist&track` to `{lyrics}`
//!
//! The token endpoints call the Spotify accounts service with the
//! confidential client secret and answer `400` on any failure. `lyrics` asks
//! the lyrics provider and falls back to a fixed text.
//!
//! ## Monitoring
//!
//! - [`health`] - status and version, mounted on both servers.
//!
//! ```rust,ignore
//! use axum::{Router, routing::{get, post}};
//! use spotlyr::api::{health, login, refresh};
//!
//! let app = Router::new()
//!     .route("/health", get(health))
//!     .route("/login", post(login))
//!     .route("/refresh", post(refresh));
//! ```

mod callback;
mod health;
mod lyrics;
mod token;

pub use callback::CallbackState;
pub use callback::callback;
pub use health::health;
pub use lyrics::lyrics;
pub use token::login;
pub use token::refresh;
