//! Spotify player session client library
//!
//! This library keeps an OAuth2 session with Spotify alive for as long as the
//! client runs. It acquires the token pair through a token exchange service,
//! persists it, refreshes it one minute before the provider-declared expiry
//! and falls back to a logged-out state when the exchange or a refresh fails.
//!
//! # Modules
//!
//! - `api` - HTTP handlers for the redirect callback and the token exchange service
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration management and environment variables
//! - `error` - Error types shared across the crate
//! - `exchange` - Client for the token exchange service
//! - `lyrics` - Lyrics provider lookup served by the token exchange service
//! - `management` - Session manager, refresh scheduler and credential storage
//! - `server` - Local HTTP servers (redirect callback, token exchange service)
//! - `spotify` - Spotify accounts and Web API calls
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use spotlyr::{config, exchange::HttpTokenExchange, management::*};
//!
//! #[tokio::main]
//! async fn main() -> spotlyr::Res<()> {
//!     config::load_env().await?;
//!     let session = SessionManager::new(
//!         Arc::new(HttpTokenExchange::from_env()?),
//!         Arc::new(FileCredentialStore::default_location()),
//!         Arc::new(ConsoleEntryPoint),
//!     );
//!     session.restore().await;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod exchange;
pub mod lyrics;
pub mod management;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;

/// A convenient Result type alias for operations that may fail.
///
/// Provides a standard error handling pattern for the CLI layer using a boxed
/// dynamic error trait object. Library modules return their own error types
/// from [`error`], which convert into this alias with `?`.
///
/// # Example
///
/// ```
/// use spotlyr::Res;
///
/// async fn fetch_data() -> Res<String> {
///     Ok("data".to_string())
/// }
/// ```
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational line prefixed with a blue `o`.
///
/// Accepts the same arguments as `println!`.
///
/// ```
/// info!("Waiting for the authorization redirect...");
/// info!("Found {} tracks", count);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success line prefixed with a green checkmark.
///
/// ```
/// success!("Logged in");
/// success!("Token refreshed, next refresh in {}s", delay);
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error line prefixed with a red `!` and exits with code 1.
///
/// Only the CLI layer uses this, for conditions the command cannot recover
/// from. Library code returns errors instead.
///
/// ```
/// error!("Cannot bind callback listener: {}", err);
/// // unreachable
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning line prefixed with a yellow `!`.
///
/// Used for recoverable problems and for session-ending events the user
/// should act on.
///
/// ```
/// warning!("Session ended, run spotlyr login");
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
