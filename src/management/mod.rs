mod entry;
mod scheduler;
mod session;
mod store;

pub use entry::ConsoleEntryPoint;
pub use entry::EntryPoint;
pub use entry::ExitCause;
pub use scheduler::REFRESH_MARGIN_SECS;
pub use scheduler::RefreshTask;
pub use scheduler::refresh_delay;
pub use scheduler::restored_refresh_delay;
pub use session::ExchangeOutcome;
pub use session::RestoreOutcome;
pub use session::SessionManager;
pub use store::CredentialStore;
pub use store::FileCredentialStore;
pub use store::MemoryCredentialStore;
pub use store::{ACCESS_TOKEN_KEY, EXPIRES_IN_KEY, OBTAINED_AT_KEY, REFRESH_TOKEN_KEY, SESSION_KEYS};
