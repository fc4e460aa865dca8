use crate::{error::SessionError, warning};

/// Why a session ended.
#[derive(Debug)]
pub enum ExitCause {
    Logout,
    Failed(SessionError),
}

/// Where the user is sent when a session ends.
///
/// Called exactly once per session end, after the session has been cleared
/// from memory and storage.
pub trait EntryPoint: Send + Sync {
    fn redirect(&self, cause: &ExitCause);
}

/// Tells the user on the terminal to go back through `spotlyr login`.
pub struct ConsoleEntryPoint;

impl EntryPoint for ConsoleEntryPoint {
    fn redirect(&self, cause: &ExitCause) {
        match cause {
            ExitCause::Logout => {}
            ExitCause::Failed(_) => {
                warning!("Session ended. Run spotlyr login to sign in again.")
            }
        }
    }
}
