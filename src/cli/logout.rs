use crate::{error, success};

pub async fn logout() {
    let session = match super::open_session() {
        Ok(session) => session,
        Err(e) => error!("Cannot set up session: {}", e),
    };

    match session.logout().await {
        Ok(()) => success!("Logged out."),
        Err(e) => error!("Failed to clear the persisted session: {}", e),
    }
}
