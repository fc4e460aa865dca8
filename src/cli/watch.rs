use crate::{error, info, management::RestoreOutcome, utils, warning};

/// Holds the session open and reports every token change until Ctrl-C.
pub async fn watch() {
    let session = match super::open_session() {
        Ok(session) => session,
        Err(e) => error!("Cannot set up session: {}", e),
    };

    match session.restore().await {
        RestoreOutcome::Restored { refresh_in } => info!(
            "Session restored, next refresh in {}",
            utils::format_duration(refresh_in)
        ),
        _ => error!("Not logged in. Run spotlyr login."),
    }

    let mut rx = session.subscribe();

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                session.shutdown().await;
                info!("Stopped.");
                return;
            }
            changed = rx.changed() => {
                if changed.is_err() {
                    return;
                }
                let current = rx.borrow_and_update().clone();
                match current {
                    Some(token) => info!("Current token sha256:{}", utils::token_fingerprint(&token)),
                    None => {
                        warning!("Session ended.");
                        return;
                    }
                }
            }
        }
    }
}
