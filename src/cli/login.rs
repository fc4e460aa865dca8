use std::{sync::Arc, time::Duration};

use tokio::time::timeout;

use crate::{
    api::CallbackState,
    config, error,
    management::{RestoreOutcome, SessionManager},
    server, spotify, success,
    types::SessionState,
    utils, warning,
};

/// Runs the authorization redirect flow and exchanges the returned code.
///
/// 1. Restores the persisted session; an existing session is kept as is
/// 2. Starts the callback listener on `SERVER_ADDRESS`
/// 3. Opens the authorization URL in the browser
/// 4. Waits until the callback's exchange settles the session or the login
///    timeout passes
pub async fn login() {
    let session = match super::open_session() {
        Ok(session) => session,
        Err(e) => error!("Cannot set up session: {}", e),
    };

    if let RestoreOutcome::Restored { .. } = session.restore_passive().await {
        success!("Already logged in. Run spotlyr logout to switch accounts.");
        return;
    }

    let (client_id, redirect_uri, login_timeout) = match (
        config::spotify_client_id(),
        config::spotify_redirect_uri(),
        config::login_timeout(),
    ) {
        (Ok(id), Ok(uri), Ok(t)) => (id, uri, t),
        (Err(e), _, _) | (_, Err(e), _) | (_, _, Err(e)) => error!("{}", e),
    };

    let expected_state = utils::generate_state();
    let auth_url = match spotify::auth::authorize_url(
        &config::spotify_apiauth_url(),
        &client_id,
        &redirect_uri,
        &config::spotify_scope(),
        &expected_state,
    ) {
        Ok(url) => url,
        Err(e) => error!("{}", e),
    };

    let listener = match server::bind(&config::server_addr()).await {
        Ok(listener) => listener,
        Err(e) => error!("Cannot start callback listener: {}", e),
    };
    let app = server::callback_router(Arc::new(CallbackState {
        expected_state,
        session: session.clone(),
    }));
    let listener_task = tokio::spawn(async move {
        if let Err(e) = server::serve(listener, app).await {
            warning!("Callback listener stopped: {}", e);
        }
    });

    if webbrowser::open(auth_url.as_str()).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            auth_url
        );
    }

    let pb = super::spinner("Waiting for the authorization redirect...");
    let settled = wait_until_settled(&session, login_timeout).await;
    pb.finish_and_clear();

    listener_task.abort();
    session.shutdown().await;

    match settled {
        Some(SessionState::Authenticated) => success!("Logged in."),
        Some(_) => error!("Login failed. Run spotlyr login to try again."),
        None => error!("Login timed out."),
    }
}

async fn wait_until_settled(session: &SessionManager, limit: Duration) -> Option<SessionState> {
    let mut rx = session.subscribe_state();
    let settled = rx.wait_for(|state| {
        matches!(state, SessionState::Authenticated | SessionState::Failed)
    });
    match timeout(limit, settled).await {
        Ok(Ok(state)) => Some(*state),
        _ => None,
    }
}
