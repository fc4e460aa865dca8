use std::sync::Arc;

use axum::{Extension, extract::Query, http::StatusCode, response::Html};

use crate::{
    management::{ExchangeOutcome, SessionManager},
    types::CallbackParams,
    warning,
};

/// What the redirect callback needs: the `state` sent with the authorization
/// request and the session the code is handed to.
pub struct CallbackState {
    pub expected_state: String,
    pub session: SessionManager,
}

/// Receives the provider redirect and hands the code to the session manager.
///
/// Repeated redirects are harmless, the manager ignores a code once it holds
/// a token.
pub async fn callback(
    Query(params): Query<CallbackParams>,
    Extension(state): Extension<Arc<CallbackState>>,
) -> (StatusCode, Html<&'static str>) {
    if let Some(error) = params.error {
        warning!("Authorization was not granted: {}", error);
        return (
            StatusCode::FORBIDDEN,
            Html("<h4>Authorization was not granted.</h4>"),
        );
    }

    let Some(code) = params.code else {
        return (
            StatusCode::BAD_REQUEST,
            Html("<h4>Missing authorization code.</h4>"),
        );
    };

    if params.state.as_deref() != Some(state.expected_state.as_str()) {
        warning!("Ignoring redirect with an unexpected state value");
        return (StatusCode::BAD_REQUEST, Html("<h4>State mismatch.</h4>"));
    }

    match state.session.authorize(&code).await {
        Ok(ExchangeOutcome::Authenticated) => (
            StatusCode::OK,
            Html("<h2>Logged in.</h2><p>You can close this window.</p>"),
        ),
        Ok(ExchangeOutcome::Skipped) => (
            StatusCode::OK,
            Html("<h2>Already logged in.</h2><p>You can close this window.</p>"),
        ),
        Err(_) => (StatusCode::BAD_REQUEST, Html("<h4>Login failed.</h4>")),
    }
}
