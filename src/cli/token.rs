use crate::error;

/// Prints the current access token, refreshing it first when it is due.
pub async fn token() {
    let session = match super::open_session() {
        Ok(session) => session,
        Err(e) => error!("Cannot set up session: {}", e),
    };

    let token = super::restored_token(&session).await;
    session.shutdown().await;

    match token {
        Ok(token) => println!("{}", token),
        Err(e) => error!("{}", e),
    }
}
