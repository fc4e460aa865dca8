use std::sync::Arc;

use crate::{
    config, error, lyrics::LyricsClient, server, spotify::auth::ProviderClient, success,
};

/// Runs the token exchange service until the process is stopped.
pub async fn serve() {
    let provider = match ProviderClient::from_env() {
        Ok(provider) => Arc::new(provider),
        Err(e) => error!("Cannot configure provider client: {}", e),
    };
    let lyrics = match LyricsClient::from_env() {
        Ok(lyrics) => Arc::new(lyrics),
        Err(e) => error!("Cannot configure lyrics client: {}", e),
    };

    let addr = config::exchange_server_addr();
    let listener = match server::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => error!("Cannot bind {}: {}", addr, e),
    };

    success!("Token exchange service listening on http://{}", addr);
    if let Err(e) = server::serve(listener, server::exchange_router(provider, lyrics)).await {
        error!("Token exchange service stopped: {}", e);
    }
}
