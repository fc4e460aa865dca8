use colored::Colorize;

use crate::{error, exchange::HttpTokenExchange};

/// Prints the lyrics of a track as served by the token exchange service.
pub async fn lyrics(artist: String, track: String) {
    let service = match HttpTokenExchange::from_env() {
        Ok(service) => service,
        Err(e) => error!("Cannot set up exchange client: {}", e),
    };

    let pb = super::spinner("Looking up lyrics...");
    let result = service.lyrics(&artist, &track).await;
    pb.finish_and_clear();

    match result {
        Ok(lyrics) => println!("{}\n\n{}", format!("{artist} - {track}").bold(), lyrics),
        Err(e) => error!("Lyrics lookup failed: {}", e),
    }
}
