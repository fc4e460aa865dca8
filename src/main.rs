use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use spotlyr::{cli, config, error};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightGreen.on_default())
        .placeholder(AnsiColor::BrightBlue.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Sign in with Spotify through the browser
    Login,

    /// Forget the persisted session
    Logout,

    /// Show the state of the persisted session
    Status,

    /// Print the current access token
    Token,

    /// Search tracks
    Search(SearchOptions),

    /// List your playlists, or the tracks of one playlist
    Playlists(PlaylistsOptions),

    /// Show the lyrics of a track
    Lyrics(LyricsOptions),

    /// Keep the session alive and report every refresh
    Watch,

    /// Run the token exchange service
    Serve,

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct SearchOptions {
    /// Free text query
    pub query: String,

    /// Maximum number of tracks to show (1-50)
    #[clap(long, default_value_t = 20)]
    pub limit: u32,
}

#[derive(Parser, Debug, Clone)]
pub struct PlaylistsOptions {
    /// Playlist id; lists all playlists when omitted
    pub id: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct LyricsOptions {
    pub artist: String,
    pub track: String,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();

    match cli.command {
        Command::Login => cli::login().await,
        Command::Logout => cli::logout().await,
        Command::Status => cli::status().await,
        Command::Token => cli::token().await,
        Command::Search(opt) => cli::search(opt.query, opt.limit).await,
        Command::Playlists(opt) => cli::playlists(opt.id).await,
        Command::Lyrics(opt) => cli::lyrics(opt.artist, opt.track).await,
        Command::Watch => cli::watch().await,
        Command::Serve => cli::serve().await,
        Command::Completions(opt) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
