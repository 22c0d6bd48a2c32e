use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, warn};

use album_downloader::commands;
use album_downloader::{AppConfig, AppState};

#[derive(Parser, Debug)]
#[command(
    name = "album-downloader",
    version,
    about = "Download the albums of a Spotify playlist as audio files"
)]
struct Cli {
    /// Configuration file (JSON)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Album list written by `fetch` and read by `download`
    #[arg(long, global = true, value_name = "PATH")]
    albums_file: Option<PathBuf>,

    /// Root directory for downloaded audio
    #[arg(short, long, global = true, value_name = "DIR")]
    output: Option<PathBuf>,

    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Save the distinct albums of a playlist to the albums file
    Fetch {
        #[arg(value_name = "PLAYLIST")]
        playlist: String,
    },
    /// Download every album listed in the albums file
    Download,
    /// Download a single album
    Album { artist: String, album: String },
    /// Run the fetch and/or download phases in sequence
    Run {
        /// Fetch albums from this playlist first
        #[arg(long, value_name = "NAME")]
        playlist: Option<String>,

        /// Download the albums file afterwards
        #[arg(long)]
        download: bool,
    },
    /// Show the effective configuration
    Config {
        /// Create a config file with default values
        #[arg(long)]
        init: bool,
    },
}

impl Cli {
    fn load_config(&self) -> Result<AppConfig> {
        let mut config = AppConfig::load(self.config.as_deref())?;
        if let Some(path) = &self.albums_file {
            config.download.albums_file = path.clone();
        }
        if let Some(dir) = &self.output {
            config.download.output_dir = dir.clone();
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    album_downloader::init(cli.verbose);

    if let Command::Config { init: true } = cli.command {
        return commands::init_config(cli.config.as_deref());
    }

    let config = cli.load_config()?;
    if let Command::Config { .. } = cli.command {
        return commands::show_config(&config, cli.config.as_deref());
    }

    let state = AppState::new(config).context("Invalid configuration")?;
    info!("🚀 Starting {} v{}", album_downloader::NAME, album_downloader::VERSION);

    match &cli.command {
        Command::Fetch { playlist } => {
            if commands::fetch_playlist(&state, playlist).await?.is_none() {
                anyhow::bail!("Playlist '{}' not found", playlist);
            }
        }
        Command::Download => {
            commands::download_albums(&state).await?;
        }
        Command::Album { artist, album } => {
            commands::download_album(&state, artist, album).await?;
        }
        Command::Run { playlist, download } => {
            if playlist.is_none() && !download {
                warn!("Nothing to do: pass --playlist <NAME> and/or --download");
            }
            if let Some(name) = playlist {
                commands::fetch_playlist(&state, name).await?;
            }
            if *download {
                commands::download_albums(&state).await?;
            }
        }
        Command::Config { .. } => unreachable!("handled before state construction"),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn run_phases_are_independent_flags() {
        let cli = Cli::parse_from(["album-downloader", "run", "--playlist", "Road Trip", "--download"]);
        match cli.command {
            Command::Run { playlist, download } => {
                assert_eq!(playlist.as_deref(), Some("Road Trip"));
                assert!(download);
            }
            other => panic!("unexpected command {:?}", other),
        }

        let cli = Cli::parse_from(["album-downloader", "run", "--download"]);
        assert!(matches!(cli.command, Command::Run { playlist: None, download: true }));
    }

    #[test]
    fn global_overrides_apply_after_subcommand() {
        let cli = Cli::parse_from([
            "album-downloader",
            "album",
            "Air",
            "Moon Safari",
            "--output",
            "/music",
            "--albums-file",
            "mine.json",
        ]);
        assert_eq!(cli.output, Some(PathBuf::from("/music")));
        assert_eq!(cli.albums_file, Some(PathBuf::from("mine.json")));
        assert!(matches!(cli.command, Command::Album { .. }));
    }
}
