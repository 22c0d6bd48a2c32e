//! Album Downloader - Core Library
//!
//! Collects the albums of a Spotify playlist, resolves their tracklists on
//! MusicBrainz and downloads each track's audio from YouTube with yt-dlp.

pub mod commands;
pub mod core;
pub mod utils;

// Re-export commonly used types
pub use crate::core::{
    album_downloader::AlbumDownloader,
    config::AppConfig,
    manager::AlbumManager,
    models::{AlbumEntry, AlbumOutcome, AlbumReport, AppError, AppResult, BatchSummary},
    musicbrainz::MusicBrainzClient,
    playlist_fetcher::PlaylistFetcher,
    spotify::SpotifyClient,
    youtube_downloader::YtDlpAudioSource,
};

/// Configuration plus the shared HTTP client, from which the workflows are built
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    http: reqwest::Client,
}

impl AppState {
    pub fn new(config: AppConfig) -> AppResult<Self> {
        config.validate()?;
        let http = utils::network::build_http_client(&config.http)?;
        Ok(Self { config, http })
    }

    /// Playlist fetcher backed by Spotify; requires credentials
    pub fn playlist_fetcher(&self) -> AppResult<PlaylistFetcher<SpotifyClient>> {
        self.config.require_spotify_credentials()?;
        let client = SpotifyClient::new(self.http.clone(), self.config.spotify.clone())?;
        Ok(PlaylistFetcher::new(client))
    }

    pub fn audio_source(&self) -> YtDlpAudioSource {
        YtDlpAudioSource::new(self.config.youtube.clone())
    }

    pub fn album_downloader(&self) -> AlbumDownloader {
        AlbumDownloader::new(
            Box::new(MusicBrainzClient::new(
                self.http.clone(),
                self.config.musicbrainz.clone(),
            )),
            Box::new(self.audio_source()),
            self.config.download.output_dir.clone(),
        )
    }

    pub fn album_manager(&self) -> AlbumManager {
        AlbumManager::new(
            self.config.download.albums_file.clone(),
            self.album_downloader(),
        )
    }
}

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Initialize logging
pub fn init(verbose: bool) {
    utils::logging::init_tracing(verbose);
    tracing::debug!("📚 {} v{} initialized", NAME, VERSION);
}
