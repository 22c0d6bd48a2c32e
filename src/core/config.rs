//! Application configuration management

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::models::{AppError, AppResult};

/// Prefix for environment overrides, e.g. `ALBUM_DOWNLOADER_DOWNLOAD__OUTPUT_DIR`
pub const ENV_PREFIX: &str = "ALBUM_DOWNLOADER";

const SUPPORTED_AUDIO_FORMATS: &[&str] = &["mp3", "m4a", "aac", "opus", "vorbis", "flac", "wav"];

/// Main application configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub spotify: SpotifyConfig,
    pub musicbrainz: MusicBrainzConfig,
    pub youtube: YoutubeConfig,
    pub download: DownloadConfig,
    pub http: HttpConfig,
}

/// Spotify Web API credentials and endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpotifyConfig {
    pub client_id: String,
    pub client_secret: String,
    pub token_url: String,
    pub api_base: String,
    /// Tracks requested per playlist page (Spotify caps this at 100)
    pub page_size: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MusicBrainzConfig {
    pub base_url: String,
}

/// yt-dlp invocation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct YoutubeConfig {
    pub binary: PathBuf,
    pub ffmpeg_location: Option<PathBuf>,
    pub audio_format: String,
    pub audio_quality_kbps: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloadConfig {
    pub output_dir: PathBuf,
    pub albums_file: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_seconds: u64,
    pub user_agent: String,
}

impl Default for SpotifyConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            token_url: "https://accounts.spotify.com/api/token".to_string(),
            api_base: "https://api.spotify.com/v1".to_string(),
            page_size: 100,
        }
    }
}

impl Default for MusicBrainzConfig {
    fn default() -> Self {
        Self {
            base_url: "https://musicbrainz.org/ws/2".to_string(),
        }
    }
}

impl Default for YoutubeConfig {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("yt-dlp"),
            ffmpeg_location: None,
            audio_format: "mp3".to_string(),
            audio_quality_kbps: 192,
        }
    }
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("Downloads"),
            albums_file: PathBuf::from("albums.json"),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            user_agent: format!("AlbumDownloader/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl AppConfig {
    /// Load configuration: defaults, then the JSON file (if present), then
    /// `ALBUM_DOWNLOADER_*` environment variables
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::get_config_path()?,
        };

        let settings = config::Config::builder()
            .add_source(
                config::File::from(config_path.clone())
                    .format(config::FileFormat::Json)
                    .required(path.is_some()),
            )
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .with_context(|| format!("Failed to read configuration from {:?}", config_path))?;

        let mut config: AppConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to parse configuration")?;

        config.apply_env_shorthands(|key| std::env::var(key).ok());

        tracing::debug!("Loaded configuration (file: {:?})", config_path);
        Ok(config)
    }

    /// Fill Spotify credentials from `SPOTIFY_CLIENT_ID` / `SPOTIFY_CLIENT_SECRET`
    /// when the layered configuration left them empty
    pub fn apply_env_shorthands(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if self.spotify.client_id.is_empty() {
            if let Some(id) = lookup("SPOTIFY_CLIENT_ID").filter(|v| !v.is_empty()) {
                self.spotify.client_id = id;
            }
        }
        if self.spotify.client_secret.is_empty() {
            if let Some(secret) = lookup("SPOTIFY_CLIENT_SECRET").filter(|v| !v.is_empty()) {
                self.spotify.client_secret = secret;
            }
        }
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
            }
        }

        let content =
            serde_json::to_string_pretty(self).with_context(|| "Failed to serialize config")?;

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {:?}", path))?;

        tracing::info!("Saved configuration to: {:?}", path);
        Ok(())
    }

    /// Get the default path of the configuration file
    pub fn get_config_path() -> Result<PathBuf> {
        let project_dirs = ProjectDirs::from("com", "albumdownloader", "album-downloader")
            .with_context(|| "Failed to get project directories")?;

        Ok(project_dirs.config_dir().join("config.json"))
    }

    /// Validate settings that every command relies on
    pub fn validate(&self) -> AppResult<()> {
        if self.download.output_dir.as_os_str().is_empty() {
            return Err(AppError::Config("download.output_dir must not be empty".into()));
        }
        if self.download.albums_file.as_os_str().is_empty() {
            return Err(AppError::Config("download.albums_file must not be empty".into()));
        }
        if self.http.timeout_seconds == 0 {
            return Err(AppError::Config(
                "http.timeout_seconds must be greater than 0".into(),
            ));
        }
        if !(1..=100).contains(&self.spotify.page_size) {
            return Err(AppError::Config(
                "spotify.page_size must be between 1 and 100".into(),
            ));
        }
        if !SUPPORTED_AUDIO_FORMATS.contains(&self.youtube.audio_format.as_str()) {
            return Err(AppError::Config(format!(
                "youtube.audio_format '{}' is not one of {:?}",
                self.youtube.audio_format, SUPPORTED_AUDIO_FORMATS
            )));
        }
        if !(32..=320).contains(&self.youtube.audio_quality_kbps) {
            return Err(AppError::Config(
                "youtube.audio_quality_kbps must be between 32 and 320".into(),
            ));
        }
        Ok(())
    }

    /// Credentials are only needed by the playlist fetch phase
    pub fn require_spotify_credentials(&self) -> AppResult<()> {
        if self.spotify.client_id.trim().is_empty() || self.spotify.client_secret.trim().is_empty()
        {
            return Err(AppError::Config(
                "Spotify credentials missing: set spotify.client_id/client_secret or SPOTIFY_CLIENT_ID/SPOTIFY_CLIENT_SECRET".into(),
            ));
        }
        Ok(())
    }

    /// Copy of the configuration that is safe to print
    pub fn masked(&self) -> Self {
        let mut copy = self.clone();
        copy.spotify.client_id = mask(&copy.spotify.client_id);
        copy.spotify.client_secret = mask(&copy.spotify.client_secret);
        copy
    }
}

fn mask(value: &str) -> String {
    if value.is_empty() {
        String::new()
    } else {
        let visible: String = value.chars().take(4).collect();
        format!("{}****", visible)
    }
}

/// Serializes tests that call `load`, which reads the process environment
#[cfg(test)]
pub(crate) static ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());
