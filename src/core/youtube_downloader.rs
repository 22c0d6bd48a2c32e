//! YouTube Downloader Module
//!
//! Searches YouTube and extracts audio by driving the `yt-dlp` command-line
//! tool. Transcoding is done by yt-dlp's ffmpeg post-processor.

use async_trait::async_trait;
use serde::Deserialize;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::{debug, info};

use crate::core::config::YoutubeConfig;
use crate::core::models::{AppError, AppResult};
use crate::core::sources::AudioSource;
use crate::utils::file_utils::ensure_dir_exists;
use crate::utils::validation::is_valid_media_url;

/// Output of `yt-dlp --flat-playlist --dump-single-json ytsearch1:...`
#[derive(Debug, Default, Deserialize)]
struct SearchResult {
    #[serde(default)]
    entries: Vec<SearchEntry>,
}

#[derive(Debug, Deserialize)]
struct SearchEntry {
    url: Option<String>,
    webpage_url: Option<String>,
    id: Option<String>,
}

impl SearchEntry {
    fn locator(self) -> Option<String> {
        self.url
            .or(self.webpage_url)
            .or_else(|| self.id.map(|id| format!("https://www.youtube.com/watch?v={}", id)))
    }
}

/// `AudioSource` backed by the yt-dlp binary
pub struct YtDlpAudioSource {
    config: YoutubeConfig,
}

impl YtDlpAudioSource {
    pub fn new(config: YoutubeConfig) -> Self {
        Self { config }
    }

    pub fn get_config(&self) -> &YoutubeConfig {
        &self.config
    }

    /// Whether the configured yt-dlp binary can be executed
    pub async fn is_available(&self) -> bool {
        Command::new(&self.config.binary)
            .arg("--version")
            .output()
            .await
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    fn search_args(&self, query: &str) -> Vec<OsString> {
        vec![
            "--flat-playlist".into(),
            "--dump-single-json".into(),
            "--no-warnings".into(),
            format!("ytsearch1:{}", query).into(),
        ]
    }

    fn download_args(&self, locator: &str, destination: &Path) -> Vec<OsString> {
        // yt-dlp substitutes the extension after post-processing
        let template = destination.with_extension("%(ext)s");

        let mut args: Vec<OsString> = vec![
            "--format".into(),
            "bestaudio/best".into(),
            "--extract-audio".into(),
            "--audio-format".into(),
            self.config.audio_format.clone().into(),
            "--audio-quality".into(),
            format!("{}K", self.config.audio_quality_kbps).into(),
            "--no-playlist".into(),
            "--no-warnings".into(),
            "--output".into(),
            template.into_os_string(),
        ];
        if let Some(ffmpeg) = &self.config.ffmpeg_location {
            args.push("--ffmpeg-location".into());
            args.push(ffmpeg.clone().into_os_string());
        }
        args.push(locator.into());
        args
    }

    async fn run(&self, args: Vec<OsString>) -> AppResult<Vec<u8>> {
        debug!("Running {:?} {:?}", self.config.binary, args);
        let output = Command::new(&self.config.binary)
            .args(&args)
            .output()
            .await
            .map_err(|e| {
                AppError::Youtube(format!(
                    "Failed to run {}: {}",
                    self.config.binary.display(),
                    e
                ))
            })?;

        if !output.status.success() {
            let error = String::from_utf8_lossy(&output.stderr);
            return Err(AppError::Youtube(format!(
                "yt-dlp failed ({}): {}",
                output.status,
                error.trim()
            )));
        }
        Ok(output.stdout)
    }
}

#[async_trait]
impl AudioSource for YtDlpAudioSource {
    async fn locate_audio(&self, artist: &str, title: &str) -> AppResult<Option<String>> {
        let query = search_query(artist, title);
        info!("🎵 Searching YouTube for: {}", query);

        let stdout = self.run(self.search_args(&query)).await?;
        parse_search_output(&stdout)
    }

    async fn fetch_and_encode(&self, locator: &str, destination: &Path) -> AppResult<PathBuf> {
        if !is_valid_media_url(locator) {
            return Err(AppError::Youtube(format!("Invalid media URL: {}", locator)));
        }
        if let Some(parent) = destination.parent() {
            ensure_dir_exists(parent)?;
        }

        self.run(self.download_args(locator, destination)).await?;

        if !destination.exists() {
            return Err(AppError::Youtube(format!(
                "yt-dlp finished but {} was not created",
                destination.display()
            )));
        }
        Ok(destination.to_path_buf())
    }

    fn file_extension(&self) -> &str {
        container_extension(&self.config.audio_format)
    }
}

/// Extension yt-dlp gives the extracted audio for an `--audio-format` codec
pub fn container_extension(audio_format: &str) -> &str {
    match audio_format {
        "vorbis" => "ogg",
        "aac" => "m4a",
        other => other,
    }
}

/// `<artist> - <title> audio`
pub fn search_query(artist: &str, title: &str) -> String {
    format!("{} - {} audio", artist, title)
}

fn parse_search_output(stdout: &[u8]) -> AppResult<Option<String>> {
    let result: SearchResult = serde_json::from_slice(stdout)
        .map_err(|e| AppError::Youtube(format!("Failed to parse yt-dlp output: {}", e)))?;
    Ok(result.entries.into_iter().next().and_then(SearchEntry::locator))
}
