//! Album downloader - one album from tracklist to audio files
//!
//! Resolves the tracklist, then for each title searches for audio and
//! downloads it into `<output_root>/<artist>/<album>/<title>.<ext>`.

use std::path::PathBuf;
use tracing::{error, info, warn};

use crate::core::models::{AlbumEntry, AlbumReport, AppError, AppResult, TrackOutcome};
use crate::core::sources::{AudioSource, TracklistSource};
use crate::utils::file_utils::{album_dir, ensure_dir_exists, sanitize_filename};

pub struct AlbumDownloader {
    tracklist: Box<dyn TracklistSource>,
    audio: Box<dyn AudioSource>,
    output_root: PathBuf,
}

impl AlbumDownloader {
    pub fn new(
        tracklist: Box<dyn TracklistSource>,
        audio: Box<dyn AudioSource>,
        output_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            tracklist,
            audio,
            output_root: output_root.into(),
        }
    }

    /// Destination of one track
    pub fn track_path(&self, artist: &str, album: &str, title: &str) -> PathBuf {
        album_dir(&self.output_root, artist, album).join(format!(
            "{}.{}",
            sanitize_filename(title),
            self.audio.file_extension()
        ))
    }

    /// Download every track of an album that the audio source can find.
    ///
    /// Fails if the tracklist cannot be resolved or a search/download
    /// errors; tracks without search results are recorded as `NotFound`.
    /// A track error is returned as `AppError::TrackFailed` carrying the
    /// outcomes of the tracks before it.
    pub async fn run_album(&self, artist: &str, album: &str) -> AppResult<AlbumReport> {
        let titles = self.tracklist.resolve_tracklist(artist, album).await?;
        let mut tracks = Vec::with_capacity(titles.len());

        for title in titles {
            match self.download_track(artist, album, &title).await {
                Ok(outcome) => tracks.push(outcome),
                Err(e) => {
                    error!("❌ {} failed: {}", title, e);
                    return Err(AppError::TrackFailed {
                        title,
                        completed: tracks,
                        source: Box::new(e),
                    });
                }
            }
        }

        let report = AlbumReport {
            entry: AlbumEntry::new(artist, album),
            tracks,
        };
        info!(
            "✅ {} - {}: {} downloaded, {} not found",
            artist,
            album,
            report.downloaded_count(),
            report.not_found_count()
        );
        Ok(report)
    }

    async fn download_track(&self, artist: &str, album: &str, title: &str) -> AppResult<TrackOutcome> {
        let Some(locator) = self.audio.locate_audio(artist, title).await? else {
            warn!("❌ No results found for {}", title);
            return Ok(TrackOutcome::NotFound {
                title: title.to_string(),
            });
        };

        info!("⬇️ Downloading: {} from {}", title, locator);
        let destination = self.track_path(artist, album, title);
        if let Some(parent) = destination.parent() {
            ensure_dir_exists(parent)?;
        }
        let path = self.audio.fetch_and_encode(&locator, &destination).await?;
        Ok(TrackOutcome::Downloaded {
            title: title.to_string(),
            path,
        })
    }
}
