//! Album Manager - batch runner over `albums.json`
//!
//! Runs every persisted album through the `AlbumDownloader`, one at a time.
//! Each album runs inside its own failure boundary: errors and panics become
//! a recorded `AlbumOutcome` and the batch moves on.

use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

use crate::core::album_downloader::AlbumDownloader;
use crate::core::album_store::load_albums;
use crate::core::models::{AlbumEntry, AlbumOutcome, AlbumResult, AppResult, BatchSummary};

pub struct AlbumManager {
    albums_file: PathBuf,
    downloader: AlbumDownloader,
}

impl AlbumManager {
    pub fn new(albums_file: impl Into<PathBuf>, downloader: AlbumDownloader) -> Self {
        Self {
            albums_file: albums_file.into(),
            downloader,
        }
    }

    pub fn albums_file(&self) -> &Path {
        &self.albums_file
    }

    pub fn load_albums(&self) -> AppResult<Vec<AlbumEntry>> {
        load_albums(&self.albums_file)
    }

    /// Load the album list and download each entry in order
    pub async fn download_all_albums(&self) -> AppResult<BatchSummary> {
        let albums = self.load_albums()?;
        Ok(self.run_entries(&albums).await)
    }

    pub async fn run_entries(&self, albums: &[AlbumEntry]) -> BatchSummary {
        let mut summary = BatchSummary::default();

        for (index, entry) in albums.iter().enumerate() {
            info!("💿 [{}/{}] {}", index + 1, albums.len(), entry);
            let outcome = self.run_isolated(entry).await;
            summary.results.push(AlbumResult {
                entry: entry.clone(),
                outcome,
            });
        }

        info!(
            "📊 Batch finished: {} completed, {} skipped, {} failed, {} tracks downloaded",
            summary.completed(),
            summary.skipped(),
            summary.failed(),
            summary.tracks_downloaded()
        );
        summary
    }

    async fn run_isolated(&self, entry: &AlbumEntry) -> AlbumOutcome {
        let run = self.downloader.run_album(&entry.artist, &entry.album);

        match AssertUnwindSafe(run).catch_unwind().await {
            Ok(Ok(report)) => AlbumOutcome::Completed(report),
            Ok(Err(e)) if e.is_not_found() => {
                warn!("⏭️ Skipping {}: {}", entry, e);
                AlbumOutcome::Skipped {
                    reason: e.to_string(),
                }
            }
            Ok(Err(e)) => {
                error!("❌ {} failed: {}", entry, e);
                AlbumOutcome::Failed {
                    reason: e.to_string(),
                    tracks: e.into_completed_tracks(),
                }
            }
            Err(panic) => {
                let reason = panic_message(panic.as_ref());
                error!("❌ {} panicked: {}", entry, reason);
                AlbumOutcome::Failed {
                    reason,
                    tracks: Vec::new(),
                }
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("panic: {}", s)
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("panic: {}", s)
    } else {
        "panic".to_string()
    }
}
