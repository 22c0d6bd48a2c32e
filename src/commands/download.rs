//! Download command handlers

use anyhow::{bail, Context, Result};
use tracing::error;

use crate::core::models::{AlbumOutcome, AlbumReport, BatchSummary, TrackOutcome};
use crate::AppState;

async fn ensure_ytdlp(state: &AppState) -> Result<()> {
    let audio = state.audio_source();
    if !audio.is_available().await {
        bail!(
            "yt-dlp not found at '{}'; install it or set youtube.binary",
            audio.get_config().binary.display()
        );
    }
    Ok(())
}

/// Download every album in the albums file
pub async fn download_albums(state: &AppState) -> Result<BatchSummary> {
    ensure_ytdlp(state).await?;

    let manager = state.album_manager();
    let summary = manager.download_all_albums().await.with_context(|| {
        format!(
            "Failed to load albums from {}",
            manager.albums_file().display()
        )
    })?;

    print_summary(&summary);
    Ok(summary)
}

/// Download a single album
pub async fn download_album(state: &AppState, artist: &str, album: &str) -> Result<AlbumReport> {
    ensure_ytdlp(state).await?;

    match state.album_downloader().run_album(artist, album).await {
        Ok(report) => {
            print_report(&report);
            Ok(report)
        }
        Err(e) => {
            error!("❌ Failed to download {} - {}: {}", artist, album, e);
            Err(e).with_context(|| format!("Failed to download {} - {}", artist, album))
        }
    }
}

pub fn print_report(report: &AlbumReport) {
    println!("{}", report.entry);
    print_tracks(&report.tracks);
}

fn print_tracks(tracks: &[TrackOutcome]) {
    for track in tracks {
        match track {
            TrackOutcome::Downloaded { title, path } => {
                println!("  ✓ {} -> {}", title, path.display())
            }
            TrackOutcome::NotFound { title } => println!("  ✗ {} (no results)", title),
        }
    }
}

pub fn print_summary(summary: &BatchSummary) {
    println!("Albums:");
    for result in &summary.results {
        match &result.outcome {
            AlbumOutcome::Completed(report) => println!(
                "  ✓ {} ({} downloaded, {} not found)",
                result.entry,
                report.downloaded_count(),
                report.not_found_count()
            ),
            AlbumOutcome::Skipped { reason } => println!("  - {} skipped: {}", result.entry, reason),
            AlbumOutcome::Failed { reason, tracks } => {
                println!("  ✗ {} failed: {}", result.entry, reason);
                print_tracks(tracks);
            }
        }
    }
    println!(
        "Completed: {}, skipped: {}, failed: {}, tracks downloaded: {}",
        summary.completed(),
        summary.skipped(),
        summary.failed(),
        summary.tracks_downloaded()
    );
}
