//! Core data models for the album downloader

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One album to download, as persisted in `albums.json`

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]

pub struct AlbumEntry {
    pub artist: String,

    pub album: String,
}

impl AlbumEntry {
    pub fn new(artist: impl Into<String>, album: impl Into<String>) -> Self {
        Self {
            artist: artist.into(),
            album: album.into(),
        }
    }
}

impl std::fmt::Display for AlbumEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}", self.artist, self.album)
    }
}

/// Result of a single track within an album run

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TrackOutcome {
    Downloaded { title: String, path: PathBuf },

    NotFound { title: String },
}

impl TrackOutcome {
    pub fn title(&self) -> &str {
        match self {
            Self::Downloaded { title, .. } | Self::NotFound { title } => title,
        }
    }
}

/// Per-track outcomes of one album, in tracklist order

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]

pub struct AlbumReport {
    pub entry: AlbumEntry,

    pub tracks: Vec<TrackOutcome>,
}

fn downloaded_in(tracks: &[TrackOutcome]) -> usize {
    tracks
        .iter()
        .filter(|t| matches!(t, TrackOutcome::Downloaded { .. }))
        .count()
}

impl AlbumReport {
    pub fn downloaded_count(&self) -> usize {
        downloaded_in(&self.tracks)
    }

    pub fn not_found_count(&self) -> usize {
        self.tracks.len() - self.downloaded_count()
    }
}

/// Album-level status recorded by the batch runner

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AlbumOutcome {
    Completed(AlbumReport),

    /// No tracklist could be resolved for the album
    Skipped { reason: String },

    /// `tracks` holds what finished before the failing track
    Failed {
        reason: String,
        tracks: Vec<TrackOutcome>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]

pub struct AlbumResult {
    pub entry: AlbumEntry,

    pub outcome: AlbumOutcome,
}

/// Outcome of a full batch run

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]

pub struct BatchSummary {
    pub results: Vec<AlbumResult>,
}

impl BatchSummary {
    pub fn completed(&self) -> usize {
        self.count(|o| matches!(o, AlbumOutcome::Completed(_)))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, AlbumOutcome::Skipped { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, AlbumOutcome::Failed { .. }))
    }

    pub fn tracks_downloaded(&self) -> usize {
        self.results
            .iter()
            .map(|r| match &r.outcome {
                AlbumOutcome::Completed(report) => report.downloaded_count(),
                AlbumOutcome::Failed { tracks, .. } => downloaded_in(tracks),
                AlbumOutcome::Skipped { .. } => 0,
            })
            .sum()
    }

    fn count(&self, pred: impl Fn(&AlbumOutcome) -> bool) -> usize {
        self.results.iter().filter(|r| pred(&r.outcome)).count()
    }
}

/// Application error types

#[derive(Debug, thiserror::Error)]

pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0} not found")]
    NotFound(String),

    #[error("{service} responded with HTTP {status}")]
    Status { service: String, status: u16 },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("YouTube error: {0}")]
    Youtube(String),

    /// A track search or download failed partway through an album
    #[error("Track '{title}' failed after {} earlier track(s): {source}", .completed.len())]
    TrackFailed {
        title: String,
        completed: Vec<TrackOutcome>,
        source: Box<AppError>,
    },
}

impl AppError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Tracks finished before a `TrackFailed` error; empty for other errors
    pub fn into_completed_tracks(self) -> Vec<TrackOutcome> {
        match self {
            Self::TrackFailed { completed, .. } => completed,
            _ => Vec::new(),
        }
    }
}

/// Result type alias for application operations

pub type AppResult<T> = Result<T, AppError>;
