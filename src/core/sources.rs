//! Seams between the workflows and the external services they call
//!
//! Production implementations live in `spotify`, `musicbrainz` and
//! `youtube_downloader`; tests substitute in-memory doubles.

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::core::models::AppResult;
use crate::core::spotify::PlaylistTrackPage;

/// Playlist search and paginated track listing
#[async_trait]
pub trait PlaylistSource: Send + Sync {
    /// Identifier of the first playlist matching `name`, if any
    async fn search_playlist(&self, name: &str) -> AppResult<Option<String>>;

    /// First page of a playlist's tracks
    async fn playlist_tracks(&self, playlist_id: &str) -> AppResult<PlaylistTrackPage>;

    /// Follow a page token returned in `PlaylistTrackPage::next`
    async fn next_page(&self, next: &str) -> AppResult<PlaylistTrackPage>;
}

/// Release lookup in a metadata database
#[async_trait]
pub trait TracklistSource: Send + Sync {
    /// Ordered track titles of the first release matching artist and album.
    ///
    /// No matching release is `AppError::NotFound`, never an empty list.
    async fn resolve_tracklist(&self, artist: &str, album: &str) -> AppResult<Vec<String>>;
}

/// Video platform search and audio extraction
#[async_trait]
pub trait AudioSource: Send + Sync {
    /// Best-guess locator for a track, `None` when the search has no results
    async fn locate_audio(&self, artist: &str, title: &str) -> AppResult<Option<String>>;

    /// Download and transcode into `destination`, returning the written file.
    /// The parent directory is created if absent.
    async fn fetch_and_encode(&self, locator: &str, destination: &Path) -> AppResult<PathBuf>;

    /// Extension of the files produced by `fetch_and_encode`
    fn file_extension(&self) -> &str;
}
