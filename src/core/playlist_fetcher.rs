//! Playlist fetcher - collects the distinct albums of a playlist
//!
//! Searches for a playlist by name, walks every page of its tracks and
//! writes the deduplicated `{artist, album}` list to disk.

use std::path::Path;
use tracing::{debug, info, warn};

use crate::core::album_store::save_albums;
use crate::core::models::{AlbumEntry, AppResult};
use crate::core::sources::PlaylistSource;

pub struct PlaylistFetcher<S> {
    source: S,
}

impl<S: PlaylistSource> PlaylistFetcher<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Identifier of the first playlist matching `name`
    pub async fn find_playlist_id(&self, name: &str) -> AppResult<Option<String>> {
        let id = self.source.search_playlist(name).await?;
        if id.is_none() {
            warn!("❌ Playlist '{}' not found", name);
        }
        Ok(id)
    }

    /// Distinct albums of a playlist, in first-seen order
    pub async fn get_albums_from_playlist(&self, playlist_id: &str) -> AppResult<Vec<AlbumEntry>> {
        let mut albums: Vec<AlbumEntry> = Vec::new();
        let mut page = self.source.playlist_tracks(playlist_id).await?;
        let mut pages = 1usize;

        loop {
            for item in &page.items {
                let Some(entry) = item.album_entry() else {
                    debug!("Skipping playlist item without track data");
                    continue;
                };
                if !albums.contains(&entry) {
                    albums.push(entry);
                }
            }

            match page.next.take() {
                Some(next) => {
                    page = self.source.next_page(&next).await?;
                    pages += 1;
                }
                None => break,
            }
        }

        info!(
            "🎵 Collected {} albums from {} page(s) of playlist {}",
            albums.len(),
            pages,
            playlist_id
        );
        Ok(albums)
    }

    /// Search, extract and persist. Returns the number of albums saved, or
    /// `None` when no playlist matched.
    pub async fn run(&self, playlist_name: &str, albums_file: &Path) -> AppResult<Option<usize>> {
        let Some(playlist_id) = self.find_playlist_id(playlist_name).await? else {
            return Ok(None);
        };

        let albums = self.get_albums_from_playlist(&playlist_id).await?;
        save_albums(&albums, albums_file)?;
        Ok(Some(albums.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::album_store::load_albums;
    use crate::core::models::AppError;
    use crate::core::spotify::{PlaylistItem, PlaylistTrackPage};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use tempfile::tempdir;

    /// Pages keyed by token; the first page is keyed by the playlist id
    #[derive(Default)]
    struct MockPlaylists {
        playlists: HashMap<String, String>,
        pages: HashMap<String, PlaylistTrackPage>,
        requested: Mutex<Vec<String>>,
    }

    impl MockPlaylists {
        fn with_pages(id: &str, pages: Vec<Vec<PlaylistItem>>) -> Self {
            let mut mock = Self::default();
            mock.playlists.insert("My Playlist".into(), id.into());
            let count = pages.len();
            for (index, items) in pages.into_iter().enumerate() {
                let key = if index == 0 {
                    id.to_string()
                } else {
                    format!("page-{}", index)
                };
                let next = (index + 1 < count).then(|| format!("page-{}", index + 1));
                mock.pages.insert(key, PlaylistTrackPage { items, next });
            }
            mock
        }

        fn page(&self, key: &str) -> AppResult<PlaylistTrackPage> {
            self.requested.lock().unwrap().push(key.to_string());
            self.pages
                .get(key)
                .cloned()
                .ok_or_else(|| AppError::NotFound(format!("page {}", key)))
        }
    }

    #[async_trait]
    impl PlaylistSource for MockPlaylists {
        async fn search_playlist(&self, name: &str) -> AppResult<Option<String>> {
            Ok(self.playlists.get(name).cloned())
        }

        async fn playlist_tracks(&self, playlist_id: &str) -> AppResult<PlaylistTrackPage> {
            self.page(playlist_id)
        }

        async fn next_page(&self, next: &str) -> AppResult<PlaylistTrackPage> {
            self.page(next)
        }
    }

    fn item(artist: &str, album: &str) -> PlaylistItem {
        PlaylistItem::with_track(artist, album)
    }

    #[tokio::test]
    async fn three_pages_yield_union_of_unique_albums() {
        let source = MockPlaylists::with_pages(
            "pl1",
            vec![
                vec![item("Air", "Moon Safari"), item("Air", "Moon Safari")],
                vec![item("Portishead", "Dummy"), item("Air", "Moon Safari")],
                vec![item("Air", "Talkie Walkie"), item("Portishead", "Dummy")],
            ],
        );
        let fetcher = PlaylistFetcher::new(source);

        let albums = fetcher.get_albums_from_playlist("pl1").await.unwrap();
        assert_eq!(
            albums,
            vec![
                AlbumEntry::new("Air", "Moon Safari"),
                AlbumEntry::new("Portishead", "Dummy"),
                AlbumEntry::new("Air", "Talkie Walkie"),
            ]
        );
        assert_eq!(
            *fetcher.source.requested.lock().unwrap(),
            vec!["pl1".to_string(), "page-1".to_string(), "page-2".to_string()]
        );
    }

    #[tokio::test]
    async fn null_tracks_are_skipped() {
        let source = MockPlaylists::with_pages(
            "pl1",
            vec![vec![
                PlaylistItem { track: None },
                item("Moderat", "II"),
                PlaylistItem::default(),
            ]],
        );
        let fetcher = PlaylistFetcher::new(source);

        let albums = fetcher.get_albums_from_playlist("pl1").await.unwrap();
        assert_eq!(albums, vec![AlbumEntry::new("Moderat", "II")]);
    }

    #[tokio::test]
    async fn same_album_different_artist_is_kept() {
        let source = MockPlaylists::with_pages(
            "pl1",
            vec![vec![item("A", "Greatest Hits"), item("B", "Greatest Hits")]],
        );
        let albums = PlaylistFetcher::new(source)
            .get_albums_from_playlist("pl1")
            .await
            .unwrap();
        assert_eq!(albums.len(), 2);
    }

    #[tokio::test]
    async fn missing_playlist_returns_none_and_writes_nothing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("albums.json");
        let fetcher = PlaylistFetcher::new(MockPlaylists::default());

        let saved = fetcher.run("Unknown", &path).await.unwrap();
        assert!(saved.is_none());
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn run_persists_albums() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("albums.json");
        let source = MockPlaylists::with_pages(
            "pl1",
            vec![vec![item("Air", "Moon Safari")], vec![item("Air", "10 000 Hz Legend")]],
        );

        let saved = PlaylistFetcher::new(source)
            .run("My Playlist", &path)
            .await
            .unwrap();
        assert_eq!(saved, Some(2));
        assert_eq!(
            load_albums(&path).unwrap(),
            vec![
                AlbumEntry::new("Air", "Moon Safari"),
                AlbumEntry::new("Air", "10 000 Hz Legend"),
            ]
        );
    }

    #[tokio::test]
    async fn page_failure_propagates() {
        let mut source = MockPlaylists::with_pages("pl1", vec![vec![item("a", "b")], vec![]]);
        source.pages.remove("page-1");
        let result = PlaylistFetcher::new(source).get_albums_from_playlist("pl1").await;
        assert!(result.is_err());
    }
}
