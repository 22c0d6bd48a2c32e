//! Playlist fetch command

use anyhow::{Context, Result};
use std::path::Path;
use tracing::{error, info};

use crate::AppState;

/// Fetch the albums of `playlist_name` into the albums file.
///
/// Returns the number of albums saved, or `None` if no playlist matched.
pub async fn fetch_playlist(state: &AppState, playlist_name: &str) -> Result<Option<usize>> {
    let albums_file = state.config.download.albums_file.as_path();
    info!("📋 Fetching albums from playlist: {}", playlist_name);

    let fetcher = state.playlist_fetcher()?;
    match fetcher.run(playlist_name, albums_file).await {
        Ok(Some(count)) => {
            print_saved(count, albums_file);
            Ok(Some(count))
        }
        Ok(None) => {
            println!("Playlist '{}' not found.", playlist_name);
            Ok(None)
        }
        Err(e) => {
            error!("❌ Failed to fetch playlist: {}", e);
            Err(e).with_context(|| format!("Failed to fetch playlist '{}'", playlist_name))
        }
    }
}

fn print_saved(count: usize, path: &Path) {
    println!("Saved {} albums to {}", count, path.display());
}
