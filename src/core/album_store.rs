//! `albums.json` persistence
//!
//! The file is a JSON array of `{ "artist", "album" }` objects, written with
//! 4-space indentation and literal (unescaped) non-ASCII text.

use serde::Serialize;
use std::path::Path;
use tracing::info;

use crate::core::models::{AlbumEntry, AppResult};

/// Overwrite `path` with the encoded album list
pub fn save_albums(albums: &[AlbumEntry], path: &Path) -> AppResult<()> {
    let encoded = encode_albums(albums)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, encoded)?;

    info!("✅ Saved {} albums to {}", albums.len(), path.display());
    Ok(())
}

/// Parse the album list; a missing or malformed file is an error
pub fn load_albums(path: &Path) -> AppResult<Vec<AlbumEntry>> {
    let content = std::fs::read_to_string(path)?;
    let albums: Vec<AlbumEntry> = serde_json::from_str(&content)?;
    info!("📂 Loaded {} albums from {}", albums.len(), path.display());
    Ok(albums)
}

fn encode_albums(albums: &[AlbumEntry]) -> AppResult<Vec<u8>> {
    let mut buffer = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    albums.serialize(&mut serializer)?;
    Ok(buffer)
}
