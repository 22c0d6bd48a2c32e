//! File system utilities

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Ensure directory exists
pub fn ensure_dir_exists(path: &Path) -> io::Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Sanitize a single path component for the filesystem
pub fn sanitize_filename(filename: &str) -> String {
    let cleaned: String = filename
        .chars()
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '|' | '?' | '*' => '_',
            '/' | '\\' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    // "." and ".." would escape the album directory
    match cleaned.trim() {
        "" => "_".to_string(),
        "." | ".." => cleaned.replace('.', "_"),
        _ => cleaned,
    }
}

/// `<root>/<artist>/<album>` with each component sanitized
pub fn album_dir(root: &Path, artist: &str, album: &str) -> PathBuf {
    root.join(sanitize_filename(artist))
        .join(sanitize_filename(album))
}
