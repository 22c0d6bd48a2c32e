//! Core business logic module
//!
//! This module contains the domain models, the clients for the external
//! services and the workflows that tie them together.

pub mod album_downloader;
pub mod album_store;
pub mod config;
pub mod manager;
pub mod models;
pub mod musicbrainz;
pub mod playlist_fetcher;
pub mod sources;
pub mod spotify;
pub mod youtube_downloader;


// Re-export commonly used types
pub use self::config::AppConfig;
pub use self::manager::AlbumManager;
