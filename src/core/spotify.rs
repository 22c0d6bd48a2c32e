//! Spotify Web API client
//!
//! Implements the client-credentials flow plus the two endpoints the playlist
//! fetcher needs: playlist search and paginated playlist tracks.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, info};
use url::Url;

use crate::core::config::SpotifyConfig;
use crate::core::models::{AlbumEntry, AppError, AppResult};
use crate::core::sources::PlaylistSource;
use crate::utils::network::ensure_ok;

const SERVICE: &str = "Spotify";

/// Refresh the token this long before Spotify says it expires
const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// One page of `GET /playlists/{id}/tracks`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlaylistTrackPage {
    #[serde(default)]
    pub items: Vec<PlaylistItem>,
    pub next: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlaylistItem {
    /// Spotify returns `null` here for removed or unavailable tracks
    #[serde(default)]
    pub track: Option<SpotifyTrack>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SpotifyTrack {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub album: Option<NamedObject>,
    #[serde(default)]
    pub artists: Vec<NamedObject>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NamedObject {
    #[serde(default)]
    pub name: String,
}

impl PlaylistItem {
    /// `{first artist, album}` of the track, or `None` when track data is missing
    pub fn album_entry(&self) -> Option<AlbumEntry> {
        let track = self.track.as_ref()?;
        let album = track.album.as_ref()?;
        let artist = track.artists.first()?;
        Some(AlbumEntry::new(artist.name.clone(), album.name.clone()))
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    playlists: Option<PlaylistSearchPage>,
}

#[derive(Debug, Deserialize)]
struct PlaylistSearchPage {
    #[serde(default)]
    items: Vec<Option<PlaylistSummary>>,
}

#[derive(Debug, Deserialize)]
struct PlaylistSummary {
    id: String,
    #[serde(default)]
    name: String,
}

struct CachedToken {
    value: String,
    expires_at: Instant,
}

/// Spotify client authenticated with client credentials
pub struct SpotifyClient {
    http: Client,
    config: SpotifyConfig,
    token: Mutex<Option<CachedToken>>,
}

impl SpotifyClient {
    pub fn new(http: Client, config: SpotifyConfig) -> AppResult<Self> {
        if config.client_id.trim().is_empty() || config.client_secret.trim().is_empty() {
            return Err(AppError::Config(
                "Spotify client_id and client_secret are required".to_string(),
            ));
        }

        Ok(Self {
            http,
            config,
            token: Mutex::new(None),
        })
    }

    async fn bearer_token(&self) -> AppResult<String> {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref() {
            if Instant::now() < token.expires_at {
                return Ok(token.value.clone());
            }
        }

        debug!("Requesting Spotify access token");
        let response = self
            .http
            .post(&self.config.token_url)
            .basic_auth(&self.config.client_id, Some(&self.config.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;
        let token: TokenResponse = ensure_ok(SERVICE, response)?.json().await?;

        let lifetime = Duration::from_secs(token.expires_in).saturating_sub(TOKEN_EXPIRY_MARGIN);
        *cached = Some(CachedToken {
            value: token.access_token.clone(),
            expires_at: Instant::now() + lifetime,
        });
        Ok(token.access_token)
    }

    async fn get_page(&self, url: Url) -> AppResult<PlaylistTrackPage> {
        debug!("GET {}", url);
        let token = self.bearer_token().await?;
        let response = self.http.get(url).bearer_auth(token).send().await?;
        Ok(ensure_ok(SERVICE, response)?.json().await?)
    }

    fn endpoint(&self, path: &str, params: &[(&str, &str)]) -> AppResult<Url> {
        let base = format!("{}/{}", self.config.api_base.trim_end_matches('/'), path);
        Url::parse_with_params(&base, params)
            .map_err(|e| AppError::Config(format!("Invalid Spotify URL {}: {}", base, e)))
    }
}

#[async_trait]
impl PlaylistSource for SpotifyClient {
    async fn search_playlist(&self, name: &str) -> AppResult<Option<String>> {
        let url = self.endpoint("search", &[("q", name), ("type", "playlist"), ("limit", "1")])?;
        let token = self.bearer_token().await?;
        let response = self.http.get(url).bearer_auth(token).send().await?;
        let body: SearchResponse = ensure_ok(SERVICE, response)?.json().await?;

        let found = first_playlist(body);
        if let Some(playlist) = &found {
            info!("📋 Found playlist '{}' ({})", playlist.name, playlist.id);
        }
        Ok(found.map(|p| p.id))
    }

    async fn playlist_tracks(&self, playlist_id: &str) -> AppResult<PlaylistTrackPage> {
        let limit = self.config.page_size.to_string();
        let url = self.endpoint(
            &format!("playlists/{}/tracks", playlist_id),
            &[("limit", limit.as_str())],
        )?;
        self.get_page(url).await
    }

    async fn next_page(&self, next: &str) -> AppResult<PlaylistTrackPage> {
        let url = Url::parse(next)
            .map_err(|e| AppError::Config(format!("Invalid Spotify page URL {}: {}", next, e)))?;
        self.get_page(url).await
    }
}

#[cfg(test)]
impl PlaylistItem {
    pub(crate) fn with_track(artist: &str, album: &str) -> Self {
        Self {
            track: Some(SpotifyTrack {
                name: String::new(),
                album: Some(NamedObject {
                    name: album.to_string(),
                }),
                artists: vec![NamedObject {
                    name: artist.to_string(),
                }],
            }),
        }
    }
}

/// First non-null playlist in a search response
fn first_playlist(response: SearchResponse) -> Option<PlaylistSummary> {
    response
        .playlists?
        .items
        .into_iter()
        .flatten()
        .next()
}
