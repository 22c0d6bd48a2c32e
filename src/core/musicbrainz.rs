//! MusicBrainz tracklist resolver
//!
//! Finds the first release matching an artist/album pair and returns the
//! titles of its first medium, in order.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, warn};
use url::Url;

use crate::core::config::MusicBrainzConfig;
use crate::core::models::{AppError, AppResult};
use crate::core::sources::TracklistSource;
use crate::utils::network::ensure_ok;
use crate::utils::validation::escape_lucene_phrase;

const SERVICE: &str = "MusicBrainz";

#[derive(Debug, Deserialize)]
struct ReleaseSearchResponse {
    #[serde(default)]
    releases: Vec<ReleaseSummary>,
}

#[derive(Debug, Deserialize)]
struct ReleaseSummary {
    id: String,
    #[serde(default)]
    title: String,
}

#[derive(Debug, Deserialize)]
struct ReleaseDetail {
    #[serde(default)]
    media: Vec<Medium>,
}

#[derive(Debug, Deserialize)]
struct Medium {
    #[serde(default)]
    tracks: Vec<Track>,
}

#[derive(Debug, Deserialize)]
struct Track {
    title: String,
}

pub struct MusicBrainzClient {
    http: Client,
    config: MusicBrainzConfig,
}

impl MusicBrainzClient {
    pub fn new(http: Client, config: MusicBrainzConfig) -> Self {
        Self { http, config }
    }

    fn release_search_url(&self, artist: &str, album: &str) -> AppResult<Url> {
        let query = release_query(artist, album);
        let base = format!("{}/release/", self.config.base_url.trim_end_matches('/'));
        Url::parse_with_params(&base, &[("query", query.as_str()), ("fmt", "json")])
            .map_err(|e| AppError::Config(format!("Invalid MusicBrainz URL {}: {}", base, e)))
    }

    fn release_detail_url(&self, release_id: &str) -> AppResult<Url> {
        let base = format!(
            "{}/release/{}",
            self.config.base_url.trim_end_matches('/'),
            release_id
        );
        Url::parse_with_params(&base, &[("inc", "recordings"), ("fmt", "json")])
            .map_err(|e| AppError::Config(format!("Invalid MusicBrainz URL {}: {}", base, e)))
    }

    async fn find_release(&self, artist: &str, album: &str) -> AppResult<ReleaseSummary> {
        let url = self.release_search_url(artist, album)?;
        debug!("GET {}", url);

        let response = self.http.get(url).send().await?;
        let body: ReleaseSearchResponse = match ensure_ok(SERVICE, response) {
            Ok(response) => response.json().await?,
            Err(e) => {
                warn!("❌ Error fetching album data: {}", e);
                return Err(e);
            }
        };

        first_release(body).ok_or_else(|| {
            warn!("❌ Album not found: {} - {}", artist, album);
            AppError::NotFound(format!("Release '{} - {}'", artist, album))
        })
    }

    async fn fetch_tracks(&self, release_id: &str) -> AppResult<Vec<String>> {
        let url = self.release_detail_url(release_id)?;
        debug!("GET {}", url);

        let response = self.http.get(url).send().await?;
        let detail: ReleaseDetail = match ensure_ok(SERVICE, response) {
            Ok(response) => response.json().await?,
            Err(e) => {
                warn!("❌ Error fetching tracklist: {}", e);
                return Err(e);
            }
        };

        track_titles(detail)
            .ok_or_else(|| AppError::NotFound(format!("Tracklist of release {}", release_id)))
    }
}

#[async_trait]
impl TracklistSource for MusicBrainzClient {
    async fn resolve_tracklist(&self, artist: &str, album: &str) -> AppResult<Vec<String>> {
        info!("🔎 Fetching tracklist for: {} - {}", artist, album);

        let release = self.find_release(artist, album).await?;
        debug!("Using release {} ({})", release.id, release.title);

        let tracks = self.fetch_tracks(&release.id).await?;
        info!("📋 {} tracks on {} - {}", tracks.len(), artist, album);
        Ok(tracks)
    }
}

/// `artist:"<artist>" AND release:"<album>"`
fn release_query(artist: &str, album: &str) -> String {
    format!(
        r#"artist:"{}" AND release:"{}""#,
        escape_lucene_phrase(artist),
        escape_lucene_phrase(album)
    )
}

fn first_release(response: ReleaseSearchResponse) -> Option<ReleaseSummary> {
    response.releases.into_iter().next()
}

/// Titles of the first medium; `None` when the release has no media
fn track_titles(detail: ReleaseDetail) -> Option<Vec<String>> {
    let medium = detail.media.into_iter().next()?;
    Some(medium.tracks.into_iter().map(|t| t.title).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> MusicBrainzClient {
        MusicBrainzClient::new(Client::new(), MusicBrainzConfig::default())
    }

    #[test]
    fn query_quotes_and_escapes() {
        assert_eq!(
            release_query("Daft Punk", "Discovery"),
            r#"artist:"Daft Punk" AND release:"Discovery""#
        );
        assert_eq!(
            release_query(r#"The "Band""#, "X"),
            r#"artist:"The \"Band\"" AND release:"X""#
        );
    }

    #[test]
    fn search_url_is_encoded() {
        let url = client().release_search_url("Daft Punk", "Discovery").unwrap();
        assert_eq!(url.path(), "/ws/2/release/");
        let params: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            params,
            vec![
                (
                    "query".to_string(),
                    r#"artist:"Daft Punk" AND release:"Discovery""#.to_string()
                ),
                ("fmt".to_string(), "json".to_string()),
            ]
        );
        assert!(!url.as_str().contains(' '));
    }

    #[test]
    fn detail_url_requests_recordings() {
        let url = client().release_detail_url("b1a9c0e9-d987-4042-ae91-78d6a3267d69").unwrap();
        assert_eq!(
            url.as_str(),
            "https://musicbrainz.org/ws/2/release/b1a9c0e9-d987-4042-ae91-78d6a3267d69?inc=recordings&fmt=json"
        );
    }

    #[test]
    fn zero_releases_is_not_an_empty_tracklist() {
        let response: ReleaseSearchResponse =
            serde_json::from_str(r#"{ "created": "x", "count": 0, "offset": 0, "releases": [] }"#)
                .unwrap();
        assert!(first_release(response).is_none());

        let missing: ReleaseSearchResponse = serde_json::from_str("{}").unwrap();
        assert!(first_release(missing).is_none());
    }

    #[test]
    fn first_release_wins() {
        let response: ReleaseSearchResponse = serde_json::from_str(
            r#"{ "releases": [ { "id": "r1", "title": "Discovery", "score": 100 }, { "id": "r2", "title": "Discovery", "score": 90 } ] }"#,
        )
        .unwrap();
        assert_eq!(first_release(response).unwrap().id, "r1");
    }

    #[test]
    fn titles_come_from_first_medium_in_order() {
        let detail: ReleaseDetail = serde_json::from_str(
            r#"{ "id": "r1", "media": [
                { "position": 1, "tracks": [ { "title": "One More Time", "position": 1 }, { "title": "Aerodynamic", "position": 2 } ] },
                { "position": 2, "tracks": [ { "title": "Bonus", "position": 1 } ] }
            ] }"#,
        )
        .unwrap();
        assert_eq!(
            track_titles(detail).unwrap(),
            vec!["One More Time".to_string(), "Aerodynamic".to_string()]
        );
    }

    mod http {
        use super::*;
        use mockito::{Matcher, Server, ServerGuard};

        fn client_for(server: &ServerGuard) -> MusicBrainzClient {
            MusicBrainzClient::new(
                Client::new(),
                MusicBrainzConfig {
                    base_url: server.url(),
                },
            )
        }

        #[tokio::test]
        async fn resolves_first_release_then_first_medium() {
            let mut server = Server::new_async().await;
            let search = server
                .mock("GET", "/release/")
                .match_query(Matcher::AllOf(vec![
                    Matcher::UrlEncoded("query".into(), r#"artist:"Air" AND release:"Moon Safari""#.into()),
                    Matcher::UrlEncoded("fmt".into(), "json".into()),
                ]))
                .with_header("content-type", "application/json")
                .with_body(r#"{ "count": 2, "releases": [ { "id": "r1", "title": "Moon Safari" }, { "id": "r2" } ] }"#)
                .create_async()
                .await;
            let detail = server
                .mock("GET", "/release/r1")
                .match_query(Matcher::AllOf(vec![
                    Matcher::UrlEncoded("inc".into(), "recordings".into()),
                    Matcher::UrlEncoded("fmt".into(), "json".into()),
                ]))
                .with_header("content-type", "application/json")
                .with_body(r#"{ "media": [ { "tracks": [ { "title": "La femme d'argent" }, { "title": "Sexy Boy" } ] } ] }"#)
                .create_async()
                .await;

            let titles = client_for(&server)
                .resolve_tracklist("Air", "Moon Safari")
                .await
                .unwrap();

            assert_eq!(titles, vec!["La femme d'argent".to_string(), "Sexy Boy".to_string()]);
            search.assert_async().await;
            detail.assert_async().await;
        }

        #[tokio::test]
        async fn search_error_status_fails() {
            let mut server = Server::new_async().await;
            server
                .mock("GET", "/release/")
                .match_query(Matcher::Any)
                .with_status(503)
                .create_async()
                .await;

            let err = client_for(&server).resolve_tracklist("Air", "Moon Safari").await.unwrap_err();
            assert!(matches!(err, AppError::Status { status: 503, .. }));
            assert!(!err.is_not_found());
        }

        #[tokio::test]
        async fn zero_releases_is_not_found() {
            let mut server = Server::new_async().await;
            server
                .mock("GET", "/release/")
                .match_query(Matcher::Any)
                .with_header("content-type", "application/json")
                .with_body(r#"{ "count": 0, "offset": 0, "releases": [] }"#)
                .create_async()
                .await;
            let detail = server
                .mock("GET", Matcher::Regex("^/release/.+".into()))
                .expect(0)
                .create_async()
                .await;

            let err = client_for(&server).resolve_tracklist("Nobody", "Nothing").await.unwrap_err();
            assert!(err.is_not_found());
            detail.assert_async().await;
        }

        #[tokio::test]
        async fn detail_error_status_fails() {
            let mut server = Server::new_async().await;
            server
                .mock("GET", "/release/")
                .match_query(Matcher::Any)
                .with_header("content-type", "application/json")
                .with_body(r#"{ "releases": [ { "id": "r1" } ] }"#)
                .create_async()
                .await;
            server
                .mock("GET", "/release/r1")
                .match_query(Matcher::Any)
                .with_status(500)
                .create_async()
                .await;

            let err = client_for(&server).resolve_tracklist("Air", "Moon Safari").await.unwrap_err();
            assert!(matches!(err, AppError::Status { status: 500, .. }));
        }
    }

    #[test]
    fn release_without_media_has_no_tracklist() {
        let detail: ReleaseDetail = serde_json::from_str(r#"{ "id": "r1", "media": [] }"#).unwrap();
        assert!(track_titles(detail).is_none());
    }
}
