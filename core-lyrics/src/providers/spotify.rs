//! Spotify Web API Client
//!
//! Implements [`MetadataProvider`] on top of the Spotify search endpoint.
//!
//! ## API Endpoints
//!
//! - **Token**: `POST https://accounts.spotify.com/api/token` with
//!   `Authorization: Basic base64(client_id:client_secret)` and body
//!   `grant_type=client_credentials`
//! - **Search**: `GET https://api.spotify.com/v1/search?q={query}&type={track|artist}&limit={n}`
//!
//! ## Token Caching
//!
//! Access tokens are cached per credential pair until shortly before
//! `expires_in` elapses. A missing credential pair yields no token rather
//! than an error.

use crate::error::{LyricsError, Result};
use crate::metadata::{ArtistRecord, MetadataProvider, TrackRecord};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use bridge_traits::http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
use core_runtime::config::SpotifyConfig;
use core_runtime::logging::redact_if_sensitive;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, info};

const ACCOUNTS_BASE: &str = "https://accounts.spotify.com";
const API_BASE: &str = "https://api.spotify.com";

/// Timeout for API requests
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Tokens are refreshed this long before Spotify says they expire
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
struct CachedToken {
    credentials: (String, String),
    value: String,
    expires_at: Instant,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
}

fn default_expires_in() -> u64 {
    3600
}

#[derive(Debug, Default, Deserialize)]
struct SearchResponse {
    tracks: Option<Paging<TrackObject>>,
    artists: Option<Paging<ArtistObject>>,
}

#[derive(Debug, Deserialize)]
struct Paging<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct TrackObject {
    #[serde(default)]
    name: String,
    #[serde(default)]
    artists: Vec<NamedObject>,
    album: Option<AlbumObject>,
}

#[derive(Debug, Deserialize)]
struct NamedObject {
    #[serde(default)]
    name: String,
}

#[derive(Debug, Deserialize)]
struct AlbumObject {
    #[serde(default)]
    name: String,
    #[serde(default)]
    images: Vec<ImageObject>,
}

#[derive(Debug, Deserialize)]
struct ImageObject {
    url: String,
}

#[derive(Debug, Deserialize)]
struct ArtistObject {
    #[serde(default)]
    name: String,
    #[serde(default)]
    images: Vec<ImageObject>,
    followers: Option<Followers>,
}

#[derive(Debug, Deserialize)]
struct Followers {
    total: Option<u64>,
}

impl From<TrackObject> for TrackRecord {
    fn from(track: TrackObject) -> Self {
        let (album, cover_url) = match track.album {
            Some(album) => (
                album.name,
                album.images.into_iter().next().map(|image| image.url),
            ),
            None => (String::new(), None),
        };

        TrackRecord {
            artist: track
                .artists
                .into_iter()
                .next()
                .map(|artist| artist.name)
                .unwrap_or_default(),
            title: track.name,
            album,
            cover_url,
        }
    }
}

impl From<ArtistObject> for ArtistRecord {
    fn from(artist: ArtistObject) -> Self {
        ArtistRecord {
            name: artist.name,
            image_url: artist.images.into_iter().next().map(|image| image.url),
            follower_count: artist
                .followers
                .and_then(|followers| followers.total)
                .unwrap_or(0),
        }
    }
}

/// Spotify metadata client using the client-credentials flow.
pub struct SpotifyClient {
    http_client: Arc<dyn HttpClient>,
    config: SpotifyConfig,
    accounts_base: String,
    api_base: String,
    token: Mutex<Option<CachedToken>>,
}

impl SpotifyClient {
    pub fn new(http_client: Arc<dyn HttpClient>, config: SpotifyConfig) -> Self {
        Self::with_base_urls(http_client, config, ACCOUNTS_BASE, API_BASE)
    }

    /// Point the client at alternative endpoints, e.g. a local stub server.
    pub fn with_base_urls(
        http_client: Arc<dyn HttpClient>,
        config: SpotifyConfig,
        accounts_base: &str,
        api_base: &str,
    ) -> Self {
        Self {
            http_client,
            config,
            accounts_base: accounts_base.trim_end_matches('/').to_string(),
            api_base: api_base.trim_end_matches('/').to_string(),
            token: Mutex::new(None),
        }
    }

    async fn request_token(&self, client_id: &str, client_secret: &str) -> Result<TokenResponse> {
        let credentials = STANDARD.encode(format!("{}:{}", client_id, client_secret));
        let request = HttpRequest::new(
            HttpMethod::Post,
            format!("{}/api/token", self.accounts_base),
        )
        .header("Authorization", format!("Basic {}", credentials))
        .form("grant_type=client_credentials")
        .timeout(REQUEST_TIMEOUT);

        let response = self.http_client.execute(request).await?;
        decode(check_status(response)?)
    }

    async fn search<T: DeserializeOwned>(
        &self,
        token: &str,
        query: &str,
        kind: &str,
        limit: u32,
    ) -> Result<T> {
        let url = format!(
            "{}/v1/search?q={}&type={}&limit={}",
            self.api_base,
            urlencoding::encode(query),
            kind,
            limit
        );

        debug!(query, kind, limit, "Querying Spotify search");

        let request = HttpRequest::get(url)
            .bearer_token(token)
            .header("Accept", "application/json")
            .timeout(REQUEST_TIMEOUT);

        let response = self.http_client.execute(request).await?;
        decode(check_status(response)?)
    }

    async fn track_search(&self, token: &str, query: &str, limit: u32) -> Result<Vec<TrackRecord>> {
        let response: SearchResponse = self.search(token, query, "track", limit).await?;
        Ok(response
            .tracks
            .map(|paging| paging.items.into_iter().map(TrackRecord::from).collect())
            .unwrap_or_default())
    }
}

fn check_status(response: HttpResponse) -> Result<HttpResponse> {
    if response.is_success() {
        return Ok(response);
    }

    if response.status == 429 {
        let retry_after = response
            .headers
            .get("Retry-After")
            .or_else(|| response.headers.get("retry-after"))
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(60);

        return Err(LyricsError::RateLimited {
            provider: "Spotify".to_string(),
            retry_after_seconds: retry_after,
        });
    }

    Err(LyricsError::HttpError {
        status: response.status,
        body: String::from_utf8_lossy(&response.body).to_string(),
    })
}

fn decode<T: DeserializeOwned>(response: HttpResponse) -> Result<T> {
    serde_json::from_slice(&response.body)
        .map_err(|e| LyricsError::JsonParse(format!("Failed to parse Spotify response: {}", e)))
}

#[async_trait]
impl MetadataProvider for SpotifyClient {
    async fn access_token(&self) -> Result<Option<String>> {
        let Some((client_id, client_secret)) = self.config.credentials() else {
            debug!("Spotify credentials not configured");
            return Ok(None);
        };

        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref() {
            if token.credentials.0 == client_id
                && token.credentials.1 == client_secret
                && Instant::now() < token.expires_at
            {
                return Ok(Some(token.value.clone()));
            }
        }

        debug!(
            client_id = %redact_if_sensitive("client_id", client_id),
            client_secret = %redact_if_sensitive("client_secret", client_secret),
            "Requesting Spotify access token"
        );
        let response = self.request_token(client_id, client_secret).await?;
        let lifetime = Duration::from_secs(response.expires_in).saturating_sub(EXPIRY_MARGIN);

        info!(expires_in = response.expires_in, "Obtained Spotify access token");

        *cached = Some(CachedToken {
            credentials: (client_id.to_string(), client_secret.to_string()),
            value: response.access_token.clone(),
            expires_at: Instant::now() + lifetime,
        });

        Ok(Some(response.access_token))
    }

    async fn search_tracks(
        &self,
        token: &str,
        query: &str,
        limit: u32,
    ) -> Result<Vec<TrackRecord>> {
        self.track_search(token, query, limit).await
    }

    async fn search_artists(
        &self,
        token: &str,
        query: &str,
        limit: u32,
    ) -> Result<Vec<ArtistRecord>> {
        let response: SearchResponse = self.search(token, query, "artist", limit).await?;
        Ok(response
            .artists
            .map(|paging| paging.items.into_iter().map(ArtistRecord::from).collect())
            .unwrap_or_default())
    }

    async fn search_tracks_by_artist(
        &self,
        token: &str,
        artist: &str,
        limit: u32,
    ) -> Result<Vec<TrackRecord>> {
        self.track_search(token, &format!("artist:\"{}\"", artist), limit)
            .await
    }
}
