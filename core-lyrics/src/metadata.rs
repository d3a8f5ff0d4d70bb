//! # Metadata Resolution
//!
//! Turns a free-text query or an exact `{artist, title}` pair into canonical
//! metadata through a [`MetadataProvider`]. Every provider failure degrades
//! to the heuristic parse and the default album info; only cancellation is
//! reported to the caller.

use crate::cancel::{race, recover};
use crate::error::Result;
use crate::models::{AlbumInfo, ParsedCandidate};
use crate::parser::parse_query;
use async_trait::async_trait;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Track record returned by a metadata provider
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackRecord {
    /// Primary (first credited) artist
    pub artist: String,
    pub title: String,
    pub album: String,
    pub cover_url: Option<String>,
}

/// Artist record returned by a metadata provider
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtistRecord {
    pub name: String,
    pub image_url: Option<String>,
    pub follower_count: u64,
}

/// Artist and track search service.
///
/// Results come back in provider order and unfiltered; filtering is the
/// caller's concern.
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Obtain an access token. `Ok(None)` when no credentials are configured.
    async fn access_token(&self) -> Result<Option<String>>;

    async fn search_tracks(
        &self,
        token: &str,
        query: &str,
        limit: u32,
    ) -> Result<Vec<TrackRecord>>;

    async fn search_artists(
        &self,
        token: &str,
        query: &str,
        limit: u32,
    ) -> Result<Vec<ArtistRecord>>;

    /// Tracks credited to `artist`, including collaborations
    async fn search_tracks_by_artist(
        &self,
        token: &str,
        artist: &str,
        limit: u32,
    ) -> Result<Vec<TrackRecord>>;
}

/// Result of a free-text resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryResolution {
    pub candidate: ParsedCandidate,
    pub album: AlbumInfo,
    /// `true` when artist and title came from the provider rather than the parser
    pub confirmed: bool,
}

pub struct MetadataResolver {
    provider: Arc<dyn MetadataProvider>,
}

impl MetadataResolver {
    pub fn new(provider: Arc<dyn MetadataProvider>) -> Self {
        Self { provider }
    }

    /// Resolve free text with a single best-match search.
    ///
    /// A provider match with both artist and title supersedes the heuristic
    /// parse. A match missing either one is replaced entirely by the parse,
    /// keeping the provider's album info.
    pub async fn resolve_by_query(
        &self,
        query: &str,
        cancel: &CancellationToken,
    ) -> Result<QueryResolution> {
        let best = match self.token(cancel).await? {
            Some(token) => recover(
                race(cancel, self.provider.search_tracks(&token, query, 1)).await,
                "search_tracks",
            )?
            .into_iter()
            .next(),
            None => None,
        };

        let Some(track) = best else {
            debug!(query, "No provider match, using heuristic parse");
            return Ok(QueryResolution {
                candidate: parse_query(query),
                album: AlbumInfo::default(),
                confirmed: false,
            });
        };

        let album = AlbumInfo::from_parts(Some(&track.album), track.cover_url.as_deref());

        if track.artist.trim().is_empty() || track.title.trim().is_empty() {
            debug!(query, "Provider match incomplete, using heuristic parse");
            return Ok(QueryResolution {
                candidate: parse_query(query),
                album,
                confirmed: false,
            });
        }

        info!(query, artist = %track.artist, title = %track.title, "Provider confirmed query");
        Ok(QueryResolution {
            candidate: ParsedCandidate::new(track.artist, track.title),
            album,
            confirmed: true,
        })
    }

    /// Look up album info for an exact pair. Never touches artist or title.
    pub async fn resolve_by_pair(
        &self,
        artist: &str,
        title: &str,
        cancel: &CancellationToken,
    ) -> Result<AlbumInfo> {
        let Some(token) = self.token(cancel).await? else {
            return Ok(AlbumInfo::default());
        };

        let query = format!("artist:\"{}\" track:\"{}\"", artist, title);
        let tracks = recover(
            race(cancel, self.provider.search_tracks(&token, &query, 1)).await,
            "search_tracks",
        )?;

        Ok(tracks
            .first()
            .map(|track| AlbumInfo::from_parts(Some(&track.album), track.cover_url.as_deref()))
            .unwrap_or_default())
    }

    async fn token(&self, cancel: &CancellationToken) -> Result<Option<String>> {
        recover(
            race(cancel, self.provider.access_token()).await,
            "access_token",
        )
    }
}
