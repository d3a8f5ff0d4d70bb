//! # Resolution Orchestrator
//!
//! End-to-end "query → song record" flow:
//!
//! ```text
//! selected pair ──► album lookup by pair ───────────┐
//!                                                   ├─► lyrics search ─► SongRecord
//! free text ─────► provider match / heuristic parse ┘
//! ```
//!
//! Collaborator failures only ever show up as degraded data in the record.

use crate::engine::{LookupResult, SourceMatchEngine};
use crate::error::{LyricsError, Result};
use crate::metadata::MetadataResolver;
use crate::models::{missing_lyrics_message, AlbumInfo, ParsedCandidate, SongRecord, UNKNOWN_ARTIST};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

/// How the artist/title pair of a resolution was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Interpretation {
    /// Supplied by the caller, typically a picked suggestion
    Selected,
    /// Matched by the metadata provider
    ProviderConfirmed,
    /// Guessed by the query parser; may be the wrong split
    HeuristicParse,
}

/// Song record plus how it was produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Resolution {
    pub record: SongRecord,
    pub interpretation: Interpretation,
    pub lookup: LookupResult,
}

pub struct ResolutionOrchestrator {
    metadata: MetadataResolver,
    engine: SourceMatchEngine,
}

impl ResolutionOrchestrator {
    pub fn new(metadata: MetadataResolver, engine: SourceMatchEngine) -> Self {
        Self { metadata, engine }
    }

    /// Resolve a query into a song record.
    ///
    /// Returns `None` only for an empty query, before any I/O.
    pub async fn resolve(
        &self,
        query: &str,
        selected: Option<&ParsedCandidate>,
    ) -> Option<SongRecord> {
        match self
            .resolve_detailed(query, selected, &CancellationToken::new())
            .await
        {
            Ok(resolution) => Some(resolution.record),
            Err(LyricsError::EmptyQuery) => None,
            Err(e) => {
                warn!(error = %e, "Resolution aborted");
                None
            }
        }
    }

    /// Resolve with cancellation and report how the result was obtained.
    ///
    /// # Errors
    ///
    /// - [`LyricsError::EmptyQuery`] for blank input, without any I/O
    /// - [`LyricsError::Cancelled`] when `cancel` fires mid-resolution
    #[instrument(skip(self, selected, cancel))]
    pub async fn resolve_detailed(
        &self,
        query: &str,
        selected: Option<&ParsedCandidate>,
        cancel: &CancellationToken,
    ) -> Result<Resolution> {
        let (query, candidate, album, interpretation) = match selected {
            Some(candidate) => {
                let query = format!("{} {}", candidate.artist, candidate.title)
                    .trim()
                    .to_string();
                if query.is_empty() {
                    return Err(LyricsError::EmptyQuery);
                }
                let album = self
                    .metadata
                    .resolve_by_pair(&candidate.artist, &candidate.title, cancel)
                    .await?;
                (query, candidate.clone(), album, Interpretation::Selected)
            }
            None => {
                let query = query.trim();
                if query.is_empty() {
                    debug!("Ignoring empty query");
                    return Err(LyricsError::EmptyQuery);
                }
                let resolved = self.metadata.resolve_by_query(query, cancel).await?;
                let interpretation = if resolved.confirmed {
                    Interpretation::ProviderConfirmed
                } else {
                    Interpretation::HeuristicParse
                };
                (query.to_string(), resolved.candidate, resolved.album, interpretation)
            }
        };

        let lookup = if candidate.is_complete() {
            self.engine
                .search(&candidate.artist, &candidate.title, cancel)
                .await?
        } else {
            debug!(query = %query, "Incomplete interpretation, skipping lyrics search");
            LookupResult::not_found(0)
        };

        info!(
            query = %query,
            interpretation = ?interpretation,
            found = lookup.found,
            "Resolved query"
        );

        Ok(Resolution {
            record: assemble(&query, &candidate, album, &lookup),
            interpretation,
            lookup,
        })
    }
}

fn assemble(
    query: &str,
    candidate: &ParsedCandidate,
    album: AlbumInfo,
    lookup: &LookupResult,
) -> SongRecord {
    let or = |value: &str, fallback: &str| {
        if value.trim().is_empty() {
            fallback.to_string()
        } else {
            value.to_string()
        }
    };

    SongRecord {
        title: or(&candidate.title, query),
        artist: or(&candidate.artist, UNKNOWN_ARTIST),
        lyrics: if lookup.found {
            lookup.text.clone()
        } else {
            missing_lyrics_message(query)
        },
        album: Some(album.album),
        album_cover: Some(album.album_cover),
    }
}
