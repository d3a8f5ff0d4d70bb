//! # Source Match Engine
//!
//! Walks the flattened `source × artist variant × title variant` sequence
//! and returns the first candidate text that passes validation.
//!
//! ## Ordering
//!
//! Source priority dominates artist-variant order, which dominates
//! title-variant order. The first accepted element of that sequence wins,
//! whatever the execution mode.
//!
//! ## Execution modes
//!
//! - **Sequential** (`max_concurrent_requests == 1`): one request at a time
//!   with a pacing delay after every rejected attempt.
//! - **Bounded concurrency**: up to N attempts in flight through an
//!   order-preserving buffered stream. Results are consumed in sequence
//!   order, so a faster lower-priority answer never beats a slower
//!   higher-priority one. Dropping the stream on success cancels the
//!   remaining in-flight attempts. No pacing is applied.

use crate::cancel;
use crate::error::Result;
use crate::sources::LyricsSource;
use crate::variants::{artist_variants, title_variants, Variant};
use core_runtime::config::SearchConfig;
use futures::stream::{self, StreamExt};
use serde::Serialize;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Outcome of a lyrics search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupResult {
    pub found: bool,
    /// Validated lyrics, empty when nothing matched
    pub text: String,
    pub source: Option<String>,
    pub artist_variant: Option<Variant>,
    pub title_variant: Option<Variant>,
    /// Requests issued before the search stopped
    pub attempts: usize,
}

impl LookupResult {
    pub fn not_found(attempts: usize) -> Self {
        Self {
            found: false,
            text: String::new(),
            source: None,
            artist_variant: None,
            title_variant: None,
            attempts,
        }
    }

    fn matched(attempt: Attempt<'_>, text: String, attempts: usize) -> Self {
        Self {
            found: true,
            text,
            source: Some(attempt.source.name().to_string()),
            artist_variant: Some(attempt.artist.clone()),
            title_variant: Some(attempt.title.clone()),
            attempts,
        }
    }
}

#[derive(Clone, Copy)]
struct Attempt<'a> {
    source: &'a dyn LyricsSource,
    artist: &'a Variant,
    title: &'a Variant,
}

/// Multi-source lyrics search with short-circuit on first validated match.
pub struct SourceMatchEngine {
    sources: Vec<Arc<dyn LyricsSource>>,
    config: SearchConfig,
}

impl SourceMatchEngine {
    /// Sources are tried in ascending [`LyricsSource::priority`]; ties keep
    /// their given order.
    pub fn new(mut sources: Vec<Arc<dyn LyricsSource>>, config: SearchConfig) -> Self {
        sources.sort_by_key(|source| source.priority());
        Self { sources, config }
    }

    pub fn source_names(&self) -> Vec<&str> {
        self.sources.iter().map(|source| source.name()).collect()
    }

    /// Search without a cancellation handle.
    pub async fn resolve_lyrics(&self, artist: &str, title: &str) -> LookupResult {
        let cancel = CancellationToken::new();
        match self.search(artist, title, &cancel).await {
            Ok(result) => result,
            Err(e) => {
                warn!(error = %e, "Lyrics search aborted");
                LookupResult::not_found(0)
            }
        }
    }

    /// Search for lyrics, stopping at the first validated candidate.
    ///
    /// Returns `found: false` when artist or title is empty or when every
    /// attempt was rejected. Source failures count as non-matches.
    ///
    /// # Errors
    ///
    /// Only [`LyricsError::Cancelled`](crate::error::LyricsError::Cancelled),
    /// when `cancel` fires before the search finishes.
    pub async fn search(
        &self,
        artist: &str,
        title: &str,
        cancel: &CancellationToken,
    ) -> Result<LookupResult> {
        if artist.trim().is_empty() || title.trim().is_empty() {
            debug!("Skipping lyrics search, artist or title missing");
            return Ok(LookupResult::not_found(0));
        }

        let artists = artist_variants(artist);
        let titles = title_variants(title);

        debug!(
            artist,
            title,
            sources = self.sources.len(),
            artist_variants = artists.len(),
            title_variants = titles.len(),
            "Starting lyrics search"
        );

        let result = if self.config.is_sequential() {
            self.search_sequential(&artists, &titles, cancel).await?
        } else {
            self.search_concurrent(&artists, &titles, cancel).await?
        };

        match &result.source {
            Some(source) => info!(
                source = %source,
                artist,
                title,
                attempts = result.attempts,
                "Lyrics found"
            ),
            None => info!(artist, title, attempts = result.attempts, "No lyrics found"),
        }

        Ok(result)
    }

    /// Whether candidate text is plausible lyrics.
    ///
    /// Rejects text shorter than `min_text_length` characters, with fewer
    /// than `min_line_count` lines, or containing "not found" or "error"
    /// in any case.
    pub fn validate(&self, text: &str) -> bool {
        if text.chars().count() < self.config.min_text_length {
            return false;
        }

        let lowered = text.to_lowercase();
        if lowered.contains("not found") || lowered.contains("error") {
            return false;
        }

        text.split('\n').count() >= self.config.min_line_count
    }

    fn attempts<'a>(
        &'a self,
        artists: &'a [Variant],
        titles: &'a [Variant],
    ) -> impl Iterator<Item = Attempt<'a>> + 'a {
        self.sources
            .iter()
            .flat_map(move |source| {
                artists.iter().flat_map(move |artist| {
                    titles.iter().map(move |title| Attempt {
                        source: source.as_ref(),
                        artist,
                        title,
                    })
                })
            })
            .filter(|attempt| !attempt.artist.value.is_empty() && !attempt.title.value.is_empty())
    }

    async fn search_sequential(
        &self,
        artists: &[Variant],
        titles: &[Variant],
        cancel: &CancellationToken,
    ) -> Result<LookupResult> {
        let mut issued = 0;

        for attempt in self.attempts(artists, titles) {
            issued += 1;
            if let Some(text) = self.try_attempt(attempt, cancel).await? {
                return Ok(LookupResult::matched(attempt, text, issued));
            }
            cancel::sleep(cancel, self.config.pacing_delay).await?;
        }

        Ok(LookupResult::not_found(issued))
    }

    async fn search_concurrent(
        &self,
        artists: &[Variant],
        titles: &[Variant],
        cancel: &CancellationToken,
    ) -> Result<LookupResult> {
        let mut issued = 0;
        let mut outcomes = stream::iter(self.attempts(artists, titles))
            .map(move |attempt| async move { (attempt, self.try_attempt(attempt, cancel).await) })
            .buffered(self.config.max_concurrent_requests);

        while let Some((attempt, outcome)) = outcomes.next().await {
            issued += 1;
            if let Some(text) = outcome? {
                return Ok(LookupResult::matched(attempt, text, issued));
            }
        }

        Ok(LookupResult::not_found(issued))
    }

    async fn try_attempt(
        &self,
        attempt: Attempt<'_>,
        cancel: &CancellationToken,
    ) -> Result<Option<String>> {
        let source = attempt.source;
        let response = cancel::race(cancel, async {
            Ok(source
                .request(&attempt.artist.value, &attempt.title.value)
                .await)
        })
        .await?;

        let response = match response {
            Ok(response) => response,
            Err(e) => {
                debug!(
                    source = source.name(),
                    artist = %attempt.artist.value,
                    title = %attempt.title.value,
                    error = %e,
                    "Source request failed"
                );
                return Ok(None);
            }
        };

        match source.parse(&response) {
            Some(text) if self.validate(&text) => Ok(Some(text)),
            Some(_) => {
                debug!(
                    source = source.name(),
                    artist = %attempt.artist.value,
                    title = %attempt.title.value,
                    "Candidate text rejected"
                );
                Ok(None)
            }
            None => Ok(None),
        }
    }
}
