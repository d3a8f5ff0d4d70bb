//! Core service façade and bootstrap helpers.
//!
//! This crate wires a [`CoreConfig`] (HTTP bridge, search settings and
//! metadata credentials) into a ready-to-use [`LyricsService`]. Desktop apps
//! typically enable the `desktop-shims` feature so a reqwest-backed client is
//! injected automatically; other hosts pass their own `HttpClient`.
//!
//! ```ignore
//! use core_service::LyricsService;
//! use core_runtime::config::{CoreConfig, SpotifyConfig};
//!
//! let config = CoreConfig::builder().spotify(SpotifyConfig::from_env()).build()?;
//! let service = LyricsService::new(config)?;
//!
//! let suggestions = service.suggest("queen bohem").await;
//! let song = service.resolve("queen bohemian rhapsody", None).await;
//! ```

pub mod error;

pub use error::{CoreError, Result};

use std::sync::Arc;

use core_lyrics::{
    default_sources, MetadataProvider, MetadataResolver, ParsedCandidate, Resolution,
    ResolutionOrchestrator, SongRecord, SourceMatchEngine, SpotifyClient, Suggestion,
    SuggestionAggregator,
};
use core_runtime::config::CoreConfig;
use tokio_util::sync::CancellationToken;
use tracing::info;

struct Components {
    orchestrator: ResolutionOrchestrator,
    suggestions: SuggestionAggregator,
}

/// Primary façade exposed to host applications.
///
/// Cheap to clone; clones share the same provider token cache.
#[derive(Clone)]
pub struct LyricsService {
    inner: Arc<Components>,
}

impl LyricsService {
    /// Build the service with the Spotify metadata provider and the built-in
    /// lyrics sources.
    ///
    /// # Errors
    ///
    /// [`CoreError::InitializationFailed`] when the configuration is invalid.
    pub fn new(config: CoreConfig) -> Result<Self> {
        config.validate()?;

        if !config.spotify.has_credentials() {
            info!("No metadata credentials configured, queries fall back to heuristic parsing");
        }

        let provider: Arc<dyn MetadataProvider> = Arc::new(SpotifyClient::new(
            config.http_client.clone(),
            config.spotify.clone(),
        ));
        let sources = default_sources(config.http_client.clone(), config.search.request_timeout);
        let engine = SourceMatchEngine::new(sources, config.search.clone());

        Ok(Self::with_components(provider, engine))
    }

    /// Build the service from explicit collaborators.
    pub fn with_components(provider: Arc<dyn MetadataProvider>, engine: SourceMatchEngine) -> Self {
        let orchestrator =
            ResolutionOrchestrator::new(MetadataResolver::new(provider.clone()), engine);
        let suggestions = SuggestionAggregator::new(provider);

        Self {
            inner: Arc::new(Components {
                orchestrator,
                suggestions,
            }),
        }
    }

    /// Resolve a query, or a picked suggestion, into a song record.
    ///
    /// `None` only for an empty query.
    pub async fn resolve(
        &self,
        query: &str,
        selected: Option<&ParsedCandidate>,
    ) -> Option<SongRecord> {
        self.inner.orchestrator.resolve(query, selected).await
    }

    /// Resolve with caller-side cancellation and interpretation details.
    pub async fn resolve_detailed(
        &self,
        query: &str,
        selected: Option<&ParsedCandidate>,
        cancel: &CancellationToken,
    ) -> Result<Resolution> {
        Ok(self
            .inner
            .orchestrator
            .resolve_detailed(query, selected, cancel)
            .await?)
    }

    pub async fn suggest(&self, query: &str) -> Vec<Suggestion> {
        self.inner.suggestions.suggest(query).await
    }

    pub async fn suggest_by_artist(&self, artist_name: &str) -> Vec<Suggestion> {
        self.inner.suggestions.suggest_by_artist(artist_name).await
    }
}

/// Convenience bootstrapper for desktop hosts.
///
/// Installs default logging (ignored if a subscriber is already set), reads
/// metadata credentials from `SPOTIFY_CLIENT_ID` and `SPOTIFY_CLIENT_SECRET`
/// and uses the reqwest HTTP client.
#[cfg(feature = "desktop-shims")]
pub fn bootstrap_desktop() -> Result<LyricsService> {
    use core_runtime::config::SpotifyConfig;
    use core_runtime::logging::{init_logging, LoggingConfig};

    let _ = init_logging(LoggingConfig::default());

    let config = CoreConfig::builder()
        .spotify(SpotifyConfig::from_env())
        .build()?;
    LyricsService::new(config)
}
