//! # Core Configuration Module
//!
//! Configuration management for the lyrics resolution core.
//!
//! ## Overview
//!
//! The configuration system uses a builder pattern to construct a `CoreConfig`
//! holding the transport bridge plus the read-only settings the engine needs:
//! - [`SearchConfig`]: validation thresholds, pacing and concurrency for the
//!   lyrics source search
//! - [`SpotifyConfig`]: client credentials for the metadata provider
//!
//! It fails fast when a required capability is missing.
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::{CoreConfig, SearchConfig, SpotifyConfig};
//! use std::time::Duration;
//!
//! let config = CoreConfig::builder()
//!     .search(SearchConfig::default().with_pacing_delay(Duration::from_millis(250)))
//!     .spotify(SpotifyConfig::from_env())
//!     .build()?;
//! ```
//!
//! With the `desktop-shims` feature a reqwest-backed `HttpClient` is injected
//! when none is provided. Without it, `build()` returns
//! [`Error::CapabilityMissing`].

use crate::error::{Error, Result};
use bridge_traits::HttpClient;
use std::sync::Arc;
use std::time::Duration;

/// Environment variable holding the Spotify client id
pub const SPOTIFY_CLIENT_ID_ENV: &str = "SPOTIFY_CLIENT_ID";

/// Environment variable holding the Spotify client secret
pub const SPOTIFY_CLIENT_SECRET_ENV: &str = "SPOTIFY_CLIENT_SECRET";

/// Settings for the multi-source lyrics search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    /// Candidate text shorter than this many characters is rejected
    pub min_text_length: usize,

    /// Candidate text with fewer newline-delimited lines is rejected
    pub min_line_count: usize,

    /// Pause after every attempted (source, artist, title) combination
    ///
    /// Default: 150ms. Free lyrics services throttle aggressive clients.
    pub pacing_delay: Duration,

    /// Maximum attempts in flight at once
    ///
    /// `1` selects the sequential, paced search. Larger values select the
    /// bounded-concurrency search, which skips pacing but keeps the
    /// priority order as the tie-break.
    pub max_concurrent_requests: usize,

    /// Per-request timeout passed to the HTTP bridge
    pub request_timeout: Duration,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            min_text_length: 30,
            min_line_count: 4,
            pacing_delay: Duration::from_millis(150),
            max_concurrent_requests: 1,
            request_timeout: Duration::from_secs(10),
        }
    }
}

impl SearchConfig {
    pub fn with_min_text_length(mut self, length: usize) -> Self {
        self.min_text_length = length;
        self
    }

    pub fn with_min_line_count(mut self, lines: usize) -> Self {
        self.min_line_count = lines;
        self
    }

    pub fn with_pacing_delay(mut self, delay: Duration) -> Self {
        self.pacing_delay = delay;
        self
    }

    pub fn with_max_concurrent_requests(mut self, max: usize) -> Self {
        self.max_concurrent_requests = max;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Whether the search runs one attempt at a time with pacing
    pub fn is_sequential(&self) -> bool {
        self.max_concurrent_requests <= 1
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        if self.min_line_count == 0 {
            return Err(Error::Config(
                "Minimum line count must be at least 1".to_string(),
            ));
        }

        if self.max_concurrent_requests == 0 {
            return Err(Error::Config(
                "Max concurrent requests must be at least 1".to_string(),
            ));
        }

        if self.max_concurrent_requests > 16 {
            return Err(Error::Config(
                "Max concurrent requests exceeds maximum of 16".to_string(),
            ));
        }

        if self.pacing_delay > Duration::from_secs(10) {
            return Err(Error::Config(
                "Pacing delay exceeds maximum of 10 seconds".to_string(),
            ));
        }

        if self.request_timeout.is_zero() {
            return Err(Error::Config(
                "Request timeout must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

/// Client credentials for the Spotify Web API.
///
/// Both values are optional: without them the metadata provider issues no
/// token and the resolver degrades to heuristic parsing and default album
/// info.
///
/// # Security Note
///
/// Credentials should never be hardcoded in the binary. Load them from the
/// environment or from the host's secure configuration.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct SpotifyConfig {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
}

impl std::fmt::Debug for SpotifyConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpotifyConfig")
            .field("client_id", &self.client_id.as_ref().map(|_| "[REDACTED]"))
            .field(
                "client_secret",
                &self.client_secret.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

impl SpotifyConfig {
    /// Creates a config with no credentials
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads `SPOTIFY_CLIENT_ID` and `SPOTIFY_CLIENT_SECRET`
    ///
    /// Empty variables are treated as missing.
    pub fn from_env() -> Self {
        let read = |key: &str| std::env::var(key).ok().filter(|v| !v.trim().is_empty());
        Self {
            client_id: read(SPOTIFY_CLIENT_ID_ENV),
            client_secret: read(SPOTIFY_CLIENT_SECRET_ENV),
        }
    }

    pub fn with_credentials(
        mut self,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        self.client_id = Some(client_id.into());
        self.client_secret = Some(client_secret.into());
        self
    }

    /// Checks that both halves of the credential pair are present
    pub fn has_credentials(&self) -> bool {
        self.credentials().is_some()
    }

    /// Returns `(client_id, client_secret)` when both are set
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (&self.client_id, &self.client_secret) {
            (Some(id), Some(secret)) if !id.is_empty() && !secret.is_empty() => {
                Some((id.as_str(), secret.as_str()))
            }
            _ => None,
        }
    }
}

/// Core configuration for the lyrics resolution core.
///
/// Use [`CoreConfigBuilder`] to construct instances.
#[derive(Clone)]
pub struct CoreConfig {
    /// HTTP client for provider and source requests
    pub http_client: Arc<dyn HttpClient>,

    /// Lyrics source search settings
    pub search: SearchConfig,

    /// Metadata provider credentials
    pub spotify: SpotifyConfig,
}

impl std::fmt::Debug for CoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoreConfig")
            .field("http_client", &"HttpClient { ... }")
            .field("search", &self.search)
            .field("spotify", &self.spotify)
            .finish()
    }
}

impl CoreConfig {
    /// Creates a new builder for constructing a `CoreConfig`.
    pub fn builder() -> CoreConfigBuilder {
        CoreConfigBuilder::default()
    }

    /// Validates the configuration and returns an error if invalid.
    pub fn validate(&self) -> Result<()> {
        self.search.validate()
    }
}

#[cfg(feature = "desktop-shims")]
fn provide_default_http_client(search: &SearchConfig) -> Result<Arc<dyn HttpClient>> {
    use bridge_desktop::ReqwestHttpClient;

    let client = ReqwestHttpClient::with_timeout(search.request_timeout).map_err(|e| {
        Error::CapabilityMissing {
            capability: "HttpClient".to_string(),
            message: e.to_string(),
        }
    })?;
    Ok(Arc::new(client))
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_http_client(_search: &SearchConfig) -> Result<Arc<dyn HttpClient>> {
    Err(Error::CapabilityMissing {
        capability: "HttpClient".to_string(),
        message: "No HTTP client implementation provided. \
                 Desktop: enable the 'desktop-shims' feature to use the reqwest client. \
                 Other hosts: inject an HttpClient with .http_client()."
            .to_string(),
    })
}

/// Builder for constructing [`CoreConfig`] instances.
#[derive(Default)]
pub struct CoreConfigBuilder {
    http_client: Option<Arc<dyn HttpClient>>,
    search: Option<SearchConfig>,
    spotify: Option<SpotifyConfig>,
}

impl CoreConfigBuilder {
    /// Sets the HTTP client implementation.
    pub fn http_client(mut self, client: Arc<dyn HttpClient>) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Sets the search settings. Defaults to [`SearchConfig::default`].
    pub fn search(mut self, search: SearchConfig) -> Self {
        self.search = Some(search);
        self
    }

    /// Sets the metadata provider credentials. Defaults to none.
    pub fn spotify(mut self, spotify: SpotifyConfig) -> Self {
        self.spotify = Some(spotify);
        self
    }

    /// Builds the final `CoreConfig` instance.
    ///
    /// # Errors
    ///
    /// - [`Error::CapabilityMissing`] if no HTTP client is available
    /// - [`Error::Config`] if the search settings are invalid
    pub fn build(self) -> Result<CoreConfig> {
        let search = self.search.unwrap_or_default();
        search.validate()?;

        let http_client = match self.http_client {
            Some(client) => client,
            None => provide_default_http_client(&search)?,
        };

        Ok(CoreConfig {
            http_client,
            search,
            spotify: self.spotify.unwrap_or_default(),
        })
    }
}
