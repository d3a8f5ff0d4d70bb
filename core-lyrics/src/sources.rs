//! # Lyrics Sources
//!
//! Each source turns an `(artist, title)` pair into one HTTP request and
//! knows how to pull candidate text out of the response. Validation is the
//! engine's job; a source only reports what the service returned.
//!
//! Built-in sources, in priority order:
//!
//! | Priority | Source      | Endpoint |
//! |----------|-------------|----------|
//! | 1        | lyrics.ovh  | `GET /v1/{artist}/{title}` |
//! | 2        | lyrist      | `GET /api/{title}/{artist}` |
//! | 3        | textyl      | `GET /api/lyrics?q={artist} {title}` |

use crate::error::{LyricsError, Result};
use async_trait::async_trait;
use bridge_traits::http::{HttpClient, HttpRequest, HttpResponse, RetryPolicy};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

const LYRICS_OVH_BASE: &str = "https://api.lyrics.ovh";
const LYRIST_BASE: &str = "https://lyrist.vercel.app";
const TEXTYL_BASE: &str = "https://api.textyl.co";

/// A content provider queried by the match engine.
#[async_trait]
pub trait LyricsSource: Send + Sync {
    /// Identifier used in logs and lookup results
    fn name(&self) -> &str;

    /// Lower values are tried first
    fn priority(&self) -> u32;

    /// Issue the lookup request.
    ///
    /// Transport failures and non-2xx statuses are errors.
    async fn request(&self, artist: &str, title: &str) -> Result<HttpResponse>;

    /// Extract trimmed candidate text from a successful response.
    fn parse(&self, response: &HttpResponse) -> Option<String>;
}

#[derive(Debug, Deserialize)]
struct LyricsPayload {
    #[serde(default)]
    lyrics: Option<String>,
    #[serde(default)]
    song: Option<String>,
}

fn non_empty(text: Option<String>) -> Option<String> {
    text.map(|t| t.trim().to_string()).filter(|t| !t.is_empty())
}

fn payload(response: &HttpResponse) -> Option<LyricsPayload> {
    response.json::<LyricsPayload>().ok()
}

/// Shared request plumbing for the HTTP-backed sources.
#[derive(Clone)]
struct SourceClient {
    http_client: Arc<dyn HttpClient>,
    base_url: String,
    timeout: Duration,
}

impl SourceClient {
    fn new(http_client: Arc<dyn HttpClient>, base_url: &str, timeout: Duration) -> Self {
        Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        }
    }

    async fn get(&self, provider: &str, url: String) -> Result<HttpResponse> {
        debug!(source = provider, url = %url, "Requesting lyrics");

        let request = HttpRequest::get(url)
            .header("Accept", "application/json")
            .timeout(self.timeout);

        // Variants already multiply the request count, so no transport retries
        let response = self
            .http_client
            .execute_with_retry(request, RetryPolicy::no_retry())
            .await?;

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
                provider: provider.to_string(),
                retry_after_seconds: retry_after,
            });
        }

        Err(LyricsError::HttpError {
            status: response.status,
            body: String::from_utf8_lossy(&response.body).to_string(),
        })
    }
}

/// [lyrics.ovh](https://lyrics.ovh) lookup by exact artist and title
pub struct LyricsOvhSource {
    client: SourceClient,
}

impl LyricsOvhSource {
    pub const NAME: &'static str = "lyrics.ovh";

    pub fn new(http_client: Arc<dyn HttpClient>, timeout: Duration) -> Self {
        Self::with_base_url(http_client, LYRICS_OVH_BASE, timeout)
    }

    pub fn with_base_url(
        http_client: Arc<dyn HttpClient>,
        base_url: &str,
        timeout: Duration,
    ) -> Self {
        Self {
            client: SourceClient::new(http_client, base_url, timeout),
        }
    }
}

#[async_trait]
impl LyricsSource for LyricsOvhSource {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn priority(&self) -> u32 {
        1
    }

    async fn request(&self, artist: &str, title: &str) -> Result<HttpResponse> {
        let url = format!(
            "{}/v1/{}/{}",
            self.client.base_url,
            urlencoding::encode(artist),
            urlencoding::encode(title)
        );
        self.client.get(Self::NAME, url).await
    }

    fn parse(&self, response: &HttpResponse) -> Option<String> {
        non_empty(payload(response)?.lyrics)
    }
}

/// Lyrist API; path order is title first. Falls back to the `song` field.
pub struct LyristSource {
    client: SourceClient,
}

impl LyristSource {
    pub const NAME: &'static str = "lyrist";

    pub fn new(http_client: Arc<dyn HttpClient>, timeout: Duration) -> Self {
        Self::with_base_url(http_client, LYRIST_BASE, timeout)
    }

    pub fn with_base_url(
        http_client: Arc<dyn HttpClient>,
        base_url: &str,
        timeout: Duration,
    ) -> Self {
        Self {
            client: SourceClient::new(http_client, base_url, timeout),
        }
    }
}

#[async_trait]
impl LyricsSource for LyristSource {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn priority(&self) -> u32 {
        2
    }

    async fn request(&self, artist: &str, title: &str) -> Result<HttpResponse> {
        let url = format!(
            "{}/api/{}/{}",
            self.client.base_url,
            urlencoding::encode(title),
            urlencoding::encode(artist)
        );
        self.client.get(Self::NAME, url).await
    }

    fn parse(&self, response: &HttpResponse) -> Option<String> {
        let payload = payload(response)?;
        non_empty(payload.lyrics).or_else(|| non_empty(payload.song))
    }
}

pub struct TextylSource {
    client: SourceClient,
}

impl TextylSource {
    pub const NAME: &'static str = "textyl";

    pub fn new(http_client: Arc<dyn HttpClient>, timeout: Duration) -> Self {
        Self::with_base_url(http_client, TEXTYL_BASE, timeout)
    }

    pub fn with_base_url(
        http_client: Arc<dyn HttpClient>,
        base_url: &str,
        timeout: Duration,
    ) -> Self {
        Self {
            client: SourceClient::new(http_client, base_url, timeout),
        }
    }
}

#[async_trait]
impl LyricsSource for TextylSource {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn priority(&self) -> u32 {
        3
    }

    async fn request(&self, artist: &str, title: &str) -> Result<HttpResponse> {
        let url = format!(
            "{}/api/lyrics?q={}",
            self.client.base_url,
            urlencoding::encode(&format!("{} {}", artist, title))
        );
        self.client.get(Self::NAME, url).await
    }

    fn parse(&self, response: &HttpResponse) -> Option<String> {
        non_empty(payload(response)?.lyrics)
    }
}

/// The built-in sources in priority order.
pub fn default_sources(
    http_client: Arc<dyn HttpClient>,
    timeout: Duration,
) -> Vec<Arc<dyn LyricsSource>> {
    vec![
        Arc::new(LyricsOvhSource::new(http_client.clone(), timeout)),
        Arc::new(LyristSource::new(http_client.clone(), timeout)),
        Arc::new(TextylSource::new(http_client, timeout)),
    ]
}
