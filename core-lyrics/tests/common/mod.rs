//! Shared fixtures: an in-memory HTTP client routing by URL prefix.

#![allow(dead_code)]

use async_trait::async_trait;
use bridge_traits::error::{BridgeError, Result};
use bridge_traits::http::{HttpClient, HttpRequest, HttpResponse};
use core_lyrics::{
    default_sources, MetadataResolver, ResolutionOrchestrator, SourceMatchEngine, SpotifyClient,
    SuggestionAggregator,
};
use core_runtime::config::{SearchConfig, SpotifyConfig};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const LYRICS: &str = "Is this the real life?\nIs this just fantasy?\n\
                          Caught in a landslide\nNo escape from reality";

pub const TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const SEARCH_URL: &str = "https://api.spotify.com/v1/search";

/// Answers requests from a route table; unknown URLs fail like a refused connection.
#[derive(Default)]
pub struct RoutedHttp {
    routes: Vec<(Route, u16, String)>,
    requests: Mutex<Vec<String>>,
}

impl RoutedHttp {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer requests for exactly `url`
    pub fn route(mut self, url: &str, status: u16, body: &str) -> Self {
        self.routes
            .push((Route::Exact(url.to_string()), status, body.to_string()));
        self
    }

    /// Answer every request whose URL starts with `prefix`
    pub fn route_prefix(mut self, prefix: &str, status: u16, body: &str) -> Self {
        self.routes
            .push((Route::Prefix(prefix.to_string()), status, body.to_string()));
        self
    }

    /// Token endpoint plus a search endpoint returning `search_body` for every query.
    pub fn with_spotify(self, search_body: &str) -> Self {
        self.route(
            TOKEN_URL,
            200,
            r#"{"access_token":"test-token","token_type":"Bearer","expires_in":3600}"#,
        )
        .route_prefix(SEARCH_URL, 200, search_body)
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, prefix: &str) -> Vec<String> {
        self.requests()
            .into_iter()
            .filter(|url| url.starts_with(prefix))
            .collect()
    }
}

enum Route {
    Exact(String),
    Prefix(String),
}

impl Route {
    fn matches(&self, url: &str) -> bool {
        match self {
            Route::Exact(expected) => url == expected,
            Route::Prefix(prefix) => url.starts_with(prefix.as_str()),
        }
    }
}

#[async_trait]
impl HttpClient for RoutedHttp {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        self.requests.lock().unwrap().push(request.url.clone());

        self.routes
            .iter()
            .find(|(route, _, _)| route.matches(&request.url))
            .map(|(_, status, body)| HttpResponse::new(*status, body.clone()))
            .ok_or_else(|| {
                BridgeError::OperationFailed(format!("Connection refused: {}", request.url))
            })
    }
}

pub fn lyrics_body(text: &str) -> String {
    serde_json::json!({ "lyrics": text }).to_string()
}

pub fn search_config() -> SearchConfig {
    SearchConfig::default().with_pacing_delay(Duration::ZERO)
}

pub fn credentials() -> SpotifyConfig {
    SpotifyConfig::new().with_credentials("client-id", "client-secret")
}

pub fn orchestrator(http: Arc<RoutedHttp>, spotify: SpotifyConfig) -> ResolutionOrchestrator {
    let search = search_config();
    let provider = Arc::new(SpotifyClient::new(http.clone(), spotify));
    let engine = SourceMatchEngine::new(default_sources(http, search.request_timeout), search);
    ResolutionOrchestrator::new(MetadataResolver::new(provider), engine)
}

pub fn aggregator(http: Arc<RoutedHttp>) -> SuggestionAggregator {
    SuggestionAggregator::new(Arc::new(SpotifyClient::new(http, credentials())))
}
