//! End-to-end resolution tests
//!
//! Runs the orchestrator against the real Spotify client and lyrics sources
//! over an in-memory HTTP client:
//! - Heuristic fallback when the metadata provider has no match
//! - Source priority and short-circuit ordering
//! - Placeholder substitution when every source fails
//! - Empty input and cancellation

mod common;

use common::*;
use core_lyrics::{
    missing_lyrics_message, title_variants, Interpretation, LyricsError, ParsedCandidate,
    DEFAULT_ALBUM_COVER, UNKNOWN_ALBUM,
};
use core_runtime::config::SpotifyConfig;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

const NO_TRACKS: &str = r#"{"tracks":{"items":[]}}"#;

#[tokio::test]
async fn test_unmatched_query_falls_back_to_parse() {
    let http = Arc::new(
        RoutedHttp::new()
            .with_spotify(NO_TRACKS)
            .route(
                "https://api.lyrics.ovh/v1/Queen/Bohemian%20Rhapsody",
                200,
                &lyrics_body(&format!("\n{}\n", LYRICS)),
            ),
    );
    let orchestrator = orchestrator(http.clone(), credentials());

    let resolution = orchestrator
        .resolve_detailed("Queen - Bohemian Rhapsody", None, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(resolution.interpretation, Interpretation::HeuristicParse);
    assert_eq!(resolution.record.artist, "Queen");
    assert_eq!(resolution.record.title, "Bohemian Rhapsody");
    assert_eq!(resolution.record.lyrics, LYRICS);
    assert_eq!(resolution.lookup.source.as_deref(), Some("lyrics.ovh"));
    assert_eq!(resolution.record.album.as_deref(), Some(UNKNOWN_ALBUM));
    assert_eq!(http.requests_to("https://api.lyrics.ovh").len(), 1);
}

#[tokio::test]
async fn test_empty_query_makes_no_calls() {
    let http = Arc::new(RoutedHttp::new().with_spotify(NO_TRACKS));
    let orchestrator = orchestrator(http.clone(), credentials());

    assert!(orchestrator.resolve("", None).await.is_none());
    assert!(orchestrator.resolve("   ", None).await.is_none());
    assert!(http.requests().is_empty());
}

#[tokio::test]
async fn test_unreachable_sources_yield_placeholder() {
    let http = Arc::new(RoutedHttp::new().with_spotify(NO_TRACKS));
    let orchestrator = orchestrator(http.clone(), credentials());

    let record = orchestrator
        .resolve("adele hello", None)
        .await
        .unwrap();

    assert_eq!(record.lyrics, missing_lyrics_message("adele hello"));
    assert!(record.lyrics.contains("adele hello"));
    assert_eq!(record.album.as_deref(), Some(UNKNOWN_ALBUM));
    assert_eq!(record.album_cover.as_deref(), Some(DEFAULT_ALBUM_COVER));

    // Every source was tried for "adele"/"The adele" × "hello"
    assert_eq!(http.requests_to("https://api.lyrics.ovh").len(), 2);
    assert_eq!(http.requests_to("https://lyrist.vercel.app").len(), 2);
    assert_eq!(http.requests_to("https://api.textyl.co").len(), 2);
}

#[tokio::test]
async fn test_second_source_third_title_variant_stops_search() {
    let title = "Thank You (Live) [Remastered]";
    let third = title_variants(title)[2].value.clone();
    let lyrist_url = format!(
        "https://lyrist.vercel.app/api/{}/Led%20Zeppelin",
        urlencoding::encode(&third)
    );

    let http = Arc::new(RoutedHttp::new().route(&lyrist_url, 200, &lyrics_body(LYRICS)));
    let orchestrator = orchestrator(http.clone(), SpotifyConfig::new());
    let selected = ParsedCandidate::new("Led Zeppelin", title);

    let resolution = orchestrator
        .resolve_detailed("", Some(&selected), &CancellationToken::new())
        .await
        .unwrap();

    assert!(resolution.lookup.found);
    assert_eq!(resolution.lookup.source.as_deref(), Some("lyrist"));
    assert_eq!(resolution.record.title, title);
    assert_eq!(http.requests_to("https://lyrist.vercel.app").len(), 3);
    assert!(http.requests_to("https://api.textyl.co").is_empty());
}

#[tokio::test]
async fn test_provider_match_drives_lyrics_lookup() {
    let tracks = r#"{
        "tracks": {"items": [{
            "name": "Bohemian Rhapsody - Remastered 2011",
            "artists": [{"name": "Queen"}],
            "album": {"name": "A Night at the Opera", "images": [{"url": "https://i.scdn.co/anato.jpg"}]}
        }]}
    }"#;
    let http = Arc::new(
        RoutedHttp::new()
            .with_spotify(tracks)
            .route(
                "https://api.lyrics.ovh/v1/Queen/Bohemian%20Rhapsody",
                200,
                &lyrics_body(LYRICS),
            ),
    );
    let orchestrator = orchestrator(http.clone(), credentials());

    let resolution = orchestrator
        .resolve_detailed("bohemian rhapsody", None, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(resolution.interpretation, Interpretation::ProviderConfirmed);
    assert_eq!(resolution.record.title, "Bohemian Rhapsody - Remastered 2011");
    assert_eq!(resolution.record.album_cover.as_deref(), Some("https://i.scdn.co/anato.jpg"));
    // Original title first, then the suffix-stripped variant matched
    assert_eq!(
        resolution.lookup.title_variant.map(|v| v.value),
        Some("Bohemian Rhapsody".to_string())
    );
}

#[tokio::test]
async fn test_invalid_payloads_are_skipped() {
    let http = Arc::new(
        RoutedHttp::new()
            .with_spotify(NO_TRACKS)
            .route_prefix(
                "https://api.lyrics.ovh/v1/Queen/",
                200,
                &lyrics_body("No lyrics found"),
            )
            .route_prefix(
                "https://lyrist.vercel.app/api/",
                200,
                &lyrics_body("Error: Lyrics NOT FOUND on this service for now\n\n\n"),
            )
            .route_prefix("https://api.textyl.co/api/lyrics", 200, &lyrics_body(LYRICS)),
    );
    let orchestrator = orchestrator(http.clone(), credentials());

    let record = orchestrator
        .resolve("Queen - Bohemian Rhapsody", None)
        .await
        .unwrap();

    assert_eq!(record.lyrics, LYRICS);
}

#[tokio::test]
async fn test_cancelled_resolution_reports_cancelled() {
    let http = Arc::new(RoutedHttp::new().with_spotify(NO_TRACKS));
    let orchestrator = orchestrator(http.clone(), credentials());

    let cancel = CancellationToken::new();
    cancel.cancel();

    let result = orchestrator
        .resolve_detailed("queen bohemian rhapsody", None, &cancel)
        .await;

    assert!(matches!(result, Err(LyricsError::Cancelled)));
    assert!(http.requests_to("https://api.lyrics.ovh").is_empty());
}
