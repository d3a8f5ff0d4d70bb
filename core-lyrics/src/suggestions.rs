//! # Suggestion Aggregation
//!
//! Builds typed suggestion lists for partial input from a
//! [`MetadataProvider`].
//!
//! `suggest` output order:
//! 1. For each of the first three matching artists, an artist entry followed
//!    by up to eight of that artist's own tracks
//! 2. General track matches not already listed
//!
//! Track entries are unique by case-insensitive `(artist, title)`. A failed
//! provider call contributes nothing; the rest of the list is still built.

use crate::error::Result;
use crate::metadata::{ArtistRecord, MetadataProvider, TrackRecord};
use crate::models::{ArtistSuggestion, Suggestion, TrackSuggestion};
use futures::future::join_all;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, warn};

/// Inputs shorter than this produce no suggestions
pub const MIN_QUERY_LENGTH: usize = 2;

const ARTIST_SEARCH_LIMIT: u32 = 5;
const EXPANDED_ARTISTS: usize = 3;
const ARTIST_TRACK_SEARCH_LIMIT: u32 = 10;
const TRACKS_PER_ARTIST: usize = 8;
const TRACK_SEARCH_LIMIT: u32 = 15;
const ARTIST_PAGE_SIZE: u32 = 20;

pub struct SuggestionAggregator {
    provider: Arc<dyn MetadataProvider>,
}

impl SuggestionAggregator {
    pub fn new(provider: Arc<dyn MetadataProvider>) -> Self {
        Self { provider }
    }

    /// Suggestions for partial input
    pub async fn suggest(&self, query: &str) -> Vec<Suggestion> {
        let query = query.trim();
        if query.chars().count() < MIN_QUERY_LENGTH {
            return Vec::new();
        }

        let Some(token) = self.token().await else {
            return Vec::new();
        };

        let (artists, tracks) = tokio::join!(
            self.provider
                .search_artists(&token, query, ARTIST_SEARCH_LIMIT),
            self.provider.search_tracks(&token, query, TRACK_SEARCH_LIMIT),
        );
        let artists = or_empty(artists, "search_artists");
        let tracks = or_empty(tracks, "search_tracks");

        let expanded: Vec<&ArtistRecord> = artists.iter().take(EXPANDED_ARTISTS).collect();
        let artist_tracks = join_all(expanded.iter().map(|artist| {
            self.provider
                .search_tracks_by_artist(&token, &artist.name, ARTIST_TRACK_SEARCH_LIMIT)
        }))
        .await;

        let mut seen = HashSet::new();
        let mut suggestions = Vec::new();

        for (artist, their_tracks) in expanded.into_iter().zip(artist_tracks) {
            suggestions.push(artist_suggestion(artist));
            suggestions.extend(
                own_tracks(&artist.name, or_empty(their_tracks, "search_tracks_by_artist"))
                    .filter(|track| seen.insert(track.dedup_key()))
                    .take(TRACKS_PER_ARTIST)
                    .map(Suggestion::Track),
            );
        }

        suggestions.extend(
            tracks
                .into_iter()
                .map(track_suggestion)
                .filter(|track| seen.insert(track.dedup_key()))
                .map(Suggestion::Track),
        );

        debug!(query, count = suggestions.len(), "Built suggestions");
        suggestions
    }

    /// One artist header followed by that artist's own tracks.
    pub async fn suggest_by_artist(&self, artist_name: &str) -> Vec<Suggestion> {
        let artist_name = artist_name.trim();
        if artist_name.is_empty() {
            return Vec::new();
        }

        let Some(token) = self.token().await else {
            return Vec::new();
        };

        let (artists, tracks) = tokio::join!(
            self.provider.search_artists(&token, artist_name, 1),
            self.provider
                .search_tracks_by_artist(&token, artist_name, ARTIST_PAGE_SIZE),
        );

        let header = or_empty(artists, "search_artists")
            .first()
            .map(artist_suggestion)
            .unwrap_or_else(|| {
                Suggestion::Artist(ArtistSuggestion {
                    artist: artist_name.to_string(),
                    image_url: None,
                    follower_count: 0,
                })
            });

        let mut seen = HashSet::new();
        let mut suggestions = vec![header];
        suggestions.extend(
            own_tracks(artist_name, or_empty(tracks, "search_tracks_by_artist"))
                .filter(|track| seen.insert(track.dedup_key()))
                .map(Suggestion::Track),
        );

        debug!(artist = artist_name, count = suggestions.len(), "Built artist suggestions");
        suggestions
    }

    async fn token(&self) -> Option<String> {
        match self.provider.access_token().await {
            Ok(token) => token,
            Err(e) => {
                warn!(error = %e, "Could not obtain metadata access token");
                None
            }
        }
    }
}

fn or_empty<T>(result: Result<Vec<T>>, operation: &str) -> Vec<T> {
    result.unwrap_or_else(|e| {
        warn!(operation, error = %e, "Suggestion lookup failed");
        Vec::new()
    })
}

/// Tracks whose primary artist is exactly `artist`, ignoring case.
fn own_tracks(artist: &str, tracks: Vec<TrackRecord>) -> impl Iterator<Item = TrackSuggestion> {
    let wanted = artist.to_lowercase();
    tracks
        .into_iter()
        .filter(move |track| track.artist.to_lowercase() == wanted)
        .map(track_suggestion)
}

fn artist_suggestion(artist: &ArtistRecord) -> Suggestion {
    Suggestion::Artist(ArtistSuggestion {
        artist: artist.name.clone(),
        image_url: artist.image_url.clone(),
        follower_count: artist.follower_count,
    })
}

fn track_suggestion(track: TrackRecord) -> TrackSuggestion {
    TrackSuggestion {
        artist: track.artist,
        title: track.title,
        album: track.album,
        image_url: track.cover_url,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LyricsError;
    use crate::metadata::mocks::{track, MockProvider};

    fn artist(name: &str, followers: u64) -> ArtistRecord {
        ArtistRecord {
            name: name.to_string(),
            image_url: Some(format!("https://img/{}.jpg", name.to_lowercase())),
            follower_count: followers,
        }
    }

    fn with_token(provider: &mut MockProvider) {
        provider
            .expect_access_token()
            .returning(|| Ok(Some("token".to_string())));
    }

    #[tokio::test]
    async fn test_short_input_issues_no_calls() {
        let mut provider = MockProvider::new();
        provider.expect_access_token().never();
        provider.expect_search_artists().never();
        provider.expect_search_tracks().never();

        let aggregator = SuggestionAggregator::new(Arc::new(provider));
        assert!(aggregator.suggest("").await.is_empty());
        assert!(aggregator.suggest("a").await.is_empty());
        assert!(aggregator.suggest("  b  ").await.is_empty());
    }

    #[tokio::test]
    async fn test_artist_blocks_then_general_tracks() {
        let mut provider = MockProvider::new();
        with_token(&mut provider);
        provider
            .expect_search_artists()
            .withf(|_, query, limit| query == "queen" && *limit == 5)
            .returning(|_, _, _| {
                Ok(vec![artist("Queen", 100), artist("Queens of the Stone Age", 50)])
            });
        provider
            .expect_search_tracks_by_artist()
            .withf(|_, name, limit| name == "Queen" && *limit == 10)
            .returning(|_, _, _| {
                Ok(vec![
                    track("Queen", "Bohemian Rhapsody", "A Night at the Opera"),
                    track("David Bowie", "Under Pressure", "Hot Space"),
                    track("QUEEN", "Don't Stop Me Now", "Jazz"),
                ])
            });
        provider
            .expect_search_tracks_by_artist()
            .withf(|_, name, _| name == "Queens of the Stone Age")
            .returning(|_, _, _| {
                Ok(vec![track(
                    "Queens of the Stone Age",
                    "No One Knows",
                    "Songs for the Deaf",
                )])
            });
        provider
            .expect_search_tracks()
            .withf(|_, query, limit| query == "queen" && *limit == 15)
            .returning(|_, _, _| {
                Ok(vec![
                    track("queen", "bohemian rhapsody", "Greatest Hits"),
                    track("Dancing Queen Tribute", "Dancing Queen", "Covers"),
                ])
            });

        let aggregator = SuggestionAggregator::new(Arc::new(provider));
        let suggestions = aggregator.suggest("queen").await;

        let labels: Vec<String> = suggestions
            .iter()
            .map(|s| match s {
                Suggestion::Artist(a) => format!("artist:{}", a.artist),
                Suggestion::Track(t) => format!("track:{}/{}", t.artist, t.title),
            })
            .collect();

        assert_eq!(
            labels,
            vec![
                "artist:Queen",
                "track:Queen/Bohemian Rhapsody",
                "track:QUEEN/Don't Stop Me Now",
                "artist:Queens of the Stone Age",
                "track:Queens of the Stone Age/No One Knows",
                "track:Dancing Queen Tribute/Dancing Queen",
            ]
        );
    }

    #[tokio::test]
    async fn test_tracks_are_unique_ignoring_case() {
        let mut provider = MockProvider::new();
        with_token(&mut provider);
        provider
            .expect_search_artists()
            .returning(|_, _, _| Ok(vec![artist("Adele", 10)]));
        provider.expect_search_tracks_by_artist().returning(|_, _, _| {
            Ok(vec![
                track("Adele", "Hello", "25"),
                track("adele", "HELLO", "25 (Deluxe)"),
            ])
        });
        provider.expect_search_tracks().returning(|_, _, _| {
            Ok(vec![track("ADELE", "hello", "Live"), track("Adele", "Skyfall", "Skyfall")])
        });

        let aggregator = SuggestionAggregator::new(Arc::new(provider));
        let suggestions = aggregator.suggest("adele").await;

        let mut keys = HashSet::new();
        for track in suggestions.iter().filter_map(Suggestion::as_track) {
            assert!(keys.insert(track.dedup_key()), "duplicate {:?}", track);
        }
        assert_eq!(keys.len(), 2);
    }

    #[tokio::test]
    async fn test_per_artist_tracks_are_capped() {
        let mut provider = MockProvider::new();
        with_token(&mut provider);
        provider
            .expect_search_artists()
            .returning(|_, _, _| Ok(vec![artist("Adele", 10)]));
        provider.expect_search_tracks_by_artist().returning(|_, _, _| {
            Ok((0..10).map(|i| track("Adele", &format!("Song {}", i), "Album")).collect())
        });
        provider.expect_search_tracks().returning(|_, _, _| Ok(Vec::new()));

        let aggregator = SuggestionAggregator::new(Arc::new(provider));
        let suggestions = aggregator.suggest("adele").await;

        assert_eq!(suggestions.len(), 1 + 8);
    }

    #[tokio::test]
    async fn test_only_three_artists_are_expanded() {
        let mut provider = MockProvider::new();
        with_token(&mut provider);
        provider.expect_search_artists().returning(|_, _, _| {
            Ok(vec![
                artist("A1", 5),
                artist("A2", 4),
                artist("A3", 3),
                artist("A4", 2),
                artist("A5", 1),
            ])
        });
        provider
            .expect_search_tracks_by_artist()
            .times(3)
            .returning(|_, _, _| Ok(Vec::new()));
        provider.expect_search_tracks().returning(|_, _, _| Ok(Vec::new()));

        let aggregator = SuggestionAggregator::new(Arc::new(provider));
        let suggestions = aggregator.suggest("a-band").await;

        assert_eq!(suggestions.iter().filter_map(Suggestion::as_artist).count(), 3);
    }

    #[tokio::test]
    async fn test_failed_artist_search_keeps_general_tracks() {
        let mut provider = MockProvider::new();
        with_token(&mut provider);
        provider
            .expect_search_artists()
            .returning(|_, _, _| Err(LyricsError::HttpError { status: 500, body: String::new() }));
        provider.expect_search_tracks_by_artist().never();
        provider
            .expect_search_tracks()
            .returning(|_, _, _| Ok(vec![track("Adele", "Hello", "25")]));

        let aggregator = SuggestionAggregator::new(Arc::new(provider));
        let suggestions = aggregator.suggest("hello").await;

        assert_eq!(suggestions.len(), 1);
        assert!(suggestions[0].as_track().is_some());
    }

    #[tokio::test]
    async fn test_no_token_means_no_suggestions() {
        let mut provider = MockProvider::new();
        provider.expect_access_token().returning(|| Ok(None));
        provider.expect_search_artists().never();

        let aggregator = SuggestionAggregator::new(Arc::new(provider));
        assert!(aggregator.suggest("queen").await.is_empty());
        assert!(aggregator.suggest_by_artist("Queen").await.is_empty());
    }

    #[tokio::test]
    async fn test_suggest_by_artist_filters_strictly() {
        let mut provider = MockProvider::new();
        with_token(&mut provider);
        provider
            .expect_search_artists()
            .withf(|_, query, limit| query == "Daft Punk" && *limit == 1)
            .returning(|_, _, _| Ok(vec![artist("Daft Punk", 9_000_000)]));
        provider
            .expect_search_tracks_by_artist()
            .withf(|_, name, limit| name == "Daft Punk" && *limit == 20)
            .returning(|_, _, _| {
                Ok(vec![
                    track("Daft Punk", "One More Time", "Discovery"),
                    track("The Weeknd", "Starboy", "Starboy"),
                    track("daft punk", "Around the World", "Homework"),
                ])
            });

        let aggregator = SuggestionAggregator::new(Arc::new(provider));
        let suggestions = aggregator.suggest_by_artist("Daft Punk").await;

        assert_eq!(suggestions.len(), 3);
        assert_eq!(
            suggestions[0].as_artist().map(|a| a.follower_count),
            Some(9_000_000)
        );
        assert!(suggestions[1..]
            .iter()
            .filter_map(Suggestion::as_track)
            .all(|t| t.artist.eq_ignore_ascii_case("daft punk")));
    }

    #[tokio::test]
    async fn test_suggest_by_artist_defaults_header() {
        let mut provider = MockProvider::new();
        with_token(&mut provider);
        provider.expect_search_artists().returning(|_, _, _| Ok(Vec::new()));
        provider
            .expect_search_tracks_by_artist()
            .returning(|_, _, _| Ok(Vec::new()));

        let aggregator = SuggestionAggregator::new(Arc::new(provider));
        let suggestions = aggregator.suggest_by_artist("Obscure Band").await;

        assert_eq!(
            suggestions,
            vec![Suggestion::Artist(ArtistSuggestion {
                artist: "Obscure Band".to_string(),
                image_url: None,
                follower_count: 0,
            })]
        );
    }
}
