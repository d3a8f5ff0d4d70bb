//! # Lyrics Resolution Core
//!
//! Resolves ambiguous free-text song queries into song records with lyrics,
//! and builds suggestion lists for partial input.
//!
//! ## Overview
//!
//! - **Variants** ([`variants`]): normalized artist/title spellings tolerant
//!   to remaster tags, parentheticals and "The" prefixes
//! - **Parser** ([`parser`]): heuristic `{artist, title}` split
//! - **Engine** ([`engine`]): ordered multi-source lyrics search with
//!   validation and short-circuit on first match
//! - **Metadata** ([`metadata`], [`providers`]): provider-confirmed
//!   interpretation and album artwork
//! - **Suggestions** ([`suggestions`]): deduplicated artist/track candidates
//! - **Orchestrator** ([`orchestrator`]): the end-to-end flow
//!
//! ## Usage
//!
//! ```ignore
//! use core_lyrics::{
//!     default_sources, MetadataResolver, ResolutionOrchestrator, SourceMatchEngine, SpotifyClient,
//! };
//!
//! let provider = Arc::new(SpotifyClient::new(http_client.clone(), SpotifyConfig::from_env()));
//! let engine = SourceMatchEngine::new(
//!     default_sources(http_client, search.request_timeout),
//!     search,
//! );
//! let orchestrator = ResolutionOrchestrator::new(MetadataResolver::new(provider), engine);
//!
//! if let Some(song) = orchestrator.resolve("queen bohemian rhapsody", None).await {
//!     println!("{} - {}\n{}", song.artist, song.title, song.lyrics);
//! }
//! ```

mod cancel;

pub mod engine;
pub mod error;
pub mod metadata;
pub mod models;
pub mod orchestrator;
pub mod parser;
pub mod providers;
pub mod sources;
pub mod suggestions;
pub mod variants;

pub use engine::{LookupResult, SourceMatchEngine};
pub use error::{LyricsError, Result};
pub use metadata::{ArtistRecord, MetadataProvider, MetadataResolver, QueryResolution, TrackRecord};
pub use models::{
    missing_lyrics_message, AlbumInfo, ArtistSuggestion, ParsedCandidate, SongRecord, Suggestion,
    TrackSuggestion, DEFAULT_ALBUM_COVER, UNKNOWN_ALBUM, UNKNOWN_ARTIST,
};
pub use orchestrator::{Interpretation, Resolution, ResolutionOrchestrator};
pub use parser::parse_query;
pub use providers::SpotifyClient;
pub use sources::{default_sources, LyricsOvhSource, LyricsSource, LyristSource, TextylSource};
pub use suggestions::SuggestionAggregator;
pub use variants::{artist_variants, title_variants, Variant, VariantKind};
