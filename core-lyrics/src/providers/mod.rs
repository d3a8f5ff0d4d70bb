//! External Metadata Providers
//!
//! Clients for metadata search services implementing
//! [`MetadataProvider`](crate::metadata::MetadataProvider):
//! - Spotify - artist and track search with album artwork

pub mod spotify;

pub use spotify::SpotifyClient;
