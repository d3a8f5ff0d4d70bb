//! Records exchanged with the presentation layer.
//!
//! Field names serialize in camelCase (`albumCover`, `imageUrl`,
//! `followerCount`) and the default values below are part of the contract
//! the presentation layer renders against.

use serde::{Deserialize, Serialize};

/// Artist shown when no artist could be resolved
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";

/// Album shown when the metadata provider has no match
pub const UNKNOWN_ALBUM: &str = "Unknown Album";

/// Cover image shown when the metadata provider has no artwork
pub const DEFAULT_ALBUM_COVER: &str =
    "https://via.placeholder.com/300x300/1f2937/10b981?text=🎵";

/// Diagnostic text returned in place of lyrics when every source came up empty.
///
/// The wording is a compatibility contract with existing presentation layers
/// and must stay byte-for-byte stable, including the two spaces after
/// "verfügbar".
pub fn missing_lyrics_message(query: &str) -> String {
    format!(
        concat!(
            "🔍 Keine Lyrics gefunden für \"{}\"\n",
            "\n",
            "Mögliche Gründe:\n",
            "• Lyrics noch nicht verfügbar  \n",
            "• Song zu neu oder unbekannt\n",
            "• API-Probleme\n",
            "\n",
            "💡 Tipp: Nutze die Dropdown-Vorschläge für bessere Ergebnisse!",
        ),
        query
    )
}

/// Best-guess `{artist, title}` interpretation of a query.
///
/// Either side may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParsedCandidate {
    pub artist: String,
    pub title: String,
}

impl ParsedCandidate {
    pub fn new(artist: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            artist: artist.into(),
            title: title.into(),
        }
    }

    /// Both artist and title are non-empty
    pub fn is_complete(&self) -> bool {
        !self.artist.is_empty() && !self.title.is_empty()
    }
}

/// Album name and cover art for a resolved song.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumInfo {
    pub album: String,
    pub album_cover: String,
}

impl Default for AlbumInfo {
    fn default() -> Self {
        Self {
            album: UNKNOWN_ALBUM.to_string(),
            album_cover: DEFAULT_ALBUM_COVER.to_string(),
        }
    }
}

impl AlbumInfo {
    /// Build from provider fields, substituting defaults for anything missing.
    pub fn from_parts(album: Option<&str>, cover_url: Option<&str>) -> Self {
        let album = album
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .unwrap_or(UNKNOWN_ALBUM);
        let album_cover = cover_url
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(DEFAULT_ALBUM_COVER);

        Self {
            album: album.to_string(),
            album_cover: album_cover.to_string(),
        }
    }
}

/// Terminal artifact handed to the presentation layer.
///
/// `lyrics` is never empty: when no source matched it holds
/// [`missing_lyrics_message`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SongRecord {
    pub title: String,
    pub artist: String,
    pub lyrics: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album_cover: Option<String>,
}

/// Artist entry in a suggestion list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtistSuggestion {
    pub artist: String,
    pub image_url: Option<String>,
    pub follower_count: u64,
}

/// Track entry in a suggestion list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackSuggestion {
    pub artist: String,
    pub title: String,
    pub album: String,
    pub image_url: Option<String>,
}

impl TrackSuggestion {
    /// Case-insensitive identity used for de-duplication
    pub fn dedup_key(&self) -> (String, String) {
        (self.artist.to_lowercase(), self.title.to_lowercase())
    }
}

impl From<&TrackSuggestion> for ParsedCandidate {
    fn from(track: &TrackSuggestion) -> Self {
        ParsedCandidate::new(track.artist.clone(), track.title.clone())
    }
}

/// Candidate offered to disambiguate a partial query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Suggestion {
    Artist(ArtistSuggestion),
    Track(TrackSuggestion),
}

impl Suggestion {
    pub fn as_track(&self) -> Option<&TrackSuggestion> {
        match self {
            Suggestion::Track(track) => Some(track),
            Suggestion::Artist(_) => None,
        }
    }

    pub fn as_artist(&self) -> Option<&ArtistSuggestion> {
        match self {
            Suggestion::Artist(artist) => Some(artist),
            Suggestion::Track(_) => None,
        }
    }
}
