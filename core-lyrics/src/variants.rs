//! # Variant Generation
//!
//! Free lyrics services look songs up by near-exact artist/title strings, so
//! the search enumerates a handful of normalized spellings instead of relying
//! on fuzzy matching at the source.
//!
//! Title variants, in order:
//! 1. the original title
//! 2. a trailing remaster/live/remix/year marker stripped
//! 3. `(...)` groups removed
//! 4. `[...]` groups removed
//! 5. the text before the first `" - "`
//! 6. the text before the first `" ("`
//!
//! Artist variants, in order: the original, a leading "The " removed,
//! "The " prepended, then aliases for a few multi-word band names.
//!
//! Both lists are de-duplicated with first-seen order preserved.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Shortest title variant worth sending to a source
pub const MIN_TITLE_VARIANT_LENGTH: usize = 3;

static TRAILING_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\s*-?\s*(remastered|remaster|live|acoustic|remix|edit|version|mix|20(?:09|1\d|2[0-5])).*$",
    )
    .expect("trailing marker pattern is valid")
});

static PARENTHESIZED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*\([^)]*\)").expect("parenthesis pattern is valid"));

static BRACKETED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*\[[^\]]*\]").expect("bracket pattern is valid"));

static LEADING_THE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^the\s+").expect("leading article pattern is valid"));

/// Multi-word band names that some sources index with different spacing.
const BAND_ALIASES: &[(&str, &[&str])] = &[
    ("led zeppelin", &["Led Zeppelin", "LedZeppelin"]),
    ("pink floyd", &["Pink Floyd", "PinkFloyd"]),
    ("deep purple", &["Deep Purple", "DeepPurple"]),
];

/// Transformation that produced a [`Variant`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VariantKind {
    Original,
    SuffixStripped,
    ParenthesesRemoved,
    BracketsRemoved,
    BeforeDash,
    BeforeParenthesis,
    ArticleRemoved,
    ArticleAdded,
    Alias,
}

/// A candidate spelling of an artist or title.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Variant {
    pub value: String,
    pub kind: VariantKind,
}

impl Variant {
    pub fn new(value: impl Into<String>, kind: VariantKind) -> Self {
        Self {
            value: value.into(),
            kind,
        }
    }
}

/// Ordered title variants. Variants shorter than three characters are dropped.
pub fn title_variants(title: &str) -> Vec<Variant> {
    let candidates = [
        Variant::new(title, VariantKind::Original),
        Variant::new(
            TRAILING_MARKER.replace(title, "").trim(),
            VariantKind::SuffixStripped,
        ),
        Variant::new(
            PARENTHESIZED.replace_all(title, "").trim(),
            VariantKind::ParenthesesRemoved,
        ),
        Variant::new(
            BRACKETED.replace_all(title, "").trim(),
            VariantKind::BracketsRemoved,
        ),
        Variant::new(before(title, " - "), VariantKind::BeforeDash),
        Variant::new(before(title, " ("), VariantKind::BeforeParenthesis),
    ];

    dedup(
        candidates
            .into_iter()
            .filter(|v| v.value.chars().count() >= MIN_TITLE_VARIANT_LENGTH),
    )
}

/// Ordered artist variants.
///
/// No length filter applies here, so short names such as "U2" survive.
pub fn artist_variants(artist: &str) -> Vec<Variant> {
    let mut candidates = vec![
        Variant::new(artist, VariantKind::Original),
        Variant::new(LEADING_THE.replace(artist, ""), VariantKind::ArticleRemoved),
        Variant::new(format!("The {}", artist), VariantKind::ArticleAdded),
    ];

    let lowered = artist.to_lowercase();
    for (needle, aliases) in BAND_ALIASES {
        if lowered.contains(needle) {
            candidates.extend(
                aliases
                    .iter()
                    .map(|alias| Variant::new(*alias, VariantKind::Alias)),
            );
        }
    }

    dedup(candidates.into_iter().filter(|v| !v.value.trim().is_empty()))
}

fn before<'a>(text: &'a str, delimiter: &str) -> &'a str {
    text.split(delimiter).next().unwrap_or(text).trim()
}

fn dedup(variants: impl Iterator<Item = Variant>) -> Vec<Variant> {
    let mut seen = HashSet::new();
    variants
        .filter(|variant| seen.insert(variant.value.clone()))
        .collect()
}
