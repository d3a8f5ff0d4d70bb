//! Heuristic split of free text into `{artist, title}`.
//!
//! Used only when the metadata provider cannot confirm an interpretation.
//! The word-count tie-break is a fixed guess: three words favour a one-word
//! artist, four or more favour a two-word artist.

use crate::models::ParsedCandidate;

const DELIMITER: &str = " - ";

/// Split `query` into a best-guess artist and title.
pub fn parse_query(query: &str) -> ParsedCandidate {
    if query.matches(DELIMITER).count() == 1 {
        if let Some((artist, title)) = query.split_once(DELIMITER) {
            return ParsedCandidate::new(artist.trim(), title.trim());
        }
    }

    let words: Vec<&str> = query.split_whitespace().collect();
    match words.len() {
        0 | 1 => ParsedCandidate::new("", query.trim()),
        2 => ParsedCandidate::new(words[0], words[1]),
        3 => ParsedCandidate::new(words[0], words[1..].join(" ")),
        _ => ParsedCandidate::new(words[..2].join(" "), words[2..].join(" ")),
    }
}
