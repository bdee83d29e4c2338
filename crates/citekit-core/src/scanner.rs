//! Bracket reference scanning.
//!
//! Finds every `[<digits>]` occurrence in generated text and computes the
//! sentence-bounded snippet around it. Text without brackets yields an empty
//! list; there is no error path.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Characters that end a sentence for snippet expansion.
pub const SENTENCE_TERMINATORS: [u8; 3] = [b'.', b'?', b'!'];

fn citation_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\[(\d+)\]").expect("Invalid regex"))
}

/// One bracket occurrence as it appears in scanned text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScannedCitation {
    /// The number inside the brackets.
    pub raw_index: usize,
    pub start_index: usize,
    pub end_index: usize,
    pub snippet_start_index: usize,
    pub snippet_end_index: usize,
}

/// Scan `text` for bracket references, left to right.
///
/// Digit runs too large for `usize` are not treated as references.
pub fn scan_citations(text: &str) -> Vec<ScannedCitation> {
    let mut found = Vec::new();
    for caps in citation_pattern().captures_iter(text) {
        let (Some(whole), Some(digits)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let Ok(raw_index) = digits.as_str().parse::<usize>() else {
            tracing::debug!("Skipping oversized bracket reference `{}`", whole.as_str());
            continue;
        };
        let (snippet_start_index, snippet_end_index) =
            expand_to_sentence(text, whole.start(), whole.end());
        found.push(ScannedCitation {
            raw_index,
            start_index: whole.start(),
            end_index: whole.end(),
            snippet_start_index,
            snippet_end_index,
        });
    }
    tracing::debug!("Scanned {} bracket references", found.len());
    found
}

/// Expand a bracket span to the sentence containing it.
///
/// Backward: from `start`, walk left to the nearest terminator and step past it
/// and any whitespace that follows; stop at the start of the text otherwise.
/// The first byte of the text is never inspected as a terminator.
///
/// Forward: from `end`, walk right to the nearest terminator, include it and any
/// whitespace that follows; stop at the end of the text otherwise.
pub fn expand_to_sentence(text: &str, start: usize, end: usize) -> (usize, usize) {
    let bytes = text.as_bytes();

    let mut s = start.min(bytes.len());
    while s > 0 {
        if s < bytes.len() && SENTENCE_TERMINATORS.contains(&bytes[s]) {
            s = skip_whitespace(text, s + 1);
            break;
        }
        s -= 1;
    }

    let mut e = end.min(bytes.len());
    while e < bytes.len() {
        if SENTENCE_TERMINATORS.contains(&bytes[e]) {
            e = skip_whitespace(text, e + 1);
            break;
        }
        e += 1;
    }

    (s, e)
}

/// First byte offset at or after `from` that is not whitespace.
fn skip_whitespace(text: &str, from: usize) -> usize {
    match text.get(from..) {
        Some(rest) => rest
            .char_indices()
            .find(|(_, c)| !c.is_whitespace())
            .map(|(i, _)| from + i)
            .unwrap_or(text.len()),
        None => from.min(text.len()),
    }
}
