//! Reference renumbering.
//!
//! Two ways to turn the model's bracket numbers into a contiguous `1..U` range:
//!
//! - [`reassign_citations_in_order`]: numbers are assigned by **first
//!   appearance** and the text is rewritten by splicing each occurrence,
//!   right to left.
//! - [`reassign_citations_by_raw_value`]: numbers are assigned over the
//!   **sorted set of distinct raw values** and the text is rewritten by a
//!   global substitution on the raw value.
//!
//! Both re-scan the rewritten text so that offsets and snippets describe the
//! new text (a renumbered bracket may have a different digit count), then pair
//! the re-scanned occurrences with the raw/new pairs in ascending position.

use std::collections::{BTreeSet, HashMap};

use crate::citation::Citation;
use crate::scanner::{scan_citations, ScannedCitation};

/// A bracket occurrence with its raw and assigned reference numbers.
#[derive(Debug, Clone, Copy)]
struct Labeled {
    raw: usize,
    new: usize,
    start: usize,
    end: usize,
}

/// Renumber references by order of first appearance.
///
/// Returns the rewritten text and one citation per occurrence, in ascending
/// position. Repeated raw numbers share the same new number.
///
/// # Example
///
/// ```
/// use citekit_core::renumber::reassign_citations_in_order;
/// use citekit_core::scanner::scan_citations;
///
/// let text = "Paris is in France[2]. Also see[2] and[5].";
/// let (new_text, citations) = reassign_citations_in_order(text, &scan_citations(text));
/// assert_eq!(new_text, "Paris is in France[1]. Also see[1] and[2].");
/// assert_eq!(citations.len(), 3);
/// ```
pub fn reassign_citations_in_order(
    text: &str,
    scanned: &[ScannedCitation],
) -> (String, Vec<Citation>) {
    if scanned.is_empty() {
        return (text.to_string(), Vec::new());
    }

    let mut sorted: Vec<&ScannedCitation> = scanned.iter().collect();
    sorted.sort_by_key(|c| c.start_index);

    let mut old_to_new: HashMap<usize, usize> = HashMap::new();
    let mut labeled = Vec::with_capacity(sorted.len());
    for cit in sorted {
        let next = old_to_new.len() + 1;
        let new = *old_to_new.entry(cit.raw_index).or_insert(next);
        labeled.push(Labeled {
            raw: cit.raw_index,
            new,
            start: cit.start_index,
            end: cit.end_index,
        });
    }

    // Right to left, so earlier offsets stay valid while lengths change.
    let mut new_text = text.to_string();
    for item in labeled.iter().rev() {
        if new_text.get(item.start..item.end).is_none() {
            tracing::warn!(
                "Bracket span {}..{} does not fit the text, leaving it unchanged",
                item.start,
                item.end
            );
            continue;
        }
        new_text.replace_range(item.start..item.end, &format!("[{}]", item.new));
    }

    tracing::debug!(
        "Renumbered {} occurrences of {} distinct references by first appearance",
        labeled.len(),
        old_to_new.len()
    );

    let citations = pair_with_rescan(&new_text, &labeled);
    (new_text, citations)
}

/// Renumber references over the sorted set of distinct raw values.
///
/// The smallest raw number becomes `[1]`, the next `[2]`, and so on, no matter
/// where they first appear. The text is rewritten by substituting every
/// `[raw]` with `[new]`.
pub fn reassign_citations_by_raw_value(
    text: &str,
    scanned: &[ScannedCitation],
) -> (String, Vec<Citation>) {
    if scanned.is_empty() {
        return (text.to_string(), Vec::new());
    }

    let unique: BTreeSet<usize> = scanned.iter().map(|c| c.raw_index).collect();
    let old_to_new: HashMap<usize, usize> = unique
        .iter()
        .enumerate()
        .map(|(i, raw)| (*raw, i + 1))
        .collect();

    let mut sorted: Vec<&ScannedCitation> = scanned.iter().collect();
    sorted.sort_by_key(|c| c.start_index);
    let labeled: Vec<Labeled> = sorted
        .iter()
        .map(|c| Labeled {
            raw: c.raw_index,
            new: old_to_new[&c.raw_index],
            start: c.start_index,
            end: c.end_index,
        })
        .collect();

    // Substitute occurrence by occurrence on the raw value; spans come from a
    // fresh scan so the substitution covers every `[raw]` in the text.
    let mut new_text = text.to_string();
    for occ in scan_citations(text).iter().rev() {
        if let Some(new) = old_to_new.get(&occ.raw_index) {
            new_text.replace_range(occ.start_index..occ.end_index, &format!("[{}]", new));
        }
    }

    tracing::debug!(
        "Renumbered {} occurrences of {} distinct references by raw value",
        labeled.len(),
        unique.len()
    );

    let citations = pair_with_rescan(&new_text, &labeled);
    (new_text, citations)
}

/// Re-scan `new_text` and zip its occurrences with `labeled` (both ascending).
fn pair_with_rescan(new_text: &str, labeled: &[Labeled]) -> Vec<Citation> {
    let mut rescanned = scan_citations(new_text);
    rescanned.sort_by_key(|c| c.start_index);

    if rescanned.len() != labeled.len() {
        tracing::warn!(
            "Re-scan found {} brackets but {} were renumbered",
            rescanned.len(),
            labeled.len()
        );
    }

    labeled
        .iter()
        .zip(rescanned.iter())
        .map(|(item, found)| Citation {
            index: item.new,
            raw_index: item.raw,
            start_index: found.start_index,
            end_index: found.end_index,
            snippet_start_index: found.snippet_start_index,
            snippet_end_index: found.snippet_end_index,
            source: None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_first_appearance_example() {
        let text = "Paris is in France[2]. Also see[2] and[5].";
        let (new_text, cits) = reassign_citations_in_order(text, &scan_citations(text));

        assert_eq!(new_text, "Paris is in France[1]. Also see[1] and[2].");
        assert_eq!(cits.len(), 3);
        assert_eq!((cits[0].index, cits[0].raw_index), (1, 2));
        assert_eq!((cits[1].index, cits[1].raw_index), (1, 2));
        assert_eq!((cits[2].index, cits[2].raw_index), (2, 5));
        for c in &cits {
            assert!(c.source.is_none());
        }
    }

    #[test]
    fn test_offsets_follow_digit_length_changes() {
        let text = "Alpha[12] beta[3]. Gamma[12].";
        let (new_text, cits) = reassign_citations_in_order(text, &scan_citations(text));

        assert_eq!(new_text, "Alpha[1] beta[2]. Gamma[1].");
        for c in &cits {
            assert_eq!(&new_text[c.start_index..c.end_index], format!("[{}]", c.index));
        }
        assert_eq!(cits[2].snippet(&new_text), Some("Gamma[1]."));
    }

    #[test]
    fn test_indices_are_contiguous_and_consistent() {
        let text = "a[9] b[4] c[9] d[7] e[4] f[1].";
        let (_, cits) = reassign_citations_in_order(text, &scan_citations(text));

        let mut by_raw: HashMap<usize, usize> = HashMap::new();
        for c in &cits {
            let prev = by_raw.insert(c.raw_index, c.index);
            if let Some(prev) = prev {
                assert_eq!(prev, c.index, "same raw value must keep its index");
            }
        }
        let mut indices: Vec<usize> = by_raw.values().copied().collect();
        indices.sort();
        assert_eq!(indices, vec![1, 2, 3, 4]);
        assert_eq!(by_raw[&9], 1);
        assert_eq!(by_raw[&4], 2);
        assert_eq!(by_raw[&7], 3);
        assert_eq!(by_raw[&1], 4);
    }

    #[test]
    fn test_unsorted_input_is_sorted_by_position() {
        let text = "x[3] y[8].";
        let mut scanned = scan_citations(text);
        scanned.reverse();
        let (new_text, cits) = reassign_citations_in_order(text, &scanned);
        assert_eq!(new_text, "x[1] y[2].");
        assert_eq!(cits[0].raw_index, 3);
    }

    #[test]
    fn test_rescan_round_trip_matches_citation_count() {
        let text = "One[4]. Two[10][4]. Three[2]!";
        let (new_text, cits) = reassign_citations_in_order(text, &scan_citations(text));
        let rescanned = scan_citations(&new_text);
        assert_eq!(rescanned.len(), cits.len());
        for (c, r) in cits.iter().zip(rescanned.iter()) {
            assert_eq!(c.index, r.raw_index);
            assert_eq!(c.start_index, r.start_index);
        }
    }

    #[test]
    fn test_empty_input_returns_text_unchanged() {
        let (new_text, cits) = reassign_citations_in_order("plain", &[]);
        assert_eq!(new_text, "plain");
        assert!(cits.is_empty());
    }

    #[test]
    fn test_raw_value_order_uses_sorted_unique_values() {
        let text = "Paris is in France[2]. Also see[5] and[2].";
        let (new_text, cits) = reassign_citations_by_raw_value(text, &scan_citations(text));

        assert_eq!(new_text, "Paris is in France[1]. Also see[2] and[1].");
        let pairs: Vec<(usize, usize)> = cits.iter().map(|c| (c.index, c.raw_index)).collect();
        assert_eq!(pairs, vec![(1, 2), (2, 5), (1, 2)]);
    }

    #[test]
    fn test_raw_value_order_differs_from_first_appearance() {
        let text = "b[7] then a[3].";
        let scanned = scan_citations(text);

        let (by_position, _) = reassign_citations_in_order(text, &scanned);
        let (by_value, _) = reassign_citations_by_raw_value(text, &scanned);

        assert_eq!(by_position, "b[1] then a[2].");
        assert_eq!(by_value, "b[2] then a[1].");
    }

    #[test]
    fn test_raw_value_offsets_describe_new_text() {
        let text = "Big[100] small[20].";
        let (new_text, cits) = reassign_citations_by_raw_value(text, &scan_citations(text));
        assert_eq!(new_text, "Big[2] small[1].");
        assert_eq!(&new_text[cits[0].start_index..cits[0].end_index], "[2]");
        assert_eq!(&new_text[cits[1].start_index..cits[1].end_index], "[1]");
    }
}
