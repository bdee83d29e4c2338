//! End-to-end citation pipelines.
//!
//! Callers pick exactly one pipeline per response:
//!
//! 1. [`finalize_citations_in_message`] - scan, renumber by first appearance,
//!    bind by category position.
//! 2. [`finalize_citations_with_collector`] - scan, renumber by sorted raw
//!    value, bind by aggregator index, and derive a collector view ordered by
//!    final bracket number.
//!
//! Mixing the outputs of the two pipelines is undefined.

use serde::{Deserialize, Serialize};

use crate::citation::Citation;
use crate::collector::SearchResultsCollector;
use crate::mapper::{AggregatorIdentityMapper, CategoryPositionalMapper, CitationMapper};
use crate::renumber::{reassign_citations_by_raw_value, reassign_citations_in_order};
use crate::scanner::scan_citations;
use crate::search::AggregateSearchResult;

/// Relabeled text plus its citations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalizedCitations {
    pub text: String,
    pub citations: Vec<Citation>,
}

impl FinalizedCitations {
    fn unchanged(text: &str) -> Self {
        Self {
            text: text.to_string(),
            citations: Vec::new(),
        }
    }

    /// Number of citations bound to an actual source.
    pub fn resolved_count(&self) -> usize {
        self.citations.iter().filter(|c| c.is_resolved()).count()
    }
}

/// Output of the collector pipeline.
#[derive(Debug, Clone)]
pub struct CollectorFinalization {
    pub finalized: FinalizedCitations,
    /// Ledger view where position `i` holds the source of bracket `i + 1`.
    pub collector: SearchResultsCollector,
}

/// Position-based pipeline.
///
/// Renumbers references by first appearance and binds each one to the
/// `index`-th source of `search_results` in category order. Citations past
/// the last source keep no source type.
pub fn finalize_citations_in_message(
    raw_text: &str,
    search_results: &AggregateSearchResult,
) -> FinalizedCitations {
    let raw = scan_citations(raw_text);
    if raw.is_empty() {
        return FinalizedCitations::unchanged(raw_text);
    }

    let (text, renumbered) = reassign_citations_in_order(raw_text, &raw);
    let citations = CategoryPositionalMapper::new(search_results).map_citations(&renumbered);

    let finalized = FinalizedCitations { text, citations };
    tracing::debug!(
        "Finalized {} citations by position ({} resolved)",
        finalized.citations.len(),
        finalized.resolved_count()
    );
    finalized
}

/// Aggregator-based pipeline.
///
/// Renumbers references over the sorted distinct raw values, binds each one to
/// the collector item whose aggregator index equals its raw number (`unknown`
/// when absent), and returns a reordered copy of the collector. The input
/// collector is not modified.
///
/// Async for callers that finalize inside an async response path; it never
/// suspends.
pub async fn finalize_citations_with_collector(
    raw_text: &str,
    collector: &SearchResultsCollector,
) -> CollectorFinalization {
    let raw = scan_citations(raw_text);
    if raw.is_empty() {
        return CollectorFinalization {
            finalized: FinalizedCitations::unchanged(raw_text),
            collector: collector.reordered_for(&[]),
        };
    }

    let (text, renumbered) = reassign_citations_by_raw_value(raw_text, &raw);
    let citations = AggregatorIdentityMapper::new(collector).map_citations(&renumbered);
    let reordered = collector.reordered_for(&citations);

    let finalized = FinalizedCitations { text, citations };
    tracing::debug!(
        "Finalized {} citations by aggregator index ({} resolved)",
        finalized.citations.len(),
        finalized.resolved_count()
    );
    CollectorFinalization {
        finalized,
        collector: reordered,
    }
}
