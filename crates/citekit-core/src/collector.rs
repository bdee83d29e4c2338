//! Per-request ledger of retrieved sources.
//!
//! The [`SearchResultsCollector`] records every retrieved item together with
//! the aggregator index it was given when added. It is written during
//! retrieval (single writer, append-only) and only read during citation
//! resolution and rendering. It is not shared across requests.
//!
//! Aggregator indices are 1-based and assigned in append order, independent of
//! category order.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::citation::Citation;
use crate::search::{AggregateSearchResult, SourceItem, SourceKey, SourceRef, SourceType};

/// One ledger entry.
///
/// Serialized as `{"aggregatorIndex": 3, "sourceType": "web", "item": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectedResult {
    pub aggregator_index: usize,
    #[serde(flatten)]
    pub item: SourceItem,
}

impl CollectedResult {
    pub fn source_type(&self) -> SourceType {
        self.item.source_type()
    }
}

/// Append-only ordered record of retrieved items and their aggregator indices.
#[derive(Debug, Clone, Default)]
pub struct SearchResultsCollector {
    results: Vec<CollectedResult>,
    /// Aggregator indices of every entry with a given key, in append order.
    by_key: HashMap<SourceKey, Vec<usize>>,
    /// Aggregator index to ledger position. First entry wins.
    by_index: HashMap<usize, usize>,
    next_index: usize,
}

impl SearchResultsCollector {
    /// Create an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one item, returning its aggregator index.
    pub fn add_result(&mut self, item: impl Into<SourceItem>) -> usize {
        self.next_index += 1;
        let aggregator_index = self.next_index;
        self.push(CollectedResult {
            aggregator_index,
            item: item.into(),
        });
        aggregator_index
    }

    /// Append every item of `aggregate`, in category order.
    pub fn add_aggregate(&mut self, aggregate: &AggregateSearchResult) {
        for source in aggregate.flatten() {
            self.add_result(source.to_item());
        }
        tracing::debug!(
            "Collector holds {} results after adding {}",
            self.results.len(),
            aggregate.len()
        );
    }

    /// A collector populated from `aggregate` in category order.
    pub fn from_aggregate(aggregate: &AggregateSearchResult) -> Self {
        let mut collector = Self::new();
        collector.add_aggregate(aggregate);
        collector
    }

    /// Rebuild a ledger recorded elsewhere, keeping its aggregator indices.
    ///
    /// Later [`add_result`](Self::add_result) calls continue after the largest
    /// index seen.
    pub fn from_entries(entries: impl IntoIterator<Item = CollectedResult>) -> Self {
        let mut collector = Self::new();
        for entry in entries {
            collector.next_index = collector.next_index.max(entry.aggregator_index);
            collector.push(entry);
        }
        collector
    }

    fn push(&mut self, entry: CollectedResult) {
        self.by_key
            .entry(entry.item.key())
            .or_default()
            .push(entry.aggregator_index);
        self.by_index
            .entry(entry.aggregator_index)
            .or_insert(self.results.len());
        self.results.push(entry);
    }

    /// The full ledger in its current order.
    pub fn get_all_results(&self) -> &[CollectedResult] {
        &self.results
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Aggregator index of the first entry matching `source`.
    pub fn aggregator_index_of(&self, source: SourceRef<'_>) -> Option<usize> {
        self.aggregator_indices_for(&source.key()).first().copied()
    }

    /// Aggregator indices of every entry recorded under `key`, in append order.
    ///
    /// Distinct items that share a key (two hits with the same link, a chunk
    /// collected twice) each keep their own index here.
    pub fn aggregator_indices_for(&self, key: &SourceKey) -> &[usize] {
        self.by_key.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Ledger entry carrying `aggregator_index`.
    pub fn get_by_aggregator_index(&self, aggregator_index: usize) -> Option<&CollectedResult> {
        self.by_index
            .get(&aggregator_index)
            .and_then(|&pos| self.results.get(pos))
    }

    /// A new ledger ordered to match final bracket numbers.
    ///
    /// Entries are ordered by the final number of the first citation that
    /// references them (by raw index). Brackets whose raw index is not in the
    /// ledger leave no hole. Items keep their aggregator indices, and `self` is
    /// not modified.
    pub fn reordered_for(&self, final_citations: &[Citation]) -> SearchResultsCollector {
        let mut slots: BTreeMap<usize, &CollectedResult> = BTreeMap::new();
        for cit in final_citations {
            let Some(entry) = self.get_by_aggregator_index(cit.raw_index) else {
                continue;
            };
            slots.entry(cit.index).or_insert(entry);
        }

        let mut reordered = SearchResultsCollector::new();
        for entry in slots.into_values() {
            reordered.push(entry.clone());
        }
        reordered.next_index = self.next_index;

        tracing::debug!(
            "Reordered collector: {} of {} results referenced by final brackets",
            reordered.len(),
            self.len()
        );
        reordered
    }

    /// Consume the collector, returning its entries.
    pub fn into_results(self) -> Vec<CollectedResult> {
        self.results
    }
}
