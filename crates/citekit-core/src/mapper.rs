//! Binding renumbered citations to source objects.
//!
//! Two strategies implement [`CitationMapper`]:
//!
//! | Strategy | Looks up | Miss |
//! |----------|----------|------|
//! | [`CategoryPositionalMapper`] | `index - 1` in the category-ordered flattening | citation unchanged |
//! | [`AggregatorIdentityMapper`] | `raw_index` among collector aggregator indices | `sourceType = "unknown"` |
//!
//! ## Equivalence
//!
//! When the collector assigned its aggregator indices in category order (see
//! [`SearchResultsCollector::from_aggregate`]) and the citations are numbered
//! so that `index == raw_index`, both mappers bind every in-range citation to
//! the same source. Nothing checks this at runtime; the tests do.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::citation::Citation;
use crate::collector::SearchResultsCollector;
use crate::errors::CiteError;
use crate::search::{AggregateSearchResult, SourceRef};

// ============================================================================
// CitationStrategy
// ============================================================================

/// Which end-to-end citation pipeline a deployment uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CitationStrategy {
    /// First-appearance renumbering, category-positional lookup.
    #[default]
    Position,
    /// Sorted raw-value renumbering, aggregator-index lookup.
    Aggregator,
}

impl fmt::Display for CitationStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Position => write!(f, "position"),
            Self::Aggregator => write!(f, "aggregator"),
        }
    }
}

impl FromStr for CitationStrategy {
    type Err = CiteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "position" | "positional" => Ok(Self::Position),
            "aggregator" | "collector" => Ok(Self::Aggregator),
            _ => Err(CiteError::UnknownStrategy(s.to_string())),
        }
    }
}

// ============================================================================
// CitationMapper
// ============================================================================

/// Binds citations to the sources they reference.
///
/// Implementations never fail: a citation that does not resolve is returned
/// according to the strategy's miss behavior. Inputs are not mutated; every
/// output citation is a copy.
pub trait CitationMapper {
    /// The strategy this mapper implements.
    fn strategy(&self) -> CitationStrategy;

    /// Bind each citation, preserving order and count.
    fn map_citations(&self, citations: &[Citation]) -> Vec<Citation>;
}

// ============================================================================
// CategoryPositionalMapper
// ============================================================================

/// Uses `citation.index` as a 1-based position into the flattened aggregate.
#[derive(Debug, Clone, Copy)]
pub struct CategoryPositionalMapper<'a> {
    aggregate: &'a AggregateSearchResult,
}

impl<'a> CategoryPositionalMapper<'a> {
    pub fn new(aggregate: &'a AggregateSearchResult) -> Self {
        Self { aggregate }
    }
}

impl CitationMapper for CategoryPositionalMapper<'_> {
    fn strategy(&self) -> CitationStrategy {
        CitationStrategy::Position
    }

    fn map_citations(&self, citations: &[Citation]) -> Vec<Citation> {
        let flat = self.aggregate.flatten();
        let mut unmatched = 0usize;

        let mapped = citations
            .iter()
            .map(|cit| match cit.index.checked_sub(1).and_then(|pos| flat.get(pos)) {
                Some(source) => cit.bound_to(*source),
                None => {
                    unmatched += 1;
                    cit.clone()
                }
            })
            .collect();

        if unmatched > 0 {
            tracing::debug!(
                "{} of {} citations fall outside the {} flattened sources",
                unmatched,
                citations.len(),
                flat.len()
            );
        }
        mapped
    }
}

// ============================================================================
// AggregatorIdentityMapper
// ============================================================================

/// Uses `citation.raw_index` as an aggregator index into the collector ledger.
#[derive(Debug, Clone)]
pub struct AggregatorIdentityMapper<'a> {
    by_index: HashMap<usize, SourceRef<'a>>,
}

impl<'a> AggregatorIdentityMapper<'a> {
    pub fn new(collector: &'a SearchResultsCollector) -> Self {
        let mut by_index = HashMap::with_capacity(collector.len());
        for entry in collector.get_all_results() {
            by_index
                .entry(entry.aggregator_index)
                .or_insert_with(|| entry.item.as_source_ref());
        }
        Self { by_index }
    }

    /// Source recorded under `aggregator_index`.
    pub fn lookup(&self, aggregator_index: usize) -> Option<SourceRef<'a>> {
        self.by_index.get(&aggregator_index).copied()
    }
}

impl CitationMapper for AggregatorIdentityMapper<'_> {
    fn strategy(&self) -> CitationStrategy {
        CitationStrategy::Aggregator
    }

    fn map_citations(&self, citations: &[Citation]) -> Vec<Citation> {
        citations
            .iter()
            .map(|cit| match self.lookup(cit.raw_index) {
                Some(source) => cit.bound_to(source),
                None => {
                    tracing::debug!(
                        "Aggregator index {} not in collector, citation [{}] is unknown",
                        cit.raw_index,
                        cit.index
                    );
                    cit.unresolved()
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::citation::CitationSource;
    use crate::search::fixtures::*;
    use crate::search::SourceType;

    fn cit(index: usize, raw_index: usize) -> Citation {
        Citation {
            index,
            raw_index,
            start_index: 0,
            end_index: 3,
            snippet_start_index: 0,
            snippet_end_index: 3,
            source: None,
        }
    }

    #[test]
    fn test_strategy_parse_and_display() {
        assert_eq!("position".parse::<CitationStrategy>().unwrap(), CitationStrategy::Position);
        assert_eq!("Aggregator".parse::<CitationStrategy>().unwrap(), CitationStrategy::Aggregator);
        assert!("nearest".parse::<CitationStrategy>().is_err());
        assert_eq!(CitationStrategy::Aggregator.to_string(), "aggregator");
    }

    #[test]
    fn test_positional_mapper_binds_each_category() {
        let aggregate = mixed_aggregate();
        let mapper = CategoryPositionalMapper::new(&aggregate);
        let mapped = mapper.map_citations(&[cit(1, 1), cit(3, 3), cit(4, 4), cit(5, 5)]);

        let types: Vec<Option<SourceType>> = mapped.iter().map(|c| c.source_type()).collect();
        assert_eq!(
            types,
            vec![
                Some(SourceType::Chunk),
                Some(SourceType::Graph),
                Some(SourceType::Web),
                Some(SourceType::ContextDoc),
            ]
        );
        match &mapped[0].source {
            Some(CitationSource::Chunk(c)) => assert_eq!(c.text, "Paris is the capital."),
            other => panic!("expected chunk citation, got {:?}", other),
        }
    }

    #[test]
    fn test_positional_mapper_leaves_out_of_range_unchanged() {
        let aggregate = mixed_aggregate();
        let mapper = CategoryPositionalMapper::new(&aggregate);
        let input = [cit(6, 6), cit(0, 0)];
        let mapped = mapper.map_citations(&input);
        assert_eq!(mapped, input.to_vec());
        assert!(mapped.iter().all(|c| c.source_type().is_none()));
    }

    #[test]
    fn test_positional_mapper_is_pure() {
        let aggregate = mixed_aggregate();
        let mapper = CategoryPositionalMapper::new(&aggregate);
        let input = [cit(2, 7), cit(4, 1)];
        assert_eq!(mapper.map_citations(&input), mapper.map_citations(&input));
        assert!(input.iter().all(|c| c.source.is_none()));
    }

    #[test]
    fn test_identity_mapper_uses_raw_index() {
        let collector = SearchResultsCollector::from_aggregate(&mixed_aggregate());
        let mapper = AggregatorIdentityMapper::new(&collector);

        // Bracket [1] in the final text came from aggregator item 4 (web).
        let mapped = mapper.map_citations(&[cit(1, 4)]);
        assert_eq!(mapped[0].source_type(), Some(SourceType::Web));
        assert_eq!(mapped[0].index, 1);
    }

    #[test]
    fn test_identity_mapper_marks_missing_as_unknown() {
        let collector = SearchResultsCollector::from_aggregate(&mixed_aggregate());
        let mapper = AggregatorIdentityMapper::new(&collector);
        let mapped = mapper.map_citations(&[cit(1, 77), cit(2, 0)]);
        assert!(mapped
            .iter()
            .all(|c| c.source == Some(CitationSource::Unknown)));
    }

    #[test]
    fn test_mappers_agree_when_ledger_follows_category_order() {
        let aggregate = mixed_aggregate();
        let collector = SearchResultsCollector::from_aggregate(&aggregate);
        let positional = CategoryPositionalMapper::new(&aggregate);
        let identity = AggregatorIdentityMapper::new(&collector);

        let citations: Vec<Citation> = (1..=aggregate.len()).map(|i| cit(i, i)).collect();
        assert_eq!(positional.map_citations(&citations), identity.map_citations(&citations));
    }
}
