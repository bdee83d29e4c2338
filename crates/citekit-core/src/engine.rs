//! Citekit engine, the facade over scanning, finalization and rendering.
//!
//! The [`CiteEngine`] owns a [`CiteConfig`] and dispatches to the pipeline the
//! configuration names. Callers that need the building blocks directly use
//! [`crate::finalize`], [`crate::mapper`] and [`crate::render`].
//!
//! ## Flow
//!
//! ```text
//! raw text + AggregateSearchResult [+ ledger recorded during retrieval]
//!   -> collector (the given ledger, or category order)
//!   -> finalize (position | aggregator)
//!   -> FinalizeReport
//! ```

use std::path::Path;

use futures::executor::block_on;
use serde::{Deserialize, Serialize};

use crate::citation::Citation;
use crate::collector::{CollectedResult, SearchResultsCollector};
use crate::config::CiteConfig;
use crate::errors::CiteError;
use crate::finalize::{finalize_citations_in_message, finalize_citations_with_collector};
use crate::mapper::CitationStrategy;
use crate::render::{format_search_results_for_stream, PromptRenderer};
use crate::scanner::{scan_citations, ScannedCitation};
use crate::search::AggregateSearchResult;

// ============================================================================
// FinalizeReport
// ============================================================================

/// Outcome of [`CiteEngine::finalize`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalizeReport {
    /// Pipeline that produced this report.
    pub strategy: CitationStrategy,
    /// Relabeled text.
    pub text: String,
    pub citations: Vec<Citation>,
    pub resolved: usize,
    pub unresolved: usize,
    /// Ledger ordered by final bracket number (aggregator strategy only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ledger: Option<Vec<CollectedResult>>,
}

impl FinalizeReport {
    fn new(
        strategy: CitationStrategy,
        text: String,
        citations: Vec<Citation>,
        ledger: Option<Vec<CollectedResult>>,
    ) -> Self {
        let resolved = citations.iter().filter(|c| c.is_resolved()).count();
        let unresolved = citations.len() - resolved;
        Self {
            strategy,
            text,
            citations,
            resolved,
            unresolved,
            ledger,
        }
    }

    /// Distinct final bracket numbers, ascending.
    pub fn distinct_indices(&self) -> Vec<usize> {
        let mut indices: Vec<usize> = self.citations.iter().map(|c| c.index).collect();
        indices.sort_unstable();
        indices.dedup();
        indices
    }
}

// ============================================================================
// CiteEngine
// ============================================================================

/// Entry point for citation resolution.
///
/// # Example
///
/// ```
/// use citekit_core::{AggregateSearchResult, CiteEngine};
///
/// let engine = CiteEngine::from_config(Default::default());
/// let report = engine.finalize("Nothing retrieved[3].", &AggregateSearchResult::new());
/// assert_eq!(report.text, "Nothing retrieved[1].");
/// assert_eq!(report.unresolved, 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CiteEngine {
    config: CiteConfig,
}

impl CiteEngine {
    // -------------------------------------------------------------------------
    // Construction
    // -------------------------------------------------------------------------

    /// Create an engine from an already loaded configuration.
    pub fn from_config(config: CiteConfig) -> Self {
        Self { config }
    }

    /// Create an engine from `~/.citekit/config.yaml`, or defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read, parsed or
    /// validated.
    pub fn with_defaults() -> Result<Self, CiteError> {
        Ok(Self::from_config(CiteConfig::load_default()?))
    }

    /// Create an engine from the configuration file at `path`.
    pub fn with_config(path: &Path) -> Result<Self, CiteError> {
        Ok(Self::from_config(CiteConfig::from_path(path)?))
    }

    pub fn config(&self) -> &CiteConfig {
        &self.config
    }

    /// Override the configured strategy for this engine instance.
    pub fn set_strategy(&mut self, strategy: CitationStrategy) {
        self.config.citations.strategy = strategy;
    }

    pub fn strategy(&self) -> CitationStrategy {
        self.config.citations.strategy
    }

    // -------------------------------------------------------------------------
    // Operations
    // -------------------------------------------------------------------------

    /// Bracket occurrences of `text`, ascending by position.
    pub fn scan(&self, text: &str) -> Vec<ScannedCitation> {
        scan_citations(text)
    }

    /// Renumber and bind the references in `text` with the configured strategy.
    ///
    /// For the aggregator strategy the ledger is built from `results` in
    /// category order, so aggregator index `k` is the `k`-th flattened source.
    /// Use [`finalize_with_ledger`](Self::finalize_with_ledger) when retrieval
    /// recorded its own ledger.
    pub fn finalize(&self, text: &str, results: &AggregateSearchResult) -> FinalizeReport {
        let ledger = match self.strategy() {
            CitationStrategy::Position => SearchResultsCollector::new(),
            CitationStrategy::Aggregator => SearchResultsCollector::from_aggregate(results),
        };
        self.finalize_with_ledger(text, results, &ledger)
    }

    /// Like [`finalize`](Self::finalize), with a caller-supplied ledger.
    ///
    /// The position strategy binds against `results` and ignores `ledger`; the
    /// aggregator strategy binds against `ledger` and reports its reordered view.
    pub fn finalize_with_ledger(
        &self,
        text: &str,
        results: &AggregateSearchResult,
        ledger: &SearchResultsCollector,
    ) -> FinalizeReport {
        let strategy = self.strategy();
        let report = match strategy {
            CitationStrategy::Position => {
                if !ledger.is_empty() {
                    tracing::debug!(
                        "Position strategy ignores the {}-entry ledger",
                        ledger.len()
                    );
                }
                let finalized = finalize_citations_in_message(text, results);
                FinalizeReport::new(strategy, finalized.text, finalized.citations, None)
            }
            CitationStrategy::Aggregator => {
                let out = block_on(finalize_citations_with_collector(text, ledger));
                FinalizeReport::new(
                    strategy,
                    out.finalized.text,
                    out.finalized.citations,
                    Some(out.collector.into_results()),
                )
            }
        };

        if self.config.citations.log_unresolved {
            for cit in report.citations.iter().filter(|c| !c.is_resolved()) {
                tracing::debug!(
                    "Citation [{}] (raw [{}]) at {}..{} has no source",
                    cit.index,
                    cit.raw_index,
                    cit.start_index,
                    cit.end_index
                );
            }
        }
        tracing::info!(
            "Finalized {} citations with {} strategy: {} resolved, {} unresolved",
            report.citations.len(),
            strategy,
            report.resolved,
            report.unresolved
        );
        report
    }

    /// Prompt text for `results`, indexed by a category-ordered ledger.
    pub fn render_prompt(&self, results: &AggregateSearchResult) -> String {
        self.render_prompt_with_ledger(results, &SearchResultsCollector::from_aggregate(results))
    }

    /// Prompt text for `results`, indexed by `ledger`.
    ///
    /// Items missing from the ledger render the configured
    /// `missingIndexMarker`.
    pub fn render_prompt_with_ledger(
        &self,
        results: &AggregateSearchResult,
        ledger: &SearchResultsCollector,
    ) -> String {
        PromptRenderer::new(ledger)
            .with_missing_marker(self.config.citations.missing_index_marker.clone())
            .render(results)
    }

    /// Tagged JSON stream segments for `results`.
    pub fn render_stream(&self, results: &AggregateSearchResult) -> String {
        format_search_results_for_stream(results)
    }
}

/// Parse an [`AggregateSearchResult`] from JSON.
///
/// # Errors
///
/// Returns [`CiteError::InvalidInput`] when the payload is not a valid
/// aggregate.
pub fn parse_results(json: &str) -> Result<AggregateSearchResult, CiteError> {
    serde_json::from_str(json)
        .map_err(|e| CiteError::InvalidInput(format!("search results are not valid JSON: {}", e)))
}

/// Parse a collector ledger (a JSON array of [`CollectedResult`]).
///
/// # Errors
///
/// Returns [`CiteError::InvalidInput`] when the payload is not a valid ledger.
pub fn parse_ledger(json: &str) -> Result<SearchResultsCollector, CiteError> {
    let entries: Vec<CollectedResult> = serde_json::from_str(json)
        .map_err(|e| CiteError::InvalidInput(format!("collector ledger is not valid JSON: {}", e)))?;
    Ok(SearchResultsCollector::from_entries(entries))
}
