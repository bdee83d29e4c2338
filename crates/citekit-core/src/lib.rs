//! # citekit-core
//!
//! **Citation resolution** for retrieval-augmented answers.
//!
//! A language model answers with bracketed references like `[3]` that point
//! into a numbered list of retrieved sources. This crate finds those brackets,
//! renumbers them into a contiguous `1..N` range, binds each to the source it
//! references, and renders the source list the model is shown.
//!
//! ## Main Types
//!
//! - [`CiteEngine`] - configuration-driven entry point
//! - [`AggregateSearchResult`] - retrieved sources grouped by category
//! - [`SearchResultsCollector`] - per-request ledger of aggregator indices
//! - [`Citation`] - one bracket occurrence, renumbered and bound
//! - [`CiteError`] - domain-specific error type
//!
//! ## Modules
//!
//! - [`scanner`] - bracket discovery and sentence snippets
//! - [`renumber`] - first-appearance and raw-value renumbering
//! - [`mapper`] - category-positional and aggregator-identity binding
//! - [`finalize`] - the two end-to-end pipelines
//! - [`render`] - prompt and stream renderings
//! - [`config`] - `~/.citekit/config.yaml`
//!
//! ## Example
//!
//! ```
//! use citekit_core::{finalize_citations_in_message, AggregateSearchResult};
//!
//! let out = finalize_citations_in_message("See[4] and[2].", &AggregateSearchResult::new());
//! assert_eq!(out.text, "See[1] and[2].");
//! ```

// Modules
pub mod citation;
pub mod collector;
pub mod config;
pub mod engine;
pub mod errors;
pub mod finalize;
pub mod mapper;
pub mod render;
pub mod renumber;
pub mod scanner;
pub mod search;

// Re-exports for convenience
pub use citation::{
    ChunkCitation, Citation, CitationSource, ContextDocCitation, GraphCitation, WebCitation,
    GRAPH_CONTENT_KEY,
};
pub use collector::{CollectedResult, SearchResultsCollector};
pub use config::{CitationsSection, CiteConfig, CITEKIT_HOME_DIR, CONFIG_FILENAME};
pub use engine::{parse_ledger, parse_results, CiteEngine, FinalizeReport};
pub use errors::CiteError;
pub use finalize::{
    finalize_citations_in_message, finalize_citations_with_collector, CollectorFinalization,
    FinalizedCitations,
};
pub use mapper::{
    AggregatorIdentityMapper, CategoryPositionalMapper, CitationMapper, CitationStrategy,
};
pub use render::{
    format_search_results_for_llm, format_search_results_for_stream, PromptRenderer,
    CHUNK_SEARCH_STREAM_MARKER, CONTEXT_STREAM_MARKER, DEFAULT_MISSING_INDEX_MARKER,
    GRAPH_SEARCH_STREAM_MARKER, WEB_SEARCH_STREAM_MARKER,
};
pub use renumber::{reassign_citations_by_raw_value, reassign_citations_in_order};
pub use scanner::{expand_to_sentence, scan_citations, ScannedCitation};
pub use search::{
    AggregateSearchResult, ChunkSearchResult, ContextDocumentResult, GraphContent,
    GraphResultType, GraphSearchResult, Metadata, SourceItem, SourceKey, SourceRef, SourceType,
    WebSearchResult,
};
