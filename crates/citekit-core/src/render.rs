//! Outbound renderings of an [`AggregateSearchResult`].
//!
//! - [`format_search_results_for_llm`]: plain text for prompt inclusion, each
//!   source headed by `Source [<aggregator index>]:`.
//! - [`format_search_results_for_stream`]: `<tag>[json]</tag>` segments for
//!   progressive transport to a client.
//!
//! Both walk the categories in the fixed order chunk, graph, web, context
//! document, and skip empty categories.

use std::collections::HashMap;

use serde_json::Value;

use crate::collector::SearchResultsCollector;
use crate::search::{AggregateSearchResult, GraphContent, SourceKey, SourceRef};

/// Stream tag for chunk results.
pub const CHUNK_SEARCH_STREAM_MARKER: &str = "chunk_search";
/// Stream tag for graph results.
pub const GRAPH_SEARCH_STREAM_MARKER: &str = "graph_search";
/// Stream tag for web results.
pub const WEB_SEARCH_STREAM_MARKER: &str = "web_search";
/// Stream tag for context documents.
pub const CONTEXT_STREAM_MARKER: &str = "content";

/// Placeholder used when an item has no aggregator index.
pub const DEFAULT_MISSING_INDEX_MARKER: &str = "???";

/// Render sources as plain text annotated with aggregator indices.
///
/// Uses [`DEFAULT_MISSING_INDEX_MARKER`] for items the collector does not know.
pub fn format_search_results_for_llm(
    results: &AggregateSearchResult,
    collector: &SearchResultsCollector,
) -> String {
    PromptRenderer::new(collector).render(results)
}

/// Prompt renderer with a configurable missing-index marker.
#[derive(Debug, Clone)]
pub struct PromptRenderer<'a> {
    collector: &'a SearchResultsCollector,
    missing_marker: String,
}

impl<'a> PromptRenderer<'a> {
    pub fn new(collector: &'a SearchResultsCollector) -> Self {
        Self {
            collector,
            missing_marker: DEFAULT_MISSING_INDEX_MARKER.to_string(),
        }
    }

    /// Override the placeholder for items without an aggregator index.
    pub fn with_missing_marker(mut self, marker: impl Into<String>) -> Self {
        self.missing_marker = marker.into();
        self
    }

    /// `Source [n]:` for `source`.
    ///
    /// The k-th rendered item with a given key takes the k-th aggregator index
    /// recorded under that key, so distinct items sharing a link or id still
    /// show their own index.
    fn header(&self, source: SourceRef<'_>, seen: &mut HashMap<SourceKey, usize>) -> String {
        let key = source.key();
        let indices = self.collector.aggregator_indices_for(&key);
        let nth = seen.entry(key).or_insert(0);
        let found = indices.get(*nth).or(indices.last()).copied();
        *nth += 1;

        match found {
            Some(idx) => format!("Source [{}]:", idx),
            None => {
                tracing::debug!(
                    "No aggregator index for {} source, using `{}`",
                    source.source_type(),
                    self.missing_marker
                );
                format!("Source [{}]:", self.missing_marker)
            }
        }
    }

    /// Render `results`, lines joined by `\n`.
    pub fn render(&self, results: &AggregateSearchResult) -> String {
        let mut lines: Vec<String> = Vec::new();
        let mut seen: HashMap<SourceKey, usize> = HashMap::new();

        if !results.chunks().is_empty() {
            lines.push("Vector Search Results:".to_string());
            for c in results.chunks() {
                lines.push(self.header(SourceRef::Chunk(c), &mut seen));
                lines.push(c.text.clone());
            }
        }

        if !results.graph().is_empty() {
            lines.push("Graph Search Results:".to_string());
            for g in results.graph() {
                lines.push(self.header(SourceRef::Graph(g), &mut seen));
                match &g.content {
                    None => {}
                    Some(GraphContent::Community { id, name, summary, .. }) => {
                        lines.push(format!("Community Name: {}", name));
                        lines.push(format!("ID: {}", display_id(id.as_ref())));
                        lines.push(format!("Summary: {}", summary));
                    }
                    Some(GraphContent::Entity { name, description, .. }) => {
                        lines.push(format!("Entity Name: {}", name));
                        if let Some(description) = description {
                            lines.push(format!("Description: {}", description));
                        }
                    }
                    Some(GraphContent::Relationship {
                        subject,
                        predicate,
                        object,
                        ..
                    }) => {
                        lines.push(format!("Relationship: {}-{}-{}", subject, predicate, object));
                    }
                }
            }
        }

        if !results.web().is_empty() {
            lines.push("Web Search Results:".to_string());
            for w in results.web() {
                lines.push(self.header(SourceRef::Web(w), &mut seen));
                lines.push(format!("Title: {}", w.title));
                lines.push(format!("Link: {}", w.link));
                lines.push(format!("Snippet: {}", w.snippet));
            }
        }

        if !results.context_documents().is_empty() {
            lines.push("Local Context Documents:".to_string());
            for doc in results.context_documents() {
                lines.push(self.header(SourceRef::ContextDoc(doc), &mut seen));
                lines.push(format!(
                    "Document Title: {} (ID: {})",
                    doc.title(),
                    doc.document_id()
                ));
                let summary = doc.summary();
                if !summary.is_empty() {
                    lines.push(format!("Summary: {}", summary));
                }
                for (i, chunk_text) in doc.chunks.iter().enumerate() {
                    lines.push(format!("Chunk {}: {}", i + 1, chunk_text));
                }
            }
        }

        lines.join("\n")
    }
}

fn display_id(id: Option<&Value>) -> String {
    match id {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => "N/A".to_string(),
        Some(other) => other.to_string(),
    }
}

/// Render sources as tagged JSON segments.
///
/// Emits `<chunk_search>`, `<graph_search>`, `<web_search>` and `<content>`
/// segments, in that order, each wrapping a JSON array of the category's
/// items. Empty categories produce no segment.
pub fn format_search_results_for_stream(results: &AggregateSearchResult) -> String {
    let mut context = String::new();

    push_segment(
        &mut context,
        CHUNK_SEARCH_STREAM_MARKER,
        results.chunks().iter().map(|r| r.as_dict()).collect(),
    );
    push_segment(
        &mut context,
        GRAPH_SEARCH_STREAM_MARKER,
        results.graph().iter().map(|r| r.as_dict()).collect(),
    );
    push_segment(
        &mut context,
        WEB_SEARCH_STREAM_MARKER,
        results.web().iter().map(|r| r.as_dict()).collect(),
    );
    push_segment(
        &mut context,
        CONTEXT_STREAM_MARKER,
        results.context_documents().iter().map(|r| r.as_dict()).collect(),
    );

    context
}

fn push_segment(out: &mut String, tag: &str, items: Vec<Value>) {
    if items.is_empty() {
        return;
    }
    out.push_str(&format!("<{}>", tag));
    out.push_str(&Value::Array(items).to_string());
    out.push_str(&format!("</{}>", tag));
}
