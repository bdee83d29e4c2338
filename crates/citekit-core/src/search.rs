//! Search result model consumed by the citation pipeline.
//!
//! This module provides the typed records for the four retrieval categories
//! and the container that groups them:
//! - [`ChunkSearchResult`] - a text chunk from a vector/hybrid search
//! - [`GraphSearchResult`] - a knowledge-graph entity, relationship or community
//! - [`WebSearchResult`] - a web search hit
//! - [`ContextDocumentResult`] - a local context document with its chunk texts
//! - [`AggregateSearchResult`] - the four optional sequences, in category order
//!
//! ## Category order
//!
//! Chunk, graph, web, then context documents. The order is fixed because the
//! positional mapper flattens sources the same way the prompt lists them.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Free-form metadata attached to results and citations.
pub type Metadata = Map<String, Value>;

// ============================================================================
// SourceType
// ============================================================================

/// The category a cited source belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SourceType {
    /// Text chunk from a document.
    Chunk,
    /// Knowledge-graph entity, relationship or community.
    Graph,
    /// Web search hit.
    Web,
    /// Local context document.
    ContextDoc,
    /// Reference that did not resolve to any source.
    Unknown,
}

impl SourceType {
    /// Wire spelling of the source type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Chunk => "chunk",
            Self::Graph => "graph",
            Self::Web => "web",
            Self::ContextDoc => "contextDoc",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// ChunkSearchResult
// ============================================================================

/// A chunk of document text returned by retrieval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkSearchResult {
    /// Chunk identifier.
    pub id: Uuid,

    /// Document the chunk belongs to.
    pub document_id: Uuid,

    /// Owner of the document, when known.
    #[serde(default)]
    pub owner_id: Option<Uuid>,

    /// Collections the document is part of.
    #[serde(default)]
    pub collection_ids: Vec<Uuid>,

    /// Retrieval score.
    #[serde(default)]
    pub score: Option<f64>,

    /// Chunk text.
    pub text: String,

    /// Free-form chunk metadata.
    #[serde(default)]
    pub metadata: Metadata,
}

impl ChunkSearchResult {
    /// Dictionary representation used by the stream renderer.
    pub fn as_dict(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

// ============================================================================
// GraphSearchResult
// ============================================================================

/// The kind of knowledge-graph item a graph result carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GraphResultType {
    Entity,
    Relationship,
    Community,
}

/// Structured content of a graph result.
///
/// Serialized untagged so that the wire form is the plain content object.
/// Variant order matters for deserialization: relationships are recognized by
/// their triple, communities by `summary`, and anything else with a `name` is an
/// entity (its `description` may be missing or `null`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GraphContent {
    Relationship {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<Value>,
        subject: String,
        predicate: String,
        object: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        metadata: Option<Metadata>,
    },
    Community {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<Value>,
        name: String,
        summary: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        metadata: Option<Metadata>,
    },
    Entity {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<Value>,
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        metadata: Option<Metadata>,
    },
}

impl GraphContent {
    /// The result type matching this content.
    pub fn result_type(&self) -> GraphResultType {
        match self {
            Self::Relationship { .. } => GraphResultType::Relationship,
            Self::Community { .. } => GraphResultType::Community,
            Self::Entity { .. } => GraphResultType::Entity,
        }
    }

    /// The content's own identifier, if it carries one.
    pub fn id(&self) -> Option<&Value> {
        match self {
            Self::Relationship { id, .. } | Self::Community { id, .. } | Self::Entity { id, .. } => {
                id.as_ref().filter(|v| !v.is_null())
            }
        }
    }
}

/// A knowledge-graph search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphSearchResult {
    /// Entity, relationship or community content, when the item carries any.
    #[serde(default)]
    pub content: Option<GraphContent>,

    /// Declared result type (derived from content when absent).
    #[serde(default)]
    pub result_type: Option<GraphResultType>,

    /// Chunks the graph item was extracted from.
    #[serde(default)]
    pub chunk_ids: Option<Vec<Uuid>>,

    /// Free-form result metadata.
    #[serde(default)]
    pub metadata: Metadata,

    /// Retrieval score.
    #[serde(default)]
    pub score: Option<f64>,
}

impl GraphSearchResult {
    /// Declared result type, or the one implied by the content.
    pub fn resolved_type(&self) -> Option<GraphResultType> {
        self.result_type
            .or_else(|| self.content.as_ref().map(GraphContent::result_type))
    }

    /// Dictionary representation used by the stream renderer.
    pub fn as_dict(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

// ============================================================================
// WebSearchResult
// ============================================================================

/// A web search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebSearchResult {
    pub title: String,
    pub link: String,
    #[serde(default)]
    pub snippet: String,
    #[serde(default)]
    pub position: u32,
    #[serde(rename = "type", default = "default_web_type")]
    pub kind: String,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub sitelinks: Option<Vec<Value>>,
}

fn default_web_type() -> String {
    "organic".to_string()
}

impl WebSearchResult {
    /// Dictionary representation used by the stream renderer.
    pub fn as_dict(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

// ============================================================================
// ContextDocumentResult
// ============================================================================

/// A local context document and the texts of its chunks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextDocumentResult {
    /// Raw document fields (`id`, `title`, `summary`, ...).
    pub document: Metadata,

    /// Chunk texts in document order.
    #[serde(default)]
    pub chunks: Vec<String>,
}

impl ContextDocumentResult {
    /// Document title, or `"Untitled Document"`.
    pub fn title(&self) -> String {
        self.document_field("title")
            .unwrap_or_else(|| "Untitled Document".to_string())
    }

    /// Document id, or `"N/A"`.
    pub fn document_id(&self) -> String {
        self.document_field("id").unwrap_or_else(|| "N/A".to_string())
    }

    /// Document summary, or the empty string.
    pub fn summary(&self) -> String {
        self.document_field("summary").unwrap_or_default()
    }

    fn document_field(&self, key: &str) -> Option<String> {
        self.document.get(key).and_then(value_to_text)
    }

    /// Dictionary representation used by the stream renderer.
    pub fn as_dict(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// Render a JSON scalar as display text (strings without quotes).
pub(crate) fn value_to_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

// ============================================================================
// SourceItem / SourceRef
// ============================================================================

/// One owned retrieved item of any category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "sourceType", content = "item", rename_all = "camelCase")]
pub enum SourceItem {
    Chunk(ChunkSearchResult),
    Graph(GraphSearchResult),
    Web(WebSearchResult),
    ContextDoc(ContextDocumentResult),
}

impl SourceItem {
    /// Borrow this item.
    pub fn as_source_ref(&self) -> SourceRef<'_> {
        match self {
            Self::Chunk(c) => SourceRef::Chunk(c),
            Self::Graph(g) => SourceRef::Graph(g),
            Self::Web(w) => SourceRef::Web(w),
            Self::ContextDoc(d) => SourceRef::ContextDoc(d),
        }
    }

    /// Category of this item.
    pub fn source_type(&self) -> SourceType {
        self.as_source_ref().source_type()
    }

    /// Stable lookup key of this item.
    pub fn key(&self) -> SourceKey {
        self.as_source_ref().key()
    }
}

impl From<ChunkSearchResult> for SourceItem {
    fn from(value: ChunkSearchResult) -> Self {
        Self::Chunk(value)
    }
}

impl From<GraphSearchResult> for SourceItem {
    fn from(value: GraphSearchResult) -> Self {
        Self::Graph(value)
    }
}

impl From<WebSearchResult> for SourceItem {
    fn from(value: WebSearchResult) -> Self {
        Self::Web(value)
    }
}

impl From<ContextDocumentResult> for SourceItem {
    fn from(value: ContextDocumentResult) -> Self {
        Self::ContextDoc(value)
    }
}

/// A borrowed retrieved item of any category.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SourceRef<'a> {
    Chunk(&'a ChunkSearchResult),
    Graph(&'a GraphSearchResult),
    Web(&'a WebSearchResult),
    ContextDoc(&'a ContextDocumentResult),
}

impl<'a> SourceRef<'a> {
    /// Category of the referenced item.
    pub fn source_type(&self) -> SourceType {
        match self {
            Self::Chunk(_) => SourceType::Chunk,
            Self::Graph(_) => SourceType::Graph,
            Self::Web(_) => SourceType::Web,
            Self::ContextDoc(_) => SourceType::ContextDoc,
        }
    }

    /// Clone the referenced item into an owned [`SourceItem`].
    pub fn to_item(&self) -> SourceItem {
        match *self {
            Self::Chunk(c) => SourceItem::Chunk(c.clone()),
            Self::Graph(g) => SourceItem::Graph(g.clone()),
            Self::Web(w) => SourceItem::Web(w.clone()),
            Self::ContextDoc(d) => SourceItem::ContextDoc(d.clone()),
        }
    }

    /// Stable lookup key.
    ///
    /// Uses the item's own identifier (chunk id, graph content id, web link,
    /// context document `id`) and falls back to the serialized item.
    pub fn key(&self) -> SourceKey {
        match *self {
            Self::Chunk(c) => SourceKey::Chunk(c.id),
            Self::Graph(g) => {
                let kind = match g.resolved_type() {
                    Some(GraphResultType::Entity) => "entity",
                    Some(GraphResultType::Relationship) => "relationship",
                    Some(GraphResultType::Community) => "community",
                    None => "graph",
                };
                let id = match g.content.as_ref() {
                    Some(content) => match content.id() {
                        Some(id) => value_to_text(id).unwrap_or_default(),
                        None => serde_json::to_string(content).unwrap_or_default(),
                    },
                    None => serde_json::to_string(g).unwrap_or_default(),
                };
                SourceKey::Graph(format!("{}:{}", kind, id))
            }
            Self::Web(w) => SourceKey::Web(w.link.clone()),
            Self::ContextDoc(d) => {
                let id = d
                    .document
                    .get("id")
                    .and_then(value_to_text)
                    .unwrap_or_else(|| serde_json::to_string(&d.document).unwrap_or_default());
                SourceKey::ContextDoc(id)
            }
        }
    }
}

/// Stable identity of a retrieved item, used for O(1) aggregator lookups.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SourceKey {
    Chunk(Uuid),
    Graph(String),
    Web(String),
    ContextDoc(String),
}

// ============================================================================
// AggregateSearchResult
// ============================================================================

/// All retrieved sources for one request, grouped by category.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateSearchResult {
    #[serde(default)]
    pub chunk_search_results: Option<Vec<ChunkSearchResult>>,
    #[serde(default)]
    pub graph_search_results: Option<Vec<GraphSearchResult>>,
    #[serde(default)]
    pub web_search_results: Option<Vec<WebSearchResult>>,
    #[serde(default)]
    pub context_document_results: Option<Vec<ContextDocumentResult>>,
}

impl AggregateSearchResult {
    /// Create an empty aggregate.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set chunk results.
    pub fn with_chunks(mut self, chunks: Vec<ChunkSearchResult>) -> Self {
        self.chunk_search_results = Some(chunks);
        self
    }

    /// Builder: set graph results.
    pub fn with_graph(mut self, graph: Vec<GraphSearchResult>) -> Self {
        self.graph_search_results = Some(graph);
        self
    }

    /// Builder: set web results.
    pub fn with_web(mut self, web: Vec<WebSearchResult>) -> Self {
        self.web_search_results = Some(web);
        self
    }

    /// Builder: set context document results.
    pub fn with_context_documents(mut self, docs: Vec<ContextDocumentResult>) -> Self {
        self.context_document_results = Some(docs);
        self
    }

    pub fn chunks(&self) -> &[ChunkSearchResult] {
        self.chunk_search_results.as_deref().unwrap_or(&[])
    }

    pub fn graph(&self) -> &[GraphSearchResult] {
        self.graph_search_results.as_deref().unwrap_or(&[])
    }

    pub fn web(&self) -> &[WebSearchResult] {
        self.web_search_results.as_deref().unwrap_or(&[])
    }

    pub fn context_documents(&self) -> &[ContextDocumentResult] {
        self.context_document_results.as_deref().unwrap_or(&[])
    }

    /// All items as one sequence in category order.
    pub fn flatten(&self) -> Vec<SourceRef<'_>> {
        let mut flat = Vec::with_capacity(self.len());
        flat.extend(self.chunks().iter().map(SourceRef::Chunk));
        flat.extend(self.graph().iter().map(SourceRef::Graph));
        flat.extend(self.web().iter().map(SourceRef::Web));
        flat.extend(self.context_documents().iter().map(SourceRef::ContextDoc));
        flat
    }

    /// Total number of items across categories.
    pub fn len(&self) -> usize {
        self.chunks().len() + self.graph().len() + self.web().len() + self.context_documents().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    //! Shared builders for unit tests across the crate.

    use super::*;
    use serde_json::json;

    pub fn chunk(n: u128, text: &str) -> ChunkSearchResult {
        ChunkSearchResult {
            id: Uuid::from_u128(n),
            document_id: Uuid::from_u128(1000 + n),
            owner_id: None,
            collection_ids: vec![Uuid::from_u128(42)],
            score: Some(0.9),
            text: text.to_string(),
            metadata: json!({ "page": n as u64 }).as_object().cloned().unwrap_or_default(),
        }
    }

    pub fn entity(id: u64, name: &str, description: &str) -> GraphSearchResult {
        GraphSearchResult {
            content: Some(GraphContent::Entity {
                id: Some(json!(id)),
                name: name.to_string(),
                description: Some(description.to_string()),
                metadata: None,
            }),
            result_type: Some(GraphResultType::Entity),
            chunk_ids: None,
            metadata: Metadata::new(),
            score: Some(0.5),
        }
    }

    pub fn web(position: u32, title: &str, link: &str) -> WebSearchResult {
        WebSearchResult {
            title: title.to_string(),
            link: link.to_string(),
            snippet: format!("About {}", title),
            position,
            kind: "organic".to_string(),
            date: None,
            sitelinks: None,
        }
    }

    pub fn context_doc(id: &str, title: &str, chunks: &[&str]) -> ContextDocumentResult {
        ContextDocumentResult {
            document: json!({ "id": id, "title": title, "summary": format!("{} summary", title) })
                .as_object()
                .cloned()
                .unwrap_or_default(),
            chunks: chunks.iter().map(|c| c.to_string()).collect(),
        }
    }

    /// Two chunks, one entity, one web hit and one context document.
    pub fn mixed_aggregate() -> AggregateSearchResult {
        AggregateSearchResult::new()
            .with_chunks(vec![chunk(1, "Paris is the capital."), chunk(2, "France is in Europe.")])
            .with_graph(vec![entity(7, "Paris", "Capital city of France")])
            .with_web(vec![web(1, "Paris - Wikipedia", "https://en.wikipedia.org/wiki/Paris")])
            .with_context_documents(vec![context_doc("doc-1", "Travel notes", &["Day one", "Day two"])])
    }
}
