//! Citation records produced by the resolution pipeline.
//!
//! A [`Citation`] is one bracket occurrence (`[3]`) in generated text. The
//! bracket fields are always present; the source fields are a tagged union on
//! `sourceType` ([`CitationSource`]) that the mappers fill in.
//!
//! ## Wire shape
//!
//! ```json
//! {
//!   "index": 1, "rawIndex": 4,
//!   "startIndex": 18, "endIndex": 21,
//!   "snippetStartIndex": 0, "snippetEndIndex": 23,
//!   "sourceType": "chunk",
//!   "id": "...", "document_id": "...", "owner_id": null,
//!   "collection_ids": ["..."], "score": 0.9, "text": "...", "metadata": {}
//! }
//! ```
//!
//! Offsets are byte offsets into the UTF-8 text the citation was scanned from.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::search::{Metadata, SourceRef, SourceType};

/// Metadata key under which graph citations carry the serialized graph content.
pub const GRAPH_CONTENT_KEY: &str = "graphContent";

// ============================================================================
// Citation
// ============================================================================

/// One resolved or unresolved bracket reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Citation {
    /// Final sequential reference number (1-based).
    pub index: usize,

    /// Bracket number as the model originally wrote it.
    pub raw_index: usize,

    /// Byte offset of `[` in the current text.
    pub start_index: usize,

    /// Byte offset just past `]` in the current text.
    pub end_index: usize,

    /// Start of the sentence-bounded snippet around the bracket.
    pub snippet_start_index: usize,

    /// End of the sentence-bounded snippet around the bracket.
    pub snippet_end_index: usize,

    /// Bound source. `None` means no mapper has assigned a source type.
    #[serde(flatten)]
    pub source: Option<CitationSource>,
}

impl Citation {
    /// The source type, if one has been assigned.
    pub fn source_type(&self) -> Option<SourceType> {
        self.source.as_ref().map(CitationSource::source_type)
    }

    /// Whether the citation is bound to an actual source.
    pub fn is_resolved(&self) -> bool {
        matches!(
            self.source_type(),
            Some(t) if t != SourceType::Unknown
        )
    }

    /// The snippet span sliced out of `text`.
    ///
    /// Returns `None` if the offsets do not fit `text` (e.g. it is not the text
    /// this citation was produced from).
    pub fn snippet<'a>(&self, text: &'a str) -> Option<&'a str> {
        text.get(self.snippet_start_index..self.snippet_end_index)
    }

    /// A copy of this citation bound to `source`.
    pub fn bound_to(&self, source: SourceRef<'_>) -> Self {
        Self {
            source: Some(CitationSource::from_source(source)),
            ..self.clone()
        }
    }

    /// A copy of this citation marked as unresolved.
    pub fn unresolved(&self) -> Self {
        Self {
            source: Some(CitationSource::Unknown),
            ..self.clone()
        }
    }
}

// ============================================================================
// CitationSource
// ============================================================================

/// Source metadata bound to a citation, tagged by `sourceType`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "sourceType", rename_all = "camelCase")]
pub enum CitationSource {
    Chunk(ChunkCitation),
    Graph(GraphCitation),
    Web(WebCitation),
    ContextDoc(ContextDocCitation),
    Unknown,
}

impl CitationSource {
    pub fn source_type(&self) -> SourceType {
        match self {
            Self::Chunk(_) => SourceType::Chunk,
            Self::Graph(_) => SourceType::Graph,
            Self::Web(_) => SourceType::Web,
            Self::ContextDoc(_) => SourceType::ContextDoc,
            Self::Unknown => SourceType::Unknown,
        }
    }

    /// Populate per-category metadata from a retrieved item.
    pub fn from_source(source: SourceRef<'_>) -> Self {
        match source {
            SourceRef::Chunk(c) => Self::Chunk(ChunkCitation {
                id: c.id.to_string(),
                document_id: c.document_id.to_string(),
                owner_id: c.owner_id.map(|o| o.to_string()),
                collection_ids: c.collection_ids.iter().map(|id| id.to_string()).collect(),
                score: c.score,
                text: c.text.clone(),
                metadata: c.metadata.clone(),
            }),
            SourceRef::Graph(g) => {
                let mut metadata = g.metadata.clone();
                if let Some(content) = g.content.as_ref().and_then(|c| serde_json::to_value(c).ok()) {
                    metadata.insert(GRAPH_CONTENT_KEY.to_string(), content);
                }
                Self::Graph(GraphCitation {
                    score: g.score,
                    metadata,
                })
            }
            SourceRef::Web(w) => {
                let mut metadata = Metadata::new();
                metadata.insert("link".to_string(), Value::String(w.link.clone()));
                metadata.insert("title".to_string(), Value::String(w.title.clone()));
                metadata.insert("position".to_string(), Value::from(w.position));
                Self::Web(WebCitation { metadata })
            }
            SourceRef::ContextDoc(d) => {
                let mut metadata = Metadata::new();
                metadata.insert("document".to_string(), Value::Object(d.document.clone()));
                metadata.insert(
                    "chunks".to_string(),
                    Value::Array(d.chunks.iter().cloned().map(Value::String).collect()),
                );
                Self::ContextDoc(ContextDocCitation { metadata })
            }
        }
    }

    /// Free-form metadata of the bound source (empty for `unknown`).
    pub fn metadata(&self) -> Option<&Metadata> {
        match self {
            Self::Chunk(c) => Some(&c.metadata),
            Self::Graph(g) => Some(&g.metadata),
            Self::Web(w) => Some(&w.metadata),
            Self::ContextDoc(d) => Some(&d.metadata),
            Self::Unknown => None,
        }
    }
}

/// Citation of a text chunk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkCitation {
    pub id: String,
    pub document_id: String,
    /// Serialized as an explicit `null` when the chunk has no owner.
    pub owner_id: Option<String>,
    pub collection_ids: Vec<String>,
    pub score: Option<f64>,
    pub text: String,
    pub metadata: Metadata,
}

/// Citation of a knowledge-graph item. `metadata` holds `graphContent` when the
/// item carries structured content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphCitation {
    pub score: Option<f64>,
    pub metadata: Metadata,
}

/// Citation of a web hit. `metadata` holds `link`, `title`, `position`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebCitation {
    pub metadata: Metadata,
}

/// Citation of a context document. `metadata` holds `document` and `chunks`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextDocCitation {
    pub metadata: Metadata,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::fixtures::*;
    use serde_json::json;

    fn bare() -> Citation {
        Citation {
            index: 1,
            raw_index: 4,
            start_index: 10,
            end_index: 13,
            snippet_start_index: 0,
            snippet_end_index: 14,
            source: None,
        }
    }

    #[test]
    fn test_unbound_citation_has_no_source_type_key() {
        let json = serde_json::to_value(bare()).unwrap();
        assert_eq!(json["rawIndex"], json!(4));
        assert_eq!(json["snippetEndIndex"], json!(14));
        assert!(json.get("sourceType").is_none());
    }

    #[test]
    fn test_chunk_citation_serializes_null_owner() {
        let c = chunk(1, "Paris is the capital.");
        let cit = bare().bound_to(SourceRef::Chunk(&c));
        let json = serde_json::to_value(&cit).unwrap();
        assert_eq!(json["sourceType"], json!("chunk"));
        assert_eq!(json["owner_id"], Value::Null);
        assert_eq!(json["text"], json!("Paris is the capital."));
        assert_eq!(json["collection_ids"].as_array().map(|a| a.len()), Some(1));
        assert!(cit.is_resolved());
    }

    #[test]
    fn test_graph_citation_embeds_content() {
        let g = entity(7, "Paris", "Capital city of France");
        let cit = bare().bound_to(SourceRef::Graph(&g));
        let metadata = cit.source.as_ref().and_then(|s| s.metadata()).unwrap();
        assert_eq!(metadata[GRAPH_CONTENT_KEY]["name"], json!("Paris"));
        assert_eq!(cit.source_type(), Some(SourceType::Graph));
    }

    #[test]
    fn test_graph_citation_without_content_keeps_plain_metadata() {
        let mut g = entity(7, "Paris", "Capital city of France");
        g.content = None;
        g.metadata.insert("source".to_string(), json!("kg"));
        let cit = bare().bound_to(SourceRef::Graph(&g));
        let metadata = cit.source.as_ref().and_then(|s| s.metadata()).unwrap();
        assert!(metadata.get(GRAPH_CONTENT_KEY).is_none());
        assert_eq!(metadata["source"], json!("kg"));
        assert!(cit.is_resolved());
    }

    #[test]
    fn test_web_citation_metadata_omits_snippet() {
        let w = web(3, "Paris", "https://example.com/paris");
        let cit = bare().bound_to(SourceRef::Web(&w));
        let metadata = cit.source.as_ref().and_then(|s| s.metadata()).unwrap();
        assert_eq!(metadata["position"], json!(3));
        assert!(metadata.get("snippet").is_none());
    }

    #[test]
    fn test_unknown_roundtrips_through_json() {
        let cit = bare().unresolved();
        let json = serde_json::to_string(&cit).unwrap();
        assert!(json.contains("\"sourceType\":\"unknown\""));
        let back: Citation = serde_json::from_str(&json).unwrap();
        assert_eq!(back.source_type(), Some(SourceType::Unknown));
        assert!(!back.is_resolved());
    }

    #[test]
    fn test_snippet_slices_text() {
        let text = "A. [1] B.";
        let cit = Citation {
            start_index: 3,
            end_index: 6,
            snippet_start_index: 3,
            snippet_end_index: 9,
            ..bare()
        };
        assert_eq!(cit.snippet(text), Some("[1] B."));
        assert_eq!(cit.snippet("short"), None);
    }
}
