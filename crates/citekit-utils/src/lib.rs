//! Utility functions for citekit
//!
//! Small helpers shared by services that build on citekit-core: deterministic
//! ids, settings merging, vector column types and version strings. Kept apart
//! from the core crate so that it stays free of citation concerns.

use thiserror::Error;

pub mod ids;
pub mod merge;
pub mod stream;
pub mod vector;
pub mod version;

pub use ids::{
    generate_default_prompt_id, generate_default_user_collection_id, generate_document_id,
    generate_entity_document_id, generate_extraction_id, generate_id, generate_user_id,
    validate_uuid,
};
pub use merge::{deep_update, update_settings_from_value};
pub use stream::to_async_stream;
pub use vector::{vector_column_str, VectorQuantizationType};
pub use version::{decrement_version, increment_version};

#[derive(Debug, Error)]
pub enum UtilsError {
    #[error("Invalid UUID `{value}`: {message}")]
    InvalidUuid { value: String, message: String },

    #[error("Invalid version `{0}`: must end with a digit")]
    InvalidVersion(String),

    #[error("Cannot apply settings: {0}")]
    InvalidSettings(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
