//! Vector column type strings for pgvector-style stores.

use serde::{Deserialize, Serialize};

/// Storage precision of an embedding column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum VectorQuantizationType {
    #[default]
    Fp32,
    Fp16,
    Int1,
}

impl VectorQuantizationType {
    /// Database column type name.
    pub fn db_type(&self) -> &'static str {
        match self {
            Self::Fp32 => "vector",
            Self::Fp16 => "halfvec",
            Self::Int1 => "bit",
        }
    }
}

/// Column type for `dimension`, e.g. `vector(512)`.
///
/// A NaN or non-positive dimension yields the bare type so the store accepts
/// any dimension.
pub fn vector_column_str(dimension: f64, quantization: VectorQuantizationType) -> String {
    if dimension.is_nan() || dimension <= 0.0 {
        quantization.db_type().to_string()
    } else {
        format!("{}({})", quantization.db_type(), dimension)
    }
}
