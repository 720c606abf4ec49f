//! Text encoding for persisted embeddings.
//!
//! Vectors are stored next to the record they describe as a JSON array of
//! floats. The codec owns the expected dimensionality so a stored vector of
//! the wrong length is rejected instead of being padded or truncated.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Embedding;
use crate::error::MalformedVector;

/// The persisted, textual form of an embedding.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EncodedVector(String);

impl EncodedVector {
    /// Wrap text read back from storage. No validation happens here.
    pub fn from_raw(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// The stored text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EncodedVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Converts embeddings to and from their persisted text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VectorCodec {
    dimension: usize,
}

impl VectorCodec {
    /// Create a codec for vectors of exactly `dimension` components.
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Encode an embedding.
    ///
    /// The same checks as [`VectorCodec::decode`] apply, so anything this
    /// returns decodes back to the input.
    pub fn encode(&self, embedding: &[f32]) -> Result<EncodedVector, MalformedVector> {
        self.validate(embedding)?;
        // `f32` Display is the shortest representation that round-trips.
        let components: Vec<String> = embedding.iter().map(ToString::to_string).collect();
        Ok(EncodedVector(format!("[{}]", components.join(","))))
    }

    /// Decode stored text back into an embedding.
    pub fn decode(&self, encoded: &EncodedVector) -> Result<Embedding, MalformedVector> {
        self.decode_str(encoded.as_str())
    }

    /// Decode raw text. Never panics, whatever the input.
    pub fn decode_str(&self, text: &str) -> Result<Embedding, MalformedVector> {
        let embedding: Embedding =
            serde_json::from_str(text).map_err(|e| MalformedVector::Syntax(e.to_string()))?;
        self.validate(&embedding)?;
        Ok(embedding)
    }

    fn validate(&self, embedding: &[f32]) -> Result<(), MalformedVector> {
        if embedding.is_empty() {
            return Err(MalformedVector::Empty);
        }
        if embedding.len() != self.dimension {
            return Err(MalformedVector::WrongDimension {
                expected: self.dimension,
                actual: embedding.len(),
            });
        }
        if let Some(index) = embedding.iter().position(|x| !x.is_finite()) {
            return Err(MalformedVector::NonFinite { index });
        }
        Ok(())
    }
}

impl Default for VectorCodec {
    fn default() -> Self {
        Self::new(crate::DEFAULT_DIMENSION)
    }
}
