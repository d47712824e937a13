//! Boundary with the embedding provider.
//!
//! The provider is called once per pass, in bulk, with the normalized texts of
//! the corpus. It either returns one vector per text, all of the same width,
//! or the pass falls back to lexical deduplication.

pub mod table;

use thiserror::Error;

pub use table::EmbeddingTable;

#[derive(Debug, Error, PartialEq)]
pub enum EmbeddingError {
    #[error("Embedding provider unavailable: {0}")]
    Unavailable(String),
    #[error("Expected {expected} embeddings, got {actual}")]
    Misaligned { expected: usize, actual: usize },
    #[error("Embedding {index} has width {actual}, expected {expected}")]
    DimensionMismatch {
        index: usize,
        expected: usize,
        actual: usize,
    },
    #[error("Embeddings have zero width")]
    EmptyVector,
    #[error("Embedding {index} contains a non-finite value")]
    NonFinite { index: usize },
}

pub trait EmbeddingProvider {
    /// One vector per input text, in input order.
    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError>;
}

impl<P: EmbeddingProvider + ?Sized> EmbeddingProvider for &P {
    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        (**self).embed(texts)
    }
}

impl<P: EmbeddingProvider + ?Sized> EmbeddingProvider for Box<P> {
    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        (**self).embed(texts)
    }
}

/// Marker for pipelines configured without any embedding provider.
///
/// Uninhabited: a lexical-only pipeline can never hold one.
#[derive(Debug, Clone, Copy)]
pub enum NoEmbedder {}

impl EmbeddingProvider for NoEmbedder {
    fn embed(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        match *self {}
    }
}

/// A complete, validated embedding set: every vector finite and of one width.
#[derive(Debug, Clone, PartialEq)]
pub struct Embeddings {
    vectors: Vec<Vec<f32>>,
    dim: usize,
}

impl Embeddings {
    pub fn new(vectors: Vec<Vec<f32>>) -> Result<Self, EmbeddingError> {
        let dim = match vectors.first() {
            Some(first) if first.is_empty() => return Err(EmbeddingError::EmptyVector),
            Some(first) => first.len(),
            None => 0,
        };

        for (index, v) in vectors.iter().enumerate() {
            if v.len() != dim {
                return Err(EmbeddingError::DimensionMismatch {
                    index,
                    expected: dim,
                    actual: v.len(),
                });
            }
            if v.iter().any(|x| !x.is_finite()) {
                return Err(EmbeddingError::NonFinite { index });
            }
        }

        Ok(Self { vectors, dim })
    }

    /// Call the provider once and validate the whole answer against `texts`.
    pub fn from_provider<P: EmbeddingProvider + ?Sized>(
        provider: &P,
        texts: &[String],
    ) -> Result<Self, EmbeddingError> {
        let embeddings = Self::new(provider.embed(texts)?)?;
        embeddings.check_aligned(texts.len())?;
        Ok(embeddings)
    }

    pub fn check_aligned(&self, expected: usize) -> Result<(), EmbeddingError> {
        if self.vectors.len() != expected {
            return Err(EmbeddingError::Misaligned {
                expected,
                actual: self.vectors.len(),
            });
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn get(&self, index: usize) -> &[f32] {
        &self.vectors[index]
    }
}
