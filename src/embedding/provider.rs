//! Capability contracts the ranking stages consume.

use super::error::EmbeddingError;
use super::reranker::RerankerError;

/// Maps text to a fixed-dimension vector.
///
/// Implementations must be deterministic for a given model: the same text always yields the
/// same vector.
pub trait EmbeddingProvider: Send + Sync {
    fn encode(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    /// Length of every vector returned by [`encode`](Self::encode).
    fn dimension(&self) -> usize;

    /// Like [`dimension`](Self::dimension), but reports a model that cannot be loaded
    /// instead of guessing its size.
    fn try_dimension(&self) -> Result<usize, EmbeddingError> {
        Ok(self.dimension())
    }
}

/// Scores one (query, candidate) pair jointly. Higher is more relevant; the expected range
/// is `[0, 1]`.
pub trait PairwiseReranker: Send + Sync {
    fn score(&self, query: &str, candidate: &str) -> Result<f32, RerankerError>;
}

impl<T: EmbeddingProvider + ?Sized> EmbeddingProvider for std::sync::Arc<T> {
    fn encode(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        (**self).encode(text)
    }

    fn dimension(&self) -> usize {
        (**self).dimension()
    }

    fn try_dimension(&self) -> Result<usize, EmbeddingError> {
        (**self).try_dimension()
    }
}

impl<T: PairwiseReranker + ?Sized> PairwiseReranker for std::sync::Arc<T> {
    fn score(&self, query: &str, candidate: &str) -> Result<f32, RerankerError> {
        (**self).score(query, candidate)
    }
}

/// Cosine similarity of two vectors. Returns `0.0` for mismatched lengths or zero vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom == 0.0 { 0.0 } else { dot / denom }
}

/// Scales a vector to unit length in place. Zero vectors are left as is.
pub fn l2_normalize(vector: &mut [f32]) {
    let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in vector.iter_mut() {
            *x /= norm;
        }
    }
}
