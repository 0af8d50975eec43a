use thiserror::Error;

use crate::candidate::NormalizeError;
use crate::embedding::EmbeddingError;
use crate::vectordb::VectorDbError;

/// Request-level ranking failures. Everything else degrades inside its stage.
#[derive(Debug, Error)]
pub enum RankingError {
    #[error("no resumes could be processed ({submitted} submitted)")]
    EmptyBatch { submitted: usize },

    #[error("embedding failed: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("vector index error: {0}")]
    VectorStore(#[from] VectorDbError),

    /// A model stage running on the blocking pool panicked or was cancelled.
    #[error("ranking worker failed: {0}")]
    Worker(String),
}

impl From<NormalizeError> for RankingError {
    fn from(err: NormalizeError) -> Self {
        match err {
            NormalizeError::EmptyBatch { submitted } => RankingError::EmptyBatch { submitted },
        }
    }
}
