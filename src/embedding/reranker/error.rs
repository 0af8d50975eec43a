use std::path::PathBuf;
use thiserror::Error;

use crate::embedding::error::EmbeddingError;

/// Cross-encoder failures. The rerank stage never propagates these: a candidate whose
/// pair cannot be scored keeps its retrieval score instead.
#[derive(Debug, Error)]
pub enum RerankerError {
    #[error("cross-encoder directory not found: {path}")]
    ModelNotFound { path: PathBuf },

    #[error("cross-encoder could not be loaded: {reason}")]
    ModelLoadFailed { reason: String },

    #[error("{device} device unavailable for cross-encoder: {reason}")]
    DeviceUnavailable { device: String, reason: String },

    /// Forward pass or logit extraction failed for one pair.
    #[error("cross-encoder scoring failed: {reason}")]
    InferenceFailed { reason: String },

    #[error("could not tokenize job/resume pair: {reason}")]
    TokenizationFailed { reason: String },

    #[error("invalid cross-encoder configuration: {reason}")]
    InvalidConfig { reason: String },

    /// The lazily loaded model could not be loaded for this call.
    #[error("cross-encoder not available: {reason}")]
    NotAvailable { reason: String },
}

impl From<candle_core::Error> for RerankerError {
    fn from(err: candle_core::Error) -> Self {
        RerankerError::InferenceFailed {
            reason: err.to_string(),
        }
    }
}

impl From<EmbeddingError> for RerankerError {
    fn from(err: EmbeddingError) -> Self {
        match err {
            EmbeddingError::DeviceUnavailable { device, reason } => {
                RerankerError::DeviceUnavailable { device, reason }
            }
            other => RerankerError::ModelLoadFailed {
                reason: other.to_string(),
            },
        }
    }
}
