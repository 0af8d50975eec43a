use std::path::PathBuf;

use crate::embedding::error::EmbeddingError;

pub const ENCODER_EMBEDDING_DIM: usize = crate::constants::DEFAULT_EMBEDDING_DIM;

pub const ENCODER_MAX_SEQ_LEN: usize = crate::constants::DEFAULT_MAX_SEQ_LEN;

/// Configuration for [`SentenceEncoder`](super::SentenceEncoder).
#[derive(Debug, Clone)]
pub struct EncoderConfig {
    /// Model directory holding `config.json`, `model.safetensors` and `tokenizer.json`.
    /// `None` selects the deterministic stub.
    pub model_path: Option<PathBuf>,
    pub embedding_dim: usize,
    pub max_seq_len: usize,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            model_path: None,
            embedding_dim: ENCODER_EMBEDDING_DIM,
            max_seq_len: ENCODER_MAX_SEQ_LEN,
        }
    }
}

impl EncoderConfig {
    pub const ENV_MODEL_PATH: &'static str = "SHORTLIST_ENCODER_PATH";

    pub fn new<P: Into<PathBuf>>(model_path: P) -> Self {
        Self {
            model_path: Some(model_path.into()),
            ..Default::default()
        }
    }

    pub fn stub() -> Self {
        Self::default()
    }

    pub fn with_embedding_dim(mut self, embedding_dim: usize) -> Self {
        self.embedding_dim = embedding_dim;
        self
    }

    pub fn from_env() -> Self {
        let model_path = std::env::var(Self::ENV_MODEL_PATH)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        Self {
            model_path,
            ..Default::default()
        }
    }

    pub fn is_stub(&self) -> bool {
        self.model_path.is_none()
    }

    pub fn validate(&self) -> Result<(), EmbeddingError> {
        if self.embedding_dim == 0 {
            return Err(EmbeddingError::InvalidConfig {
                reason: "embedding_dim must be greater than 0".to_string(),
            });
        }

        if self.max_seq_len == 0 {
            return Err(EmbeddingError::InvalidConfig {
                reason: "max_seq_len must be greater than 0".to_string(),
            });
        }

        if let Some(ref path) = self.model_path
            && path.as_os_str().is_empty()
        {
            return Err(EmbeddingError::InvalidConfig {
                reason: "model_path cannot be empty when provided".to_string(),
            });
        }

        Ok(())
    }
}
