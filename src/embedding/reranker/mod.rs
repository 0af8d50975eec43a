//! Cross-encoder scoring a (job description, resume) pair jointly.

pub mod config;
pub mod error;

#[cfg(test)]
mod tests;

pub use config::{MAX_SEQ_LEN, RerankerConfig};
pub use error::RerankerError;

use std::collections::HashSet;
use std::sync::LazyLock;

use candle_core::{Device, Tensor};
use tokenizers::Tokenizer;
use tracing::{debug, info};

use crate::embedding::bert::BertClassifier;
use crate::embedding::device::select_device;
use crate::embedding::provider::PairwiseReranker;
use crate::embedding::utils::{load_tokenizer, missing_model_file};

static STOP_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "a", "an", "the", "is", "are", "was", "were", "be", "been", "have", "has", "had", "do",
        "does", "did", "will", "would", "could", "should", "can", "to", "of", "in", "for", "on",
        "with", "at", "by", "from", "as", "into", "and", "but", "if", "or", "not", "no", "so",
        "than", "too", "very", "just", "this", "that", "these", "those", "it", "its", "we", "you",
        "our", "your", "who", "what", "which", "all", "any", "some", "such",
    ]
    .into_iter()
    .collect()
});

fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

pub struct Reranker {
    device: Device,
    config: RerankerConfig,
    model: Option<(BertClassifier, Tokenizer)>,
}

impl std::fmt::Debug for Reranker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reranker")
            .field("device", &format!("{:?}", self.device))
            .field("config", &self.config)
            .field("model_loaded", &self.is_model_loaded())
            .finish()
    }
}

impl Reranker {
    pub fn load(config: RerankerConfig) -> Result<Self, RerankerError> {
        if let Err(msg) = config.validate() {
            return Err(RerankerError::InvalidConfig { reason: msg });
        }

        let Some(model_path) = config.model_path.clone() else {
            info!("No reranker model path configured, operating in stub mode");
            return Ok(Self {
                device: Device::Cpu,
                config,
                model: None,
            });
        };

        if !model_path.exists() {
            return Err(RerankerError::ModelNotFound { path: model_path });
        }

        if let Some(file) = missing_model_file(&model_path) {
            return Err(RerankerError::ModelLoadFailed {
                reason: format!("Missing {} in {}", file, model_path.display()),
            });
        }

        let device = select_device()?;
        debug!(?device, "Selected compute device for reranker");

        info!(model_path = %model_path.display(), "Loading reranker model");

        let model = BertClassifier::load(&model_path, &device).map_err(|e| {
            RerankerError::ModelLoadFailed {
                reason: format!("Failed to load BERT classifier: {}", e),
            }
        })?;

        let tokenizer = load_tokenizer(&model_path, config.max_seq_len).map_err(|e| {
            RerankerError::ModelLoadFailed {
                reason: format!("Failed to load tokenizer: {}", e),
            }
        })?;

        info!("Reranker model loaded");

        Ok(Self {
            device,
            config,
            model: Some((model, tokenizer)),
        })
    }

    pub fn stub() -> Result<Self, RerankerError> {
        Self::load(RerankerConfig::stub())
    }

    pub fn is_model_loaded(&self) -> bool {
        self.model.is_some()
    }

    pub fn config(&self) -> &RerankerConfig {
        &self.config
    }

    fn score_with_model(
        &self,
        model: &BertClassifier,
        tokenizer: &Tokenizer,
        query: &str,
        candidate: &str,
    ) -> Result<f32, RerankerError> {
        let tokens = tokenizer.encode((query, candidate), true).map_err(|e| {
            RerankerError::TokenizationFailed {
                reason: e.to_string(),
            }
        })?;

        let token_ids = Tensor::new(tokens.get_ids(), &self.device)?.unsqueeze(0)?;
        let type_ids = Tensor::new(tokens.get_type_ids(), &self.device)?.unsqueeze(0)?;
        let attention_mask = Tensor::new(tokens.get_attention_mask(), &self.device)?.unsqueeze(0)?;

        let logits = model
            .forward(&token_ids, &type_ids, Some(&attention_mask))
            .map_err(|e| RerankerError::InferenceFailed {
                reason: e.to_string(),
            })?;

        let logit = logits
            .flatten_all()?
            .to_vec1::<f32>()?
            .first()
            .copied()
            .ok_or_else(|| RerankerError::InferenceFailed {
                reason: "classifier returned no logits".to_string(),
            })?;

        Ok(sigmoid(logit))
    }

    /// Lexical relevance in `[0, 1]`: recall of query terms blended with Jaccard overlap.
    fn placeholder_score(&self, query: &str, candidate: &str) -> f32 {
        let terms = |text: &str| -> HashSet<String> {
            text.to_lowercase()
                .split(|c: char| !c.is_alphanumeric())
                .filter(|w| !w.is_empty() && !STOP_WORDS.contains(*w))
                .map(str::to_string)
                .collect()
        };

        let query_terms = terms(query);
        if query_terms.is_empty() {
            return 0.0;
        }
        let candidate_terms = terms(candidate);

        let matches = query_terms.intersection(&candidate_terms).count();
        let recall = matches as f32 / query_terms.len() as f32;
        let union = query_terms.union(&candidate_terms).count();
        let jaccard = matches as f32 / union.max(1) as f32;

        (0.7 * recall + 0.3 * jaccard).clamp(0.0, 1.0)
    }
}

impl PairwiseReranker for Reranker {
    /// Relevance probability in `[0, 1]`.
    fn score(&self, query: &str, candidate: &str) -> Result<f32, RerankerError> {
        debug!(
            query_len = query.len(),
            candidate_len = candidate.len(),
            model_loaded = self.is_model_loaded(),
            "Scoring query-candidate pair"
        );

        match &self.model {
            Some((model, tokenizer)) => self.score_with_model(model, tokenizer, query, candidate),
            None => Ok(self.placeholder_score(query, candidate)),
        }
    }
}
