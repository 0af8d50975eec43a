//! Cross-cutting, shared constants.
//!
//! The fusion weights and cutoffs are part of the persisted-result contract: a stored
//! [`RankingResult`](crate::ranking::RankingResult) must recompute to the same combined score,
//! so changing any of these invalidates history.

/// Output dimension of the default bi-encoder (all-MiniLM-L6-v2 layout).
pub const DEFAULT_EMBEDDING_DIM: usize = 384;

/// Max tokens fed to either model.
pub const DEFAULT_MAX_SEQ_LEN: usize = 512;

/// Number of retrieval hits promoted to reranking.
pub const SHORTLIST_SIZE: usize = 20;

/// Number of fused results returned as the final ranking.
pub const FINAL_SIZE: usize = 10;

/// Factor applied to cosine similarity and reranker output.
pub const SCORE_SCALE: f64 = 100.0;

pub const RETRIEVAL_WEIGHT: f64 = 0.3;
pub const RERANK_WEIGHT: f64 = 0.7;

pub const CONTEXTUAL_WEIGHT: f64 = 0.7;
pub const REPUTATION_WEIGHT: f64 = 0.3;

/// Upper bound for every sub-score and the reputation score.
pub const MAX_SCORE: f64 = 100.0;

/// Language code that marks a candidate as untranslated.
pub const DEFAULT_LANGUAGE: &str = "en";
