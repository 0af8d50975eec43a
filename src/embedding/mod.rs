//! Embedding and pairwise scoring models.
//!
//! - [`encoder`] produces the bi-encoder vectors used by retrieval.
//! - [`reranker`] provides the cross-encoder used on the shortlist.
//! - [`LazyModel`] defers loading either one until first use.

/// BERT loaders shared by both models.
pub mod bert;
/// Device selection (CPU / Metal / CUDA).
pub mod device;
/// Bi-encoder sentence embeddings.
pub mod encoder;
mod error;
mod lazy;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
mod provider;
/// Cross-encoder reranker.
pub mod reranker;
/// Tokenizer and model-file helpers.
pub mod utils;

#[cfg(test)]
mod tests;

pub use encoder::{ENCODER_EMBEDDING_DIM, ENCODER_MAX_SEQ_LEN, EncoderConfig, SentenceEncoder};
pub use error::EmbeddingError;
pub use lazy::LazyModel;
#[cfg(any(test, feature = "mock"))]
pub use mock::{MockEmbeddingProvider, MockReranker};
pub use provider::{EmbeddingProvider, PairwiseReranker, cosine_similarity, l2_normalize};
pub use reranker::{Reranker, RerankerConfig, RerankerError};

/// Lazily loaded bi-encoder.
pub type LazyEncoder = LazyModel<SentenceEncoder, EmbeddingError>;

/// Lazily loaded cross-encoder.
pub type LazyReranker = LazyModel<Reranker, RerankerError>;

/// Builds a bi-encoder handle that loads `config` on first use.
pub fn lazy_encoder(config: EncoderConfig) -> LazyEncoder {
    LazyModel::new("encoder", move || SentenceEncoder::load(config.clone()))
}

/// Builds a cross-encoder handle that loads `config` on first use.
pub fn lazy_reranker(config: RerankerConfig) -> LazyReranker {
    LazyModel::new("reranker", move || Reranker::load(config.clone()))
}
