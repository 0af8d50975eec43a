//! Shortlist library crate (used by the server and integration tests).
//!
//! # Public API Surface
//!
//! ## Pipeline
//! - [`RankingPipeline`] - normalize, retrieve, rerank, enrich and fuse one batch
//! - [`IndexedPipeline`] - the same stages sourced from a vector index
//! - [`RankingResult`], [`ScoredCandidate`] - what a run produces
//!
//! ## Models
//! - [`SentenceEncoder`], [`EncoderConfig`] - bi-encoder embeddings
//! - [`Reranker`], [`RerankerConfig`] - cross-encoder scoring
//! - [`LazyModel`] - load-once wrapper for either
//!
//! ## Collaborators
//! - [`ReputationEnricher`] - coding-platform reputation lookups
//! - [`ResultStore`] - ranking history
//! - [`QdrantClient`] - vector index
//!
//! ## Test/Mock Support
//! Mock implementations are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod candidate;
pub mod config;
pub mod constants;
pub mod embedding;
pub mod extraction;
pub mod gateway;
pub mod hashing;
pub mod ranking;
pub mod reputation;
pub mod storage;
pub mod vectordb;

pub use candidate::{Candidate, CandidateId, NormalizeError, Query, RawCandidate, ScoredCandidate};
pub use config::{Config, ConfigError};
pub use embedding::{
    EmbeddingError, EmbeddingProvider, EncoderConfig, LazyModel, PairwiseReranker, Reranker,
    RerankerConfig, RerankerError, SentenceEncoder, lazy_encoder, lazy_reranker,
};
#[cfg(any(test, feature = "mock"))]
pub use embedding::{MockEmbeddingProvider, MockReranker};
pub use extraction::{PlainTextExtractor, TextExtractor};
pub use gateway::{HandlerState, create_router_with_state};
pub use hashing::{hash_to_u64, point_id};
pub use ranking::{
    IndexedPipeline, RankingError, RankingPipeline, RankingResult, combined_score,
    contextual_score,
};
#[cfg(any(test, feature = "mock"))]
pub use reputation::MockReputationSource;
pub use reputation::{LookupContext, ReputationConfig, ReputationEnricher, ReputationProfile};
pub use storage::{FileResultStore, InMemoryResultStore, ResultStore, StoreError};
#[cfg(any(test, feature = "mock"))]
pub use vectordb::MockVectorDbClient;
pub use vectordb::{QdrantClient, VectorDbClient, VectorDbError};
