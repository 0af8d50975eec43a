//! The ranking pipeline.
//!
//! Stages run in order and each one only adds a score:
//!
//! 1. [`retrieval`] scores the whole batch by bi-encoder cosine and cuts a shortlist.
//! 2. [`rerank`] scores the shortlist with the cross-encoder, falling back to the
//!    retrieval score.
//! 3. Reputation enrichment ([`crate::reputation`]) adds the external-activity score.
//! 4. [`fusion`] combines the three and produces the final order.
//!
//! [`RankingPipeline`] runs them over an uploaded batch; [`IndexedPipeline`] sources the
//! retrieval stage from a vector index.

pub mod error;
pub mod fusion;
pub mod indexed;
pub mod pipeline;
pub mod rerank;
pub mod retrieval;
pub mod types;


pub use error::RankingError;
pub use fusion::{combined_score, contextual_score};
pub use indexed::IndexedPipeline;
pub use pipeline::RankingPipeline;
pub use types::RankingResult;
