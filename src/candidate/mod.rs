//! Candidate data model and ingestion normalization.
//!
//! [`normalize`] turns extractor output into [`Candidate`]s; the ranking stages then wrap
//! each one in a [`ScoredCandidate`] that only ever gains scores.

pub mod error;
pub mod normalizer;
pub mod types;

#[cfg(test)]
mod tests;

pub use error::NormalizeError;
pub use normalizer::normalize;
pub use types::{Candidate, CandidateId, Query, RawCandidate, ScoredCandidate};
