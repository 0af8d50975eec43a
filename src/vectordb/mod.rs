//! Qdrant vector index for the persistent (indexed) ranking flow.

pub mod client;
pub mod error;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod model;


pub use client::{QdrantClient, VectorDbClient};
pub use error::VectorDbError;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockVectorDbClient;
pub use model::{CandidatePayload, SearchResult, VectorPoint};

pub const DEFAULT_COLLECTION_NAME: &str = "resume_index";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteConsistency {
    /// Wait until the points are indexed and searchable (`wait=true`).
    Strong,
    /// Return once the server acknowledges the write (`wait=false`).
    Eventual,
}

impl From<WriteConsistency> for bool {
    fn from(c: WriteConsistency) -> bool {
        matches!(c, WriteConsistency::Strong)
    }
}
