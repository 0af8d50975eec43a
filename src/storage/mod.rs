//! Ranking history.
//!
//! Every completed run is appended to a [`ResultStore`]. Storage is best-effort from the
//! caller's point of view: the gateway logs write failures and keeps serving.

/// Store error types.
pub mod error;
mod file;
mod memory;


pub use error::{StoreError, StoreResult};
pub use file::FileResultStore;
pub use memory::InMemoryResultStore;

use crate::ranking::RankingResult;

/// Append-only history of ranking runs.
pub trait ResultStore: Send + Sync {
    /// Persists `result`.
    fn append(&self, result: &RankingResult) -> StoreResult<()>;

    /// Returns at most `limit` results, newest first.
    fn recent(&self, limit: usize) -> StoreResult<Vec<RankingResult>>;
}
