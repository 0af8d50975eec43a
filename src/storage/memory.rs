use parking_lot::RwLock;

use crate::ranking::RankingResult;

use super::{ResultStore, StoreResult};

/// Keeps results in process memory, in append order.
#[derive(Debug, Default)]
pub struct InMemoryResultStore {
    results: RwLock<Vec<RankingResult>>,
}

impl InMemoryResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.results.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.read().is_empty()
    }
}

impl ResultStore for InMemoryResultStore {
    fn append(&self, result: &RankingResult) -> StoreResult<()> {
        self.results.write().push(result.clone());
        Ok(())
    }

    fn recent(&self, limit: usize) -> StoreResult<Vec<RankingResult>> {
        Ok(self
            .results
            .read()
            .iter()
            .rev()
            .take(limit)
            .cloned()
            .collect())
    }
}
