use std::sync::{Arc, OnceLock};

use parking_lot::Mutex;
use tracing::{info, warn};

use super::error::EmbeddingError;
use super::provider::{EmbeddingProvider, PairwiseReranker};
use super::reranker::RerankerError;

type Loader<T, E> = Box<dyn Fn() -> Result<T, E> + Send + Sync>;

/// A model handle loaded on first use and shared read-only afterwards.
///
/// The loader runs under a lock so at most one load is in flight; once it succeeds, callers
/// read the cached handle without taking the lock. A failed load is not cached and the next
/// call tries again.
pub struct LazyModel<T, E> {
    name: &'static str,
    cell: OnceLock<Arc<T>>,
    init_lock: Mutex<()>,
    loader: Loader<T, E>,
}

impl<T, E> std::fmt::Debug for LazyModel<T, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LazyModel")
            .field("name", &self.name)
            .field("loaded", &self.is_loaded())
            .finish()
    }
}

impl<T, E> LazyModel<T, E> {
    pub fn is_loaded(&self) -> bool {
        self.cell.get().is_some()
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl<T, E: std::fmt::Display> LazyModel<T, E> {
    pub fn new<F>(name: &'static str, loader: F) -> Self
    where
        F: Fn() -> Result<T, E> + Send + Sync + 'static,
    {
        Self {
            name,
            cell: OnceLock::new(),
            init_lock: Mutex::new(()),
            loader: Box::new(loader),
        }
    }

    /// Returns the shared handle, loading it if this is the first successful call.
    pub fn get(&self) -> Result<Arc<T>, E> {
        if let Some(model) = self.cell.get() {
            return Ok(Arc::clone(model));
        }

        let _guard = self.init_lock.lock();
        if let Some(model) = self.cell.get() {
            return Ok(Arc::clone(model));
        }

        let model = match (self.loader)() {
            Ok(model) => Arc::new(model),
            Err(e) => {
                warn!(model = self.name, error = %e, "Model load failed");
                return Err(e);
            }
        };

        info!(model = self.name, "Model loaded");
        Ok(Arc::clone(self.cell.get_or_init(|| model)))
    }
}

impl<T: EmbeddingProvider> EmbeddingProvider for LazyModel<T, EmbeddingError> {
    fn encode(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.get()?.encode(text)
    }

    /// Falls back to the default size when the model cannot be loaded. Callers that size
    /// storage from this use [`try_dimension`](EmbeddingProvider::try_dimension).
    fn dimension(&self) -> usize {
        self.try_dimension().unwrap_or(crate::constants::DEFAULT_EMBEDDING_DIM)
    }

    fn try_dimension(&self) -> Result<usize, EmbeddingError> {
        Ok(self.get()?.dimension())
    }
}

impl<T: PairwiseReranker> PairwiseReranker for LazyModel<T, RerankerError> {
    fn score(&self, query: &str, candidate: &str) -> Result<f32, RerankerError> {
        let model = self.get().map_err(|e| RerankerError::NotAvailable {
            reason: e.to_string(),
        })?;
        model.score(query, candidate)
    }
}
