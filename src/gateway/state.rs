use std::sync::Arc;

use crate::extraction::{PlainTextExtractor, TextExtractor};
use crate::ranking::{IndexedPipeline, RankingPipeline};
use crate::storage::ResultStore;
use crate::vectordb::VectorDbClient;

/// Whether a model slot runs the real network or its deterministic stub.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelMode {
    Real,
    Stub,
}

impl ModelMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelMode::Real => "real",
            ModelMode::Stub => "stub",
        }
    }
}

pub struct HandlerState<V: VectorDbClient + 'static> {
    pub pipeline: RankingPipeline,

    /// Vector-store flow. `None` when no Qdrant URL is configured.
    pub indexed: Option<Arc<IndexedPipeline<V>>>,

    /// Ranking history. `None` disables persistence.
    pub store: Option<Arc<dyn ResultStore>>,

    pub extractor: Arc<dyn TextExtractor>,

    pub encoder_mode: ModelMode,

    pub reranker_mode: ModelMode,
}

impl<V: VectorDbClient + 'static> Clone for HandlerState<V> {
    fn clone(&self) -> Self {
        Self {
            pipeline: self.pipeline.clone(),
            indexed: self.indexed.clone(),
            store: self.store.clone(),
            extractor: self.extractor.clone(),
            encoder_mode: self.encoder_mode,
            reranker_mode: self.reranker_mode,
        }
    }
}

impl<V: VectorDbClient + 'static> HandlerState<V> {
    pub fn new(pipeline: RankingPipeline) -> Self {
        Self {
            pipeline,
            indexed: None,
            store: None,
            extractor: Arc::new(PlainTextExtractor),
            encoder_mode: ModelMode::Stub,
            reranker_mode: ModelMode::Stub,
        }
    }

    pub fn with_indexed(mut self, indexed: IndexedPipeline<V>) -> Self {
        self.indexed = Some(Arc::new(indexed));
        self
    }

    pub fn with_store(mut self, store: Arc<dyn ResultStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_extractor(mut self, extractor: Arc<dyn TextExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn with_model_modes(mut self, encoder: ModelMode, reranker: ModelMode) -> Self {
        self.encoder_mode = encoder;
        self.reranker_mode = reranker;
        self
    }
}
