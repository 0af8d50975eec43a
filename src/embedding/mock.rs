//! Scripted encoder and reranker for tests.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

use super::encoder::SentenceEncoder;
use super::error::EmbeddingError;
use super::provider::{EmbeddingProvider, PairwiseReranker};
use super::reranker::RerankerError;

/// Returns pinned vectors for known texts and the stub encoding for anything else.
pub struct MockEmbeddingProvider {
    vectors: HashMap<String, Vec<f32>>,
    fallback: SentenceEncoder,
    dimension: usize,
    failing: bool,
    calls: AtomicUsize,
}

impl MockEmbeddingProvider {
    pub fn new() -> Self {
        let fallback = SentenceEncoder::stub().expect("stub encoder always loads");
        let dimension = fallback.dimension();
        Self {
            vectors: HashMap::new(),
            fallback,
            dimension,
            failing: false,
            calls: AtomicUsize::new(0),
        }
    }

    /// Pins the vector returned for `text`. Also sets the reported dimension.
    pub fn with_vector(mut self, text: &str, vector: Vec<f32>) -> Self {
        self.dimension = vector.len();
        self.vectors.insert(text.to_string(), vector);
        self
    }

    /// Every call fails with an inference error.
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::new()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockEmbeddingProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl EmbeddingProvider for MockEmbeddingProvider {
    fn encode(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.failing {
            return Err(EmbeddingError::InferenceFailed {
                reason: "mock encoder failure".to_string(),
            });
        }

        match self.vectors.get(text) {
            Some(vector) => Ok(vector.clone()),
            None => self.fallback.encode(text),
        }
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

/// Returns pinned scores per candidate text, a default otherwise.
pub struct MockReranker {
    scores: HashMap<String, f32>,
    failing_for: HashSet<String>,
    default_score: f32,
    fail_all: bool,
    calls: AtomicUsize,
}

impl MockReranker {
    pub fn new(default_score: f32) -> Self {
        Self {
            scores: HashMap::new(),
            failing_for: HashSet::new(),
            default_score,
            fail_all: false,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_score(mut self, candidate_text: &str, score: f32) -> Self {
        self.scores.insert(candidate_text.to_string(), score);
        self
    }

    /// Scoring `candidate_text` fails.
    pub fn failing_for(mut self, candidate_text: &str) -> Self {
        self.failing_for.insert(candidate_text.to_string());
        self
    }

    /// Every call fails as if the model were absent.
    pub fn unavailable() -> Self {
        Self {
            fail_all: true,
            ..Self::new(0.0)
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl PairwiseReranker for MockReranker {
    fn score(&self, _query: &str, candidate: &str) -> Result<f32, RerankerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.fail_all {
            return Err(RerankerError::NotAvailable {
                reason: "mock reranker unavailable".to_string(),
            });
        }

        if self.failing_for.contains(candidate) {
            return Err(RerankerError::InferenceFailed {
                reason: "mock reranker failure".to_string(),
            });
        }

        Ok(self.scores.get(candidate).copied().unwrap_or(self.default_score))
    }
}
