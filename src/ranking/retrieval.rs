//! Bi-encoder retrieval over the whole batch.

use tracing::debug;

use crate::candidate::{Candidate, Query, ScoredCandidate};
use crate::constants::SCORE_SCALE;
use crate::embedding::{EmbeddingError, EmbeddingProvider, cosine_similarity};

/// Raw cosine times [`SCORE_SCALE`]. Negative values are valid and rank below zero.
pub fn retrieval_score(query_vec: &[f32], candidate_vec: &[f32]) -> f64 {
    cosine_similarity(query_vec, candidate_vec) as f64 * SCORE_SCALE
}

/// Scores every candidate against the query and returns them best first.
///
/// Any encoding failure fails the whole call.
pub fn retrieve(
    encoder: &dyn EmbeddingProvider,
    query: &Query,
    candidates: Vec<Candidate>,
) -> Result<Vec<ScoredCandidate>, EmbeddingError> {
    let query_vec = encoder.encode(query.text())?;

    let scored = candidates
        .into_iter()
        .map(|candidate| {
            let vector = encoder.encode(candidate.effective_text())?;
            if vector.len() != query_vec.len() {
                return Err(EmbeddingError::DimensionMismatch {
                    expected: query_vec.len(),
                    actual: vector.len(),
                });
            }
            let score = retrieval_score(&query_vec, &vector);
            Ok(ScoredCandidate::retrieved(candidate, score))
        })
        .collect::<Result<Vec<_>, EmbeddingError>>()?;

    let ranking = sort_by_retrieval(scored);

    debug!(
        num_candidates = ranking.len(),
        top_score = ranking.first().map(|c| c.retrieval_score()),
        "Retrieval complete"
    );

    Ok(ranking)
}

/// Stable sort, best first. Ties keep their incoming order.
pub fn sort_by_retrieval(mut scored: Vec<ScoredCandidate>) -> Vec<ScoredCandidate> {
    scored.sort_by(|a, b| b.retrieval_score().total_cmp(&a.retrieval_score()));
    scored
}

/// The first `min(size, len)` entries of a retrieval ranking.
pub fn shortlist(ranking: &[ScoredCandidate], size: usize) -> Vec<ScoredCandidate> {
    ranking.iter().take(size).cloned().collect()
}
