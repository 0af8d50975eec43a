//! Cross-encoder rerank of the shortlist.

use tracing::{debug, warn};

use crate::candidate::{Query, ScoredCandidate};
use crate::constants::SCORE_SCALE;
use crate::embedding::PairwiseReranker;

/// Adds a rerank score to every shortlisted candidate, keeping shortlist order.
///
/// A pair the reranker cannot score gets its retrieval score instead; no candidate is
/// dropped.
pub fn rerank(
    reranker: &dyn PairwiseReranker,
    query: &Query,
    shortlist: Vec<ScoredCandidate>,
) -> Vec<ScoredCandidate> {
    let mut fallbacks = 0usize;

    let reranked: Vec<ScoredCandidate> = shortlist
        .into_iter()
        .map(|candidate| {
            let score = match reranker.score(query.text(), candidate.candidate().effective_text())
            {
                Ok(raw) if raw.is_finite() => raw as f64 * SCORE_SCALE,
                Ok(raw) => {
                    warn!(
                        candidate_id = %candidate.id(),
                        raw_score = raw,
                        "Reranker returned a non-finite score, using retrieval score"
                    );
                    fallbacks += 1;
                    candidate.retrieval_score()
                }
                Err(e) => {
                    warn!(
                        candidate_id = %candidate.id(),
                        error = %e,
                        "Rerank failed, using retrieval score"
                    );
                    fallbacks += 1;
                    candidate.retrieval_score()
                }
            };
            candidate.with_rerank_score(score)
        })
        .collect();

    debug!(
        num_candidates = reranked.len(),
        fallbacks, "Rerank complete"
    );

    reranked
}

/// Rerank-only view: stable sort by rerank score, best first.
pub fn sort_by_rerank(reranked: &[ScoredCandidate]) -> Vec<ScoredCandidate> {
    let mut ranking = reranked.to_vec();
    ranking.sort_by(|a, b| {
        let a = a.rerank_score().unwrap_or(f64::NEG_INFINITY);
        let b = b.rerank_score().unwrap_or(f64::NEG_INFINITY);
        b.total_cmp(&a)
    });
    ranking
}
