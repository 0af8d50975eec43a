//! Score fusion and the final ordering.

use tracing::{debug, warn};

use crate::candidate::ScoredCandidate;
use crate::constants::{CONTEXTUAL_WEIGHT, REPUTATION_WEIGHT, RERANK_WEIGHT, RETRIEVAL_WEIGHT};

/// Relevance blend, dominated by the reranker.
pub fn contextual_score(retrieval: f64, rerank: f64) -> f64 {
    retrieval * RETRIEVAL_WEIGHT + rerank * RERANK_WEIGHT
}

/// Final ordering key.
pub fn combined_score(retrieval: f64, rerank: f64, reputation: f64) -> f64 {
    contextual_score(retrieval, rerank) * CONTEXTUAL_WEIGHT + reputation * REPUTATION_WEIGHT
}

/// Fuses every fully scored candidate and returns the best `final_size`, best first.
///
/// Candidates missing a sub-score are left out. Ties keep shortlist order.
pub fn fuse(enriched: Vec<ScoredCandidate>, final_size: usize) -> Vec<ScoredCandidate> {
    let mut fused: Vec<ScoredCandidate> = enriched
        .into_iter()
        .filter_map(|candidate| {
            let id = candidate.id().clone();
            let fused = candidate.fused();
            if fused.is_none() {
                warn!(candidate_id = %id, "Candidate missing a sub-score, excluded from fusion");
            }
            fused
        })
        .collect();

    fused.sort_by(|a, b| {
        let a = a.combined_score().unwrap_or(f64::NEG_INFINITY);
        let b = b.combined_score().unwrap_or(f64::NEG_INFINITY);
        b.total_cmp(&a)
    });
    fused.truncate(final_size);

    debug!(
        num_final = fused.len(),
        top_score = fused.first().and_then(|c| c.combined_score()),
        "Fusion complete"
    );

    fused
}
