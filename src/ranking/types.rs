use chrono::{DateTime, Utc};
use rkyv::{Archive, Deserialize, Serialize};

use crate::candidate::{Query, ScoredCandidate};

/// One pipeline run, as returned to the caller and persisted to history.
#[derive(Archive, Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct RankingResult {
    pub id: String,
    /// Job description the run ranked against.
    pub query: String,
    /// Unix milliseconds, UTC.
    pub timestamp_millis: i64,
    /// Every candidate by retrieval score.
    pub retrieval_ranking: Vec<ScoredCandidate>,
    /// The shortlist by rerank score.
    pub rerank_ranking: Vec<ScoredCandidate>,
    /// The fused top results; the authoritative order.
    pub final_ranking: Vec<ScoredCandidate>,
    pub total_processed: u64,
}

impl RankingResult {
    pub fn new(
        query: &Query,
        total_processed: usize,
        retrieval_ranking: Vec<ScoredCandidate>,
        rerank_ranking: Vec<ScoredCandidate>,
        final_ranking: Vec<ScoredCandidate>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            query: query.text().to_string(),
            timestamp_millis: Utc::now().timestamp_millis(),
            retrieval_ranking,
            rerank_ranking,
            final_ranking,
            total_processed: total_processed as u64,
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.timestamp_millis).unwrap_or_default()
    }
}
