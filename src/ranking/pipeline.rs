use std::sync::Arc;

use tracing::{info, instrument};

use crate::candidate::{Query, RawCandidate, ScoredCandidate, normalize};
use crate::constants::{FINAL_SIZE, SHORTLIST_SIZE};
use crate::embedding::{EmbeddingProvider, PairwiseReranker};
use crate::reputation::{LookupContext, ReputationEnricher};

use super::error::RankingError;
use super::types::RankingResult;
use super::{fusion, rerank, retrieval};

/// Normalize, retrieve, rerank, enrich and fuse one batch of resumes.
#[derive(Clone)]
pub struct RankingPipeline {
    encoder: Arc<dyn EmbeddingProvider>,
    reranker: Arc<dyn PairwiseReranker>,
    enricher: Arc<ReputationEnricher>,
    shortlist_size: usize,
    final_size: usize,
}

impl std::fmt::Debug for RankingPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RankingPipeline")
            .field("enricher", &self.enricher)
            .field("shortlist_size", &self.shortlist_size)
            .field("final_size", &self.final_size)
            .finish()
    }
}

impl RankingPipeline {
    pub fn new(
        encoder: Arc<dyn EmbeddingProvider>,
        reranker: Arc<dyn PairwiseReranker>,
        enricher: Arc<ReputationEnricher>,
    ) -> Self {
        Self {
            encoder,
            reranker,
            enricher,
            shortlist_size: SHORTLIST_SIZE,
            final_size: FINAL_SIZE,
        }
    }

    /// Overrides the cutoffs. `final_size` is capped at `shortlist_size`.
    pub fn with_limits(mut self, shortlist_size: usize, final_size: usize) -> Self {
        self.shortlist_size = shortlist_size.max(1);
        self.final_size = final_size.clamp(1, self.shortlist_size);
        self
    }

    pub fn encoder(&self) -> &Arc<dyn EmbeddingProvider> {
        &self.encoder
    }

    pub fn shortlist_size(&self) -> usize {
        self.shortlist_size
    }

    pub fn final_size(&self) -> usize {
        self.final_size
    }

    /// Ranks `raw` against `query`.
    ///
    /// Fails only when no document has usable text or encoding fails.
    #[instrument(skip_all, fields(num_submitted = raw.len()))]
    pub async fn rank(
        &self,
        query: &Query,
        raw: Vec<RawCandidate>,
        ctx: &LookupContext,
    ) -> Result<RankingResult, RankingError> {
        let candidates = normalize(raw)?;
        let total_processed = candidates.len();

        let encoder = Arc::clone(&self.encoder);
        let owned_query = query.clone();
        let retrieval_ranking = blocking("retrieval", move || {
            retrieval::retrieve(encoder.as_ref(), &owned_query, candidates)
        })
        .await??;

        self.finish(query, retrieval_ranking, total_processed, ctx).await
    }

    /// Runs the stages after retrieval on an already sorted retrieval ranking.
    pub(crate) async fn finish(
        &self,
        query: &Query,
        retrieval_ranking: Vec<ScoredCandidate>,
        total_processed: usize,
        ctx: &LookupContext,
    ) -> Result<RankingResult, RankingError> {
        let shortlist = retrieval::shortlist(&retrieval_ranking, self.shortlist_size);

        let reranker = Arc::clone(&self.reranker);
        let owned_query = query.clone();
        let reranked = blocking("rerank", move || {
            rerank::rerank(reranker.as_ref(), &owned_query, shortlist)
        })
        .await?;
        let rerank_ranking = rerank::sort_by_rerank(&reranked);

        let enriched = self.enricher.enrich(reranked, ctx).await;
        let final_ranking = fusion::fuse(enriched, self.final_size);

        info!(
            total_processed,
            shortlisted = rerank_ranking.len(),
            returned = final_ranking.len(),
            "Ranking complete"
        );

        Ok(RankingResult::new(
            query,
            total_processed,
            retrieval_ranking,
            rerank_ranking,
            final_ranking,
        ))
    }
}

/// Runs a model stage on the blocking pool so inference never stalls the async workers.
pub(crate) async fn blocking<T, F>(stage: &'static str, work: F) -> Result<T, RankingError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| RankingError::Worker(format!("{} task failed: {}", stage, e)))
}
