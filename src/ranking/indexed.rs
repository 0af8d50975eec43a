//! Ranking against a persistent vector index instead of an uploaded batch.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, instrument};

use crate::candidate::{CandidateId, Query, RawCandidate, ScoredCandidate, normalize};
use crate::constants::SCORE_SCALE;
use crate::embedding::{EmbeddingError, EmbeddingProvider};
use crate::reputation::LookupContext;
use crate::vectordb::{VectorDbClient, VectorDbError, VectorPoint, WriteConsistency};

use super::error::RankingError;
use super::pipeline::{RankingPipeline, blocking};
use super::retrieval;
use super::types::RankingResult;

pub struct IndexedPipeline<V: VectorDbClient> {
    pipeline: RankingPipeline,
    client: V,
    collection: String,
}

impl<V: VectorDbClient> IndexedPipeline<V> {
    pub fn new(pipeline: RankingPipeline, client: V, collection: impl Into<String>) -> Self {
        Self {
            pipeline,
            client,
            collection: collection.into(),
        }
    }

    pub fn client(&self) -> &V {
        &self.client
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Creates the collection sized for the pipeline's encoder.
    ///
    /// Fails when the encoder cannot be loaded rather than guessing its size.
    pub async fn ensure_collection(&self) -> Result<(), RankingError> {
        let encoder = Arc::clone(self.pipeline.encoder());
        let vector_size = blocking("encoder load", move || encoder.try_dimension()).await?? as u64;
        self.client
            .ensure_collection(&self.collection, vector_size)
            .await?;
        Ok(())
    }

    /// Encodes and stores `raw`, returning the ids of the stored candidates.
    #[instrument(skip_all, fields(collection = %self.collection, num_submitted = raw.len()))]
    pub async fn index(&self, raw: Vec<RawCandidate>) -> Result<Vec<CandidateId>, RankingError> {
        let candidates = normalize(raw)?;
        let timestamp = Utc::now().timestamp_millis();
        let stored_ids: Vec<CandidateId> = candidates.iter().map(|c| c.id().clone()).collect();
        let encoder = Arc::clone(self.pipeline.encoder());

        let points = blocking("indexing", move || {
            candidates
                .iter()
                .map(|c| {
                    let vector = encoder.encode(c.effective_text())?;
                    Ok(VectorPoint::for_candidate(c, vector, timestamp))
                })
                .collect::<Result<Vec<_>, EmbeddingError>>()
        })
        .await??;

        self.ensure_collection().await?;
        self.client
            .upsert_points(&self.collection, points, WriteConsistency::Strong)
            .await?;

        info!(num_stored = stored_ids.len(), "Indexed resumes");
        Ok(stored_ids)
    }

    /// Ranks the best indexed matches for `query`.
    #[instrument(skip_all, fields(collection = %self.collection))]
    pub async fn rank(
        &self,
        query: &Query,
        ctx: &LookupContext,
    ) -> Result<RankingResult, RankingError> {
        let encoder = Arc::clone(self.pipeline.encoder());
        let text = query.text().to_string();
        let query_vec = blocking("query encoding", move || encoder.encode(&text)).await??;

        let hits = match self
            .client
            .search(
                &self.collection,
                query_vec,
                self.pipeline.shortlist_size() as u64,
            )
            .await
        {
            Ok(hits) => hits,
            Err(VectorDbError::CollectionNotFound { .. }) => Vec::new(),
            Err(e) => return Err(e.into()),
        };

        let retrieved: Vec<ScoredCandidate> = hits
            .into_iter()
            .filter_map(|hit| {
                let candidate = hit.payload.to_candidate()?;
                Some(ScoredCandidate::retrieved(
                    candidate,
                    hit.score as f64 * SCORE_SCALE,
                ))
            })
            .collect();

        if retrieved.is_empty() {
            return Err(RankingError::EmptyBatch { submitted: 0 });
        }

        let total_processed = retrieved.len();
        let retrieval_ranking = retrieval::sort_by_retrieval(retrieved);

        self.pipeline
            .finish(query, retrieval_ranking, total_processed, ctx)
            .await
    }
}
