use qdrant_client::qdrant::vectors_config::Config as VectorsConfigKind;
use qdrant_client::qdrant::{
    CollectionInfo, CreateCollectionBuilder, Distance, PointStruct, SearchPointsBuilder,
    UpsertPointsBuilder, VectorParamsBuilder,
};
use qdrant_client::{Qdrant, QdrantError};
use tracing::{debug, info, warn};

use super::WriteConsistency;
use super::error::VectorDbError;
use super::model::{SearchResult, VectorPoint};

/// Async index interface used by the indexed ranking flow.
pub trait VectorDbClient: Send + Sync {
    /// Creates the collection with cosine distance if it does not exist. An existing
    /// collection must already hold vectors of `vector_size`.
    fn ensure_collection(
        &self,
        name: &str,
        vector_size: u64,
    ) -> impl std::future::Future<Output = Result<(), VectorDbError>> + Send;

    fn upsert_points(
        &self,
        collection: &str,
        points: Vec<VectorPoint>,
        consistency: WriteConsistency,
    ) -> impl std::future::Future<Output = Result<(), VectorDbError>> + Send;

    /// Top-`limit` points by cosine similarity, best first. A missing collection is
    /// reported as [`VectorDbError::CollectionNotFound`].
    fn search(
        &self,
        collection: &str,
        query: Vec<f32>,
        limit: u64,
    ) -> impl std::future::Future<Output = Result<Vec<SearchResult>, VectorDbError>> + Send;

    fn health_check(&self) -> impl std::future::Future<Output = Result<(), VectorDbError>> + Send;
}

/// Resume index stored in Qdrant, one point per candidate.
#[derive(Clone)]
pub struct QdrantClient {
    client: Qdrant,
    url: String,
}

impl QdrantClient {
    /// Builds the gRPC client. No request is made until first use.
    pub fn new(url: &str) -> Result<Self, VectorDbError> {
        let client = Qdrant::from_url(url)
            .build()
            .map_err(|e| VectorDbError::ConnectionFailed {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            url: url.to_string(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn create_collection(&self, name: &str, vector_size: u64) -> Result<(), VectorDbError> {
        self.client
            .create_collection(
                CreateCollectionBuilder::new(name)
                    .vectors_config(VectorParamsBuilder::new(vector_size, Distance::Cosine))
                    .on_disk_payload(true),
            )
            .await
            .map_err(|e| VectorDbError::CreateCollectionFailed {
                collection: name.to_string(),
                message: e.to_string(),
            })?;

        info!(collection = name, vector_size, "Created resume collection");
        Ok(())
    }

    async fn check_dimension(&self, name: &str, vector_size: u64) -> Result<(), VectorDbError> {
        let info = self.client.collection_info(name).await.map_err(|e| {
            VectorDbError::CreateCollectionFailed {
                collection: name.to_string(),
                message: e.to_string(),
            }
        })?;

        match info.result.as_ref().and_then(configured_vector_size) {
            Some(actual) if actual != vector_size => Err(VectorDbError::InvalidDimension {
                expected: vector_size as usize,
                actual: actual as usize,
            }),
            Some(_) => Ok(()),
            None => {
                warn!(
                    collection = name,
                    "Collection has no single vector config, skipping size check"
                );
                Ok(())
            }
        }
    }
}

fn configured_vector_size(info: &CollectionInfo) -> Option<u64> {
    let vectors = info.config.as_ref()?.params.as_ref()?.vectors_config.as_ref()?;
    match vectors.config.as_ref()? {
        VectorsConfigKind::Params(params) => Some(params.size),
        VectorsConfigKind::ParamsMap(_) => None,
    }
}

/// Qdrant reports an unknown collection as a `Not found` status.
fn is_missing_collection(err: &QdrantError) -> bool {
    let message = err.to_string();
    message.contains("Not found") || message.contains("doesn't exist")
}

impl VectorDbClient for QdrantClient {
    async fn ensure_collection(&self, name: &str, vector_size: u64) -> Result<(), VectorDbError> {
        let exists = self.client.collection_exists(name).await.map_err(|e| {
            VectorDbError::CreateCollectionFailed {
                collection: name.to_string(),
                message: e.to_string(),
            }
        })?;

        if exists {
            self.check_dimension(name, vector_size).await
        } else {
            self.create_collection(name, vector_size).await
        }
    }

    async fn upsert_points(
        &self,
        collection: &str,
        points: Vec<VectorPoint>,
        consistency: WriteConsistency,
    ) -> Result<(), VectorDbError> {
        if points.is_empty() {
            return Ok(());
        }

        let count = points.len();
        let qdrant_points: Vec<PointStruct> = points
            .into_iter()
            .map(|p| PointStruct::new(p.id, p.vector, p.payload.into_qdrant()))
            .collect();

        self.client
            .upsert_points(
                UpsertPointsBuilder::new(collection, qdrant_points).wait(consistency.into()),
            )
            .await
            .map_err(|e| {
                if is_missing_collection(&e) {
                    VectorDbError::CollectionNotFound {
                        collection: collection.to_string(),
                    }
                } else {
                    VectorDbError::UpsertFailed {
                        collection: collection.to_string(),
                        message: e.to_string(),
                    }
                }
            })?;

        debug!(collection, count, "Indexed resume points");
        Ok(())
    }

    async fn search(
        &self,
        collection: &str,
        query: Vec<f32>,
        limit: u64,
    ) -> Result<Vec<SearchResult>, VectorDbError> {
        let request = SearchPointsBuilder::new(collection, query, limit).with_payload(true);

        let response = self.client.search_points(request).await.map_err(|e| {
            if is_missing_collection(&e) {
                VectorDbError::CollectionNotFound {
                    collection: collection.to_string(),
                }
            } else {
                VectorDbError::SearchFailed {
                    collection: collection.to_string(),
                    message: e.to_string(),
                }
            }
        })?;

        let hits = response.result.len();
        let results: Vec<SearchResult> = response
            .result
            .into_iter()
            .filter_map(SearchResult::from_scored_point)
            .collect();

        if results.len() < hits {
            warn!(
                collection,
                dropped = hits - results.len(),
                "Skipped points without a candidate payload"
            );
        }

        Ok(results)
    }

    async fn health_check(&self) -> Result<(), VectorDbError> {
        self.client
            .health_check()
            .await
            .map_err(|e| VectorDbError::ConnectionFailed {
                url: self.url.clone(),
                message: e.to_string(),
            })?;
        Ok(())
    }
}
