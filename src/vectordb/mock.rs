use parking_lot::RwLock;
use std::collections::HashMap;

use crate::embedding::cosine_similarity;
use crate::vectordb::{SearchResult, VectorDbClient, VectorDbError, VectorPoint, WriteConsistency};

/// In-memory index. Points keep insertion order, so equal scores come back in the order
/// they were first indexed.
#[derive(Default)]
pub struct MockVectorDbClient {
    collections: RwLock<HashMap<String, MockCollection>>,
    unavailable: bool,
}

#[derive(Default)]
struct MockCollection {
    vector_size: u64,
    points: Vec<VectorPoint>,
}

impl MockVectorDbClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call fails as if Qdrant were down.
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    pub fn point_count(&self, collection: &str) -> Option<usize> {
        self.collections
            .read()
            .get(collection)
            .map(|c| c.points.len())
    }

    fn check_available(&self) -> Result<(), VectorDbError> {
        if self.unavailable {
            return Err(VectorDbError::ConnectionFailed {
                url: "mock://qdrant".to_string(),
                message: "mock index unavailable".to_string(),
            });
        }
        Ok(())
    }
}

impl VectorDbClient for MockVectorDbClient {
    async fn ensure_collection(&self, name: &str, vector_size: u64) -> Result<(), VectorDbError> {
        self.check_available()?;
        let mut collections = self.collections.write();
        let coll = collections
            .entry(name.to_string())
            .or_insert_with(|| MockCollection {
                vector_size,
                points: Vec::new(),
            });

        if coll.vector_size != vector_size {
            return Err(VectorDbError::InvalidDimension {
                expected: vector_size as usize,
                actual: coll.vector_size as usize,
            });
        }
        Ok(())
    }

    async fn upsert_points(
        &self,
        collection: &str,
        points: Vec<VectorPoint>,
        _consistency: WriteConsistency,
    ) -> Result<(), VectorDbError> {
        self.check_available()?;
        let mut collections = self.collections.write();
        let coll =
            collections
                .get_mut(collection)
                .ok_or_else(|| VectorDbError::CollectionNotFound {
                    collection: collection.to_string(),
                })?;

        for point in points {
            if point.vector.len() as u64 != coll.vector_size {
                return Err(VectorDbError::InvalidDimension {
                    expected: coll.vector_size as usize,
                    actual: point.vector.len(),
                });
            }

            match coll.points.iter_mut().find(|p| p.id == point.id) {
                Some(existing) => *existing = point,
                None => coll.points.push(point),
            }
        }

        Ok(())
    }

    async fn search(
        &self,
        collection: &str,
        query: Vec<f32>,
        limit: u64,
    ) -> Result<Vec<SearchResult>, VectorDbError> {
        self.check_available()?;
        let collections = self.collections.read();
        let coll =
            collections
                .get(collection)
                .ok_or_else(|| VectorDbError::CollectionNotFound {
                    collection: collection.to_string(),
                })?;

        let mut results: Vec<SearchResult> = coll
            .points
            .iter()
            .map(|p| SearchResult {
                id: p.id,
                score: cosine_similarity(&query, &p.vector),
                payload: p.payload.clone(),
            })
            .collect();

        results.sort_by(|a, b| b.score.total_cmp(&a.score));
        results.truncate(limit as usize);
        Ok(results)
    }

    async fn health_check(&self) -> Result<(), VectorDbError> {
        self.check_available()
    }
}
