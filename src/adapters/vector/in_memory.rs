use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::{check_dimension, cosine_distance, nearest};
use crate::domain::errors::DomainResult;
use crate::domain::ports::{Neighbor, VectorIndex};

/// Brute-force vector index held in process memory.
///
/// Lost on restart. Suited to tests and short-lived stores.
#[derive(Debug)]
pub struct InMemoryVectorIndex {
    dimension: usize,
    vectors: RwLock<HashMap<String, Vec<f32>>>,
}

impl InMemoryVectorIndex {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            vectors: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl VectorIndex for InMemoryVectorIndex {
    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn upsert(&self, key: &str, vector: &[f32]) -> DomainResult<()> {
        check_dimension(self.dimension, vector)?;
        self.vectors.write().await.insert(key.to_string(), vector.to_vec());
        Ok(())
    }

    async fn remove(&self, key: &str) -> DomainResult<bool> {
        Ok(self.vectors.write().await.remove(key).is_some())
    }

    async fn knn(&self, vector: &[f32], k: usize) -> DomainResult<Vec<Neighbor>> {
        check_dimension(self.dimension, vector)?;
        if k == 0 {
            return Ok(Vec::new());
        }

        let vectors = self.vectors.read().await;
        let candidates = vectors
            .iter()
            .map(|(key, stored)| Neighbor {
                key: key.clone(),
                distance: cosine_distance(vector, stored),
            })
            .collect();
        Ok(nearest(candidates, k))
    }

    async fn count(&self) -> DomainResult<u64> {
        Ok(self.vectors.read().await.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::DomainError;

    #[tokio::test]
    async fn test_knn_returns_nearest_first() {
        let index = InMemoryVectorIndex::new(2);
        index.upsert("east", &[1.0, 0.0]).await.unwrap();
        index.upsert("north", &[0.0, 1.0]).await.unwrap();
        index.upsert("northeast", &[0.7, 0.7]).await.unwrap();

        let hits = index.knn(&[1.0, 0.1], 2).await.unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].key, "east");
        assert_eq!(hits[1].key, "northeast");
    }

    #[tokio::test]
    async fn test_upsert_replaces_and_remove() {
        let index = InMemoryVectorIndex::new(2);
        index.upsert("a", &[1.0, 0.0]).await.unwrap();
        index.upsert("a", &[0.0, 1.0]).await.unwrap();
        assert_eq!(index.count().await.unwrap(), 1);

        let hits = index.knn(&[0.0, 1.0], 1).await.unwrap();
        assert!(hits[0].distance < 1e-6);

        assert!(index.remove("a").await.unwrap());
        assert!(!index.remove("a").await.unwrap());
        assert_eq!(index.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_dimension_mismatch_rejected() {
        let index = InMemoryVectorIndex::new(3);
        let err = index.upsert("a", &[1.0]).await.unwrap_err();
        assert!(matches!(err, DomainError::DimensionMismatch { expected: 3, actual: 1 }));
        assert!(index.knn(&[1.0, 0.0], 1).await.is_err());
    }
}
