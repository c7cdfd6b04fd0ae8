use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{VectorStoreError, VectorStoreResult};
use crate::models::{BmiPayload, BmiPoint, ScoredMatch};

/// Similarity index over BMI embeddings
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BmiVectorStore: Send + Sync {
    /// Create the collection if it does not exist yet
    async fn ensure_collection(&self) -> VectorStoreResult<()>;

    /// Insert or replace the point with `point.id`
    async fn upsert(&self, point: BmiPoint) -> VectorStoreResult<()>;

    /// Up to `limit` nearest points by cosine similarity, best first
    async fn search(&self, vector: Vec<f32>, limit: u64) -> VectorStoreResult<Vec<ScoredMatch>>;

    async fn health_check(&self) -> VectorStoreResult<()>;
}

/// In-memory vector store (for testing/development)
#[derive(Clone, Default)]
pub struct InMemoryVectorStore {
    points: Arc<RwLock<HashMap<i64, ([f32; 3], BmiPayload)>>>,
}

impl InMemoryVectorStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.points.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.points.read().await.is_empty()
    }
}

#[async_trait]
impl BmiVectorStore for InMemoryVectorStore {
    async fn ensure_collection(&self) -> VectorStoreResult<()> {
        Ok(())
    }

    async fn upsert(&self, point: BmiPoint) -> VectorStoreResult<()> {
        if point.id < 0 {
            return Err(VectorStoreError::InvalidPoint(format!(
                "point id {} is negative",
                point.id
            )));
        }
        self.points
            .write()
            .await
            .insert(point.id, (point.vector, point.payload));
        Ok(())
    }

    async fn search(&self, vector: Vec<f32>, limit: u64) -> VectorStoreResult<Vec<ScoredMatch>> {
        let points = self.points.read().await;
        let mut matches: Vec<ScoredMatch> = points
            .iter()
            .map(|(id, (stored, payload))| ScoredMatch {
                id: *id,
                score: cosine_similarity(&vector, stored),
                payload: payload.clone(),
            })
            .collect();

        matches.sort_by(|a, b| b.score.total_cmp(&a.score).then(a.id.cmp(&b.id)));
        matches.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        Ok(matches)
    }

    async fn health_check(&self) -> VectorStoreResult<()> {
        Ok(())
    }
}

/// Cosine similarity; 0 when either vector has zero length.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}
