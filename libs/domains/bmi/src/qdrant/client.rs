use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use qdrant_client::Qdrant;
use qdrant_client::qdrant::{
    self, CreateCollectionBuilder, Distance, PointId, PointStruct, SearchPointsBuilder,
    UpsertPointsBuilder, Value as QdrantValue, VectorParamsBuilder,
};

use super::QdrantConfig;
use crate::error::{VectorStoreError, VectorStoreResult};
use crate::models::{BmiPayload, BmiPoint, EMBEDDING_DIM, ScoredMatch};
use crate::vector_store::BmiVectorStore;

/// Qdrant-backed implementation of BmiVectorStore.
///
/// Point ids are the relational record ids.
pub struct QdrantBmiStore {
    client: Qdrant,
    collection: String,
}

impl QdrantBmiStore {
    pub fn new(config: QdrantConfig) -> VectorStoreResult<Self> {
        let mut builder = Qdrant::from_url(&config.url);

        if let Some(api_key) = config.api_key {
            builder = builder.api_key(api_key);
        }

        builder = builder.timeout(Duration::from_secs(config.timeout_secs));

        let client = builder
            .build()
            .map_err(|e| VectorStoreError::Qdrant(format!("Failed to build client: {}", e)))?;

        Ok(Self {
            client,
            collection: config.collection,
        })
    }

    pub fn from_client(client: Qdrant, collection: impl Into<String>) -> Self {
        Self {
            client,
            collection: collection.into(),
        }
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }
}

fn to_point_id(id: i64) -> VectorStoreResult<PointId> {
    u64::try_from(id)
        .map(PointId::from)
        .map_err(|_| VectorStoreError::InvalidPoint(format!("point id {} is negative", id)))
}

fn from_point_id(point_id: Option<&PointId>) -> VectorStoreResult<i64> {
    match point_id.and_then(|p| p.point_id_options.as_ref()) {
        Some(qdrant::point_id::PointIdOptions::Num(num)) => i64::try_from(*num)
            .map_err(|_| VectorStoreError::InvalidPoint(format!("point id {} out of range", num))),
        Some(qdrant::point_id::PointIdOptions::Uuid(uuid)) => Err(VectorStoreError::InvalidPoint(
            format!("unexpected uuid point id {}", uuid),
        )),
        None => Err(VectorStoreError::InvalidPoint("Missing point ID".to_string())),
    }
}

fn payload_to_qdrant(payload: BmiPayload) -> HashMap<String, QdrantValue> {
    HashMap::from([
        ("category".to_string(), QdrantValue::from(payload.category)),
        ("risk".to_string(), QdrantValue::from(payload.risk)),
        ("created_at".to_string(), QdrantValue::from(payload.created_at)),
    ])
}

/// Missing or non-string fields decode as empty strings.
fn qdrant_to_payload(mut payload: HashMap<String, QdrantValue>) -> BmiPayload {
    let mut take = |key: &str| {
        payload
            .remove(key)
            .and_then(|value| match value.kind {
                Some(qdrant::value::Kind::StringValue(s)) => Some(s),
                _ => None,
            })
            .unwrap_or_default()
    };

    BmiPayload {
        category: take("category"),
        risk: take("risk"),
        created_at: take("created_at"),
    }
}

#[async_trait]
impl BmiVectorStore for QdrantBmiStore {
    async fn ensure_collection(&self) -> VectorStoreResult<()> {
        if self.client.collection_exists(&self.collection).await? {
            tracing::debug!(collection = %self.collection, "Qdrant collection already exists");
            return Ok(());
        }

        self.client
            .create_collection(
                CreateCollectionBuilder::new(&self.collection).vectors_config(
                    VectorParamsBuilder::new(EMBEDDING_DIM as u64, Distance::Cosine),
                ),
            )
            .await?;

        tracing::info!(collection = %self.collection, "Created Qdrant collection");
        Ok(())
    }

    async fn upsert(&self, point: BmiPoint) -> VectorStoreResult<()> {
        let point = PointStruct::new(
            to_point_id(point.id)?,
            point.vector.to_vec(),
            payload_to_qdrant(point.payload),
        );

        self.client
            .upsert_points(UpsertPointsBuilder::new(&self.collection, vec![point]).wait(true))
            .await?;

        Ok(())
    }

    async fn search(&self, vector: Vec<f32>, limit: u64) -> VectorStoreResult<Vec<ScoredMatch>> {
        let results = self
            .client
            .search_points(
                SearchPointsBuilder::new(&self.collection, vector, limit).with_payload(true),
            )
            .await?;

        results
            .result
            .into_iter()
            .map(|point| {
                Ok(ScoredMatch {
                    id: from_point_id(point.id.as_ref())?,
                    score: point.score,
                    payload: qdrant_to_payload(point.payload),
                })
            })
            .collect()
    }

    async fn health_check(&self) -> VectorStoreResult<()> {
        self.client.health_check().await?;
        Ok(())
    }
}
