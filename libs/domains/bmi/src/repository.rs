use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::BmiResult;
use crate::models::{BmiRecord, Measurement, NewBmiRecord};

/// Repository trait for BMI record persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BmiRepository: Send + Sync {
    /// Insert a record and return its generated id
    async fn insert(&self, input: NewBmiRecord) -> BmiResult<i64>;

    /// Get a record by ID
    async fn get_by_id(&self, id: i64) -> BmiResult<Option<BmiRecord>>;

    /// All records in store order
    async fn list(&self) -> BmiResult<Vec<BmiRecord>>;

    /// Overwrite height, weight and value; returns rows affected
    async fn update(&self, id: i64, measurement: Measurement) -> BmiResult<u64>;

    /// Delete a record; returns rows affected
    async fn delete(&self, id: i64) -> BmiResult<u64>;
}

#[derive(Debug, Default)]
struct InMemoryState {
    next_id: i64,
    records: BTreeMap<i64, BmiRecord>,
}

/// In-memory implementation of BmiRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryBmiRepository {
    state: Arc<RwLock<InMemoryState>>,
}

impl InMemoryBmiRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BmiRepository for InMemoryBmiRepository {
    async fn insert(&self, input: NewBmiRecord) -> BmiResult<i64> {
        let mut state = self.state.write().await;
        state.next_id += 1;
        let id = state.next_id;
        state.records.insert(id, input.into_record(id));

        tracing::info!(bmi_id = id, value = input.measurement.value, "Stored BMI record");
        Ok(id)
    }

    async fn get_by_id(&self, id: i64) -> BmiResult<Option<BmiRecord>> {
        let state = self.state.read().await;
        Ok(state.records.get(&id).cloned())
    }

    async fn list(&self) -> BmiResult<Vec<BmiRecord>> {
        let state = self.state.read().await;
        Ok(state.records.values().cloned().collect())
    }

    async fn update(&self, id: i64, measurement: Measurement) -> BmiResult<u64> {
        let mut state = self.state.write().await;
        let Some(record) = state.records.get_mut(&id) else {
            return Ok(0);
        };

        record.height = measurement.height;
        record.weight = measurement.weight;
        record.value = measurement.value;

        tracing::info!(bmi_id = id, value = measurement.value, "Updated BMI record");
        Ok(1)
    }

    async fn delete(&self, id: i64) -> BmiResult<u64> {
        let mut state = self.state.write().await;
        let removed = state.records.remove(&id).is_some();
        if removed {
            tracing::info!(bmi_id = id, "Deleted BMI record");
        }
        Ok(u64::from(removed))
    }
}
