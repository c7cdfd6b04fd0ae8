use std::sync::Arc;
use tracing::instrument;
use validator::Validate;

use crate::error::{BmiError, BmiResult};
use crate::models::{
    BmiPoint, BmiRecord, CalculateBmi, EMBEDDING_DIM, Measurement, NewBmiRecord, QUERY_LIMIT,
    QueryBmi, ScoredMatch, UpdateBmi,
};
use crate::repository::BmiRepository;
use crate::vector_store::BmiVectorStore;

const INVALID_MEASUREMENT: &str = "height and weight must be greater than 0";

/// Service layer for BMI business logic
#[derive(Clone)]
pub struct BmiService<R: BmiRepository> {
    repository: Arc<R>,
    vector_store: Option<Arc<dyn BmiVectorStore>>,
}

impl<R: BmiRepository> BmiService<R> {
    /// Service without a vector store; embedding and query operations
    /// fail with `VectorStoreUnavailable`.
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
            vector_store: None,
        }
    }

    pub fn with_vector_store(mut self, vector_store: Arc<dyn BmiVectorStore>) -> Self {
        self.vector_store = Some(vector_store);
        self
    }

    pub fn has_vector_store(&self) -> bool {
        self.vector_store.is_some()
    }

    fn require_vector_store(&self) -> BmiResult<&Arc<dyn BmiVectorStore>> {
        self.vector_store
            .as_ref()
            .ok_or(BmiError::VectorStoreUnavailable)
    }

    /// Compute, persist and classify a measurement
    #[instrument(skip(self))]
    pub async fn calculate_and_store(&self, input: CalculateBmi) -> BmiResult<BmiRecord> {
        let measurement = validated_measurement(&input, input.height, input.weight)?;
        let new_record = NewBmiRecord::now(measurement);

        let id = self.repository.insert(new_record).await?;
        Ok(new_record.into_record(id).classified())
    }

    /// Persist a measurement and index its embedding.
    ///
    /// The relational row is written first; if the vector write then fails
    /// the row stays committed and `DualWrite` carries its id.
    #[instrument(skip(self))]
    pub async fn store_with_embedding(&self, input: CalculateBmi) -> BmiResult<BmiRecord> {
        let measurement = validated_measurement(&input, input.height, input.weight)?;
        let vector_store = self.require_vector_store()?;
        let new_record = NewBmiRecord::now(measurement);

        let id = self.repository.insert(new_record).await?;
        let record = new_record.into_record(id);

        if let Err(source) = vector_store.upsert(BmiPoint::from_record(&record)).await {
            tracing::warn!(bmi_id = id, error = %source, "Vector write failed after relational insert");
            return Err(BmiError::DualWrite { id, source });
        }

        Ok(record.classified())
    }

    /// Get a record by ID
    #[instrument(skip(self))]
    pub async fn get_bmi(&self, id: i64) -> BmiResult<BmiRecord> {
        self.repository
            .get_by_id(id)
            .await?
            .map(BmiRecord::classified)
            .ok_or(BmiError::NotFound(id))
    }

    /// All records, each classified independently
    #[instrument(skip(self))]
    pub async fn list_bmi(&self) -> BmiResult<Vec<BmiRecord>> {
        let records = self.repository.list().await?;
        Ok(records.into_iter().map(BmiRecord::classified).collect())
    }

    /// Replace height and weight and recompute the value
    #[instrument(skip(self))]
    pub async fn update_bmi(&self, id: i64, input: UpdateBmi) -> BmiResult<()> {
        let measurement = validated_measurement(&input, input.height, input.weight)?;

        match self.repository.update(id, measurement).await? {
            0 => Err(BmiError::NotFound(id)),
            _ => Ok(()),
        }
    }

    /// Delete a record by ID
    #[instrument(skip(self))]
    pub async fn delete_bmi(&self, id: i64) -> BmiResult<()> {
        match self.repository.delete(id).await? {
            0 => Err(BmiError::NotFound(id)),
            _ => Ok(()),
        }
    }

    /// Nearest stored embeddings to `[height, weight, value]`
    #[instrument(skip(self))]
    pub async fn query_by_vector(&self, input: QueryBmi) -> BmiResult<Vec<ScoredMatch>> {
        if input.query_vector.len() != EMBEDDING_DIM {
            return Err(BmiError::Validation(format!(
                "query_vector must have exactly {} components, got {}",
                EMBEDDING_DIM,
                input.query_vector.len()
            )));
        }
        if input.query_vector.iter().any(|c| !c.is_finite()) {
            return Err(BmiError::Validation(
                "query_vector components must be finite".to_string(),
            ));
        }

        self.require_vector_store()?
            .search(input.query_vector, QUERY_LIMIT)
            .await
            .map_err(|source| BmiError::VectorStore {
                context: "searching",
                source,
            })
    }

    /// Provision the vector collection; no-op without a vector store
    pub async fn ensure_collection(&self) -> BmiResult<()> {
        let Some(vector_store) = &self.vector_store else {
            return Ok(());
        };

        vector_store
            .ensure_collection()
            .await
            .map_err(|source| BmiError::VectorStore {
                context: "creating the collection",
                source,
            })
    }

    pub async fn vector_store_health(&self) -> BmiResult<()> {
        self.require_vector_store()?
            .health_check()
            .await
            .map_err(|source| BmiError::VectorStore {
                context: "checking health",
                source,
            })
    }
}

fn validated_measurement(input: &impl Validate, height: f64, weight: f64) -> BmiResult<Measurement> {
    if input.validate().is_err() || !height.is_finite() || !weight.is_finite() {
        return Err(BmiError::Validation(INVALID_MEASUREMENT.to_string()));
    }
    // A tiny height can square to zero and overflow the derived value
    let measurement = Measurement::new(height, weight);
    if !measurement.value.is_finite() {
        return Err(BmiError::Validation(INVALID_MEASUREMENT.to_string()));
    }
    Ok(measurement)
}
