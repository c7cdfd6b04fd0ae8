use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VectorStoreError {
    #[error("Qdrant error: {0}")]
    Qdrant(String),

    #[error("Invalid point: {0}")]
    InvalidPoint(String),
}

pub type VectorStoreResult<T> = Result<T, VectorStoreError>;

impl From<qdrant_client::QdrantError> for VectorStoreError {
    fn from(err: qdrant_client::QdrantError) -> Self {
        VectorStoreError::Qdrant(err.to_string())
    }
}

#[derive(Debug, Error)]
pub enum BmiError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("BMI record not found: {0}")]
    NotFound(i64),

    #[error("Storage error: {0}")]
    Storage(String),

    /// The relational row `id` is committed; only the embedding is missing.
    #[error("BMI record {id} stored but vector write failed: {source}")]
    DualWrite {
        id: i64,
        source: VectorStoreError,
    },

    #[error("Vector store error while {context}: {source}")]
    VectorStore {
        context: &'static str,
        source: VectorStoreError,
    },

    #[error("Vector store is not configured")]
    VectorStoreUnavailable,
}

pub type BmiResult<T> = Result<T, BmiError>;

impl From<sea_orm::DbErr> for BmiError {
    fn from(err: sea_orm::DbErr) -> Self {
        BmiError::Storage(err.to_string())
    }
}

/// Convert BmiError to AppError for standardized error responses
impl From<BmiError> for AppError {
    fn from(err: BmiError) -> Self {
        match err {
            BmiError::Validation(msg) => AppError::BadRequest(msg),
            BmiError::NotFound(_) => AppError::NotFound("BMI record not found".to_string()),
            BmiError::Storage(msg) => AppError::Storage(msg),
            BmiError::DualWrite { id, source } => AppError::DualWrite {
                id,
                message: source.to_string(),
            },
            err @ BmiError::VectorStore { .. } => AppError::VectorStore(err.to_string()),
            BmiError::VectorStoreUnavailable => {
                AppError::ServiceUnavailable("Vector store is not configured".to_string())
            }
        }
    }
}

impl IntoResponse for BmiError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
