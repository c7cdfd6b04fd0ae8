//! BMI Domain
//!
//! Calculates body-mass index values, classifies them, stores them in
//! PostgreSQL and optionally indexes `[height, weight, value]` embeddings in
//! a vector store for similarity queries.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Validation, classification, dual-write
//! └──┬───────┬──┘
//!    │       │
//! ┌──▼───┐ ┌─▼────────────┐
//! │ Repo │ │ Vector store │  ← traits + PostgreSQL / Qdrant / in-memory
//! └──────┘ └──────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use domain_bmi::{
//!     handlers,
//!     repository::InMemoryBmiRepository,
//!     service::BmiService,
//!     vector_store::InMemoryVectorStore,
//! };
//!
//! let service = BmiService::new(InMemoryBmiRepository::new())
//!     .with_vector_store(Arc::new(InMemoryVectorStore::new()));
//!
//! let router = handlers::router(service);
//! ```

pub mod classification;
pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod qdrant;
pub mod repository;
pub mod service;
pub mod vector_store;

// Re-export commonly used types
pub use classification::{BmiClass, category_and_risk};
pub use error::{BmiError, BmiResult, VectorStoreError, VectorStoreResult};
pub use handlers::ApiDoc;
pub use models::{
    BmiPayload, BmiRecord, CalculateBmi, MessageResponse, QueryBmi, ScoredMatch, UpdateBmi,
};
pub use postgres::PgBmiRepository;
pub use qdrant::{QdrantBmiStore, QdrantConfig};
pub use repository::{BmiRepository, InMemoryBmiRepository};
pub use service::BmiService;
pub use vector_store::{BmiVectorStore, InMemoryVectorStore};
