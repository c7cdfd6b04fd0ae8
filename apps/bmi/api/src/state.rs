//! Application state management.
//!
//! The state is cloned for each handler (inexpensive Arc clones) and holds:
//! - Configuration
//! - PostgreSQL connection pool
//! - The optional vector store

use domain_bmi::BmiVectorStore;
use std::sync::Arc;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded from environment variables
    pub config: crate::config::Config,
    /// PostgreSQL database connection pool
    pub db: database::postgres::DatabaseConnection,
    /// Qdrant-backed store when `QDRANT_URL` is set
    pub vector_store: Option<Arc<dyn BmiVectorStore>>,
}
