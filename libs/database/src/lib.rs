//! PostgreSQL connectivity for the BMI service
//!
//! # Features
//!
//! - `postgres` (default) - connection pool, migrations and health checks via SeaORM
//! - `config` - `core_config::FromEnv` support for [`postgres::PostgresConfig`]
//!
//! ```ignore
//! use database::postgres::{self, PostgresConfig};
//! use migration::Migrator;
//!
//! let db = postgres::connect_with_retry(PostgresConfig::from_env()?, &RetryPolicy::default()).await?;
//! postgres::run_migrations::<Migrator>(&db, "bmi_api").await?;
//! ```

pub mod common;

#[cfg(feature = "postgres")]
pub mod postgres;

pub use common::{DatabaseError, DatabaseResult, RetryPolicy};
