use sea_orm::{Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use tracing::info;

use super::PostgresConfig;
use crate::common::{DatabaseError, DatabaseResult, RetryPolicy, retry_with_backoff};

/// Open a connection pool using the given configuration
pub async fn connect(config: PostgresConfig) -> DatabaseResult<DatabaseConnection> {
    let db = Database::connect(config.into_connect_options()).await?;
    info!("Connected to PostgreSQL");
    Ok(db)
}

/// Open a connection pool, retrying with backoff while the server is unavailable
///
/// ```ignore
/// use database::{RetryPolicy, postgres::{PostgresConfig, connect_with_retry}};
///
/// let db = connect_with_retry(PostgresConfig::from_env()?, &RetryPolicy::new(10)).await?;
/// ```
pub async fn connect_with_retry(
    config: PostgresConfig,
    policy: &RetryPolicy,
) -> DatabaseResult<DatabaseConnection> {
    retry_with_backoff(|| connect(config.clone()), policy)
        .await
        .map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))
}

/// Apply all pending migrations of `M`
///
/// `app_name` only appears in log output.
pub async fn run_migrations<M: MigratorTrait>(
    db: &DatabaseConnection,
    app_name: &str,
) -> DatabaseResult<()> {
    info!(app = app_name, "Running database migrations");
    M::up(db, None)
        .await
        .map_err(|e| DatabaseError::MigrationError(e.to_string()))?;
    info!(app = app_name, "Database migrations applied");
    Ok(())
}
