//! Readiness check with real database and vector store probes.

use crate::state::AppState;
use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use axum_helpers::server::{HealthCheckFuture, run_health_checks};
use database::postgres::check_health_detailed;

/// Readiness check endpoint.
///
/// Always probes PostgreSQL; probes the vector store only when one is configured.
pub async fn ready_handler(State(state): State<AppState>) -> Response {
    let database: HealthCheckFuture<'_> = Box::pin(async {
        let status = check_health_detailed(&state.db).await;
        tracing::debug!(response_time_ms = status.response_time_ms, "Database probe finished");
        if status.healthy {
            Ok(())
        } else {
            Err(status.message.unwrap_or_default())
        }
    });
    let mut checks = vec![("database", database)];

    if let Some(vector_store) = &state.vector_store {
        let vector_check: HealthCheckFuture<'_> = Box::pin(async move {
            vector_store
                .health_check()
                .await
                .map_err(|e| format!("Vector store health check failed: {}", e))
        });
        checks.push(("vector_store", vector_check));
    }

    run_health_checks(checks).await.into_response()
}
