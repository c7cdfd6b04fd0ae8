use axum_helpers::server::{create_production_app, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use database::RetryPolicy;
use domain_bmi::{BmiVectorStore, QdrantBmiStore};
use migration::Migrator;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Install color-eyre first for colored error output (before any fallible operations)
    install_color_eyre();

    // Load configuration from environment variables
    let config = Config::from_env()?;

    // Initialize tracing with ErrorLayer for span trace capture
    init_tracing(&config.environment);

    let db = database::postgres::connect_with_retry(config.database.clone(), &RetryPolicy::default())
        .await
        .map_err(|e| eyre::eyre!("PostgreSQL connection failed: {}", e))?;

    if config.run_migrations {
        database::postgres::run_migrations::<Migrator>(&db, config.app.name)
            .await
            .map_err(|e| eyre::eyre!("Migrations failed: {}", e))?;
    }

    // Vector features stay disabled without QDRANT_URL
    let vector_store: Option<Arc<dyn BmiVectorStore>> = match config.qdrant.clone() {
        Some(qdrant_config) => {
            info!("Connecting to Qdrant at {}", qdrant_config.url);
            let store = QdrantBmiStore::new(qdrant_config)
                .map_err(|e| eyre::eyre!("Qdrant client setup failed: {}", e))?;

            // Readiness reports the store as disconnected until it is reachable
            match store.ensure_collection().await {
                Ok(()) => info!("Qdrant collection {} ready", store.collection()),
                Err(e) => tracing::warn!("Failed to ensure Qdrant collection: {}", e),
            }
            Some(Arc::new(store))
        }
        None => {
            info!("QDRANT_URL not set; embedding and query routes will return 503");
            None
        }
    };

    let state = AppState {
        config,
        db,
        vector_store,
    };

    // Build router with API routes (pass reference, not ownership!)
    let api_routes = api::routes(&state);

    // create_router adds docs/middleware to our composed routes
    let router = axum_helpers::create_router::<openapi::ApiDoc>(api_routes, &state.config.server)?;

    // Merge health endpoints into the app
    // - /health: liveness check with app name/version
    // - /ready: readiness check against PostgreSQL and the vector store
    let app = router
        .merge(health_router(state.config.app.clone()))
        .merge(api::ready_router(state.clone()));

    info!("Starting BMI API with graceful shutdown (30s timeout)");

    let server_config = state.config.server.clone();
    create_production_app(app, &server_config, Duration::from_secs(30), async move {
        info!("Shutting down: closing database connections");
        match state.db.close().await {
            Ok(_) => info!("PostgreSQL connection closed successfully"),
            Err(e) => tracing::error!("Error closing PostgreSQL: {}", e),
        }
    })
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("BMI API shutdown complete");
    Ok(())
}
