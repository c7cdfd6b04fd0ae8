use axum::Router;
use domain_bmi::{BmiService, PgBmiRepository, handlers};

pub fn router(state: &crate::state::AppState) -> Router {
    let repository = PgBmiRepository::new(state.db.clone());
    let service = match &state.vector_store {
        Some(vector_store) => BmiService::new(repository).with_vector_store(vector_store.clone()),
        None => BmiService::new(repository),
    };
    handlers::router(service)
}
