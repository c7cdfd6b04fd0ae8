use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use axum_helpers::{
    IdPath, ValidatedJson,
    errors::responses::{
        BadRequestIdResponse, BadRequestValidationResponse, InternalServerErrorResponse,
        NotFoundResponse, ServiceUnavailableResponse,
    },
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::classification::BmiClass;
use crate::error::BmiResult;
use crate::models::{BmiPayload, BmiRecord, CalculateBmi, MessageResponse, QueryBmi, ScoredMatch, UpdateBmi};
use crate::repository::BmiRepository;
use crate::service::BmiService;

pub const BMI_TAG: &str = "bmi";

/// OpenAPI documentation for the BMI API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_bmi,
        calculate_bmi,
        store_with_embedding,
        query_by_vector,
        get_bmi,
        update_bmi,
        delete_bmi,
    ),
    components(
        schemas(BmiRecord, CalculateBmi, UpdateBmi, QueryBmi, ScoredMatch, BmiPayload, BmiClass, MessageResponse),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestIdResponse,
            InternalServerErrorResponse,
            ServiceUnavailableResponse
        )
    ),
    tags(
        (name = BMI_TAG, description = "BMI calculation, storage and similarity search")
    )
)]
pub struct ApiDoc;

/// Create the BMI router with all HTTP endpoints
pub fn router<R: BmiRepository + 'static>(service: BmiService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_bmi).post(calculate_bmi))
        .route("/embedding", post(store_with_embedding))
        .route("/query", post(query_by_vector))
        .route("/{id}", get(get_bmi).put(update_bmi).delete(delete_bmi))
        .with_state(shared_service)
}

/// List all stored records
#[utoipa::path(
    get,
    path = "",
    tag = BMI_TAG,
    responses(
        (status = 200, description = "All BMI records", body = Vec<BmiRecord>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_bmi<R: BmiRepository>(
    State(service): State<Arc<BmiService<R>>>,
) -> BmiResult<Json<Vec<BmiRecord>>> {
    let records = service.list_bmi().await?;
    Ok(Json(records))
}

/// Calculate a BMI and store it
#[utoipa::path(
    post,
    path = "",
    tag = BMI_TAG,
    request_body = CalculateBmi,
    responses(
        (status = 200, description = "BMI calculated and stored", body = BmiRecord),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn calculate_bmi<R: BmiRepository>(
    State(service): State<Arc<BmiService<R>>>,
    ValidatedJson(input): ValidatedJson<CalculateBmi>,
) -> BmiResult<Json<BmiRecord>> {
    let record = service.calculate_and_store(input).await?;
    Ok(Json(record))
}

/// Calculate a BMI, store it and index its embedding
#[utoipa::path(
    post,
    path = "/embedding",
    tag = BMI_TAG,
    request_body = CalculateBmi,
    responses(
        (status = 200, description = "Stored in both stores", body = BmiRecord),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, description = "Storage failure, or vector write failed after the record was stored (details.id)", body = axum_helpers::ErrorResponse),
        (status = 503, response = ServiceUnavailableResponse)
    )
)]
async fn store_with_embedding<R: BmiRepository>(
    State(service): State<Arc<BmiService<R>>>,
    ValidatedJson(input): ValidatedJson<CalculateBmi>,
) -> BmiResult<Json<BmiRecord>> {
    let record = service.store_with_embedding(input).await?;
    Ok(Json(record))
}

/// Find the stored embeddings closest to a query vector
#[utoipa::path(
    post,
    path = "/query",
    tag = BMI_TAG,
    request_body = QueryBmi,
    responses(
        (status = 200, description = "Up to 10 matches, best first", body = Vec<ScoredMatch>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse),
        (status = 503, response = ServiceUnavailableResponse)
    )
)]
async fn query_by_vector<R: BmiRepository>(
    State(service): State<Arc<BmiService<R>>>,
    ValidatedJson(input): ValidatedJson<QueryBmi>,
) -> BmiResult<Json<Vec<ScoredMatch>>> {
    let matches = service.query_by_vector(input).await?;
    Ok(Json(matches))
}

/// Get a record by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = BMI_TAG,
    params(
        ("id" = i64, Path, description = "BMI record ID")
    ),
    responses(
        (status = 200, description = "BMI record found", body = BmiRecord),
        (status = 400, response = BadRequestIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_bmi<R: BmiRepository>(
    State(service): State<Arc<BmiService<R>>>,
    IdPath(id): IdPath,
) -> BmiResult<Json<BmiRecord>> {
    let record = service.get_bmi(id).await?;
    Ok(Json(record))
}

/// Update height and weight of a record
#[utoipa::path(
    put,
    path = "/{id}",
    tag = BMI_TAG,
    params(
        ("id" = i64, Path, description = "BMI record ID")
    ),
    request_body = UpdateBmi,
    responses(
        (status = 200, description = "BMI record updated", body = MessageResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_bmi<R: BmiRepository>(
    State(service): State<Arc<BmiService<R>>>,
    IdPath(id): IdPath,
    ValidatedJson(input): ValidatedJson<UpdateBmi>,
) -> BmiResult<Json<MessageResponse>> {
    service.update_bmi(id, input).await?;
    Ok(Json(MessageResponse::new("BMI record updated successfully")))
}

/// Delete a record
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = BMI_TAG,
    params(
        ("id" = i64, Path, description = "BMI record ID")
    ),
    responses(
        (status = 200, description = "BMI record deleted", body = MessageResponse),
        (status = 400, response = BadRequestIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_bmi<R: BmiRepository>(
    State(service): State<Arc<BmiService<R>>>,
    IdPath(id): IdPath,
) -> BmiResult<Json<MessageResponse>> {
    service.delete_bmi(id).await?;
    Ok(Json(MessageResponse::new("BMI record deleted successfully")))
}
