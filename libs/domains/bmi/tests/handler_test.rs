//! Handler tests for the BMI domain
//!
//! These run the domain router against the in-memory stores and check:
//! - Request deserialization and validation
//! - Response bodies and HTTP status codes
//! - The structured error body for every failure class

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use domain_bmi::*;
use domain_bmi::models::BmiPoint;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt; // For oneshot()

// Helper to parse JSON response body
async fn json_body<T: serde::de::DeserializeOwned>(body: Body) -> T {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn app_without_vectors() -> Router {
    handlers::router(BmiService::new(InMemoryBmiRepository::new()))
}

fn app_with_vectors() -> Router {
    let service = BmiService::new(InMemoryBmiRepository::new())
        .with_vector_store(Arc::new(InMemoryVectorStore::new()));
    handlers::router(service)
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Vector store whose writes always fail
struct UnreachableVectorStore;

#[async_trait]
impl BmiVectorStore for UnreachableVectorStore {
    async fn ensure_collection(&self) -> VectorStoreResult<()> {
        Ok(())
    }

    async fn upsert(&self, _point: BmiPoint) -> VectorStoreResult<()> {
        Err(VectorStoreError::Qdrant("connection refused".to_string()))
    }

    async fn search(&self, _vector: Vec<f32>, _limit: u64) -> VectorStoreResult<Vec<ScoredMatch>> {
        Err(VectorStoreError::Qdrant("connection refused".to_string()))
    }

    async fn health_check(&self) -> VectorStoreResult<()> {
        Err(VectorStoreError::Qdrant("connection refused".to_string()))
    }
}

#[tokio::test]
async fn test_calculate_returns_classified_record() {
    let app = app_without_vectors();

    let response = app
        .oneshot(json_request("POST", "/", json!({"height": 1.70, "weight": 70.0})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["id"], 1);
    assert_eq!(body["height"], 1.70);
    assert_eq!(body["weight"], 70.0);
    assert!((body["value"].as_f64().unwrap() - 24.2215).abs() < 1e-4);
    assert_eq!(body["category"], "overweight / obesity class 1");
    assert_eq!(body["risk"], "elevated risk level 1");
    assert!(body["created_at"].is_string());
}

#[tokio::test]
async fn test_calculate_rejects_non_positive_height() {
    let app = app_without_vectors();

    let response = app
        .clone()
        .oneshot(json_request("POST", "/", json!({"height": 0, "weight": 70.0})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["error"], "VALIDATION_ERROR");
    assert_eq!(body["code"], 1001);

    // Nothing was stored
    let response = app.oneshot(empty_request("GET", "/")).await.unwrap();
    let records: Vec<BmiRecord> = json_body(response.into_body()).await;
    assert!(records.is_empty());
}

async fn assert_json_extraction_400(app: Router, request: Request<Body>) {
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["error"], "JSON_EXTRACTION");
    assert_eq!(body["code"], 1003);
}

#[tokio::test]
async fn test_calculate_rejects_malformed_json() {
    let app = app_without_vectors();

    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/json")
        .body(Body::from("{\"height\": 1.7,"))
        .unwrap();
    assert_json_extraction_400(app, request).await;
}

#[tokio::test]
async fn test_unreadable_bodies_return_400_on_every_write_route() {
    let app = app_with_vectors();

    let bodies = [json!({"height": 1.70}), json!({"height": "abc", "weight": 70.0})];
    for body in bodies {
        assert_json_extraction_400(app.clone(), json_request("POST", "/", body.clone())).await;
        assert_json_extraction_400(app.clone(), json_request("PUT", "/1", body.clone())).await;
        assert_json_extraction_400(app.clone(), json_request("POST", "/embedding", body)).await;
    }

    assert_json_extraction_400(app.clone(), json_request("POST", "/query", json!({"query_vector": "x"}))).await;
    assert_json_extraction_400(app.clone(), json_request("POST", "/query", json!({}))).await;
}

#[tokio::test]
async fn test_missing_content_type_returns_400() {
    let app = app_with_vectors();

    for (method, uri, body) in [
        ("POST", "/", json!({"height": 1.70, "weight": 70.0})),
        ("PUT", "/1", json!({"height": 1.70, "weight": 70.0})),
        ("POST", "/query", json!({"query_vector": [1.7, 70.0, 24.2]})),
    ] {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::from(body.to_string()))
            .unwrap();
        assert_json_extraction_400(app.clone(), request).await;
    }

    // Nothing was stored
    let response = app.oneshot(empty_request("GET", "/")).await.unwrap();
    let records: Vec<Value> = json_body(response.into_body()).await;
    assert!(records.is_empty());
}

#[tokio::test]
async fn test_overflowing_value_returns_400() {
    let app = app_without_vectors();

    let response = app
        .oneshot(json_request("POST", "/", json!({"height": 1e-200, "weight": 70.0})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_get_and_list_records() {
    let app = app_without_vectors();

    for (height, weight) in [(1.70, 70.0), (1.80, 70.0)] {
        let response = app
            .clone()
            .oneshot(json_request("POST", "/", json!({"height": height, "weight": weight})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app.clone().oneshot(empty_request("GET", "/2")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let record: BmiRecord = json_body(response.into_body()).await;
    assert_eq!(record.id, 2);
    assert_eq!(record.height, 1.80);
    assert_eq!(record.category.as_deref(), Some("normal"));

    let response = app.oneshot(empty_request("GET", "/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let records: Vec<BmiRecord> = json_body(response.into_body()).await;
    assert_eq!(records.iter().map(|r| r.id).collect::<Vec<_>>(), vec![1, 2]);
}

#[tokio::test]
async fn test_get_missing_record_returns_404() {
    let app = app_without_vectors();

    let response = app.oneshot(empty_request("GET", "/99")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["error"], "NOT_FOUND");
    assert_eq!(body["message"], "BMI record not found");
}

#[tokio::test]
async fn test_non_numeric_id_returns_400() {
    let app = app_without_vectors();

    for request in [
        empty_request("GET", "/abc"),
        empty_request("DELETE", "/abc"),
        json_request("PUT", "/abc", json!({"height": 1.75, "weight": 72.0})),
    ] {
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = json_body(response.into_body()).await;
        assert_eq!(body["error"], "INVALID_ID");
        assert_eq!(body["message"], "Invalid ID");
    }
}

#[tokio::test]
async fn test_update_recomputes_value() {
    let app = app_without_vectors();
    app.clone()
        .oneshot(json_request("POST", "/", json!({"height": 1.70, "weight": 70.0})))
        .await
        .unwrap();

    // Fields other than height and weight are ignored
    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/1",
            json!({"id": 5, "height": 1.75, "weight": 72.0, "value": 1.0}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: MessageResponse = json_body(response.into_body()).await;
    assert_eq!(body.message, "BMI record updated successfully");

    let response = app.oneshot(empty_request("GET", "/1")).await.unwrap();
    let record: BmiRecord = json_body(response.into_body()).await;
    assert_eq!(record.id, 1);
    assert!((record.value - 23.5102).abs() < 1e-4);
    assert_eq!(record.category.as_deref(), Some("overweight / obesity class 1"));
}

#[tokio::test]
async fn test_update_and_delete_missing_record_return_404() {
    let app = app_without_vectors();

    let response = app
        .clone()
        .oneshot(json_request("PUT", "/7", json!({"height": 1.75, "weight": 72.0})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app.oneshot(empty_request("DELETE", "/7")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_rejects_invalid_body() {
    let app = app_without_vectors();
    app.clone()
        .oneshot(json_request("POST", "/", json!({"height": 1.70, "weight": 70.0})))
        .await
        .unwrap();

    let response = app
        .oneshot(json_request("PUT", "/1", json!({"height": 1.75, "weight": -3.0})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_record() {
    let app = app_without_vectors();
    app.clone()
        .oneshot(json_request("POST", "/", json!({"height": 1.70, "weight": 70.0})))
        .await
        .unwrap();

    let response = app.clone().oneshot(empty_request("DELETE", "/1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: MessageResponse = json_body(response.into_body()).await;
    assert_eq!(body.message, "BMI record deleted successfully");

    let response = app.oneshot(empty_request("GET", "/1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_embedding_and_query() {
    let app = app_with_vectors();

    let response = app
        .clone()
        .oneshot(json_request("POST", "/embedding", json!({"height": 1.70, "weight": 70.0})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let record: BmiRecord = json_body(response.into_body()).await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/query",
            json!({"query_vector": record.embedding()}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let matches: Vec<ScoredMatch> = json_body(response.into_body()).await;
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].id, record.id);
    assert_eq!(matches[0].payload.category, "overweight / obesity class 1");
    assert_eq!(matches[0].payload.risk, "elevated risk level 1");
    assert!(!matches[0].payload.created_at.is_empty());
}

#[tokio::test]
async fn test_query_rejects_wrong_dimension() {
    let app = app_with_vectors();

    let response = app
        .oneshot(json_request("POST", "/query", json!({"query_vector": [1.7, 70.0]})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_vector_routes_without_vector_store_return_503() {
    let app = app_without_vectors();

    let requests = [
        json_request("POST", "/embedding", json!({"height": 1.70, "weight": 70.0})),
        json_request("POST", "/query", json!({"query_vector": [1.7, 70.0, 24.2]})),
    ];
    for request in requests {
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body: Value = json_body(response.into_body()).await;
        assert_eq!(body["error"], "SERVICE_UNAVAILABLE");
    }

    // The embedding request did not write a relational row
    let response = app.oneshot(empty_request("GET", "/")).await.unwrap();
    let records: Vec<BmiRecord> = json_body(response.into_body()).await;
    assert!(records.is_empty());
}

#[tokio::test]
async fn test_dual_write_failure_reports_committed_id() {
    let service = BmiService::new(InMemoryBmiRepository::new())
        .with_vector_store(Arc::new(UnreachableVectorStore));
    let app = handlers::router(service);

    let response = app
        .clone()
        .oneshot(json_request("POST", "/embedding", json!({"height": 1.70, "weight": 70.0})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["error"], "DUAL_WRITE_FAILED");
    assert_eq!(body["details"]["id"], 1);

    // The relational row stays committed
    let response = app.oneshot(empty_request("GET", "/1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_query_vector_store_failure_returns_500() {
    let service = BmiService::new(InMemoryBmiRepository::new())
        .with_vector_store(Arc::new(UnreachableVectorStore));
    let app = handlers::router(service);

    let response = app
        .oneshot(json_request("POST", "/query", json!({"query_vector": [1.7, 70.0, 24.2]})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["error"], "VECTOR_STORE_ERROR");
}
