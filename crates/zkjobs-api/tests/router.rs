//! Router tests driven through `tower::ServiceExt::oneshot`.

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use zkjobs_api::{create_router, ApiConfig, AppState};
use zkjobs_models::JobCatalog;

fn app() -> Router {
    let config = ApiConfig {
        service_name: "zkjobs-test".to_string(),
        ..ApiConfig::default()
    };
    create_router(AppState::with_catalog(config, JobCatalog::generate(42, 30)), None)
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

#[tokio::test]
async fn test_health_reports_service_name() {
    let (status, body) = get(app(), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "zkjobs-test");
    assert!(chrono::DateTime::parse_from_rfc3339(body["timestamp"].as_str().unwrap()).is_ok());
}

#[tokio::test]
async fn test_live_endpoint() {
    let (status, body) = get(app(), "/live").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["alive"], true);
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_list_jobs_paginates() {
    let (status, body) = get(app(), "/api/v1/jobs?limit=5&offset=2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"].as_array().unwrap().len(), 5);
    assert_eq!(body["meta"]["total"], 30);
    assert_eq!(body["meta"]["limit"], 5);
    assert_eq!(body["meta"]["offset"], 2);
}

#[tokio::test]
async fn test_remote_location_returns_only_remote_jobs() {
    let (status, body) = get(app(), "/api/v1/jobs?location=Remote&limit=100").await;
    assert_eq!(status, StatusCode::OK);
    let jobs = body["data"].as_array().unwrap();
    assert!(!jobs.is_empty());
    assert!(jobs.iter().all(|job| job["remote"] == true));
}

#[tokio::test]
async fn test_out_of_range_limit_is_rejected() {
    let (status, body) = get(app(), "/api/v1/jobs?limit=500").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_malformed_query_gets_failure_envelope() {
    let (status, body) = get(app(), "/api/v1/jobs?remote=maybe").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_get_job_and_unknown_id() {
    let (status, body) = get(app(), "/api/v1/jobs/job-0003").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], "job-0003");

    let (status, body) = get(app(), "/api/v1/jobs/job-9999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert!(body.get("data").is_none());
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let response = app()
        .oneshot(
            Request::builder()
                .uri("/live")
                .header("x-request-id", "abc-123")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.headers()["x-request-id"], "abc-123");
    assert_eq!(response.headers()["x-content-type-options"], "nosniff");

    let response = app()
        .oneshot(Request::builder().uri("/live").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert!(response.headers().contains_key("x-request-id"));
}
