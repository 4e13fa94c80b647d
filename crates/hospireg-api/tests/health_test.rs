//! Health and file-serving integration tests.

mod helpers;

use helpers::{setup_test_app, setup_test_app_with_failing_database};
use serde_json::{json, Value};

#[tokio::test]
async fn test_liveness() {
    let app = setup_test_app().await;

    let response = app.client().get("/health").await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(response.json::<Value>(), json!({"status": "alive"}));
}

#[tokio::test]
async fn test_readiness_when_database_answers() {
    let app = setup_test_app().await;

    let response = app.client().get("/health/ready").await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(
        response.json::<Value>(),
        json!({"status": "ready", "database": "ready"})
    );
}

#[tokio::test]
async fn test_readiness_when_database_fails() {
    let app = setup_test_app_with_failing_database().await;

    let response = app.client().get("/health/ready").await;

    assert_eq!(response.status_code(), 503);
    let body: Value = response.json();
    assert_eq!(body["status"], "not_ready");
    assert!(body["database"].as_str().unwrap().starts_with("not_ready"));
}

#[tokio::test]
async fn test_missing_file_is_not_found() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .get("/files/hospital_uploads/1-missing.jpg")
        .await;

    assert_eq!(response.status_code(), 404);
    assert_eq!(response.json::<Value>()["success"], false);
}
