//! Integration tests for the HTTP front-end.
//!
//! All tests run against a temp-dir document store with no network access:
//! browsing and validation paths are exercised end to end, while runs that
//! would reach a chart provider are out of scope here.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use chartsnap::model::RegionPolicy;
use chartsnap::pipeline::PipelineConfig;
use chartsnap::server::{build_router, AppState};
use chartsnap::store::{DocumentStore, FsDocumentStore};
use chartsnap::ChartService;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tower::util::ServiceExt; // for `oneshot`

fn test_config(policy: RegionPolicy) -> PipelineConfig {
    PipelineConfig {
        settle: Duration::from_millis(0),
        lookup_timeout: Duration::from_secs(1),
        region_policy: policy,
    }
}

fn setup_app(policy: RegionPolicy) -> (TempDir, axum::Router) {
    let dir = tempfile::tempdir().expect("tempdir");
    let service = ChartService::new(test_config(policy), dir.path().to_path_buf())
        .expect("service builds offline");
    let state = AppState {
        service: Arc::new(service),
    };
    (dir, build_router(state))
}

async fn seed_document(dir: &TempDir, name: &str, html: &str) {
    FsDocumentStore::new(dir.path())
        .save(name, html)
        .await
        .expect("seed document");
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn post_form(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_string(body: Body) -> String {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn index_lists_stored_documents() {
    let (dir, app) = setup_app(RegionPolicy::Lenient);
    seed_document(&dir, "01012023_US", "<html>us</html>").await;
    seed_document(&dir, "08012023_DE", "<html>de</html>").await;

    let response = app.oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_string(response.into_body()).await;
    assert!(body.contains("res?fileName=01012023_US"));
    assert!(body.contains("01/01/2023 (US)"));
    assert!(body.contains("08/01/2023 (DE)"));
    // Newest chart first.
    let de_pos = body.find("08012023_DE").unwrap();
    let us_pos = body.find("01012023_US").unwrap();
    assert!(de_pos < us_pos);
}

#[tokio::test]
async fn index_renders_on_empty_store() {
    let (_dir, app) = setup_app(RegionPolicy::Lenient);
    let response = app.oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response.into_body()).await;
    assert!(body.contains("<form"));
}

#[tokio::test]
async fn result_page_replays_stored_document() {
    let (dir, app) = setup_app(RegionPolicy::Lenient);
    seed_document(&dir, "01012023_US", "<html>stored chart</html>").await;

    let response = app
        .oneshot(get("/res?fileName=01012023_US"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response.into_body()).await;
    assert_eq!(body, "<html>stored chart</html>");
}

#[tokio::test]
async fn missing_document_is_not_found() {
    let (_dir, app) = setup_app(RegionPolicy::Lenient);
    let response = app
        .oneshot(get("/res?fileName=02012023_DE"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn traversal_file_name_is_not_found() {
    let (_dir, app) = setup_app(RegionPolicy::Lenient);
    let response = app
        .oneshot(get("/res?fileName=..%2F..%2Fetc%2Fpasswd"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_date_is_rejected_before_any_run() {
    let (dir, app) = setup_app(RegionPolicy::Lenient);
    let response = app
        .oneshot(post_form("/action", "curData=not-a-date&country=US"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    // No partial run: nothing was written.
    let docs = FsDocumentStore::new(dir.path()).list().await.unwrap();
    assert!(docs.is_empty());
}

#[tokio::test]
async fn unknown_region_is_rejected_under_strict_policy() {
    let (dir, app) = setup_app(RegionPolicy::Strict);
    let response = app
        .oneshot(post_form("/action", "curData=2023-01-01&country=XX"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_string(response.into_body()).await;
    assert!(body.contains("XX"));

    let docs = FsDocumentStore::new(dir.path()).list().await.unwrap();
    assert!(docs.is_empty());
}
