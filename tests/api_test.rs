mod common;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use crossmarket_backend::app::create_app;
use crossmarket_backend::state::AppState;

use common::{service, source};

fn app(offline: bool) -> Router {
    create_app(AppState {
        market: service(source(offline)),
    })
}

async fn send(app: Router, method: &str, uri: &str) -> (StatusCode, Vec<u8>) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec())
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let (status, body) = send(app, "GET", uri).await;
    (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
}

#[tokio::test]
async fn test_health() {
    let (status, body) = get_json(app(false), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["cached_queries"], 0);
}

#[tokio::test]
async fn test_overview_endpoint() {
    let (status, body) = get_json(app(false), "/api/overview?start=2024-01-01&end=2024-01-03").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["range"]["start"], "2024-01-01");
    assert_eq!(body["range"]["end"], "2024-01-03");
    assert_eq!(body["metrics"][0]["label"], "Bitcoin (Avg)");
    assert_eq!(body["metrics"][0]["value"], 110.0);
    assert_eq!(body["snapshot"]["rows"].as_array().map(|r| r.len()), Some(3));
}

#[tokio::test]
async fn test_overview_rejects_malformed_date() {
    let (status, _) = send(app(false), "GET", "/api/overview?start=yesterday").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_offline_database_maps_to_service_unavailable() {
    let (status, body) = send(app(true), "GET", "/api/overview").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(String::from_utf8_lossy(&body).contains("Can't connect"));
}

#[tokio::test]
async fn test_list_queries() {
    let (status, body) = get_json(app(false), "/api/queries").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(|q| q.len()), Some(30));
    assert_eq!(body[0]["id"], 1);
}

#[tokio::test]
async fn test_run_query_status_mapping() {
    let (status, body) = get_json(app(false), "/api/queries/1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["row_count"], 3);

    let (status, _) = send(app(false), "GET", "/api/queries/20").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = send(app(false), "GET", "/api/queries/99").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_query_csv_export() {
    let request = Request::builder()
        .uri("/api/queries/1/csv")
        .body(Body::empty())
        .unwrap();
    let response = app(false).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/csv; charset=utf-8"
    );
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let text = String::from_utf8_lossy(&body);
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some("name,market_cap,current_price"));
    assert_eq!(lines.count(), 3);
}

#[tokio::test]
async fn test_coins_and_trend() {
    let (status, body) = get_json(app(false), "/api/coins").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["id"], "bitcoin");

    let (status, body) = get_json(app(false), "/api/coins/bitcoin/trend").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["max_price"], 120.0);
    assert_eq!(body["series"].as_array().map(|s| s.len()), Some(3));

    let (status, _) = send(app(false), "GET", "/api/coins/dogecoin/trend").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cache_reset() {
    let app = app(false);

    let (status, _) = send(app.clone(), "GET", "/api/coins/bitcoin/trend").await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = get_json(app.clone(), "/health").await;
    assert_eq!(body["cached_queries"], 1);
    assert_eq!(body["cache"][0]["query"], "SELECT * FROM historical_prices");
    assert_eq!(body["cache"][0]["rows"], 4);
    assert!(body["cache"][0]["loaded_at"].is_string());

    let (status, _) = send(app.clone(), "POST", "/api/cache/reset").await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (_, body) = get_json(app, "/health").await;
    assert_eq!(body["cached_queries"], 0);
}
