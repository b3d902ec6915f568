//! Router-level tests: status codes and response JSON shape.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use prscore_engine::EngineConfig;
use prscore_service::{router, AppState};

fn app() -> Router {
  router(Arc::new(AppState {
    config: EngineConfig::default(),
  }))
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
  Request::builder()
    .method("POST")
    .uri(uri)
    .header("content-type", "application/json")
    .body(Body::from(body.to_string()))
    .unwrap()
}

async fn body_json(res: axum::response::Response) -> Value {
  let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
  serde_json::from_slice(&bytes).unwrap()
}

const SCORE_BODY: &str = r#"{
  "changeSet": {
    "files": [
      {"path": "db/migrations/007_orders.sql", "additions": 40, "deletions": 2, "diff": "+ALTER TABLE orders ADD COLUMN note text;"},
      {"path": "src/ui/Cart.tsx", "additions": 25, "deletions": 5}
    ],
    "commits": [
      {"sha": "a1", "timestamp": "2025-03-01T09:00:00Z"},
      {"sha": "b2", "timestamp": "2025-03-02T09:00:00Z"}
    ]
  },
  "analysis": {
    "breakingChanges": [
      {"file": "db/migrations/007_orders.sql", "type": "schema", "description": "new column", "severity": 4}
    ]
  }
}"#;

#[tokio::test]
async fn health_returns_ok() {
  let res = app()
    .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
    .await
    .unwrap();
  assert_eq!(res.status(), StatusCode::OK);
  let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
  assert_eq!(&bytes[..], b"ok");
}

#[tokio::test]
async fn score_response_shape() {
  let res = app().oneshot(post_json("/score", SCORE_BODY)).await.unwrap();
  assert_eq!(res.status(), StatusCode::OK);

  let v = body_json(res).await;
  assert!(v["reportId"].as_str().unwrap().starts_with("rpt-"));
  assert_eq!(v["sizeAnalysis"]["size"], "small");
  assert_eq!(v["sizeAnalysis"]["totalLines"], 72);
  assert_eq!(v["plan"]["depth"], "detailed");
  assert_eq!(v["plan"]["suspectFiles"][0], "db/migrations/007_orders.sql");
  assert!(v["plan"]["prompt"].as_str().unwrap().contains("(72 lines changed)"));
  assert_eq!(v["risk"]["breakdown"]["migrations"], 7.0);
  assert_eq!(v["risk"]["breakdown"]["breakingChanges"], 4.5);
  assert_eq!(v["risk"]["details"]["timeSpanHours"], 24.0);
  assert!(v["risk"]["recommendations"].as_array().unwrap().len() >= 7);
}

#[tokio::test]
async fn plan_response_has_no_risk() {
  let body = r#"{"files": [{"path": "src/ui/Cart.tsx", "additions": 25, "deletions": 5}]}"#;
  let res = app().oneshot(post_json("/plan", body)).await.unwrap();
  assert_eq!(res.status(), StatusCode::OK);

  let v = body_json(res).await;
  assert!(v.get("risk").is_none());
  assert_eq!(v["plan"]["filesToAnalyze"][0], "src/ui/Cart.tsx");
}

#[tokio::test]
async fn unknown_finding_type_is_unprocessable() {
  let body = r#"{
    "changeSet": {"files": []},
    "analysis": {"breakingChanges": [
      {"file": "a.ts", "type": "vibes", "description": "?", "severity": 3}
    ]}
  }"#;
  let res = app().oneshot(post_json("/score", body)).await.unwrap();
  assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn score_without_analysis_is_unprocessable() {
  let body = r#"{"changeSet": {"files": []}}"#;
  let res = app().oneshot(post_json("/score", body)).await.unwrap();
  assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn malformed_json_is_bad_request() {
  let res = app().oneshot(post_json("/score", "{not json")).await.unwrap();
  assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}
