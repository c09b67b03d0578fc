use std::time::{Duration, Instant};

use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, app_with, Directory};
use serde_json::{json, Value};
use tower::ServiceExt;

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn get(uri: &str) -> Request<String> {
    Request::builder().uri(uri).body(String::new()).unwrap()
}

// --- hits ---

#[tokio::test]
async fn lookup_known_member() {
    let resp = app().oneshot(get("/exec?name=Tanaka")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["No."], 12);
    assert_eq!(body["名前"], "Tanaka");
    assert!(body.get("error").is_none());
}

#[tokio::test]
async fn lookup_decodes_percent_encoded_name() {
    let mut directory = Directory::default();
    directory.insert(json!({ "名前": "田中", "No.": 3 }));
    let uri = "/exec?name=%E7%94%B0%E4%B8%AD";

    let resp = app_with(directory).oneshot(get(uri)).await.unwrap();
    assert_eq!(body_json(resp).await["No."], 3);
}

#[tokio::test]
async fn lookup_trims_name() {
    let resp = app().oneshot(get("/exec?name=%20Sato%20")).await.unwrap();
    assert_eq!(body_json(resp).await["No."], "205");
}

// --- misses ---

#[tokio::test]
async fn lookup_unknown_member_reports_not_found() {
    let resp = app().oneshot(get("/exec?name=Nobody")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["error"], "Nobody が見つかりません");
}

#[tokio::test]
async fn lookup_without_name_is_an_error() {
    for uri in ["/exec", "/exec?name=", "/exec?name=%20"] {
        let resp = app().oneshot(get(uri)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK, "{uri}");
        let body = body_json(resp).await;
        assert_eq!(body["error"], "名前が指定されていません", "{uri}");
    }
}

#[tokio::test]
async fn unknown_route_is_404() {
    let resp = app().oneshot(get("/members")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- failure knobs ---

#[tokio::test]
async fn outage_answers_with_configured_status() {
    let directory = Directory {
        outage: Some(500),
        ..Directory::sample()
    };
    let resp = app_with(directory).oneshot(get("/exec?name=Tanaka")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(&body_bytes(resp).await[..], b"service unavailable");
}

#[tokio::test]
async fn latency_delays_answer() {
    let directory = Directory {
        latency: Duration::from_millis(50),
        ..Directory::sample()
    };
    let started = Instant::now();
    let resp = app_with(directory).oneshot(get("/exec?name=Tanaka")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(started.elapsed() >= Duration::from_millis(50));
}
