use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use docsearch_core::InvertedIndex;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::fs;
use tempfile::tempdir;
use tower::ServiceExt;

const TOKEN: &str = "secret";

fn tiny_index() -> InvertedIndex {
    let mut index = InvertedIndex::new();
    index.index_text("A", "free software foundation");
    index.index_text("B", "free hardware");
    index.index_text("C", "rust rust rust free");
    index
}

async fn send(app: Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let body = resp.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    send(app, Request::get(uri).body(Body::empty()).unwrap()).await
}

async fn post(app: Router, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
    let mut req = Request::post(uri).header("content-type", "application/json");
    if let Some(token) = token {
        req = req.header("X-ADMIN-TOKEN", token);
    }
    send(app, req.body(Body::from(body.to_string())).unwrap()).await
}

fn paths(json: &Value) -> Vec<String> {
    json["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|h| h["path"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn boolean_modes() {
    let app = docsearch_server::build_router(tiny_index(), None);

    let (status, json) = get(app.clone(), "/search?q=free+foundation&mode=AND").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(paths(&json), vec!["A"]);

    let (_, json) = get(app.clone(), "/search?q=hardware&mode=NOT").await;
    assert_eq!(paths(&json), vec!["A", "C"]);

    let (status, json) = get(app.clone(), "/search?q=free&mode=XOR").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total_hits"], 0);

    let (status, json) = get(app, "/search?q=free&mode=and").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total_hits"], 0);
}

#[tokio::test]
async fn ranked_search_and_domain_error() {
    let app = docsearch_server::build_router(tiny_index(), None);

    let (status, json) = get(app.clone(), "/search?q=rust+free&mode=OR&rank=true").await;
    assert_eq!(status, StatusCode::OK);
    let results = json["results"].as_array().unwrap();
    assert_eq!(results[0]["path"], "C");
    assert!(results[0]["score"].as_f64().unwrap() > results[1]["score"].as_f64().unwrap());

    let (status, _) = get(app, "/search?q=free+gpl&mode=OR&rank=true").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn phrase_doc_and_stats() {
    let app = docsearch_server::build_router(tiny_index(), None);

    let (_, json) = get(app.clone(), "/phrase?q=free+software").await;
    assert_eq!(paths(&json), vec!["A"]);
    let (_, json) = get(app.clone(), "/phrase?q=software+free").await;
    assert_eq!(json["total_hits"], 0);

    let (status, json) = get(app.clone(), "/doc?path=B").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["text"], "free hardware");
    assert_eq!(json["tokens"], 2);
    let (status, _) = get(app.clone(), "/doc?path=Z").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, json) = get(app, "/stats").await;
    assert_eq!(json["documents"], 3);
}

#[tokio::test]
async fn mutations_require_token_and_keep_index_consistent() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("gnu.txt");
    fs::write(&file, "GNU is not Unix").unwrap();
    let file_str = file.to_string_lossy().to_string();

    let app = docsearch_server::build_router(tiny_index(), Some(TOKEN.into()));

    let (status, _) = post(app.clone(), "/index/add", None, json!({ "path": file_str })).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, json) = post(app.clone(), "/index/add", Some(TOKEN), json!({ "path": file_str })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["documents"], 4);
    let (_, json) = get(app.clone(), "/search?q=unix").await;
    assert_eq!(paths(&json), vec![file_str.clone()]);

    fs::write(&file, "GNU is free").unwrap();
    let (status, _) = post(app.clone(), "/index/update", Some(TOKEN), json!({ "path": file_str })).await;
    assert_eq!(status, StatusCode::OK);
    let (_, json) = get(app.clone(), "/search?q=unix").await;
    assert_eq!(json["total_hits"], 0);

    let (status, json) = post(app.clone(), "/index/delete", Some(TOKEN), json!({ "path": file_str })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["documents"], 3);
    let (status, _) = post(app.clone(), "/index/delete", Some(TOKEN), json!({ "path": file_str })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let missing = dir.path().join("nope.txt").to_string_lossy().to_string();
    let (status, _) = post(app.clone(), "/index/add", Some(TOKEN), json!({ "path": missing })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, json) = post(app, "/index/folder", Some(TOKEN), json!({ "path": dir.path().to_string_lossy() })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["indexed"].as_array().unwrap().len(), 1);
    assert_eq!(json["documents"], 4);
}
