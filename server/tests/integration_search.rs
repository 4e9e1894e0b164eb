use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use catalog_core::{CatalogRecord, SearchEngine, Tokenizer};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::fs;
use std::sync::Arc;
use tempfile::tempdir;
use tower::ServiceExt;

fn tiny_corpus() -> Vec<CatalogRecord> {
    vec![
        CatalogRecord::titled("Chaussure de course rouge Nike").with_category("Chaussures").with_brand("Nike").with_price(89.9),
        CatalogRecord::titled("Basket noire Adidas").with_category("Chaussures").with_brand("Adidas").with_price(120.0),
        CatalogRecord::titled("Telephone Samsung Galaxy").with_category("Telephone").with_brand("Samsung").with_price(499.0),
    ]
}

fn app() -> Router {
    catalog_server::build_app(Arc::new(SearchEngine::new(tiny_corpus(), Tokenizer::default())))
}

async fn call(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let resp = app.oneshot(request).await.unwrap();
    let status = resp.status();
    let body = resp.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&body).unwrap())
}

fn post_search(body: Value) -> Request<Body> {
    Request::post("/search")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn search_returns_ranked_results() {
    let (status, json) = call(app(), post_search(json!({"query": "chaussure rouge"}))).await;
    assert_eq!(status, StatusCode::OK);
    let results = json["results"].as_array().unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0]["title"], "Chaussure de course rouge Nike");
    assert_eq!(results[0]["why"], "matched: chaussure, rouge | category match");
    assert_eq!(results[1]["title"], "Basket noire Adidas");
    assert!(results[0].get("debug_scores").is_none());
    assert_eq!(json["diagnostics"]["query_tokens"], json!(["chaussure", "rouge"]));
    assert_eq!(json["diagnostics"]["total_products"], 3);
}

#[tokio::test]
async fn search_accepts_string_filters_and_debug() {
    let request = json!({"query": "chaussure", "max_price": "100", "min_price": "", "debug": true});
    let (status, json) = call(app(), post_search(request)).await;
    assert_eq!(status, StatusCode::OK);
    let results = json["results"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["price"], 89.9);
    assert!(results[0]["debug_scores"]["final"].is_number());
    assert!(json["diagnostics"]["top_scores"].is_array());
}

#[tokio::test]
async fn invalid_requests_are_bad_requests() {
    let (status, json) = call(app(), post_search(json!({"query": "   "}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].is_string());

    let (status, _) = call(app(), post_search(json!({"query": "mug", "min_price": "cheap"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = call(app(), post_search(json!({"query": "mug", "min_price": 50, "max_price": 10}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn wrongly_typed_fields_are_json_bad_requests() {
    for body in [
        json!({"query": "mug", "min_price": true}),
        json!({"query": "mug", "debug": "yes"}),
        json!({"query": 42}),
    ] {
        let (status, json) = call(app(), post_search(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"].as_str().unwrap().starts_with("malformed request"));
    }

    let request = Request::post("/search")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, json) = call(app(), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn catalog_without_titles_is_served_as_unavailable() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("products.json");
    fs::write(&path, r#"[{"price": 1, "brand": "x"}]"#).unwrap();
    let engine = catalog_ingest::open_engine(&path, &HashMap::new(), None).unwrap();
    let app = catalog_server::build_app(Arc::new(engine));

    let (status, json) = call(app.clone(), post_search(json!({"query": "mug"}))).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(json["error"].as_str().unwrap().contains("title"));

    let (_, json) = call(app, Request::get("/health").body(Body::empty()).unwrap()).await;
    assert_eq!(json["status"], "failed");
}

#[tokio::test]
async fn failed_build_is_service_unavailable() {
    let app = catalog_server::build_app(Arc::new(SearchEngine::new(vec![], Tokenizer::default())));
    let (status, json) = call(app.clone(), post_search(json!({"query": "mug"}))).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(json["error"].as_str().unwrap().contains("unavailable"));

    let (status, json) = call(app, Request::get("/health").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "failed");
}

#[tokio::test]
async fn health_reports_engine_state() {
    let engine = Arc::new(SearchEngine::new(tiny_corpus(), Tokenizer::default()));
    let app = catalog_server::build_app(Arc::clone(&engine));
    let (_, json) = call(app.clone(), Request::get("/health").body(Body::empty()).unwrap()).await;
    assert_eq!(json["status"], "uninitialized");

    engine.initialize().unwrap();
    let (_, json) = call(app, Request::get("/health").body(Body::empty()).unwrap()).await;
    assert_eq!(json["status"], "ready");
}

#[tokio::test]
async fn categories_are_sorted_and_distinct() {
    let (status, json) = call(app(), Request::get("/categories").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["categories"], json!(["Chaussures", "Telephone"]));
}

#[tokio::test]
async fn serves_a_catalog_loaded_from_disk() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("products.jsonl");
    fs::write(
        &path,
        concat!(
            "{\"nom\": \"Mug Cadeau Anniversaire\", \"prix\": \"12,50\", \"categorie\": \"Maison\"}\n",
            "{\"nom\": \"Chaise de bureau ergonomique\", \"prix\": \"149\", \"categorie\": \"Mobilier\"}\n",
        ),
    )
    .unwrap();
    let engine = catalog_ingest::open_engine(&path, &HashMap::new(), None).unwrap();
    let app = catalog_server::build_app(Arc::new(engine));

    let (status, json) = call(app, post_search(json!({"query": "cadeaux anniv"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["results"][0]["title"], "Mug Cadeau Anniversaire");
    assert_eq!(json["results"][0]["price"], 12.5);
}
