//! HTTP API tests driven through the router without a listener

mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use common::seeded_store;
use records_manager::api::{build_router, AppState};
use records_manager::config::Config;
use records_manager::filters::{encode, FilterOperator, FilterValue};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn app_with(config: Config) -> Router {
    build_router(AppState::new(Arc::new(seeded_store()), config))
}

fn app() -> Router {
    app_with(Config::default())
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    send(app, Request::get(uri).body(Body::empty()).unwrap()).await
}

async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

fn status_filter() -> Value {
    json!({
        "groups": [{
            "conditions": [{
                "field": "status",
                "operator": "equals",
                "value": {"single": {"text": "ACTIVE"}}
            }]
        }]
    })
}

#[tokio::test]
async fn test_health() {
    let (status, body) = get(app(), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "records-manager");
}

#[tokio::test]
async fn test_search_endpoint() {
    let (status, body) = get(app(), "/v1/search?q=acme&types=companies,deals").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["results"]["companies"][0]["record"]["name"], "Acme");
    assert_eq!(body["results"]["companies"][0]["relevance_score"], 100);
    assert_eq!(body["total_results"], 3);
    assert!(body["results"].get("contacts").is_none());
}

#[tokio::test]
async fn test_search_rejects_unusable_requests() {
    let (status, body) = get(app(), "/v1/search?q=acme&types=invoices").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    let long = "x".repeat(101);
    let (status, _) = get(app(), &format!("/v1/search?q={long}")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_field_and_operator_catalogs() {
    let (status, body) = get(app(), "/v1/filters/fields/contacts").await;
    assert_eq!(status, StatusCode::OK);
    let keys: Vec<&str> = body["fields"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|f| f["key"].as_str())
        .collect();
    assert!(keys.contains(&"company.name"));

    let (status, body) = get(app(), "/v1/filters/fields/invoices").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["fields"], json!([]));

    let (status, body) = get(app(), "/v1/filters/operators/boolean").await;
    assert_eq!(status, StatusCode::OK);
    let operators: Vec<&str> = body["operators"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|o| o["operator"].as_str())
        .collect();
    assert_eq!(operators, vec!["is_true", "is_false"]);

    let (status, _) = get(app(), "/v1/filters/operators/colour").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_validate_reports_findings() {
    let (status, body) = post_json(app(), "/v1/filters/validate", json!({"groups": []})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_valid"], false);
    assert_eq!(body["errors"][0], "Filter must contain at least one group");
}

#[tokio::test]
async fn test_compile_endpoint() {
    let (status, body) = post_json(app(), "/v1/filters/compile/companies", status_filter()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["predicate"]["kind"], "leaf");
    assert_eq!(body["predicate"]["field"], "status");

    let between = json!({
        "groups": [{
            "conditions": [{
                "field": "employee_count",
                "operator": "between",
                "value": {"single": {"number": 10.0}}
            }]
        }]
    });
    let (status, body) = post_json(app(), "/v1/filters/compile/companies", between).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_FILTER");

    let (status, _) = post_json(app(), "/v1/filters/compile/invoices", status_filter()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_encode_then_decode() {
    let (status, body) = post_json(app(), "/v1/filters/encode", status_filter()).await;
    assert_eq!(status, StatusCode::OK);
    let token = body["token"].as_str().unwrap().to_string();

    let (status, body) = get(app(), &format!("/v1/filters/decode?token={token}&strict=true")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["config"]["groups"][0]["conditions"][0]["field"], "status");
    assert!(body.get("warning").is_none());
}

#[tokio::test]
async fn test_decode_bad_token() {
    let (status, body) = get(app(), "/v1/filters/decode?token=garbage!&strict=true").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_FILTER_TOKEN");

    let (status, body) = get(app(), "/v1/filters/decode?token=garbage!").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["warning"].is_string());
    assert_eq!(body["config"]["groups"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_list_records_with_token() {
    let config = common::config_of(vec![(
        "industry",
        FilterOperator::Equals,
        FilterValue::single("technology"),
    )]);
    let token = encode(&config);

    let (status, body) = get(app(), &format!("/v1/records/companies?filters={token}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 2);
    assert_eq!(body["records"][0]["name"], "Acme");
    assert_eq!(body["records"][1]["name"], "Globex");
    assert!(body.get("filter_warning").is_none());

    let (status, body) = get(app(), "/v1/records/companies?page=1&page_size=2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 3);
    assert_eq!(body["records"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_list_records_bad_token() {
    let (status, body) = get(app(), "/v1/records/companies?filters=not-a-token").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 3);
    assert!(body["filter_warning"].is_string());

    let mut strict = Config::default();
    strict.filters.strict_decode = true;
    let (status, body) = get(app_with(strict), "/v1/records/companies?filters=not-a-token").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_FILTER_TOKEN");
}

#[tokio::test]
async fn test_create_and_get_record() {
    let app = app();

    let (status, created) = post_json(
        app.clone(),
        "/v1/records/companies",
        json!({"name": "Initech", "industry": "Software"}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_str().unwrap().to_string();

    let (status, body) = get(app.clone(), &format!("/v1/records/companies/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Initech");

    let (status, _) = get(app.clone(), &format!("/v1/records/contacts/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = post_json(app, "/v1/records/companies", json!({"name": ""})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}
