//! Integration tests for the HTTP GraphQL endpoint
//!
//! Each test builds the full router over a private in-memory database and
//! drives it with `oneshot` requests, without binding a socket.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use tower::ServiceExt;

use userbase::app::{AppState, build_app};
use userbase::config::Config;
use userbase::db::Database;
use userbase::graphql::build_schema;

async fn test_app() -> (Router, Database) {
    let db = Database::connect_in_memory().await.unwrap();
    let sync = db.sync_schema().await;
    assert!(sync.errors.is_empty(), "{:?}", sync.errors);

    let state = AppState {
        config: Arc::new(Config::default()),
        schema: build_schema(db.clone()),
    };
    (build_app(state), db)
}

async fn post_graphql(app: &Router, query: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({ "query": query }).to_string()))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_post_hello() {
    let (app, _db) = test_app().await;

    let (status, body) = post_graphql(&app, r#"{ hello(name: "X") }"#).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "data": { "hello": "Hello X" } }));
}

#[tokio::test]
async fn test_create_then_fetch_over_http() {
    let (app, db) = test_app().await;

    let (_, created) = post_graphql(
        &app,
        r#"mutation { createUser(firstName: "Ada", profile: { gender: "female" }) { id profileId } }"#,
    )
    .await;
    let id = created["data"]["createUser"]["id"].as_i64().unwrap();
    let profile_id = created["data"]["createUser"]["profileId"].clone();

    let (_, fetched) = post_graphql(
        &app,
        &format!("{{ user(id: {id}) {{ firstName profile {{ id gender }} }} }}"),
    )
    .await;

    assert_eq!(
        fetched["data"]["user"],
        json!({ "firstName": "Ada", "profile": { "id": profile_id, "gender": "female" } })
    );
    assert_eq!(db.users().count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_update_to_empty_name_over_http() {
    let (app, _db) = test_app().await;

    let (_, created) = post_graphql(
        &app,
        r#"mutation { createUser(firstName: "Ada", profile: { gender: "female" }) { id } }"#,
    )
    .await;
    let id = created["data"]["createUser"]["id"].as_i64().unwrap();

    let (status, body) = post_graphql(
        &app,
        &format!(r#"mutation {{ updateUser(id: {id}, firstName: "") }}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "data": { "updateUser": true } }));
}

#[tokio::test]
async fn test_get_without_html_is_rejected() {
    let (app, _db) = test_app().await;

    let request = Request::builder()
        .method("GET")
        .uri("/")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert!(body["error"].as_str().unwrap().contains("POST"));
}

#[tokio::test]
async fn test_get_from_browser_serves_graphiql() {
    let (app, _db) = test_app().await;

    let request = Request::builder()
        .method("GET")
        .uri("/")
        .header(header::ACCEPT, "text/html,application/xhtml+xml")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let html = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(html.to_lowercase().contains("graphiql"));
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let (app, _db) = test_app().await;

    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header(header::ORIGIN, "http://example.com")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({ "query": "{ hello }" }).to_string()))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*"
    );
}
