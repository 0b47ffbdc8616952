//! Malformed bodies, paths and query strings are answered with the same
//! 400 JSON error shape as domain validation failures.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use casebook_core::roles::Role;
use common::{body_json, get_auth, post_json_auth, user_with_token};
use sqlx::PgPool;
use tower::ServiceExt;

async fn assert_validation_error(response: axum::http::Response<Body>) {
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("application/json"), "got {content_type}");
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert!(json["error"].as_str().is_some_and(|msg| !msg.is_empty()));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_case_body_missing_name(pool: PgPool) {
    let (_s, token) = user_with_token(&pool, "alice", Role::Student).await;

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(app, "/api/v1/cases", serde_json::json!({}), &token).await;
    assert_validation_error(response).await;

    let app = common::build_test_app(pool);
    let response = post_json_auth(
        app,
        "/api/v1/cases",
        serde_json::json!({ "company": "Acme" }),
        &token,
    )
    .await;
    assert_validation_error(response).await;
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_question_body_missing_text(pool: PgPool) {
    let (_s, token) = user_with_token(&pool, "alice", Role::Student).await;

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(app, "/api/v1/questions", serde_json::json!({}), &token).await;
    assert_validation_error(response).await;

    let app = common::build_test_app(pool);
    let response = post_json_auth(
        app,
        "/api/v1/questions",
        serde_json::json!({ "case_id": 1 }),
        &token,
    )
    .await;
    assert_validation_error(response).await;
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_wrongly_typed_field(pool: PgPool) {
    let (_s, token) = user_with_token(&pool, "alice", Role::Student).await;
    let app = common::build_test_app(pool);

    let response = post_json_auth(
        app,
        "/api/v1/questions",
        serde_json::json!({ "case_id": "one", "question_text": "Why?" }),
        &token,
    )
    .await;
    assert_validation_error(response).await;
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unparseable_body_and_missing_content_type(pool: PgPool) {
    let (_s, token) = user_with_token(&pool, "alice", Role::Student).await;

    let app = common::build_test_app(pool.clone());
    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/cases")
        .header("authorization", format!("Bearer {token}"))
        .header("content-type", "application/json")
        .body(Body::from("{\"name\": "))
        .unwrap();
    assert_validation_error(app.oneshot(request).await.unwrap()).await;

    let app = common::build_test_app(pool);
    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/cases")
        .header("authorization", format!("Bearer {token}"))
        .body(Body::from("{\"name\": \"Acme\"}"))
        .unwrap();
    assert_validation_error(app.oneshot(request).await.unwrap()).await;
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_non_numeric_path_id(pool: PgPool) {
    let (_s, token) = user_with_token(&pool, "alice", Role::Student).await;

    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, "/api/v1/questions/abc", &token).await;
    assert_validation_error(response).await;

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/cases/abc", &token).await;
    assert_validation_error(response).await;
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_bad_query_string(pool: PgPool) {
    let (_s, token) = user_with_token(&pool, "alice", Role::Student).await;

    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, "/api/v1/cases?page=first", &token).await;
    assert_validation_error(response).await;

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/cases?status=archived", &token).await;
    assert_validation_error(response).await;
}
