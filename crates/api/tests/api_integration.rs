//! API integration tests.
//!
//! The router is assembled the way the server does it and driven with
//! `oneshot` against a scripted mock database.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
    middleware::from_fn_with_state,
    response::Response,
};
use chrono::Utc;
use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Value};
use serde_json::Value as Json;
use tower::ServiceExt;
use vidtube_api::{API_PREFIX, AppState, auth_middleware, route_not_found, router};
use vidtube_common::NoOpMediaStore;
use vidtube_db::entities::{comment, like, like::LikeTarget, user, video};

const TOKEN: &str = "test-token";
const ALICE: &str = "01hzy8b3k6m2n4p5q7r8s9t0va";
const BOB: &str = "01hzy8b3k6m2n4p5q7r8s9t0vb";
const VIDEO: &str = "01hzy8b3k6m2n4p5q7r8s9t0vc";

fn create_test_router(db: MockDatabase) -> Router {
    let state = AppState::new(Arc::new(db.into_connection()), Arc::new(NoOpMediaStore));

    Router::new()
        .nest(API_PREFIX, router())
        .fallback(route_not_found)
        .layer(from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}

fn create_test_user(id: &str, username: &str) -> user::Model {
    user::Model {
        id: id.to_string(),
        username: username.to_string(),
        email: format!("{username}@example.com"),
        full_name: username.to_string(),
        avatar_url: format!("https://cdn.test/{username}.png"),
        cover_image_url: None,
        token: Some(TOKEN.to_string()),
        created_at: Utc::now().into(),
        updated_at: Utc::now().into(),
    }
}

fn create_test_video() -> video::Model {
    video::Model {
        id: VIDEO.to_string(),
        owner_id: BOB.to_string(),
        title: "Clip".to_string(),
        description: "A clip".to_string(),
        video_file_id: "videos/clip.mp4".to_string(),
        video_url: "/media/videos/clip.mp4".to_string(),
        thumbnail_id: None,
        thumbnail_url: None,
        duration: 12.5,
        views: 3,
        is_published: true,
        created_at: Utc::now().into(),
        updated_at: Utc::now().into(),
    }
}

fn create_test_comment(id: &str) -> comment::Model {
    comment::Model {
        id: id.to_string(),
        owner_id: ALICE.to_string(),
        content: "Nice one".to_string(),
        video_id: Some(VIDEO.to_string()),
        tweet_id: None,
        created_at: Utc::now().into(),
        updated_at: Utc::now().into(),
    }
}

const fn exec(rows_affected: u64) -> MockExecResult {
    MockExecResult {
        last_insert_id: 0,
        rows_affected,
    }
}

fn authed(method: &str, uri: &str) -> axum::http::request::Builder {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {TOKEN}"))
}

async fn body_json(response: Response) -> Json {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_healthcheck_is_public() {
    let app = create_test_router(MockDatabase::new(DatabaseBackend::Postgres));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/healthcheck")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["database"]["status"], "connected");
}

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let app = create_test_router(MockDatabase::new(DatabaseBackend::Postgres));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/videos")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["statusCode"], 401);
    assert_eq!(json["success"], false);
    assert!(json["errors"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_unknown_token_is_unauthorized() {
    let app = create_test_router(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<user::Model>::new()]),
    );

    let response = app
        .oneshot(
            authed("GET", "/api/v1/dashboard/stats")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_unknown_endpoint_returns_404() {
    let app = create_test_router(MockDatabase::new(DatabaseBackend::Postgres));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/nonexistent")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["statusCode"], 404);
    assert_eq!(json["success"], false);
}

#[tokio::test]
async fn test_toggle_existing_like_deletes_it() {
    let existing = like::Model {
        id: "01hzy8b3k6m2n4p5q7r8s9t0ve".to_string(),
        user_id: ALICE.to_string(),
        target_kind: LikeTarget::Video,
        target_id: VIDEO.to_string(),
        created_at: Utc::now().into(),
    };
    let app = create_test_router(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[create_test_user(ALICE, "alice")]])
            .append_query_results([[create_test_video()]])
            .append_query_results([[existing]])
            .append_exec_results([exec(0), exec(1)]),
    );

    let response = app
        .oneshot(
            authed("POST", &format!("/api/v1/likes/toggle/v/{VIDEO}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Video unliked");
    assert_eq!(json["data"]["action"], "deleted");
    assert_eq!(json["data"]["record"]["targetId"], VIDEO);
}

#[tokio::test]
async fn test_empty_comment_is_rejected() {
    let app = create_test_router(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[create_test_user(ALICE, "alice")]]),
    );

    let response = app
        .oneshot(
            authed("POST", &format!("/api/v1/comments/video/{VIDEO}"))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"content":""}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["statusCode"], 400);
    assert!(!json["errors"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_malformed_json_uses_error_envelope() {
    let app = create_test_router(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[create_test_user(ALICE, "alice")]]),
    );

    let response = app
        .oneshot(
            authed("POST", "/api/v1/tweets")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
}

#[tokio::test]
async fn test_comment_pagination() {
    let rows = [
        (create_test_comment("c5"), create_test_user(ALICE, "alice")),
        (create_test_comment("c4"), create_test_user(ALICE, "alice")),
    ];
    let app = create_test_router(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[create_test_user(ALICE, "alice")]])
            .append_query_results([[create_test_video()]])
            .append_query_results([[maplit::btreemap! {
                "num_items" => Value::BigInt(Some(5)),
            }]])
            .append_query_results([rows]),
    );

    let response = app
        .oneshot(
            authed(
                "GET",
                &format!("/api/v1/comments/video/{VIDEO}?page=1&limit=2"),
            )
            .body(Body::empty())
            .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let page = &json["data"];
    assert_eq!(page["items"].as_array().unwrap().len(), 2);
    assert_eq!(page["totalItems"], 5);
    assert_eq!(page["totalPages"], 3);
    assert_eq!(page["items"][0]["owner"]["username"], "alice");
    assert!(page["items"][0]["owner"].get("token").is_none());
}

#[tokio::test]
async fn test_invalid_page_is_rejected() {
    let app = create_test_router(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[create_test_user(ALICE, "alice")]]),
    );

    let response = app
        .oneshot(
            authed("GET", "/api/v1/likes/videos?page=0")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_invalid_sort_key_is_rejected() {
    let app = create_test_router(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[create_test_user(ALICE, "alice")]]),
    );

    let response = app
        .oneshot(
            authed("GET", "/api/v1/videos?sortBy=owner")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Invalid sortBy: owner");
}

#[tokio::test]
async fn test_self_subscription_is_rejected() {
    let app = create_test_router(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[create_test_user(ALICE, "alice")]])
            .append_query_results([[create_test_user(ALICE, "alice")]]),
    );

    let response = app
        .oneshot(
            authed("POST", &format!("/api/v1/subscriptions/c/{ALICE}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
