mod support;

use lowdraw_web::{IntoErrorResponse, SessionError, SessionManager, SettingsStore};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use support::{create, routes, send};
use warp::http::StatusCode;

#[tokio::test]
async fn illegal_action_is_400_with_details() {
    let (_ctx, routes) = routes();
    let id = create(&routes, json!({ "seed": 1 })).await;

    let (status, body) = send(
        &routes,
        "POST",
        &format!("/api/sessions/{id}/actions"),
        Some(json!({ "action": "check" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "illegal_action");
    assert_eq!(body["details"]["seat"], "player");
    assert_eq!(body["details"]["action"], "check");
}

#[tokio::test]
async fn oversized_stacks_are_rejected_at_creation() {
    let (ctx, routes) = routes();
    let (status, body) = send(
        &routes,
        "POST",
        "/api/sessions",
        Some(json!({ "player_stack": 4294967295u64 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_config");
    assert!(ctx.sessions().active_sessions().is_empty());
}

#[tokio::test]
async fn unknown_action_word_is_invalid_request() {
    let (_ctx, routes) = routes();
    let id = create(&routes, json!({})).await;

    let (status, body) = send(
        &routes,
        "POST",
        &format!("/api/sessions/{id}/actions"),
        Some(json!({ "action": "shove" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_request");
}

#[tokio::test]
async fn discard_outside_draw_phase_is_409() {
    let (_ctx, routes) = routes();
    let id = create(&routes, json!({ "seed": 5 })).await;

    let (status, body) = send(
        &routes,
        "POST",
        &format!("/api/sessions/{id}/discard"),
        Some(json!({ "keep_indexes": [0, 1] })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "invalid_state");
}

#[tokio::test]
async fn out_of_range_discard_is_400() {
    let (_ctx, routes) = routes();
    let id = create(&routes, json!({ "seed": 6 })).await;
    let (status, body) = send(
        &routes,
        "POST",
        &format!("/api/sessions/{id}/actions"),
        Some(json!({ "action": "call" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["state"]["draw_phase"], true);

    let (status, body) = send(
        &routes,
        "POST",
        &format!("/api/sessions/{id}/discard"),
        Some(json!({ "keep_indexes": [0, 7] })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_discard");
}

#[tokio::test]
async fn showdown_before_the_last_round_is_409() {
    let (_ctx, routes) = routes();
    let id = create(&routes, json!({ "seed": 8 })).await;

    let (status, body) = send(&routes, "POST", &format!("/api/sessions/{id}/showdown"), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "invalid_state");
}

#[tokio::test]
async fn next_hand_while_in_progress_is_409() {
    let (_ctx, routes) = routes();
    let id = create(&routes, json!({ "seed": 9 })).await;

    let (status, body) = send(&routes, "POST", &format!("/api/sessions/{id}/hands"), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "invalid_state");
}

#[tokio::test]
async fn short_stacks_are_rejected() {
    let (_ctx, routes) = routes();
    let (status, body) = send(
        &routes,
        "POST",
        "/api/sessions",
        Some(json!({ "player_stack": 20 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "insufficient_chips");
    assert_eq!(body["details"]["required"], 48);
}

#[tokio::test]
async fn malformed_body_is_rejected() {
    let (_ctx, routes) = routes();
    let response = warp::test::request()
        .method("POST")
        .path("/api/sessions")
        .header("content-type", "application/json")
        .body("{not json")
        .reply(&routes)
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_session_is_404() {
    let (_ctx, routes) = routes();
    let (status, body) = send(&routes, "GET", "/api/sessions/nope/state", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["details"]["session_id"], "nope");
}

#[tokio::test]
async fn idle_session_is_gone_then_not_found() {
    let settings = Arc::new(SettingsStore::new());
    let sessions = Arc::new(SessionManager::with_ttl(settings.clone(), Duration::ZERO));
    let ctx = lowdraw_web::AppContext::new_with_dependencies(
        lowdraw_web::ServerConfig::for_tests(),
        sessions,
        settings,
    );
    let routes = lowdraw_web::WebServer::routes(&ctx);
    let id = create(&routes, json!({})).await;
    tokio::time::sleep(Duration::from_millis(5)).await;

    let (status, body) = send(&routes, "GET", &format!("/api/sessions/{id}/state"), None).await;
    assert_eq!(status, StatusCode::GONE);
    assert_eq!(body["error"], "session_expired");

    let (status, _) = send(&routes, "GET", &format!("/api/sessions/{id}/state"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[test]
fn storage_errors_are_critical() {
    let err = SessionError::StoragePoisoned;
    assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(err.severity(), lowdraw_web::ErrorSeverity::Critical);
}
