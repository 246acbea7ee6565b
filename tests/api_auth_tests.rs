// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Authentication tests for protected API routes.
//!
//! Run with: cargo test --test api_auth_tests

mod common;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use common::{body_json, create_test_app, create_test_jwt, create_test_jwt_with_exp};
use tower::ServiceExt;

#[tokio::test]
async fn test_protected_routes_require_auth() {
    let (app, _) = create_test_app();

    for (method, uri) in [
        ("GET", "/api/me"),
        ("PUT", "/api/me"),
        ("DELETE", "/api/account"),
        ("GET", "/api/exercises"),
        ("POST", "/api/exercises"),
        ("GET", "/api/exercises/abc"),
        ("GET", "/api/library"),
        ("GET", "/api/templates"),
        ("POST", "/api/templates/prebuilt-strength-5x5/use"),
        ("GET", "/api/stats/overview"),
        ("GET", "/api/stats/records"),
        ("GET", "/api/stats/progress?name=Squat"),
    ] {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response.status(),
            StatusCode::UNAUTHORIZED,
            "{} {} should require auth",
            method,
            uri
        );
    }
}

#[tokio::test]
async fn test_missing_token_reports_unauthorized() {
    let (app, _) = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/library")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["error"], "unauthorized");
}

#[tokio::test]
async fn test_invalid_token_rejected() {
    let (app, _) = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/library")
                .header(header::AUTHORIZATION, "Bearer not-a-jwt")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["error"], "invalid_token");
}

#[tokio::test]
async fn test_token_signed_with_wrong_key_rejected() {
    let (app, _) = create_test_app();
    let token = create_test_jwt("user_1", b"some_other_key_that_is_32_bytes!");

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/library")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_expired_token_rejected() {
    let (app, state) = create_test_app();
    let token = create_test_jwt_with_exp("user_1", &state.config.session_signing_key, -3600);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/library")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_valid_bearer_token_reaches_library() {
    let (app, state) = create_test_app();
    let token = create_test_jwt("user_1", &state.config.session_signing_key);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/library")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CACHE_CONTROL).unwrap(),
        "private, max-age=3600"
    );
    assert_eq!(
        response.headers().get("x-content-type-options").unwrap(),
        "nosniff"
    );

    let json = body_json(response).await;
    let total = json["total"].as_u64().unwrap();
    assert!(total > 0);
    assert_eq!(json["exercises"].as_array().unwrap().len() as u64, total);
}

#[tokio::test]
async fn test_valid_session_cookie_reaches_library() {
    let (app, state) = create_test_app();
    let token = create_test_jwt("user_1", &state.config.session_signing_key);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/library?category=cardio")
                .header(header::COOKIE, format!("session_token={}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["exercises"]
        .as_array()
        .unwrap()
        .iter()
        .all(|item| item["category"] == "cardio"));
}

#[tokio::test]
async fn test_prebuilt_template_use_needs_no_database() {
    let (app, state) = create_test_app();
    let token = create_test_jwt("user_1", &state.config.session_signing_key);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/templates/prebuilt-strength-5x5/use")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["id"], "prebuilt-strength-5x5");
    assert_eq!(json["is_prebuilt"], true);
}

#[tokio::test]
async fn test_health_is_public() {
    let (app, _) = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert!(json["library_exercises"].as_u64().unwrap() > 0);
    assert_eq!(json["prebuilt_templates"], 3);
}

#[tokio::test]
async fn test_cors_preflight_for_frontend_origin() {
    let (app, _) = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/api/exercises")
                .header(header::ORIGIN, "http://localhost:5173")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        "http://localhost:5173"
    );
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS)
            .unwrap(),
        "true"
    );
}

#[tokio::test]
async fn test_cors_rejects_unknown_origin() {
    let (app, _) = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/api/exercises")
                .header(header::ORIGIN, "https://evil.example.com")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .is_none());
}
