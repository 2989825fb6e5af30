//! HTTP-level tests for the token issuance routes
//!
//! These drive the router directly with `tower::ServiceExt::oneshot`, so no
//! listener is bound and every test injects its own fake credentials.

use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use http_body_util::BodyExt;
use rtc_token_server::auth::{Principal, RtcRole, RtcTokenPayload};
use rtc_token_server::server::{create_router, AppState};
use rtc_token_server::Config;
use serde_json::Value;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tower::ServiceExt;

const TEST_APP_ID: &str = "test-app-id";
const TEST_CERT: &str = "test-app-certificate";

fn test_router() -> axum::Router {
    let config = Config {
        app_id: TEST_APP_ID.to_string(),
        app_certificate: TEST_CERT.to_string(),
        port: 0,
    };
    create_router(Arc::new(AppState { config }))
}

async fn get(uri: &str) -> (StatusCode, HeaderMap, Value) {
    let response = test_router()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let headers = response.headers().clone();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&body).unwrap();
    (status, headers, json)
}

fn now_unix() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs()
}

fn assert_nocache_headers(headers: &HeaderMap) {
    assert_eq!(
        headers.get("cache-control").unwrap(),
        "private, no-cache, no-store, must-revalidate"
    );
    assert_eq!(headers.get("expires").unwrap(), "-1");
    assert_eq!(headers.get("pragma").unwrap(), "no-cache");
    assert_eq!(headers.get("access-control-allow-origin").unwrap(), "*");
}

#[tokio::test]
async fn test_welcome() {
    let (status, _, body) = get("/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_str().unwrap().contains("Welcome"));
}

#[tokio::test]
async fn test_health() {
    let response = test_router()
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&body[..], b"ok");
}

#[tokio::test]
async fn test_token_with_uid_default_expiry() {
    let before = now_unix();
    let (status, headers, body) = get("/token/room1/publisher/uid/42").await;
    let after = now_unix();

    assert_eq!(status, StatusCode::OK);
    assert_nocache_headers(&headers);

    let token = body["rtcToken"].as_str().unwrap();
    assert!(!token.is_empty());

    let payload = RtcTokenPayload::parse(token, TEST_CERT).unwrap();
    assert_eq!(payload.app_id, TEST_APP_ID);
    assert_eq!(payload.channel, "room1");
    assert_eq!(payload.principal, Principal::Uid("42".to_string()));
    assert_eq!(payload.role, RtcRole::Publisher);
    assert!(payload.expire_at >= before + 3600);
    assert!(payload.expire_at <= after + 3600);
}

#[tokio::test]
async fn test_token_with_account_explicit_expiry() {
    let before = now_unix();
    let (status, _, body) = get("/token/room1/audience/userAccount/alice?expiry=60").await;
    let after = now_unix();

    assert_eq!(status, StatusCode::OK);

    let token = body["rtcToken"].as_str().unwrap();
    let payload = RtcTokenPayload::parse(token, TEST_CERT).unwrap();
    assert_eq!(payload.channel, "room1");
    assert_eq!(payload.principal, Principal::Account("alice".to_string()));
    assert_eq!(payload.role, RtcRole::Audience);
    assert!(payload.expire_at >= before + 60);
    assert!(payload.expire_at <= after + 60);
}

#[tokio::test]
async fn test_empty_expiry_falls_back_to_default() {
    let before = now_unix();
    let (status, _, body) = get("/token/room1/publisher/uid/42?expiry=").await;

    assert_eq!(status, StatusCode::OK);
    let payload = RtcTokenPayload::parse(body["rtcToken"].as_str().unwrap(), TEST_CERT).unwrap();
    assert!(payload.expire_at >= before + 3600);
}

#[tokio::test]
async fn test_huge_expiry_saturates() {
    // u64::MAX passes validation; the expiry timestamp must clamp instead
    // of wrapping into the past
    let (status, _, body) = get("/token/room1/publisher/uid/42?expiry=18446744073709551615").await;

    assert_eq!(status, StatusCode::OK);
    let payload = RtcTokenPayload::parse(body["rtcToken"].as_str().unwrap(), TEST_CERT).unwrap();
    assert_eq!(payload.expire_at, u64::MAX);
}

#[tokio::test]
async fn test_invalid_role() {
    let (status, headers, body) = get("/token/room1/moderator/uid/42").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "role is incorrect");
    // Error responses carry the same headers as successes
    assert_nocache_headers(&headers);
}

#[tokio::test]
async fn test_invalid_token_type() {
    let (status, _, body) = get("/token/room1/publisher/jwt/42").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "token type is invalid");
}

#[tokio::test]
async fn test_invalid_expiry() {
    let (status, _, body) = get("/token/room1/publisher/uid/42?expiry=soon").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "expiry is invalid");
}

#[tokio::test]
async fn test_repeated_requests_yield_distinct_tokens() {
    let (_, _, first) = get("/token/room1/publisher/uid/42").await;
    let (_, _, second) = get("/token/room1/publisher/uid/42").await;

    let a = first["rtcToken"].as_str().unwrap();
    let b = second["rtcToken"].as_str().unwrap();
    assert_ne!(a, b);

    // Both verify under the builder's own contract
    assert!(RtcTokenPayload::parse(a, TEST_CERT).is_ok());
    assert!(RtcTokenPayload::parse(b, TEST_CERT).is_ok());
}

#[tokio::test]
async fn test_token_is_opaque_to_other_certificates() {
    let (_, _, body) = get("/token/room1/publisher/uid/42").await;
    let token = body["rtcToken"].as_str().unwrap();
    assert!(RtcTokenPayload::parse(token, "some-other-cert").is_err());
}
