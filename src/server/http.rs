//! Token issuance routes
//!
//! Requests are stateless; the only shared state is the immutable [`Config`]
//! behind an `Arc`. Validation happens before anything touches the builder,
//! so an invalid request never reaches it.

use crate::auth::{RtcRole, RtcTokenBuilder, TokenType};
use crate::config::Config;
use crate::server::error::ApiError;
use axum::extract::{Path, Query, Request, State};
use axum::http::{header, HeaderValue};
use axum::middleware::{from_fn, Next};
use axum::response::Response;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tower_http::trace::TraceLayer;
use tracing::debug;

/// Token lifetime in seconds when the caller does not pass `expiry`
pub const DEFAULT_EXPIRY_SECS: u64 = 3600;

/// State shared by all handlers
pub struct AppState {
    pub config: Config,
}

/// Build the router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(welcome))
        .route("/health", get(health))
        .route(
            "/token/{channel}/{role}/{token_type}/{uid}",
            get(issue_token).layer(from_fn(nocache)),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn welcome() -> Json<&'static str> {
    Json("Welcome to the RTC token server")
}

async fn health() -> &'static str {
    "ok"
}

/// Disable caching and allow cross-origin reads on every token response,
/// success or failure
async fn nocache(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static("private, no-cache, no-store, must-revalidate"),
    );
    headers.insert(header::EXPIRES, HeaderValue::from_static("-1"));
    headers.insert(header::PRAGMA, HeaderValue::from_static("no-cache"));
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    response
}

#[derive(Deserialize)]
struct TokenPath {
    channel: String,
    role: String,
    token_type: String,
    uid: String,
}

#[derive(Deserialize)]
struct TokenQuery {
    expiry: Option<String>,
}

#[derive(Serialize)]
struct TokenResponse {
    #[serde(rename = "rtcToken")]
    rtc_token: String,
}

/// A fully validated token request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenRequest {
    pub channel: String,
    pub uid: String,
    pub role: RtcRole,
    pub token_type: TokenType,
    pub expiry_secs: u64,
}

impl TokenRequest {
    /// Fail-fast validation; the first failing check wins
    pub fn validate(
        channel: &str,
        role: &str,
        token_type: &str,
        uid: &str,
        expiry: Option<&str>,
    ) -> Result<Self, ApiError> {
        if channel.is_empty() {
            return Err(ApiError::MissingChannel);
        }

        if uid.is_empty() {
            return Err(ApiError::MissingUid);
        }

        let role = RtcRole::parse(role).ok_or(ApiError::InvalidRole)?;

        let token_type = TokenType::parse(token_type).ok_or(ApiError::InvalidTokenType)?;

        // Absent or empty means the default; anything else must be a
        // positive decimal integer
        let expiry_secs = match expiry {
            None | Some("") => DEFAULT_EXPIRY_SECS,
            Some(raw) => raw
                .parse::<u64>()
                .ok()
                .filter(|v| *v > 0)
                .ok_or(ApiError::InvalidExpiry)?,
        };

        Ok(Self {
            channel: channel.to_string(),
            uid: uid.to_string(),
            role,
            token_type,
            expiry_secs,
        })
    }
}

/// Current wall-clock time in whole seconds since the Unix epoch
fn now_unix() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

async fn issue_token(
    State(state): State<Arc<AppState>>,
    Path(path): Path<TokenPath>,
    Query(query): Query<TokenQuery>,
) -> Result<Json<TokenResponse>, ApiError> {
    let req = TokenRequest::validate(
        &path.channel,
        &path.role,
        &path.token_type,
        &path.uid,
        query.expiry.as_deref(),
    )?;

    // Saturate so an enormous expiry cannot wrap the timestamp
    let expire_at = now_unix().saturating_add(req.expiry_secs);

    debug!(
        channel = %req.channel,
        role = %req.role,
        token_type = %req.token_type,
        expire_at,
        "issuing token"
    );

    let config = &state.config;
    let token = match req.token_type {
        TokenType::Uid => RtcTokenBuilder::build_token_with_uid(
            &config.app_id,
            &config.app_certificate,
            &req.channel,
            &req.uid,
            req.role,
            expire_at,
        ),
        TokenType::UserAccount => RtcTokenBuilder::build_token_with_account(
            &config.app_id,
            &config.app_certificate,
            &req.channel,
            &req.uid,
            req.role,
            expire_at,
        ),
    }
    .map_err(|e| ApiError::TokenBuildFailure(e.to_string()))?;

    Ok(Json(TokenResponse { rtc_token: token }))
}
