//! RTC token construction and verification
//!
//! Token layout: `007` + base64url(payload JSON) + `.` + base64url(signature)
//! where the signature is HMAC-SHA256 over the encoded payload, keyed with
//! the application certificate and truncated to 16 bytes.
//!
//! The issuance path only ever calls the build operations; `parse` exists so
//! that token consumers (and tests) can verify a token against the same
//! certificate without the server interpreting tokens it hands out.

use crate::auth::role::RtcRole;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use hmac::{Hmac, Mac};
use rand::Rng;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use thiserror::Error;

/// Version prefix on every issued token
pub const RTC_TOKEN_VERSION: &str = "007";

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("invalid token format")]
    InvalidFormat,

    #[error("invalid token version: expected '{expected}', got '{got}'")]
    InvalidVersion { expected: String, got: String },

    #[error("invalid token signature")]
    InvalidSignature,

    #[error("token encode error: {0}")]
    EncodeError(String),

    #[error("token decode error: {0}")]
    DecodeError(String),
}

/// The principal a token is issued to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "id")]
pub enum Principal {
    /// Numeric uid, kept as the caller's string form
    Uid(String),
    /// Account name
    Account(String),
}

impl Principal {
    pub fn id(&self) -> &str {
        match self {
            Principal::Uid(id) | Principal::Account(id) => id,
        }
    }
}

/// Payload embedded in an issued token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RtcTokenPayload {
    /// Application the token was issued for
    pub app_id: String,
    /// Channel the token grants access to
    pub channel: String,
    /// Who the token is issued to
    pub principal: Principal,
    /// Permission level
    pub role: RtcRole,
    /// Absolute Unix timestamp (whole seconds) after which the token is invalid
    pub expire_at: u64,
    /// Random salt so identical inputs never produce identical tokens
    pub salt: u32,
}

impl RtcTokenPayload {
    /// Verify a token against the application certificate and decode its payload
    pub fn parse(token: &str, app_certificate: &str) -> Result<Self, TokenError> {
        if !token.starts_with(RTC_TOKEN_VERSION) {
            return Err(TokenError::InvalidVersion {
                expected: RTC_TOKEN_VERSION.to_string(),
                got: token.chars().take(3).collect(),
            });
        }

        let content = &token[RTC_TOKEN_VERSION.len()..];
        let parts: Vec<&str> = content.split('.').collect();

        if parts.len() != 2 {
            return Err(TokenError::InvalidFormat);
        }

        let payload_b64 = parts[0];
        let signature_b64 = parts[1];

        // Verify signature
        if signature_b64 != sign(payload_b64, app_certificate)? {
            return Err(TokenError::InvalidSignature);
        }

        // Decode payload
        let payload_json = URL_SAFE_NO_PAD
            .decode(payload_b64)
            .map_err(|e| TokenError::DecodeError(e.to_string()))?;

        serde_json::from_slice(&payload_json).map_err(|e| TokenError::DecodeError(e.to_string()))
    }
}

/// HMAC-SHA256 over the encoded payload, truncated to 16 bytes
fn sign(payload_b64: &str, app_certificate: &str) -> Result<String, TokenError> {
    let mut mac = HmacSha256::new_from_slice(app_certificate.as_bytes())
        .map_err(|e| TokenError::EncodeError(e.to_string()))?;
    mac.update(payload_b64.as_bytes());
    let signature = mac.finalize().into_bytes();
    Ok(URL_SAFE_NO_PAD.encode(&signature[..16]))
}

/// Builds signed, opaque RTC tokens
///
/// Both operations take the same inputs apart from how the principal is
/// addressed, and neither panics; any fault surfaces as a [`TokenError`].
pub struct RtcTokenBuilder;

impl RtcTokenBuilder {
    /// Build a token for a principal addressed by numeric uid
    pub fn build_token_with_uid(
        app_id: &str,
        app_certificate: &str,
        channel: &str,
        uid: &str,
        role: RtcRole,
        expire_at: u64,
    ) -> Result<String, TokenError> {
        Self::build(
            app_id,
            app_certificate,
            channel,
            Principal::Uid(uid.to_string()),
            role,
            expire_at,
        )
    }

    /// Build a token for a principal addressed by account name
    pub fn build_token_with_account(
        app_id: &str,
        app_certificate: &str,
        channel: &str,
        account: &str,
        role: RtcRole,
        expire_at: u64,
    ) -> Result<String, TokenError> {
        Self::build(
            app_id,
            app_certificate,
            channel,
            Principal::Account(account.to_string()),
            role,
            expire_at,
        )
    }

    fn build(
        app_id: &str,
        app_certificate: &str,
        channel: &str,
        principal: Principal,
        role: RtcRole,
        expire_at: u64,
    ) -> Result<String, TokenError> {
        let payload = RtcTokenPayload {
            app_id: app_id.to_string(),
            channel: channel.to_string(),
            principal,
            role,
            expire_at,
            salt: rand::rng().random(),
        };

        let payload_json =
            serde_json::to_vec(&payload).map_err(|e| TokenError::EncodeError(e.to_string()))?;
        let payload_b64 = URL_SAFE_NO_PAD.encode(&payload_json);
        let signature_b64 = sign(&payload_b64, app_certificate)?;

        Ok(format!(
            "{}{}.{}",
            RTC_TOKEN_VERSION, payload_b64, signature_b64
        ))
    }
}
