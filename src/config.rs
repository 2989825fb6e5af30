//! Process configuration
//!
//! Loaded once at startup and passed into handlers by reference; business
//! logic never reads the environment directly.

use std::env;
use std::fmt;
use tracing::warn;

/// Immutable process configuration
#[derive(Clone)]
pub struct Config {
    /// Application identifier embedded in every issued token
    pub app_id: String,
    /// Application secret the token builder signs with
    pub app_certificate: String,
    /// HTTP listen port
    pub port: u16,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Missing credentials are tolerated so existing deployments keep their
    /// behavior, but tokens signed with an empty certificate will not verify
    /// anywhere, so a warning is logged.
    pub fn from_env() -> anyhow::Result<Self> {
        let app_id = env::var("APP_ID").unwrap_or_default();
        let app_certificate = env::var("APP_CERTIFICATE").unwrap_or_default();

        if app_id.is_empty() || app_certificate.is_empty() {
            warn!("APP_ID or APP_CERTIFICATE not set; issued tokens will not verify");
        }

        let port = env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()?;

        Ok(Self {
            app_id,
            app_certificate,
            port,
        })
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("app_id", &self.app_id)
            .field("app_certificate", &"[REDACTED]")
            .field("port", &self.port)
            .finish()
    }
}
