//! RTC token issuance server
//!
//! A minimal HTTP service that issues time-limited access tokens for a
//! real-time communication platform. Request parameters are validated at
//! the boundary; token construction lives in [`auth`] and is treated as
//! opaque everywhere else.

pub mod auth;
pub mod config;
pub mod server;

pub use auth::{RtcRole, RtcTokenBuilder, TokenType};
pub use config::Config;
pub use server::{create_router, AppState};
