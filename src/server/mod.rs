//! Token issuance HTTP server

mod error;
mod http;

pub use error::ApiError;
pub use http::{create_router, AppState, TokenRequest, DEFAULT_EXPIRY_SECS};
