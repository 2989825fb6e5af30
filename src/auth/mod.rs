//! Token parameters and construction
//!
//! Roles:
//! - `publisher`: may send media into a channel
//! - `audience`: may only receive
//!
//! Token types:
//! - `uid`: principal addressed by a numeric uid
//! - `userAccount`: principal addressed by an account name

mod builder;
mod role;

pub use builder::{Principal, RtcTokenBuilder, RtcTokenPayload, TokenError, RTC_TOKEN_VERSION};
pub use role::{RtcRole, TokenType};
