//! Closed enums for the request parameters
//!
//! Both enums are parsed once at the request boundary; nothing downstream
//! ever sees a raw role or token-type string.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Permission level granted by an issued token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RtcRole {
    /// May publish media into the channel
    Publisher,
    /// May only receive media
    Audience,
}

impl RtcRole {
    /// Parse the exact wire literal; anything else is rejected
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "publisher" => Some(RtcRole::Publisher),
            "audience" => Some(RtcRole::Audience),
            _ => None,
        }
    }
}

impl fmt::Display for RtcRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RtcRole::Publisher => write!(f, "publisher"),
            RtcRole::Audience => write!(f, "audience"),
        }
    }
}

/// How the principal in a token request is addressed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TokenType {
    /// Numeric uid
    Uid,
    /// String account name
    UserAccount,
}

impl TokenType {
    /// Parse the exact wire literal; anything else is rejected
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "uid" => Some(TokenType::Uid),
            "userAccount" => Some(TokenType::UserAccount),
            _ => None,
        }
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenType::Uid => write!(f, "uid"),
            TokenType::UserAccount => write!(f, "userAccount"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse() {
        assert_eq!(RtcRole::parse("publisher"), Some(RtcRole::Publisher));
        assert_eq!(RtcRole::parse("audience"), Some(RtcRole::Audience));
        assert_eq!(RtcRole::parse("moderator"), None);
        // Exact literals only
        assert_eq!(RtcRole::parse("Publisher"), None);
        assert_eq!(RtcRole::parse(""), None);
    }

    #[test]
    fn test_token_type_parse() {
        assert_eq!(TokenType::parse("uid"), Some(TokenType::Uid));
        assert_eq!(TokenType::parse("userAccount"), Some(TokenType::UserAccount));
        assert_eq!(TokenType::parse("useraccount"), None);
        assert_eq!(TokenType::parse("account"), None);
    }

    #[test]
    fn test_display_round_trip() {
        for role in [RtcRole::Publisher, RtcRole::Audience] {
            assert_eq!(RtcRole::parse(&role.to_string()), Some(role));
        }
        for tt in [TokenType::Uid, TokenType::UserAccount] {
            assert_eq!(TokenType::parse(&tt.to_string()), Some(tt));
        }
    }
}
