//! Uniform token produced by authentication negotiation
//!
//! Whatever scheme the registry asked for, callers get a [`Token`] that knows
//! its scheme name, renders the `Authorization` header value and reports how
//! long it stays valid.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::RequestBuilder;
use reqwest::header::AUTHORIZATION;
use std::fmt;
use std::time::{Duration, Instant};

/// `expires_in` value of tokens that never expire
pub const NON_EXPIRING: i64 = -1;

/// Lifetime assumed for bearer tokens whose issuer omits `expires_in`
pub const DEFAULT_BEARER_EXPIRES_IN: i64 = 60;

/// Static credentials rendered for HTTP Basic authentication
#[derive(Clone, PartialEq, Eq)]
pub struct BasicToken {
    encoded: String,
}

impl BasicToken {
    pub fn new(username: &str, password: &str) -> Self {
        Self {
            encoded: STANDARD.encode(format!("{}:{}", username, password)),
        }
    }

    /// Base64 of `username:password`
    pub fn encoded(&self) -> &str {
        &self.encoded
    }
}

/// Token issued by a separate authority after a bearer exchange
#[derive(Clone)]
pub struct BearerToken {
    token: String,
    expires_in: i64,
    issued_at: Instant,
}

impl BearerToken {
    pub fn new(token: impl Into<String>, expires_in: Option<i64>) -> Self {
        Self {
            token: token.into(),
            expires_in: expires_in
                .map(|secs| secs.max(0))
                .unwrap_or(DEFAULT_BEARER_EXPIRES_IN),
            issued_at: Instant::now(),
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn expires_in(&self) -> i64 {
        self.expires_in
    }

    /// Whether the declared lifetime has elapsed since the token was issued
    pub fn is_expired(&self) -> bool {
        self.issued_at.elapsed() >= Duration::from_secs(self.expires_in as u64)
    }
}

#[derive(Clone)]
pub enum Token {
    /// Anonymous access, no credential material
    None,
    Basic(BasicToken),
    Bearer(BearerToken),
}

impl Token {
    /// Scheme that produced this token
    pub fn method(&self) -> &'static str {
        match self {
            Token::None => "None",
            Token::Basic(_) => "Basic",
            Token::Bearer(_) => "Bearer",
        }
    }

    /// Seconds of validity, or [`NON_EXPIRING`]
    pub fn expires_in(&self) -> i64 {
        match self {
            Token::None | Token::Basic(_) => NON_EXPIRING,
            Token::Bearer(bearer) => bearer.expires_in(),
        }
    }

    pub fn is_expired(&self) -> bool {
        match self {
            Token::None | Token::Basic(_) => false,
            Token::Bearer(bearer) => bearer.is_expired(),
        }
    }

    /// Attach this token to an outgoing request
    pub fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self {
            Token::None => request,
            _ => request.header(AUTHORIZATION, self.to_string()),
        }
    }
}

/// Renders the literal `Authorization` header value; empty for [`Token::None`]
impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::None => Ok(()),
            Token::Basic(basic) => write!(f, "Basic {}", basic.encoded),
            Token::Bearer(bearer) => write!(f, "Bearer {}", bearer.token),
        }
    }
}

// Token material stays out of debug output.
impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token")
            .field("method", &self.method())
            .field("expires_in", &self.expires_in())
            .finish()
    }
}
