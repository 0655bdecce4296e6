//! Scheme-specific handshakes
//!
//! Each handler turns a parsed [`Challenge`] plus [`Credentials`] into a
//! [`Token`]. Only the bearer handler touches the network.

pub mod basic;
pub mod bearer;
pub mod none;

use crate::config::Credentials;
use crate::error::Result;
use crate::registry::challenge::Challenge;
use crate::registry::token::Token;
use async_trait::async_trait;

pub use basic::BasicScheme;
pub use bearer::BearerScheme;
pub use none::NoneScheme;

#[async_trait]
pub trait SchemeHandler: Send + Sync {
    /// Scheme name this handler answers to
    fn name(&self) -> &'static str;

    /// Complete the handshake and produce a token
    async fn request_token(&self, challenge: &Challenge, credentials: &Credentials)
        -> Result<Token>;
}
