//! HTTP Basic authentication
//!
//! Basic credentials are verified lazily by the registry on each resource
//! request, so this handler only renders the token.

use crate::config::Credentials;
use crate::error::{RegistryError, Result};
use crate::registry::challenge::Challenge;
use crate::registry::schemes::SchemeHandler;
use crate::registry::token::{BasicToken, Token};
use async_trait::async_trait;

#[derive(Debug, Clone, Copy, Default)]
pub struct BasicScheme;

#[async_trait]
impl SchemeHandler for BasicScheme {
    fn name(&self) -> &'static str {
        "Basic"
    }

    async fn request_token(&self, challenge: &Challenge, credentials: &Credentials) -> Result<Token> {
        if challenge.realm().is_none() {
            return Err(RegistryError::MissingParameter {
                scheme: "Basic",
                parameter: "realm",
            });
        }

        Ok(Token::Basic(BasicToken::new(
            &credentials.username,
            &credentials.password,
        )))
    }
}
