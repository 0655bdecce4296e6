//! Anonymous access

use crate::config::Credentials;
use crate::error::Result;
use crate::registry::challenge::Challenge;
use crate::registry::schemes::SchemeHandler;
use crate::registry::token::Token;
use async_trait::async_trait;

#[derive(Debug, Clone, Copy, Default)]
pub struct NoneScheme;

#[async_trait]
impl SchemeHandler for NoneScheme {
    fn name(&self) -> &'static str {
        "None"
    }

    async fn request_token(&self, _challenge: &Challenge, _credentials: &Credentials) -> Result<Token> {
        Ok(Token::None)
    }
}
