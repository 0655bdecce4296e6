//! OAuth2-style bearer token exchange
//!
//! The registry names a token issuer in `realm`; we ask it for a token scoped
//! by `service` and `scope`, presenting the credentials as HTTP Basic when we
//! have any. Anonymous requests rely on the issuer granting a limited token.

use crate::config::Credentials;
use crate::error::handlers::HttpErrorHandler;
use crate::error::{RegistryError, Result};
use crate::logging::Logger;
use crate::registry::challenge::Challenge;
use crate::registry::schemes::SchemeHandler;
use crate::registry::token::{BearerToken, Token};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use url::Url;

/// Challenge parameters forwarded to the issuer as query parameters
const FORWARDED_PARAMS: [&str; 2] = ["service", "scope"];

#[derive(Debug, Deserialize)]
struct TokenResponse {
    token: Option<String>,
    access_token: Option<String>,
    expires_in: Option<i64>,
}

impl TokenResponse {
    fn into_token(self) -> Option<String> {
        self.token
            .filter(|t| !t.is_empty())
            .or(self.access_token.filter(|t| !t.is_empty()))
    }
}

#[derive(Debug, Clone)]
pub struct BearerScheme {
    client: Client,
    output: Logger,
}

impl BearerScheme {
    pub fn new(client: Client, output: Logger) -> Self {
        Self { client, output }
    }

    fn query_params<'a>(challenge: &'a Challenge) -> Vec<(&'static str, &'a str)> {
        FORWARDED_PARAMS
            .iter()
            .filter_map(|name| challenge.param(name).map(|value| (*name, value)))
            .collect()
    }

    /// The realm must be an absolute http(s) URL
    fn issuer_url(realm: &str) -> Result<Url> {
        let issuer = Url::parse(realm).map_err(|e| {
            RegistryError::Parse(format!("Invalid token realm '{}': {}", realm, e))
        })?;

        match issuer.scheme() {
            "http" | "https" => Ok(issuer),
            other => Err(RegistryError::Parse(format!(
                "Unsupported token realm scheme '{}' in '{}'",
                other, realm
            ))),
        }
    }

    fn decode_response(body: &str) -> Result<BearerToken> {
        let response: TokenResponse = serde_json::from_str(body).map_err(|e| {
            RegistryError::Decode(format!("Failed to parse token response: {}", e))
        })?;

        let expires_in = response.expires_in;
        let token = response.into_token().ok_or_else(|| {
            RegistryError::Decode("Token response has no 'token' or 'access_token' field".to_string())
        })?;

        Ok(BearerToken::new(token, expires_in))
    }
}

#[async_trait]
impl SchemeHandler for BearerScheme {
    fn name(&self) -> &'static str {
        "Bearer"
    }

    async fn request_token(&self, challenge: &Challenge, credentials: &Credentials) -> Result<Token> {
        let realm = challenge.realm().ok_or(RegistryError::MissingParameter {
            scheme: "Bearer",
            parameter: "realm",
        })?;

        let issuer = Self::issuer_url(realm)?;

        let query = Self::query_params(challenge);
        self.output.detail(&format!(
            "Requesting token from: {} with {:?}",
            issuer, query
        ));

        let mut request = self.client.get(issuer).query(&query);
        if !credentials.is_anonymous() {
            self.output.detail(&format!(
                "Presenting credentials for user: {}",
                credentials.username
            ));
            request = request.basic_auth(&credentials.username, Some(&credentials.password));
        } else {
            self.output.detail("Requesting anonymous token");
        }

        let response = request.send().await.map_err(|e| {
            RegistryError::Network(format!("Failed to reach token issuer {}: {}", realm, e))
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            RegistryError::Network(format!("Failed to read token response: {}", e))
        })?;

        if status != StatusCode::OK {
            self.output.error(&format!(
                "Token request failed with status {}",
                status
            ));
            return Err(HttpErrorHandler::handle_auth_error(status, &body));
        }

        self.output.detail("Token request successful, parsing response");
        let bearer = Self::decode_response(&body)?;
        self.output.detail(&format!(
            "Token obtained (length: {} chars, expires in {}s)",
            bearer.token().len(),
            bearer.expires_in()
        ));

        Ok(Token::Bearer(bearer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::token::DEFAULT_BEARER_EXPIRES_IN;

    #[test]
    fn test_decode_token_field() {
        let token = BearerScheme::decode_response(r#"{"token":"abc","expires_in":60}"#).unwrap();
        assert_eq!(token.token(), "abc");
        assert_eq!(token.expires_in(), 60);
    }

    #[test]
    fn test_decode_access_token_field() {
        let token = BearerScheme::decode_response(r#"{"access_token":"xyz"}"#).unwrap();
        assert_eq!(token.token(), "xyz");
        assert_eq!(token.expires_in(), DEFAULT_BEARER_EXPIRES_IN);
    }

    #[test]
    fn test_decode_prefers_token_over_access_token() {
        let token =
            BearerScheme::decode_response(r#"{"token":"a","access_token":"b"}"#).unwrap();
        assert_eq!(token.token(), "a");

        let token =
            BearerScheme::decode_response(r#"{"token":"","access_token":"b"}"#).unwrap();
        assert_eq!(token.token(), "b");
    }

    #[test]
    fn test_decode_failures() {
        assert!(matches!(
            BearerScheme::decode_response("<html>nope</html>"),
            Err(RegistryError::Decode(_))
        ));
        assert!(matches!(
            BearerScheme::decode_response(r#"{"expires_in":60}"#),
            Err(RegistryError::Decode(_))
        ));
    }

    #[test]
    fn test_only_present_params_are_forwarded() {
        let challenge =
            Challenge::parse(&[r#"Bearer realm="https://auth/token",service="reg""#]).unwrap();
        assert_eq!(BearerScheme::query_params(&challenge), vec![("service", "reg")]);
    }

    #[test]
    fn test_realm_must_be_http_url() {
        assert!(BearerScheme::issuer_url("https://auth.example/token").is_ok());
        assert!(matches!(
            BearerScheme::issuer_url("not a url"),
            Err(RegistryError::Parse(_))
        ));
        assert!(matches!(
            BearerScheme::issuer_url("ftp://auth.example/token"),
            Err(RegistryError::Parse(_))
        ));
    }

    #[tokio::test]
    async fn test_invalid_realm_is_parse_error() {
        let scheme = BearerScheme::new(Client::new(), Logger::new_quiet());
        let challenge = Challenge::parse(&[r#"Bearer realm="not a url",service="x""#]).unwrap();
        let err = scheme
            .request_token(&challenge, &Credentials::anonymous())
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::Parse(_)));
    }

    #[tokio::test]
    async fn test_missing_realm() {
        let scheme = BearerScheme::new(Client::new(), Logger::new_quiet());
        let challenge = Challenge::parse(&[r#"Bearer service="reg""#]).unwrap();
        let err = scheme
            .request_token(&challenge, &Credentials::anonymous())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            RegistryError::MissingParameter { scheme: "Bearer", parameter: "realm" }
        ));
    }
}
