//! Authentication negotiation for Docker Registry HTTP API V2
//!
//! [`Auth::authenticate`] probes the registry without credentials, parses the
//! `Www-Authenticate` challenge it answers with and completes the matching
//! scheme handshake. There is no retry and no token caching at this layer.

use crate::config::{ClientConfig, Credentials};
use crate::error::{RegistryError, Result};
use crate::logging::Logger;
use crate::registry::challenge::{AuthScheme, Challenge};
use crate::registry::schemes::{BasicScheme, BearerScheme, NoneScheme, SchemeHandler};
use crate::registry::token::Token;
use reqwest::Client;
use reqwest::header::WWW_AUTHENTICATE;

#[derive(Debug, Clone)]
pub struct Auth {
    client: Client,
    output: Logger,
}

impl Auth {
    pub fn new(client: Client, output: Logger) -> Self {
        Self { client, output }
    }

    /// Build the HTTP client used for probes and token exchanges
    pub fn build_client(config: &ClientConfig) -> Result<Client> {
        let mut builder = Client::builder().timeout(config.timeout);
        if config.skip_tls {
            builder = builder
                .danger_accept_invalid_certs(true)
                .danger_accept_invalid_hostnames(true);
        }

        builder
            .build()
            .map_err(|e| RegistryError::Network(format!("Failed to create auth client: {}", e)))
    }

    /// Probe `probe_url` and complete whatever handshake the registry asks for
    pub async fn authenticate(&self, probe_url: &str, credentials: &Credentials) -> Result<Token> {
        let challenge = self.get_auth_challenge(probe_url).await?;
        let scheme: AuthScheme = challenge.scheme.parse()?;

        self.output.verbose(&format!(
            "Auth challenge received: scheme={}, realm={}",
            scheme,
            challenge.realm().unwrap_or("<none>")
        ));

        let handler = self.handler_for(scheme);
        self.output
            .detail(&format!("Dispatching to {} handler", handler.name()));
        let token = handler.request_token(&challenge, credentials).await?;

        match token {
            Token::None => self.output.verbose("No authentication required by registry"),
            _ => self.output.verbose(&format!(
                "{} authentication token obtained",
                token.method()
            )),
        }

        Ok(token)
    }

    fn handler_for(&self, scheme: AuthScheme) -> Box<dyn SchemeHandler> {
        match scheme {
            AuthScheme::None => Box::new(NoneScheme),
            AuthScheme::Basic => Box::new(BasicScheme),
            AuthScheme::Bearer => Box::new(BearerScheme::new(
                self.client.clone(),
                self.output.clone(),
            )),
        }
    }

    async fn get_auth_challenge(&self, probe_url: &str) -> Result<Challenge> {
        self.output
            .detail(&format!("Sending auth challenge request to {}", probe_url));

        let response = self.client.get(probe_url).send().await.map_err(|e| {
            RegistryError::Network(format!("Failed to get auth challenge: {}", e))
        })?;

        self.output
            .detail(&format!("Auth challenge response status: {}", response.status()));

        let header_lines = response
            .headers()
            .get_all(WWW_AUTHENTICATE)
            .iter()
            .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
            .collect::<Vec<_>>();

        if let Some(line) = header_lines.first() {
            self.output.detail(&format!("Parsing auth header: {}", line));
        }

        Challenge::parse(&header_lines)
    }
}
