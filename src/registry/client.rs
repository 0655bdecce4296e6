//! Registry client holding the session token
//!
//! The client owns the registry address and its [`ClientConfig`], runs the
//! negotiation on [`RegistryClient::login`] and signs later requests with the
//! token it obtained. The token is replaced wholesale on every successful
//! login, so readers never observe a half-updated value. For the same reason
//! a poisoned token lock still holds a whole token and is read through.

use crate::config::{ClientConfig, Credentials};
use crate::error::handlers::HttpErrorHandler;
use crate::error::{RegistryError, Result};
use crate::logging::Logger;
use crate::registry::auth::Auth;
use crate::registry::token::Token;
use reqwest::{Client, RequestBuilder, StatusCode};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

pub struct RegistryClientBuilder {
    registry: String,
    config: ClientConfig,
    output: Logger,
}

impl RegistryClientBuilder {
    pub fn new(registry: impl Into<String>) -> Self {
        Self {
            registry: registry.into(),
            config: ClientConfig::default(),
            output: Logger::default(),
        }
    }

    pub fn with_config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_logger(mut self, output: Logger) -> Self {
        self.output = output;
        self
    }

    pub fn build(self) -> Result<RegistryClient> {
        let registry = self.registry.trim().trim_end_matches('/').to_string();
        if registry.is_empty() {
            return Err(RegistryError::Validation(
                "Registry address cannot be empty".to_string(),
            ));
        }
        if registry.contains("://") {
            return Err(RegistryError::Validation(format!(
                "Invalid registry address: {}. Pass a bare host[:port]; the scheme comes from the config",
                registry
            )));
        }

        let config = self.config.normalized();
        config.validate()?;

        let output = self.output.with_verbose(config.trace_requests);
        let client = Auth::build_client(&config)?;
        let auth = Auth::new(client.clone(), output.clone());

        Ok(RegistryClient {
            client,
            registry,
            config,
            auth,
            output,
            token: RwLock::new(None),
            login_attempted: AtomicBool::new(false),
        })
    }
}

pub struct RegistryClient {
    client: Client,
    registry: String,
    config: ClientConfig,
    auth: Auth,
    output: Logger,
    token: RwLock<Option<Arc<Token>>>,
    login_attempted: AtomicBool,
}

impl RegistryClient {
    pub fn new(registry: &str, config: ClientConfig) -> Result<Self> {
        Self::builder(registry).with_config(config).build()
    }

    pub fn builder(registry: impl Into<String>) -> RegistryClientBuilder {
        RegistryClientBuilder::new(registry)
    }

    pub fn registry(&self) -> &str {
        &self.registry
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Base URL of the registry's V2 API
    pub fn url(&self) -> String {
        format!("{}{}/v2/", self.config.web_scheme(), self.registry)
    }

    /// Check basic connectivity; 200 and 401 both mean a V2 registry is there
    pub async fn ping(&self) -> Result<()> {
        let url = self.url();
        self.output.verbose(&format!("Pinging registry at {}", url));

        let response = self.client.get(&url).send().await.map_err(|e| {
            RegistryError::Network(format!("Failed to connect to registry: {}", e))
        })?;

        let status = response.status();
        self.output
            .detail(&format!("Registry response status: {}", status));

        match status {
            StatusCode::OK | StatusCode::UNAUTHORIZED => Ok(()),
            _ => {
                let body = response.text().await.unwrap_or_default();
                Err(HttpErrorHandler::handle_registry_error(status, &body, "ping"))
            }
        }
    }

    /// Authenticate against the registry and keep the resulting token.
    ///
    /// On failure any previously held token stays in place.
    pub async fn login(&self, username: &str, password: &str) -> Result<()> {
        self.login_attempted.store(true, Ordering::SeqCst);

        let credentials = Credentials::new(username, password);
        let token = self.auth.authenticate(&self.url(), &credentials).await?;
        let method = token.method();

        *self.token.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::new(token));

        self.output.success(&format!(
            "Logged in to {} using {} authentication",
            self.registry, method
        ));

        Ok(())
    }

    pub fn is_logged_in(&self) -> bool {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Whether [`login`](Self::login) was ever called, successful or not
    pub fn login_attempted(&self) -> bool {
        self.login_attempted.load(Ordering::SeqCst)
    }

    /// Token from the most recent successful login
    pub fn token(&self) -> Option<Arc<Token>> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// GET request for `path` under [`url`](Self::url), signed with the current token
    pub fn authorized_get(&self, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.url(), path.trim_start_matches('/'));
        let request = self.client.get(url);

        match self.token() {
            Some(token) => token.authorize(request),
            None => request,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DEFAULT_CONCURRENT_REQUESTS, DEFAULT_RETRY_DELAY};
    use std::time::Duration;

    fn quiet(registry: &str, config: ClientConfig) -> Result<RegistryClient> {
        RegistryClient::builder(registry)
            .with_config(config)
            .with_logger(Logger::new_quiet())
            .build()
    }

    #[test]
    fn test_new_with_empty_config() {
        let client = quiet("registry.hub.docker.com", ClientConfig::default()).unwrap();
        assert_eq!(client.config().concurrent_requests, DEFAULT_CONCURRENT_REQUESTS);
        assert_eq!(client.config().retry_delay, DEFAULT_RETRY_DELAY);
    }

    #[test]
    fn test_new_with_defined_config() {
        let config = ClientConfig::default()
            .with_concurrent_requests(77)
            .with_retries(2, Duration::from_secs(5));
        let client = quiet("registry.hub.docker.com", config).unwrap();
        assert_eq!(client.config().concurrent_requests, 77);
        assert_eq!(client.config().retry_delay, Duration::from_secs(5));
    }

    #[test]
    fn test_new_with_invalid_config() {
        let config = ClientConfig::default().with_concurrent_requests(9000);
        assert!(matches!(
            quiet("registry.hub.docker.com", config),
            Err(RegistryError::Validation(_))
        ));
    }

    #[test]
    fn test_rejects_bad_addresses() {
        assert!(quiet("", ClientConfig::default()).is_err());
        assert!(quiet("https://registry.example", ClientConfig::default()).is_err());
    }

    #[test]
    fn test_url() {
        let client = quiet("registry.example:5000/", ClientConfig::default()).unwrap();
        assert_eq!(client.url(), "https://registry.example:5000/v2/");

        let client = quiet(
            "localhost:5000",
            ClientConfig::default().with_insecure(true),
        )
        .unwrap();
        assert_eq!(client.url(), "http://localhost:5000/v2/");
    }

    #[test]
    fn test_poisoned_token_lock_is_read_through() {
        let client = quiet("registry.example", ClientConfig::default()).unwrap();
        *client.token.write().unwrap() = Some(Arc::new(Token::None));

        std::thread::scope(|s| {
            let _ = s
                .spawn(|| {
                    let _guard = client.token.write().unwrap();
                    panic!("writer died holding the token lock");
                })
                .join();
        });

        assert!(client.token.is_poisoned());
        assert!(client.is_logged_in());
        assert_eq!(client.token().unwrap().method(), "None");
    }

    #[test]
    fn test_fresh_client_is_not_logged_in() {
        let client = quiet("registry.example", ClientConfig::default()).unwrap();
        assert!(!client.is_logged_in());
        assert!(!client.login_attempted());
        assert!(client.token().is_none());
    }
}
