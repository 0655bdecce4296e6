//! Configuration for the registry client and login credentials

use crate::error::{RegistryError, Result};
use std::env;
use std::time::Duration;

/// Used when no explicit concurrency is configured
pub const DEFAULT_CONCURRENT_REQUESTS: usize = 32;

/// Hard limit for simultaneous registry requests
pub const MAX_CONCURRENT_REQUESTS: usize = 256;

/// Used when no explicit retry delay is configured
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(30);

/// Transport deadline applied to every probe and token exchange
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Registry client configuration.
///
/// The concurrency and retry settings bound how downstream request machinery
/// uses a token; authentication itself always runs a single probe and at most
/// one token exchange.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// How many requests to the registry may run concurrently
    pub concurrent_requests: usize,
    /// Pause between batches of requests
    pub wait_between: Duration,
    /// How many times a failed request is retried
    pub retry_requests: u32,
    /// Pause between a failed request and its retry
    pub retry_delay: Duration,
    /// Print registry request traces
    pub trace_requests: bool,
    /// Talk to the registry over plain HTTP instead of HTTPS
    pub insecure: bool,
    /// Accept invalid TLS certificates and hostnames
    pub skip_tls: bool,
    /// Request deadline for every outbound call
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            concurrent_requests: DEFAULT_CONCURRENT_REQUESTS,
            wait_between: Duration::ZERO,
            retry_requests: 0,
            retry_delay: DEFAULT_RETRY_DELAY,
            trace_requests: false,
            insecure: false,
            skip_tls: false,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_concurrent_requests(mut self, concurrent_requests: usize) -> Self {
        self.concurrent_requests = concurrent_requests;
        self
    }

    pub fn with_wait_between(mut self, wait_between: Duration) -> Self {
        self.wait_between = wait_between;
        self
    }

    pub fn with_retries(mut self, retry_requests: u32, retry_delay: Duration) -> Self {
        self.retry_requests = retry_requests;
        self.retry_delay = retry_delay;
        self
    }

    pub fn with_trace_requests(mut self, trace_requests: bool) -> Self {
        self.trace_requests = trace_requests;
        self
    }

    pub fn with_insecure(mut self, insecure: bool) -> Self {
        self.insecure = insecure;
        self
    }

    pub fn with_skip_tls(mut self, skip_tls: bool) -> Self {
        self.skip_tls = skip_tls;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Replace unset (zero) values with their defaults
    pub fn normalized(mut self) -> Self {
        if self.concurrent_requests == 0 {
            self.concurrent_requests = DEFAULT_CONCURRENT_REQUESTS;
        }
        if self.retry_delay.is_zero() {
            self.retry_delay = DEFAULT_RETRY_DELAY;
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.concurrent_requests > MAX_CONCURRENT_REQUESTS {
            return Err(RegistryError::Validation(format!(
                "Could not run more than {} concurrent requests ({} configured)",
                MAX_CONCURRENT_REQUESTS, self.concurrent_requests
            )));
        }

        if self.timeout.is_zero() {
            return Err(RegistryError::Validation(
                "Timeout must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// URL scheme prefix used to reach the registry
    pub fn web_scheme(&self) -> &'static str {
        if self.insecure { "http://" } else { "https://" }
    }
}

/// Username/password pair presented to the registry.
///
/// Either half may be empty, which asks the scheme for anonymous access.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Read `REGISTRY_USERNAME` / `REGISTRY_PASSWORD`, defaulting to empty
    pub fn from_env() -> Self {
        Self {
            username: env::var("REGISTRY_USERNAME").unwrap_or_default(),
            password: env::var("REGISTRY_PASSWORD").unwrap_or_default(),
        }
    }

    pub fn is_anonymous(&self) -> bool {
        self.username.is_empty() && self.password.is_empty()
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
