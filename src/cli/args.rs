//! Command-line argument parsing

use crate::config::{ClientConfig, Credentials};
use clap::Parser;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "registry-auth")]
#[command(about = "Negotiate authentication with a Docker Registry V2 endpoint")]
#[command(version, author)]
pub struct Args {
    /// Registry host, optionally with a port (e.g. registry.hub.docker.com)
    #[arg(help = "Registry host[:port] to authenticate against")]
    pub registry: String,

    /// Registry username
    #[arg(
        long = "username",
        short = 'u',
        help = "Username for registry authentication (falls back to REGISTRY_USERNAME)"
    )]
    pub username: Option<String>,

    /// Registry password
    #[arg(
        long = "password",
        short = 'p',
        help = "Password for registry authentication (falls back to REGISTRY_PASSWORD)"
    )]
    pub password: Option<String>,

    /// Use plain HTTP
    #[arg(long = "insecure", help = "Talk to the registry over plain HTTP")]
    pub insecure: bool,

    /// Skip TLS verification
    #[arg(
        long = "skip-tls",
        short = 'k',
        help = "Skip TLS certificate verification"
    )]
    pub skip_tls: bool,

    /// Number of concurrent registry requests
    #[arg(
        long = "concurrency",
        short = 'j',
        default_value = "32",
        help = "Maximum number of simultaneous registry requests"
    )]
    pub concurrency: usize,

    /// Timeout in seconds for network operations
    #[arg(
        long = "timeout",
        short = 't',
        default_value = "60",
        help = "Request timeout in seconds"
    )]
    pub timeout: u64,

    /// Print request traces
    #[arg(long = "trace", help = "Print registry request traces")]
    pub trace: bool,

    /// Verbose output
    #[arg(long = "verbose", short = 'v', help = "Enable verbose output")]
    pub verbose: bool,

    /// Quiet mode
    #[arg(
        long = "quiet",
        short = 'q',
        conflicts_with = "verbose",
        help = "Only print errors"
    )]
    pub quiet: bool,
}

impl Args {
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::default()
            .with_concurrent_requests(self.concurrency)
            .with_insecure(self.insecure)
            .with_skip_tls(self.skip_tls)
            .with_timeout(Duration::from_secs(self.timeout))
            .with_trace_requests(self.trace)
    }

    /// Explicit flags win over the environment
    pub fn credentials(&self) -> Credentials {
        let env = Credentials::from_env();
        Credentials::new(
            self.username.clone().unwrap_or(env.username),
            self.password.clone().unwrap_or(env.password),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_args() {
        let args = Args::try_parse_from(["registry-auth", "registry.example"]).unwrap();
        assert_eq!(args.registry, "registry.example");
        assert!(!args.insecure);

        let config = args.client_config();
        assert_eq!(config.concurrent_requests, 32);
        assert_eq!(config.timeout, Duration::from_secs(60));
    }

    #[test]
    fn test_parse_full_args() {
        let args = Args::try_parse_from([
            "registry-auth",
            "localhost:5000",
            "-u",
            "alice",
            "-p",
            "secret",
            "--insecure",
            "-j",
            "8",
            "-t",
            "5",
            "--trace",
        ])
        .unwrap();

        let config = args.client_config();
        assert!(config.insecure);
        assert!(config.trace_requests);
        assert_eq!(config.concurrent_requests, 8);
        assert_eq!(config.timeout, Duration::from_secs(5));

        let credentials = args.credentials();
        assert_eq!(credentials.username, "alice");
        assert_eq!(credentials.password, "secret");
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Args::try_parse_from(["registry-auth", "r", "-q", "-v"]).is_err());
    }
}
