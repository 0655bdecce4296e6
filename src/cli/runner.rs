//! Runs a ping and a login against one registry and reports the outcome

use crate::cli::args::Args;
use crate::error::Result;
use crate::logging::Logger;
use crate::registry::{NON_EXPIRING, RegistryClient};

pub struct Runner {
    args: Args,
    output: Logger,
}

impl Runner {
    pub fn new(args: Args) -> Self {
        let output = if args.quiet {
            Logger::new_quiet()
        } else {
            Logger::new(args.verbose)
        };

        Self { args, output }
    }

    pub fn output(&self) -> &Logger {
        &self.output
    }

    pub async fn run(&self) -> Result<()> {
        self.output.section("Registry Auth");

        let client = RegistryClient::builder(self.args.registry.as_str())
            .with_config(self.args.client_config())
            .with_logger(self.output.clone())
            .build()?;

        self.output.info(&format!("Checking {}", client.url()));
        client.ping().await?;

        let credentials = self.args.credentials();
        if credentials.is_anonymous() {
            self.output.info("No credentials provided, attempting anonymous login");
        }
        client
            .login(&credentials.username, &credentials.password)
            .await?;

        if let Some(token) = client.token() {
            let expiry = match token.expires_in() {
                NON_EXPIRING => "never".to_string(),
                secs => format!("in {}s", secs),
            };
            self.output.summary_kv(
                "Session",
                &[
                    ("Registry", client.registry().to_string()),
                    ("Method", token.method().to_string()),
                    ("Expires", expiry),
                    (
                        "Concurrency",
                        client.config().concurrent_requests.to_string(),
                    ),
                ],
            );
        }

        self.output.success(&format!(
            "Completed in {}",
            self.output.format_duration(self.output.elapsed())
        ));
        Ok(())
    }
}
