use clap::Parser;
use registry_auth::cli::{Args, Runner};
use std::process;

#[tokio::main]
async fn main() {
    let args = Args::parse();
    let runner = Runner::new(args);

    if let Err(e) = runner.run().await {
        runner.output().error(&e.to_string());
        process::exit(1);
    }
}
