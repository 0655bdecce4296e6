//! Command-line interface: argument parsing and the login runner

pub mod args;
pub mod runner;

pub use args::Args;
pub use runner::Runner;
