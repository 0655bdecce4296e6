//! Registry Auth Library
//!
//! Authenticates against container registries that implement the Docker
//! Registry HTTP API V2 challenge model (anonymous, Basic or Bearer token
//! exchange) and exposes the result as a single [`Token`] type.

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod registry;

pub use config::{ClientConfig, Credentials};
pub use error::{RegistryError, Result};
pub use logging::Logger;
pub use registry::{Auth, Challenge, RegistryClient, Token};
