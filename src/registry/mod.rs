//! Registry module for Docker registry authentication
//!
//! This module provides challenge parsing, the None/Basic/Bearer scheme
//! handshakes, the negotiator that ties them together and the client that
//! keeps the resulting token for later requests.

pub mod auth;
pub mod challenge;
pub mod client;
pub mod schemes;
pub mod token;

pub use auth::Auth;
pub use challenge::{AuthScheme, Challenge};
pub use client::{RegistryClient, RegistryClientBuilder};
pub use token::{BasicToken, BearerToken, Token, DEFAULT_BEARER_EXPIRES_IN, NON_EXPIRING};
