//! Error types and handlers for registry authentication

pub mod handlers;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, RegistryError>;

#[derive(Debug, Error)]
pub enum RegistryError {
    /// Transport failure reaching the registry or the token issuer
    #[error("Network error: {0}")]
    Network(String),
    /// Malformed `Www-Authenticate` challenge
    #[error("Parse error: {0}")]
    Parse(String),
    /// The registry asked for an authentication scheme we do not implement
    #[error("Unknown authentication method: {0}")]
    UnknownScheme(String),
    /// A challenge lacks a parameter its scheme cannot work without
    #[error("{scheme} challenge is missing required parameter '{parameter}'")]
    MissingParameter {
        scheme: &'static str,
        parameter: &'static str,
    },
    /// The token issuer rejected the request
    #[error("Authentication failed with status {status}: {body}")]
    Authentication { status: u16, body: String },
    /// The token issuer answered with something that is not a token response
    #[error("Decode error: {0}")]
    Decode(String),
    /// Invalid client configuration or input
    #[error("Validation error: {0}")]
    Validation(String),
    /// Unexpected registry behaviour
    #[error("Registry error: {0}")]
    Registry(String),
}

impl From<reqwest::Error> for RegistryError {
    fn from(err: reqwest::Error) -> Self {
        RegistryError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for RegistryError {
    fn from(err: serde_json::Error) -> Self {
        RegistryError::Decode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_parameter_message_names_scheme_and_parameter() {
        let err = RegistryError::MissingParameter {
            scheme: "Bearer",
            parameter: "realm",
        };
        assert_eq!(
            err.to_string(),
            "Bearer challenge is missing required parameter 'realm'"
        );
    }

    #[test]
    fn test_json_errors_become_decode_errors() {
        let err: RegistryError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(matches!(err, RegistryError::Decode(_)));
    }
}
