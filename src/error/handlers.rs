//! Standardized mapping of HTTP failures onto registry errors

use crate::error::RegistryError;
use reqwest::StatusCode;

/// Longest response body excerpt carried inside an error
pub const MAX_BODY_SNIPPET: usize = 512;

/// Standard error handler for HTTP responses
pub struct HttpErrorHandler;

impl HttpErrorHandler {
    /// Handle a token issuer rejecting a token request
    pub fn handle_auth_error(status: StatusCode, error_text: &str) -> RegistryError {
        RegistryError::Authentication {
            status: status.as_u16(),
            body: Self::snippet(error_text),
        }
    }

    /// Handle registry-related HTTP errors
    pub fn handle_registry_error(
        status: StatusCode,
        error_text: &str,
        operation: &str,
    ) -> RegistryError {
        let body = Self::snippet(error_text);
        let error_msg = match status.as_u16() {
            403 => format!(
                "Forbidden: insufficient permissions for {}: {}",
                operation, body
            ),
            404 => format!("Registry API v2 not found during {}: {}", operation, body),
            429 => format!("Rate limited during {}: {}", operation, body),
            500 => format!("Registry server error during {}: {}", operation, body),
            502 | 503 => format!("Registry unavailable for {}: {}", operation, body),
            _ => format!("{} failed (status {}): {}", operation, status, body),
        };

        RegistryError::Registry(error_msg)
    }

    /// Trim a response body down to something that fits in a log line
    pub fn snippet(text: &str) -> String {
        let text = text.trim();
        if text.len() <= MAX_BODY_SNIPPET {
            return text.to_string();
        }

        let mut end = MAX_BODY_SNIPPET;
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &text[..end])
    }
}
