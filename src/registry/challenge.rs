//! `Www-Authenticate` challenge parsing
//!
//! A challenge looks like `Bearer realm="https://auth.example/token",service="registry.example"`.
//! Registries that allow anonymous access send no challenge at all, which is
//! reported as the canonical `None realm=none` challenge.

use crate::error::{RegistryError, Result};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Authentication schemes the negotiator knows how to complete
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthScheme {
    None,
    Basic,
    Bearer,
}

impl AuthScheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthScheme::None => "None",
            AuthScheme::Basic => "Basic",
            AuthScheme::Bearer => "Bearer",
        }
    }
}

impl fmt::Display for AuthScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuthScheme {
    type Err = RegistryError;

    /// Case-sensitive, as registries send the canonical spelling
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "None" => Ok(AuthScheme::None),
            "Basic" => Ok(AuthScheme::Basic),
            "Bearer" => Ok(AuthScheme::Bearer),
            other => Err(RegistryError::UnknownScheme(other.to_string())),
        }
    }
}

/// Scheme and parameters advertised by a registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Challenge {
    /// Raw scheme token; unrecognized values are kept as-is
    pub scheme: String,
    pub params: HashMap<String, String>,
}

impl Challenge {
    /// The challenge implied by a response without any `Www-Authenticate` header
    pub fn anonymous() -> Self {
        Self {
            scheme: AuthScheme::None.as_str().to_string(),
            params: HashMap::from([("realm".to_string(), "none".to_string())]),
        }
    }

    /// Parse the `Www-Authenticate` values of a probe response.
    ///
    /// Only the first line is significant. Parameters are split on commas
    /// outside double quotes and then on the first `=`; fragments without `=`
    /// are ignored and a repeated key keeps its last value.
    pub fn parse<S: AsRef<str>>(header_lines: &[S]) -> Result<Self> {
        let Some(line) = header_lines.first() else {
            return Ok(Self::anonymous());
        };
        let line = line.as_ref().trim_start();

        let Some((scheme, param_string)) = line.split_once(' ') else {
            return Err(RegistryError::Parse(format!(
                "malformed challenge header: '{}'",
                line
            )));
        };

        let mut params = HashMap::new();
        for fragment in split_params(param_string) {
            if let Some((key, value)) = fragment.split_once('=') {
                let key = key.trim();
                if key.is_empty() {
                    continue;
                }
                params.insert(key.to_string(), unquote(value.trim()).to_string());
            }
        }

        Ok(Self {
            scheme: scheme.to_string(),
            params,
        })
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    pub fn realm(&self) -> Option<&str> {
        self.param("realm")
    }
}

/// Split on commas that are not inside a double-quoted value
fn split_params(input: &str) -> Vec<&str> {
    let mut fragments = Vec::new();
    let mut in_quotes = false;
    let mut start = 0;

    for (idx, ch) in input.char_indices() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                fragments.push(&input[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
    }
    fragments.push(&input[start..]);

    fragments
}

fn unquote(value: &str) -> &str {
    value.trim_matches('"')
}
