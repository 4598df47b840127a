use tracing::debug;

use crate::contract::CredentialSource;

pub const DEFAULT_TOKEN_ENV: &str = "GITHUB_TOKEN";

/// Reads the bearer token from an environment variable each time it is asked.
#[derive(Debug, Clone)]
pub struct EnvCredentials {
    variable: String,
}

impl EnvCredentials {
    pub fn new(variable: impl Into<String>) -> Self {
        Self {
            variable: variable.into(),
        }
    }
}

impl Default for EnvCredentials {
    fn default() -> Self {
        Self::new(DEFAULT_TOKEN_ENV)
    }
}

impl CredentialSource for EnvCredentials {
    fn describe(&self) -> String {
        format!("environment variable {}", self.variable)
    }

    fn token(&self) -> Option<String> {
        let token = std::env::var(&self.variable)
            .ok()
            .filter(|v| !v.trim().is_empty());
        // Only presence is logged, never the value.
        debug!(variable = %self.variable, token_set = token.is_some(), "Resolved bearer token");
        token
    }
}
