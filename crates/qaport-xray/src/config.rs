//! Client configuration.

use crate::error::{XrayError, XrayResult};

pub const ENV_URL: &str = "JIRA_URL";
pub const ENV_TOKEN: &str = "JIRA_TOKEN";
pub const ENV_TIMEOUT: &str = "QAPORT_XRAY_TIMEOUT";

fn default_timeout() -> u64 {
    30
}

/// Connection settings for a Jira instance with Xray installed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XrayConfig {
    /// Jira base URL, e.g. `https://jira.example.com/jira`.
    pub url: String,

    /// Personal access token, sent as a bearer token.
    pub token: String,

    /// Base request timeout in seconds. Slow endpoints use longer fixed timeouts.
    pub timeout_secs: u64,
}

impl XrayConfig {
    pub fn new(url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            token: token.into(),
            timeout_secs: default_timeout(),
        }
    }

    /// Create config from environment variables.
    ///
    /// `JIRA_URL` and `JIRA_TOKEN` must both be set and non-empty.
    pub fn from_env() -> XrayResult<Self> {
        let url = required_env(ENV_URL)?;
        let token = required_env(ENV_TOKEN)?;
        let timeout_secs = std::env::var(ENV_TIMEOUT)
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or_else(default_timeout);

        Ok(Self {
            url,
            token,
            timeout_secs,
        })
    }

    /// Set the base timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

fn required_env(name: &str) -> XrayResult<String> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(XrayError::MissingCredentials {
            variable: name.to_string(),
        }),
    }
}
