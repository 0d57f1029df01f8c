//! Error types for the Xray client.

/// Xray client errors.
#[derive(Debug, thiserror::Error)]
pub enum XrayError {
    /// A required environment variable is unset or empty.
    #[error("missing credentials: set {variable}")]
    MissingCredentials { variable: String },

    /// Token rejected by Jira.
    #[error("unauthorized: {message}")]
    Unauthorized { message: String },

    /// Endpoint or issue does not exist.
    #[error("not found: {url}")]
    NotFound { url: String },

    /// Any other non-2xx response.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// Transport failure (connect, timeout, TLS).
    #[error("network error: {message}")]
    Network { message: String },

    /// Response body did not have the expected shape.
    #[error("invalid response: {message}")]
    InvalidResponse { message: String },

    /// Mapping cache could not be written.
    #[error("cache error: {message}")]
    Cache { message: String },
}

impl XrayError {
    /// HTTP status behind the error, when there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized { .. } => Some(401),
            Self::NotFound { .. } => Some(404),
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for XrayError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network {
            message: err.to_string(),
        }
    }
}

/// Result type for Xray operations.
pub type XrayResult<T> = Result<T, XrayError>;
