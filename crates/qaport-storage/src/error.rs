//! Error types for bucket and upload operations.

use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur while preparing a bucket or uploading a dataset.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Local path or remote object does not exist.
    #[error("not found: {path}")]
    NotFound { path: String },

    /// Access denied by the storage backend.
    #[error("access denied: {message}")]
    AccessDenied { message: String },

    /// Rejected before talking to the backend (bad bucket name, endpoint, ...).
    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Local filesystem or transport error.
    #[error("I/O error: {message}")]
    Io { message: String },

    /// A bucket administration call failed.
    #[error("bucket '{bucket}': {message}")]
    Bucket { bucket: String, message: String },

    /// Generic error from the underlying object store.
    #[error("object store error: {0}")]
    ObjectStore(object_store::Error),

    /// Other errors.
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl StoreError {
    /// Returns true if the path or object was not found.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns true if this is an access/permission error.
    pub fn is_access_denied(&self) -> bool {
        matches!(self, Self::AccessDenied { .. })
    }

    pub(crate) fn io(context: impl std::fmt::Display, err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            return Self::NotFound {
                path: context.to_string(),
            };
        }
        Self::Io {
            message: format!("{}: {}", context, err),
        }
    }
}

impl From<object_store::Error> for StoreError {
    fn from(err: object_store::Error) -> Self {
        match err {
            object_store::Error::NotFound { path, .. } => StoreError::NotFound { path },
            object_store::Error::PermissionDenied { path, source }
            | object_store::Error::Unauthenticated { path, source } => StoreError::AccessDenied {
                message: format!("{}: {}", path, source),
            },
            other => StoreError::ObjectStore(other),
        }
    }
}
