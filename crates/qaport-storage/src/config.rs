//! Connection settings for the target bucket.

use crate::error::{StoreError, StoreResult};

/// Shortest bucket name S3 accepts.
pub const MIN_BUCKET_NAME_LEN: usize = 3;

/// Where datasets are uploaded to.
///
/// Credentials are not part of the config: both clients read them from the
/// standard AWS environment and credential chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub bucket: String,

    /// S3-compatible endpoint, e.g. `http://localhost:9000`. `None` means AWS.
    pub endpoint: Option<String>,

    pub region: Option<String>,
}

impl StoreConfig {
    pub fn new(bucket: impl Into<String>) -> StoreResult<Self> {
        let bucket = bucket.into();
        validate_bucket_name(&bucket)?;
        Ok(Self {
            bucket,
            endpoint: None,
            region: None,
        })
    }

    pub fn with_endpoint(mut self, endpoint: Option<String>) -> Self {
        self.endpoint = endpoint.filter(|e| !e.trim().is_empty());
        self
    }

    pub fn with_region(mut self, region: Option<String>) -> Self {
        self.region = region.filter(|r| !r.trim().is_empty());
        self
    }

    /// Plain-HTTP endpoints (local MinIO and friends) need explicit opt-in.
    pub(crate) fn allow_http(&self) -> bool {
        self.endpoint
            .as_deref()
            .is_some_and(|e| e.starts_with("http://"))
    }
}

/// Reject bucket names shorter than [`MIN_BUCKET_NAME_LEN`] characters.
pub fn validate_bucket_name(name: &str) -> StoreResult<()> {
    if name.chars().count() < MIN_BUCKET_NAME_LEN {
        return Err(StoreError::InvalidConfig {
            message: format!(
                "bucket name '{}' is too short (at least {} characters)",
                name, MIN_BUCKET_NAME_LEN
            ),
        });
    }
    Ok(())
}
