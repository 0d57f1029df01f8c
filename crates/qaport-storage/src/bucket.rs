//! Bucket administration: create-if-absent, versioning, lifecycle.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use crate::error::StoreResult;

/// Lifecycle rule id written by `qaport upload`.
pub const LIFECYCLE_RULE_ID: &str = "ScriptLifecycle";

/// Result of a create-bucket call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateOutcome {
    Created,
    /// The bucket exists and is owned by the caller. Not an error.
    AlreadyExists,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersioningStatus {
    Enabled,
    Suspended,
}

impl fmt::Display for VersioningStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Enabled => f.write_str("Enabled"),
            Self::Suspended => f.write_str("Suspended"),
        }
    }
}

/// A single enabled expiration rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LifecycleRule {
    pub id: String,
    /// Empty prefix applies the rule to the whole bucket.
    pub prefix: String,
    pub expiration_days: u32,
    pub noncurrent_expiration_days: Option<u32>,
}

impl LifecycleRule {
    /// Whole-bucket rule expiring objects after `days`. With versioning,
    /// noncurrent versions expire after the same number of days.
    pub fn expire_after(days: u32, versioning: bool) -> Self {
        Self {
            id: LIFECYCLE_RULE_ID.to_string(),
            prefix: String::new(),
            expiration_days: days,
            noncurrent_expiration_days: versioning.then_some(days),
        }
    }
}

/// Bucket-level operations the upload flow needs.
///
/// Object upload is separate (see [`crate::ObjectUploader`]) because
/// `object_store` has no bucket administration API.
#[async_trait]
pub trait BucketAdmin: Send + Sync {
    /// Create the bucket. A bucket already owned by the caller is
    /// [`CreateOutcome::AlreadyExists`]; every other failure is an error.
    async fn create_bucket(&self, bucket: &str) -> StoreResult<CreateOutcome>;

    async fn set_versioning(&self, bucket: &str, status: VersioningStatus) -> StoreResult<()>;

    /// Replace the bucket lifecycle configuration with `rule`.
    async fn put_lifecycle(&self, bucket: &str, rule: &LifecycleRule) -> StoreResult<()>;
}

/// Recorded state of one bucket in [`MemoryBucketAdmin`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BucketState {
    pub versioning: Option<VersioningStatus>,
    pub lifecycle: Option<LifecycleRule>,
}

/// In-memory [`BucketAdmin`] for tests.
#[derive(Debug, Default)]
pub struct MemoryBucketAdmin {
    buckets: Mutex<HashMap<String, BucketState>>,
}

impl MemoryBucketAdmin {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of a bucket, if it was created.
    pub fn bucket(&self, name: &str) -> Option<BucketState> {
        self.buckets
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    fn update(&self, bucket: &str, f: impl FnOnce(&mut BucketState)) -> StoreResult<()> {
        let mut buckets = self.buckets.lock().unwrap_or_else(PoisonError::into_inner);
        let state = buckets
            .get_mut(bucket)
            .ok_or_else(|| crate::StoreError::Bucket {
                bucket: bucket.to_string(),
                message: "NoSuchBucket".to_string(),
            })?;
        f(state);
        Ok(())
    }
}

#[async_trait]
impl BucketAdmin for MemoryBucketAdmin {
    async fn create_bucket(&self, bucket: &str) -> StoreResult<CreateOutcome> {
        let mut buckets = self.buckets.lock().unwrap_or_else(PoisonError::into_inner);
        if buckets.contains_key(bucket) {
            return Ok(CreateOutcome::AlreadyExists);
        }
        buckets.insert(bucket.to_string(), BucketState::default());
        Ok(CreateOutcome::Created)
    }

    async fn set_versioning(&self, bucket: &str, status: VersioningStatus) -> StoreResult<()> {
        self.update(bucket, |state| state.versioning = Some(status))
    }

    async fn put_lifecycle(&self, bucket: &str, rule: &LifecycleRule) -> StoreResult<()> {
        self.update(bucket, |state| state.lifecycle = Some(rule.clone()))
    }
}
