//! The upload flow: prepare the bucket, upload files, write sidecars.

use chrono::{DateTime, Utc};
use tracing::info;

use crate::bucket::{BucketAdmin, CreateOutcome, LifecycleRule, VersioningStatus};
use crate::dataset::{build_index, build_metadata, object_key, sidecar_key, DatasetFile, DatasetKind};
use crate::error::StoreResult;
use crate::upload::ObjectUploader;

/// Everything decided before the first remote call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPlan {
    pub bucket: String,
    pub prefix: String,
    pub kind: DatasetKind,
    /// Effective versioning, fixed by `kind`.
    pub versioning: bool,
    pub lifecycle_days: Option<u32>,
}

impl UploadPlan {
    pub fn new(
        bucket: impl Into<String>,
        prefix: impl Into<String>,
        kind: DatasetKind,
        lifecycle_days: Option<u32>,
    ) -> Self {
        Self {
            bucket: bucket.into(),
            prefix: prefix.into(),
            kind,
            versioning: kind.versioning(),
            lifecycle_days,
        }
    }

    pub fn lifecycle_rule(&self) -> Option<LifecycleRule> {
        self.lifecycle_days
            .map(|days| LifecycleRule::expire_after(days, self.versioning))
    }
}

/// Result of the file upload step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReport {
    /// Keys of uploaded dataset files, in upload order.
    pub uploaded: Vec<String>,
    /// Keys of uploaded sidecar documents.
    pub sidecars: Vec<String>,
    pub bytes: u64,
}

/// Create the bucket if needed, then apply versioning and lifecycle.
///
/// Must succeed before [`upload_dataset`] runs.
pub async fn prepare_bucket(admin: &dyn BucketAdmin, plan: &UploadPlan) -> StoreResult<CreateOutcome> {
    let outcome = admin.create_bucket(&plan.bucket).await?;

    if plan.versioning {
        admin
            .set_versioning(&plan.bucket, VersioningStatus::Enabled)
            .await?;
    }
    if let Some(rule) = plan.lifecycle_rule() {
        admin.put_lifecycle(&plan.bucket, &rule).await?;
    }
    Ok(outcome)
}

/// Upload `files` under the plan's prefix, then the stream sidecars.
///
/// Calls are made one at a time and the first failure aborts the run.
/// `on_file` is invoked before each file upload.
pub async fn upload_dataset(
    uploader: &ObjectUploader,
    plan: &UploadPlan,
    files: &[DatasetFile],
    now: DateTime<Utc>,
    mut on_file: impl FnMut(&DatasetFile),
) -> StoreResult<UploadReport> {
    let mut uploaded = Vec::with_capacity(files.len());
    let mut bytes = 0;
    for file in files {
        on_file(file);
        let key = object_key(&plan.prefix, &file.name);
        bytes += uploader.upload_file(&file.path, &key).await?;
        uploaded.push(key);
    }

    let mut sidecars = Vec::new();
    if plan.kind.has_sidecars() {
        let meta_key = sidecar_key(&plan.prefix, "meta");
        uploader
            .upload_json(&meta_key, &build_metadata(&plan.prefix, files.len(), now))
            .await?;
        sidecars.push(meta_key);

        let index_key = sidecar_key(&plan.prefix, "index");
        uploader
            .upload_json(&index_key, &build_index(&plan.prefix, files))
            .await?;
        sidecars.push(index_key);
    }

    info!(
        bucket = %plan.bucket,
        kind = %plan.kind,
        files = uploaded.len(),
        sidecars = sidecars.len(),
        bytes,
        "dataset published"
    );

    Ok(UploadReport {
        uploaded,
        sidecars,
        bytes,
    })
}
