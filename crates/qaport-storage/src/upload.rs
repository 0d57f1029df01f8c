//! Object upload backed by `object_store`.

use std::path::Path;
use std::sync::Arc;

use bytes::Bytes;
use object_store::buffered::BufWriter;
use object_store::path::Path as ObjectPath;
use object_store::{ObjectStore, ObjectStoreExt, PutPayload};
use serde::Serialize;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};

/// Uploads local files and JSON documents into one bucket.
///
/// Supports:
/// - S3 and S3-compatible endpoints (MinIO, Ceph RGW, ...)
/// - In-memory (for testing)
pub struct ObjectUploader {
    inner: Arc<dyn ObjectStore>,
    bucket: String,
}

impl ObjectUploader {
    /// Create an S3 uploader. Credentials come from the AWS environment.
    pub fn from_config(config: &StoreConfig) -> StoreResult<Self> {
        let mut builder = object_store::aws::AmazonS3Builder::from_env()
            .with_bucket_name(&config.bucket)
            .with_allow_http(config.allow_http());

        if let Some(region) = &config.region {
            builder = builder.with_region(region);
        }
        if let Some(endpoint) = &config.endpoint {
            builder = builder
                .with_endpoint(endpoint)
                .with_virtual_hosted_style_request(false);
        }

        let inner = builder.build().map_err(|e| StoreError::InvalidConfig {
            message: format!("failed to create S3 client: {}", e),
        })?;

        Ok(Self {
            inner: Arc::new(inner),
            bucket: config.bucket.clone(),
        })
    }

    /// Create an in-memory uploader for testing.
    pub fn memory(bucket: &str) -> Self {
        Self {
            inner: Arc::new(object_store::memory::InMemory::new()),
            bucket: bucket.to_string(),
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Stream a local file to `key`. Large files go up as multipart uploads.
    ///
    /// Returns the number of bytes written.
    pub async fn upload_file(&self, path: &Path, key: &str) -> StoreResult<u64> {
        let mut file = tokio::fs::File::open(path)
            .await
            .map_err(|e| StoreError::io(path.display(), e))?;

        let mut writer = BufWriter::new(Arc::clone(&self.inner), ObjectPath::from(key));
        let written = tokio::io::copy(&mut file, &mut writer)
            .await
            .map_err(|e| StoreError::io(format!("uploading {}", path.display()), e))?;
        writer
            .shutdown()
            .await
            .map_err(|e| StoreError::io(format!("finishing upload of {}", key), e))?;

        debug!(bucket = %self.bucket, key, bytes = written, "uploaded file");
        Ok(written)
    }

    /// Upload `value` as pretty-printed JSON.
    pub async fn upload_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> StoreResult<()> {
        let body = serde_json::to_vec_pretty(value)
            .map_err(|e| StoreError::Other(anyhow::Error::new(e)))?;

        self.inner
            .put(&ObjectPath::from(key), PutPayload::from(body))
            .await?;

        debug!(bucket = %self.bucket, key, "uploaded json");
        Ok(())
    }

    /// Read an object back.
    pub async fn get(&self, key: &str) -> StoreResult<Bytes> {
        let result = self.inner.get(&ObjectPath::from(key)).await?;
        Ok(result.bytes().await?)
    }
}
