//! Dataset upload to S3-compatible storage.
//!
//! Bucket administration (create-if-absent, versioning, lifecycle) goes
//! through the AWS SDK behind the [`BucketAdmin`] trait; objects are written
//! with `object_store`. Both sides have in-memory implementations for tests.
//!
//! # Key Schema
//!
//! ```text
//! {prefix}{file_name}     # every dataset file
//! {prefix}_meta.json      # stream datasets only
//! {prefix}_index.json     # stream datasets only
//! ```

pub mod bucket;
pub mod config;
pub mod dataset;
pub mod error;
pub mod publish;
pub mod s3;
pub mod upload;

pub use bucket::{
    BucketAdmin, BucketState, CreateOutcome, LifecycleRule, MemoryBucketAdmin, VersioningStatus,
    LIFECYCLE_RULE_ID,
};
pub use config::{validate_bucket_name, StoreConfig, MIN_BUCKET_NAME_LEN};
pub use dataset::{
    build_index, build_metadata, collect_files, generate_test_file, object_key, sidecar_key,
    DatasetFile, DatasetIndex, DatasetKind, DatasetMetadata, IndexEntry,
};
pub use error::{StoreError, StoreResult};
pub use publish::{prepare_bucket, upload_dataset, UploadPlan, UploadReport};
pub use s3::S3BucketAdmin;
pub use upload::ObjectUploader;
