//! AWS SDK implementation of [`BucketAdmin`].

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata};
use aws_sdk_s3::types::{
    BucketLifecycleConfiguration, BucketLocationConstraint, BucketVersioningStatus,
    CreateBucketConfiguration, ExpirationStatus, LifecycleExpiration,
    LifecycleRule as S3LifecycleRule, LifecycleRuleFilter, NoncurrentVersionExpiration,
    VersioningConfiguration,
};
use aws_sdk_s3::Client as S3Client;
use tracing::{debug, info};

use crate::bucket::{BucketAdmin, CreateOutcome, LifecycleRule, VersioningStatus};
use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};

/// Region where buckets are created without a location constraint.
const DEFAULT_REGION: &str = "us-east-1";

/// Bucket administration through the AWS SDK.
pub struct S3BucketAdmin {
    s3_client: S3Client,
    region: Option<String>,
}

impl S3BucketAdmin {
    /// Build a client from the default credential chain.
    ///
    /// A custom endpoint switches to path-style addressing, which is what
    /// S3-compatible servers expect.
    pub async fn from_config(config: &StoreConfig) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = &config.region {
            loader = loader.region(aws_sdk_s3::config::Region::new(region.clone()));
        }
        if let Some(endpoint) = &config.endpoint {
            loader = loader.endpoint_url(endpoint);
        }
        let sdk_config = loader.load().await;

        let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(config.endpoint.is_some())
            .build();

        let region = config
            .region
            .clone()
            .or_else(|| sdk_config.region().map(|r| r.to_string()));

        Self {
            s3_client: S3Client::from_conf(s3_config),
            region,
        }
    }

    /// Create an admin from an existing S3Client.
    pub fn from_client(s3_client: S3Client, region: Option<String>) -> Self {
        Self { s3_client, region }
    }

    fn location_constraint(&self) -> Option<CreateBucketConfiguration> {
        self.region
            .as_deref()
            .filter(|region| *region != DEFAULT_REGION)
            .map(|region| {
                CreateBucketConfiguration::builder()
                    .location_constraint(BucketLocationConstraint::from(region))
                    .build()
            })
    }
}

#[async_trait]
impl BucketAdmin for S3BucketAdmin {
    async fn create_bucket(&self, bucket: &str) -> StoreResult<CreateOutcome> {
        let mut request = self.s3_client.create_bucket().bucket(bucket);
        if let Some(configuration) = self.location_constraint() {
            request = request.create_bucket_configuration(configuration);
        }

        match request.send().await {
            Ok(_) => {
                info!(bucket, "bucket created");
                Ok(CreateOutcome::Created)
            }
            Err(err) => {
                let service_err = err.into_service_error();
                if service_err.is_bucket_already_owned_by_you() {
                    debug!(bucket, "bucket already owned by caller");
                    Ok(CreateOutcome::AlreadyExists)
                } else {
                    Err(bucket_error(bucket, &service_err))
                }
            }
        }
    }

    async fn set_versioning(&self, bucket: &str, status: VersioningStatus) -> StoreResult<()> {
        let status = match status {
            VersioningStatus::Enabled => BucketVersioningStatus::Enabled,
            VersioningStatus::Suspended => BucketVersioningStatus::Suspended,
        };

        self.s3_client
            .put_bucket_versioning()
            .bucket(bucket)
            .versioning_configuration(VersioningConfiguration::builder().status(status).build())
            .send()
            .await
            .map_err(|err| bucket_error(bucket, &err.into_service_error()))?;

        info!(bucket, "bucket versioning updated");
        Ok(())
    }

    async fn put_lifecycle(&self, bucket: &str, rule: &LifecycleRule) -> StoreResult<()> {
        let configuration = lifecycle_configuration(rule)?;

        self.s3_client
            .put_bucket_lifecycle_configuration()
            .bucket(bucket)
            .lifecycle_configuration(configuration)
            .send()
            .await
            .map_err(|err| bucket_error(bucket, &err.into_service_error()))?;

        info!(bucket, rule = %rule.id, days = rule.expiration_days, "lifecycle rule set");
        Ok(())
    }
}

fn lifecycle_configuration(rule: &LifecycleRule) -> StoreResult<BucketLifecycleConfiguration> {
    let mut builder = S3LifecycleRule::builder()
        .id(&rule.id)
        .status(ExpirationStatus::Enabled)
        .filter(LifecycleRuleFilter::builder().prefix(&rule.prefix).build())
        .expiration(
            LifecycleExpiration::builder()
                .days(days_i32(rule.expiration_days)?)
                .build(),
        );

    if let Some(days) = rule.noncurrent_expiration_days {
        builder = builder.noncurrent_version_expiration(
            NoncurrentVersionExpiration::builder()
                .noncurrent_days(days_i32(days)?)
                .build(),
        );
    }

    let s3_rule = builder
        .build()
        .map_err(|e| StoreError::Other(anyhow::Error::new(e)))?;

    BucketLifecycleConfiguration::builder()
        .rules(s3_rule)
        .build()
        .map_err(|e| StoreError::Other(anyhow::Error::new(e)))
}

fn days_i32(days: u32) -> StoreResult<i32> {
    i32::try_from(days).map_err(|_| StoreError::InvalidConfig {
        message: format!("lifecycle days out of range: {}", days),
    })
}

fn bucket_error<E>(bucket: &str, err: &E) -> StoreError
where
    E: ProvideErrorMetadata + std::error::Error,
{
    if matches!(err.code(), Some("AccessDenied") | Some("InvalidAccessKeyId")) {
        return StoreError::AccessDenied {
            message: format!("{}: {}", bucket, DisplayErrorContext(err)),
        };
    }
    StoreError::Bucket {
        bucket: bucket.to_string(),
        message: DisplayErrorContext(err).to_string(),
    }
}
