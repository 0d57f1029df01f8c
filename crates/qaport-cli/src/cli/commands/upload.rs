//! `qaport upload`: local dataset directory → S3 bucket.

use anyhow::{Context, Result};
use chrono::Utc;
use qaport_storage::{
    collect_files, prepare_bucket, upload_dataset, CreateOutcome, DatasetKind, ObjectUploader,
    S3BucketAdmin, StoreConfig, StoreError, UploadPlan,
};
use tracing::warn;

use crate::cli::args::UploadArgs;
use crate::exit_codes::SUCCESS;

pub async fn run(args: UploadArgs) -> Result<i32> {
    let kind = DatasetKind::from(args.file_type);

    let files = collect_files(&args.dir_path)
        .await
        .map_err(|e| match e {
            StoreError::NotFound { .. } => {
                anyhow::anyhow!("Directory not found: {}", args.dir_path.display())
            }
            other => anyhow::Error::new(other),
        })?;

    let plan = UploadPlan::new(&args.bucket_name, &args.prefix, kind, args.lifecycle);
    if args.versioning != plan.versioning {
        warn!(
            kind = %kind,
            requested = args.versioning,
            effective = plan.versioning,
            "versioning flag ignored for this file type"
        );
    }

    let config = StoreConfig::new(&args.bucket_name)?
        .with_endpoint(args.endpoint.clone())
        .with_region(args.region.clone());

    println!("S3 client connection");
    let admin = S3BucketAdmin::from_config(&config).await;
    let uploader = ObjectUploader::from_config(&config)?;

    println!("Bucket creation");
    let outcome = prepare_bucket(&admin, &plan)
        .await
        .map_err(|e| upload_failed(e, &plan))?;
    if outcome == CreateOutcome::AlreadyExists {
        println!("Bucket already exists and is owned by you");
    }

    println!("Uploading files:");
    let report = upload_dataset(&uploader, &plan, &files, Utc::now(), |file| {
        println!("{}", file.name)
    })
    .await
    .map_err(|e| upload_failed(e, &plan))?;

    for key in &report.sidecars {
        println!("{}", key);
    }
    println!(
        "Uploaded {} files ({} bytes) to {}",
        report.uploaded.len(),
        report.bytes,
        plan.bucket
    );

    Ok(SUCCESS)
}

fn upload_failed(e: StoreError, plan: &UploadPlan) -> anyhow::Error {
    let hint = if e.is_access_denied() {
        " (check AWS credentials)"
    } else {
        ""
    };
    anyhow::Error::new(e).context(format!("upload to bucket '{}' failed{}", plan.bucket, hint))
}
