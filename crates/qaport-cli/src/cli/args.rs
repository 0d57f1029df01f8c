use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use qaport_storage::DatasetKind;

#[derive(Parser)]
#[command(
    name = "qaport",
    version,
    about = "Report JUnit results to Xray and upload QA datasets to S3"
)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Import a JUnit XML report into an Xray Test Execution
    Import(ImportArgs),
    /// Upload a directory of movie or stream files to an S3 bucket
    Upload(UploadArgs),
    /// Create a sparse file of a given size (upload fixtures)
    Generate(GenerateArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ImportArgs {
    /// Path to the JUnit XML file
    #[arg(long)]
    pub junit_xml: PathBuf,

    /// Jira project key
    #[arg(long, default_value = "LCTEST")]
    pub project_key: String,

    /// Test Set whose members make up the name → key mapping
    #[arg(long, default_value = "rs-automation")]
    pub test_set: String,

    /// Test environment (e.g. qa7)
    #[arg(long)]
    pub test_environment: Option<String>,

    /// Software version under test
    #[arg(long)]
    pub version: Option<String>,

    /// Custom Test Execution summary
    #[arg(long)]
    pub execution_summary: Option<String>,

    /// Report into an existing Test Execution instead of creating one
    #[arg(long)]
    pub execution_key: Option<String>,

    /// Ignore the mapping cache and rebuild it from the Test Set
    #[arg(long)]
    pub refresh_mapping: bool,

    /// Parse and match only; create nothing in Jira
    #[arg(long)]
    pub dry_run: bool,

    /// Mapping cache file
    #[arg(long, default_value = qaport_xray::DEFAULT_MAPPING_FILE)]
    pub mapping_file: PathBuf,

    /// Where to write the run-info JSON
    #[arg(long, default_value = "xray_execution_info.json")]
    pub info_out: PathBuf,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum FileType {
    Movie,
    Stream,
}

impl From<FileType> for DatasetKind {
    fn from(value: FileType) -> Self {
        match value {
            FileType::Movie => DatasetKind::Movie,
            FileType::Stream => DatasetKind::Stream,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct UploadArgs {
    /// Local directory containing files
    #[arg(long)]
    pub dir_path: PathBuf,

    /// File type to process
    #[arg(long, value_enum)]
    pub file_type: FileType,

    /// Target bucket name (at least 3 characters)
    #[arg(long, value_parser = parse_bucket_name)]
    pub bucket_name: String,

    /// Object key prefix
    #[arg(long, default_value = "")]
    pub prefix: String,

    /// Enable bucket versioning (movie always versions, stream never does)
    #[arg(long)]
    pub versioning: bool,

    /// Expire objects after N days
    #[arg(long, value_name = "DAYS", value_parser = clap::value_parser!(u32).range(1..))]
    pub lifecycle: Option<u32>,

    /// S3-compatible endpoint URL
    #[arg(long, env = "QAPORT_S3_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Bucket region
    #[arg(long, env = "AWS_REGION")]
    pub region: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    /// File name without extension
    #[arg(long)]
    pub name: String,

    /// File extension (e.g. mp4, ts)
    #[arg(long)]
    pub extension: String,

    /// Size in GiB (fractions allowed)
    #[arg(long, value_parser = parse_size_gb)]
    pub size_gb: f64,

    /// Output directory (created if missing)
    #[arg(long, default_value = ".")]
    pub dir_path: PathBuf,
}

fn parse_bucket_name(value: &str) -> Result<String, String> {
    qaport_storage::validate_bucket_name(value)
        .map(|()| value.to_string())
        .map_err(|e| e.to_string())
}

fn parse_size_gb(value: &str) -> Result<f64, String> {
    let size: f64 = value
        .parse()
        .map_err(|_| format!("'{}' is not a number", value))?;
    if !size.is_finite() || size < 0.0 {
        return Err("size must be a non-negative number".to_string());
    }
    Ok(size)
}
