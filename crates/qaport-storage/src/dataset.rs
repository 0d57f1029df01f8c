//! Dataset discovery, object keys and the stream sidecar documents.

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::debug;

use crate::error::{StoreError, StoreResult};

/// macOS folder metadata, never part of a dataset.
const IGNORED_FILE: &str = ".DS_Store";

const DATASET_OWNER: &str = "qa";

/// What kind of media a directory holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetKind {
    /// Always uploaded to a versioned bucket.
    Movie,
    /// Never versioned; gets `_meta.json` and `_index.json` sidecars.
    Stream,
}

impl DatasetKind {
    /// Versioning is fixed by the kind, whatever the caller asked for.
    pub fn versioning(self) -> bool {
        matches!(self, Self::Movie)
    }

    pub fn has_sidecars(self) -> bool {
        matches!(self, Self::Stream)
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Movie => f.write_str("movie"),
            Self::Stream => f.write_str("stream"),
        }
    }
}

/// A file that will be uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetFile {
    pub name: String,
    pub path: PathBuf,
    pub size: u64,
    pub last_modified: DateTime<Utc>,
}

/// Regular files directly inside `dir`, sorted by name.
///
/// Subdirectories and `.DS_Store` are skipped.
pub async fn collect_files(dir: &Path) -> StoreResult<Vec<DatasetFile>> {
    let metadata = fs::metadata(dir)
        .await
        .map_err(|e| StoreError::io(dir.display(), e))?;
    if !metadata.is_dir() {
        return Err(StoreError::InvalidConfig {
            message: format!("not a directory: {}", dir.display()),
        });
    }

    let mut entries = fs::read_dir(dir)
        .await
        .map_err(|e| StoreError::io(dir.display(), e))?;
    let mut files = Vec::new();

    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| StoreError::io(dir.display(), e))?
    {
        let path = entry.path();
        let Some(name) = entry.file_name().to_str().map(str::to_string) else {
            debug!(path = %path.display(), "skipping non UTF-8 file name");
            continue;
        };
        if name == IGNORED_FILE {
            continue;
        }

        let metadata = fs::metadata(&path)
            .await
            .map_err(|e| StoreError::io(path.display(), e))?;
        if !metadata.is_file() {
            continue;
        }

        let last_modified = metadata
            .modified()
            .map(DateTime::<Utc>::from)
            .map_err(|e| StoreError::io(path.display(), e))?;

        files.push(DatasetFile {
            name,
            path,
            size: metadata.len(),
            last_modified,
        });
    }

    files.sort_by(|a, b| a.name.cmp(&b.name));
    debug!(dir = %dir.display(), count = files.len(), "collected dataset files");
    Ok(files)
}

/// Object key of a dataset file.
pub fn object_key(prefix: &str, name: &str) -> String {
    format!("{}{}", prefix, name)
}

/// Object key of a sidecar document, e.g. `{prefix}_meta.json`.
pub fn sidecar_key(prefix: &str, sidecar: &str) -> String {
    format!("{}_{}.json", prefix, sidecar)
}

/// `{prefix}_meta.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetMetadata {
    pub dataset: String,
    pub created_at: String,
    pub file_count: usize,
    pub owner: String,
}

/// `{prefix}_index.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetIndex {
    pub dataset: String,
    pub files: Vec<IndexEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub name: String,
    pub size: u64,
    pub last_modified: String,
}

pub fn build_metadata(prefix: &str, file_count: usize, now: DateTime<Utc>) -> DatasetMetadata {
    DatasetMetadata {
        dataset: prefix.to_string(),
        created_at: utc_timestamp(now),
        file_count,
        owner: DATASET_OWNER.to_string(),
    }
}

pub fn build_index(prefix: &str, files: &[DatasetFile]) -> DatasetIndex {
    let mut entries: Vec<IndexEntry> = files
        .iter()
        .map(|f| IndexEntry {
            name: f.name.clone(),
            size: f.size,
            last_modified: utc_timestamp(f.last_modified),
        })
        .collect();
    entries.sort_by(|a, b| a.name.cmp(&b.name));

    DatasetIndex {
        dataset: prefix.to_string(),
        files: entries,
    }
}

fn utc_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Create `{dir}/{name}.{extension}` as a sparse file of exactly `size_bytes`.
///
/// The directory is created if needed and an existing file is truncated.
pub async fn generate_test_file(
    name: &str,
    extension: &str,
    size_bytes: u64,
    dir: &Path,
) -> StoreResult<PathBuf> {
    fs::create_dir_all(dir)
        .await
        .map_err(|e| StoreError::io(dir.display(), e))?;

    let path = dir.join(format!("{}.{}", name, extension));
    let file = fs::File::create(&path)
        .await
        .map_err(|e| StoreError::io(path.display(), e))?;
    file.set_len(size_bytes)
        .await
        .map_err(|e| StoreError::io(path.display(), e))?;

    debug!(path = %path.display(), size_bytes, "generated test file");
    Ok(path)
}
