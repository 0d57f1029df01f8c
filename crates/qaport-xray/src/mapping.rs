//! On-disk `test name → test key` table.
//!
//! The cache is a flat JSON object. A missing or corrupt file reads as an
//! empty mapping so a bad cache only costs a refresh from Xray.

use std::path::{Path, PathBuf};

use qaport_core::TestMapping;
use tokio::fs;
use tracing::{debug, info, warn};

use crate::client::XrayClient;
use crate::error::{XrayError, XrayResult};

pub const DEFAULT_MAPPING_FILE: &str = "xray_test_mapping.json";

/// Mapping cache backed by a JSON file.
#[derive(Debug, Clone)]
pub struct MappingCache {
    path: PathBuf,
}

impl Default for MappingCache {
    fn default() -> Self {
        Self::new(DEFAULT_MAPPING_FILE)
    }
}

impl MappingCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the mapping. Never fails.
    pub async fn load(&self) -> TestMapping {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no mapping cache");
                return TestMapping::new();
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "failed to read mapping cache");
                return TestMapping::new();
            }
        };

        match serde_json::from_str::<TestMapping>(&content) {
            Ok(mapping) => {
                debug!(path = %self.path.display(), entries = mapping.len(), "loaded mapping cache");
                mapping
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "corrupt mapping cache, ignoring");
                TestMapping::new()
            }
        }
    }

    /// Persist the mapping as pretty JSON.
    pub async fn save(&self, mapping: &TestMapping) -> XrayResult<()> {
        let content = serde_json::to_string_pretty(mapping).map_err(|e| XrayError::Cache {
            message: format!("failed to serialize mapping: {}", e),
        })?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| XrayError::Cache {
                    message: format!("failed to create cache directory: {}", e),
                })?;
        }

        write_atomic(&self.path, &content).await?;
        info!(path = %self.path.display(), entries = mapping.len(), "saved mapping cache");
        Ok(())
    }

    /// Build a fresh mapping from the members of a Test Set.
    ///
    /// Keys are test summaries, values are issue keys. A missing Test Set or
    /// one without members yields an empty mapping.
    pub async fn fetch_from_xray(
        client: &XrayClient,
        project_key: &str,
        test_set_name: &str,
    ) -> XrayResult<TestMapping> {
        let Some(test_set) = client.find_test_set(project_key, test_set_name).await? else {
            warn!(project = project_key, test_set = test_set_name, "test set not found");
            return Ok(TestMapping::new());
        };

        let members = client.test_set_members(&test_set.key).await?;
        if members.is_empty() {
            warn!(test_set = %test_set.key, "test set has no tests");
            return Ok(TestMapping::new());
        }

        let mapping: TestMapping = client
            .issues_bulk(&members)
            .await?
            .into_iter()
            .filter(|issue| !issue.fields.summary.is_empty())
            .map(|issue| (issue.fields.summary, issue.key))
            .collect();

        info!(test_set = %test_set.key, entries = mapping.len(), "fetched mapping from xray");
        Ok(mapping)
    }
}

async fn write_atomic(path: &Path, content: &str) -> XrayResult<()> {
    let temp_path = path.with_extension("tmp");

    fs::write(&temp_path, content)
        .await
        .map_err(|e| XrayError::Cache {
            message: format!("failed to write temp file: {}", e),
        })?;

    fs::rename(&temp_path, path)
        .await
        .map_err(|e| XrayError::Cache {
            message: format!("failed to rename temp file: {}", e),
        })?;

    Ok(())
}
