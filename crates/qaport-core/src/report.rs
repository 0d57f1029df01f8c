//! Run summaries and the persisted run-info record.
//!
//! Formatting is pure: callers pass the clock value in, so the same inputs
//! always give the same text.

use std::fmt::Display;
use std::path::Path;

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};

use crate::aggregate::Aggregation;
use crate::junit::RunCounts;

const SUMMARY_PREFIX: &str = "Automated Test Run";
const HUMAN_TIMESTAMP: &str = "%Y-%m-%d %H:%M:%S";

/// Run parameters supplied on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunParams {
    pub environment: Option<String>,
    pub version: Option<String>,
    /// Overrides the generated summary entirely.
    pub custom_summary: Option<String>,
}

fn present(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|v| !v.is_empty())
}

/// Title of the execution record.
///
/// A custom summary wins unchanged; otherwise `Automated Test Run`, then the
/// environment and version when present, then the timestamp, joined by ` - `.
pub fn summary<Tz>(params: &RunParams, now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    if let Some(custom) = present(params.custom_summary.as_ref()) {
        return custom.to_string();
    }

    let timestamp = now.format(HUMAN_TIMESTAMP).to_string();
    let mut parts = vec![SUMMARY_PREFIX];
    parts.extend(present(params.environment.as_ref()));
    parts.extend(present(params.version.as_ref()));
    parts.push(&timestamp);
    parts.join(" - ")
}

/// Body text of the execution record.
pub fn description<Tz>(counts: &RunCounts, now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    format!(
        "Automated test execution from pytest\n\n\
         Results: {} passed, {} failed, {} skipped\n\
         Total: {} tests\n\
         Timestamp: {}",
        counts.passed,
        counts.failed,
        counts.skipped,
        counts.total,
        now.format(HUMAN_TIMESTAMP)
    )
}

/// Counters block of [`RunInfo`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunResultsInfo {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    /// Matched groups (one per external key).
    pub matched: usize,
    /// Distinct unmatched clean names.
    pub unmatched: usize,
}

/// Durable record of one import run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunInfo {
    pub execution_key: String,
    pub execution_url: String,
    pub timestamp: String,
    pub environment: Option<String>,
    pub version: Option<String>,
    pub results: RunResultsInfo,
}

impl RunInfo {
    pub fn new<Tz>(
        execution_key: &str,
        base_url: &str,
        params: &RunParams,
        counts: &RunCounts,
        aggregation: &Aggregation,
        now: &DateTime<Tz>,
    ) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        Self {
            execution_key: execution_key.to_string(),
            execution_url: browse_url(base_url, execution_key),
            timestamp: now.to_rfc3339(),
            environment: params.environment.clone(),
            version: params.version.clone(),
            results: RunResultsInfo {
                total: counts.total,
                passed: counts.passed,
                failed: counts.failed,
                skipped: counts.skipped,
                matched: aggregation.matched.len(),
                unmatched: aggregation.unmatched.len(),
            },
        }
    }

    /// Write as pretty-printed JSON.
    pub fn write_to(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(path, json)
    }

    pub fn read_from(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(std::io::Error::other)
    }
}

/// Link to an issue in the Jira web UI.
pub fn browse_url(base_url: &str, issue_key: &str) -> String {
    format!("{}/browse/{}", base_url.trim_end_matches('/'), issue_key)
}
