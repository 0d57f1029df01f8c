//! Collapse parametrized variations into one result per logical test.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::junit::{ParsedResults, TestRecord};
use crate::status::TestStatus;

/// Clean test name → external test key.
pub type TestMapping = BTreeMap<String, String>;

/// Failed variations listed in the failure block of a comment.
const MAX_FAILURE_DETAILS: usize = 5;

/// Characters of each failure detail kept in a comment.
const MAX_DETAIL_CHARS: usize = 1000;

/// All variations of one matched clean name.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedResult {
    pub key: String,
    pub status: TestStatus,
    /// In encounter order.
    pub variations: Vec<TestRecord>,
    pub total_duration: f64,
}

impl AggregatedResult {
    fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            status: TestStatus::Pass,
            variations: Vec::new(),
            total_duration: 0.0,
        }
    }

    fn add_variation(&mut self, record: TestRecord) {
        self.total_duration += record.duration;
        self.status = self.status.merge(record.status);
        self.variations.push(record);
    }

    /// Human-readable comment listing every variation and the first failures.
    pub fn build_comment(&self) -> String {
        let mut lines = Vec::with_capacity(self.variations.len() + 2);

        if self.variations.len() > 1 {
            lines.push(format!(
                "Parametrized test with {} variations:\n",
                self.variations.len()
            ));
        }

        for var in &self.variations {
            lines.push(format!(
                "{} {} - {} ({:.2}s)",
                var.status.icon(),
                var.full_name,
                var.status,
                var.duration
            ));
        }

        let mut failed = self
            .variations
            .iter()
            .filter(|v| v.status == TestStatus::Fail && !v.detail.is_empty())
            .peekable();
        if failed.peek().is_some() {
            lines.push("\n--- Failure Details ---".to_string());
            for var in failed.take(MAX_FAILURE_DETAILS) {
                lines.push(format!("\n{}:", var.full_name));
                lines.push(var.detail.chars().take(MAX_DETAIL_CHARS).collect());
            }
        }

        lines.join("\n")
    }

    /// Freeze the group into the entry sent to the test-management system.
    pub fn to_entry(&self) -> ResultEntry {
        ResultEntry {
            key: self.key.clone(),
            status: self.status,
            comment: self.build_comment(),
            duration: self.total_duration,
        }
    }
}

/// Finalized result for one external test key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultEntry {
    pub key: String,
    pub status: TestStatus,
    pub comment: String,
    pub duration: f64,
}

/// Output of [`aggregate`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregation {
    /// One group per matched clean name, in first-encounter order.
    pub matched: Vec<AggregatedResult>,
    /// Clean names missing from the mapping, deduplicated, first-seen order.
    pub unmatched: Vec<String>,
}

impl Aggregation {
    /// External keys of all matched groups.
    pub fn keys(&self) -> Vec<String> {
        self.matched.iter().map(|group| group.key.clone()).collect()
    }

    pub fn entries(&self) -> Vec<ResultEntry> {
        self.matched.iter().map(AggregatedResult::to_entry).collect()
    }

    /// Number of records that landed in a matched group.
    pub fn matched_variations(&self) -> usize {
        self.matched.iter().map(|group| group.variations.len()).sum()
    }
}

/// Group records by clean name and match each group against `mapping`.
pub fn aggregate(results: &ParsedResults, mapping: &TestMapping) -> Aggregation {
    let mut matched: Vec<AggregatedResult> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut unmatched = Vec::new();
    let mut unmatched_seen: HashSet<&str> = HashSet::new();

    for record in &results.records {
        let name = record.clean_name.as_str();
        let Some(key) = mapping.get(name) else {
            if unmatched_seen.insert(name) {
                unmatched.push(name.to_string());
            }
            continue;
        };

        let slot = *index.entry(name).or_insert_with(|| {
            matched.push(AggregatedResult::new(key.as_str()));
            matched.len() - 1
        });
        matched[slot].add_variation(record.clone());
    }

    tracing::debug!(
        matched = matched.len(),
        unmatched = unmatched.len(),
        "aggregated results"
    );

    Aggregation { matched, unmatched }
}
