//! Xray client for test sets, test executions and result import.
//!
//! Public API: no status code knowledge. All HTTP/status mapping in http.rs.

use std::time::Duration;

use qaport_core::ResultEntry;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE, USER_AGENT};
use tracing::{debug, info};

use crate::config::XrayConfig;
use crate::error::{XrayError, XrayResult};
use crate::types::{
    AddTestsRequest, CreateIssueFields, CreateIssueRequest, CreatedIssue, ImportRequest,
    ImportTest, Issue, KeyRef, NameRef, SearchResponse,
};

mod helpers;
mod http;

use helpers::{keys_jql, test_set_jql, test_set_members_jql, truncate_chars};
use http::HttpBackend;

pub const XRAY_USER_AGENT: &str = concat!("qaport-xray/", env!("CARGO_PKG_VERSION"));

const SEARCH_ENDPOINT: &str = "/rest/api/2/search";
const ISSUE_ENDPOINT: &str = "/rest/api/2/issue";
const IMPORT_ENDPOINT: &str = "/rest/raven/1.0/import/execution";

const TEST_SET_SEARCH_LIMIT: usize = 10;
const TEST_SET_MEMBER_LIMIT: usize = 1000;
const BULK_BATCH_SIZE: usize = 100;

/// Xray rejects longer comments.
pub const MAX_COMMENT_CHARS: usize = 32_000;

const EXECUTION_ISSUE_TYPE: &str = "Test Execution";
const EXECUTION_PRIORITY: &str = "P3: Standard";

const SLOW_TIMEOUT: Duration = Duration::from_secs(60);
const IMPORT_TIMEOUT: Duration = Duration::from_secs(120);

/// Client for a Jira instance with Xray installed.
#[derive(Debug, Clone)]
pub struct XrayClient {
    http: HttpBackend,
    timeout: Duration,
}

impl XrayClient {
    pub fn new(config: XrayConfig) -> XrayResult<Self> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(USER_AGENT, HeaderValue::from_static(XRAY_USER_AGENT));
        default_headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(default_headers)
            .build()
            .map_err(|e| XrayError::Network {
                message: format!("failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            http: HttpBackend {
                client,
                base_url: config.url.trim_end_matches('/').to_string(),
                token: config.token,
            },
            timeout: Duration::from_secs(config.timeout_secs),
        })
    }

    pub fn from_env() -> XrayResult<Self> {
        Self::new(XrayConfig::from_env()?)
    }

    /// Jira base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.http.base_url
    }

    /// Find a Test Set in `project_key` whose summary is exactly `name`.
    ///
    /// JQL `~` is a fuzzy match, so the candidates are filtered client side.
    pub async fn find_test_set(&self, project_key: &str, name: &str) -> XrayResult<Option<Issue>> {
        debug!(project = project_key, test_set = name, "searching test set");

        let query = [
            ("jql", test_set_jql(project_key, name)),
            ("maxResults", TEST_SET_SEARCH_LIMIT.to_string()),
        ];
        let response: SearchResponse = self
            .http
            .get_json(SEARCH_ENDPOINT, &query, self.timeout)
            .await?;

        Ok(response
            .issues
            .into_iter()
            .find(|issue| issue.fields.summary == name))
    }

    /// Keys of the tests that belong to a Test Set.
    pub async fn test_set_members(&self, test_set_key: &str) -> XrayResult<Vec<String>> {
        debug!(test_set = test_set_key, "listing test set members");

        let query = [
            ("jql", test_set_members_jql(test_set_key)),
            ("maxResults", TEST_SET_MEMBER_LIMIT.to_string()),
            ("fields", "key".to_string()),
        ];
        let response: SearchResponse = self
            .http
            .get_json(SEARCH_ENDPOINT, &query, SLOW_TIMEOUT)
            .await?;

        Ok(response.issues.into_iter().map(|issue| issue.key).collect())
    }

    /// Fetch issues with their summaries, one search per batch of keys.
    pub async fn issues_bulk(&self, keys: &[String]) -> XrayResult<Vec<Issue>> {
        let mut issues = Vec::with_capacity(keys.len());

        for batch in keys.chunks(BULK_BATCH_SIZE) {
            debug!(count = batch.len(), "fetching issue batch");
            let query = [
                ("jql", keys_jql(batch)),
                ("maxResults", batch.len().to_string()),
                ("fields", "summary".to_string()),
            ];
            let response: SearchResponse = self
                .http
                .get_json(SEARCH_ENDPOINT, &query, SLOW_TIMEOUT)
                .await?;
            issues.extend(response.issues);
        }

        Ok(issues)
    }

    /// Create a Test Execution issue and return its key.
    pub async fn create_test_execution(
        &self,
        project_key: &str,
        summary: &str,
        description: &str,
    ) -> XrayResult<String> {
        let body = CreateIssueRequest {
            fields: CreateIssueFields {
                project: KeyRef { key: project_key },
                summary,
                description,
                issuetype: NameRef {
                    name: EXECUTION_ISSUE_TYPE,
                },
                priority: NameRef {
                    name: EXECUTION_PRIORITY,
                },
            },
        };

        let value = self
            .http
            .post_json(ISSUE_ENDPOINT, &body, self.timeout)
            .await?;
        let created: CreatedIssue =
            serde_json::from_value(value).map_err(|e| XrayError::InvalidResponse {
                message: format!("failed to parse created issue: {}", e),
            })?;

        info!(key = %created.key, "created test execution");
        Ok(created.key)
    }

    /// Attach tests to an execution.
    pub async fn add_tests_to_execution(
        &self,
        execution_key: &str,
        test_keys: &[String],
    ) -> XrayResult<()> {
        debug!(execution = execution_key, count = test_keys.len(), "adding tests");

        let endpoint = format!("/rest/raven/1.0/api/testexec/{}/test", execution_key);
        self.http
            .post_json(&endpoint, &AddTestsRequest { add: test_keys }, SLOW_TIMEOUT)
            .await?;
        Ok(())
    }

    /// Import per-test results into an execution. Returns Xray's response body.
    pub async fn import_execution_results(
        &self,
        execution_key: &str,
        entries: &[ResultEntry],
    ) -> XrayResult<serde_json::Value> {
        debug!(execution = execution_key, count = entries.len(), "importing results");

        let body = ImportRequest {
            test_execution_key: execution_key,
            tests: entries.iter().map(import_test).collect(),
        };
        self.http
            .post_json(IMPORT_ENDPOINT, &body, IMPORT_TIMEOUT)
            .await
    }
}

fn import_test(entry: &ResultEntry) -> ImportTest {
    ImportTest {
        test_key: entry.key.clone(),
        status: entry.status.as_str().to_string(),
        comment: truncate_chars(&entry.comment, MAX_COMMENT_CHARS).to_string(),
    }
}
