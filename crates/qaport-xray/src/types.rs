//! Request and response bodies of the Jira and Xray REST APIs.

use serde::{Deserialize, Serialize};

/// Response from `GET /rest/api/2/search`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub issues: Vec<Issue>,
}

/// A Jira issue, reduced to the fields we ask for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub key: String,

    #[serde(default)]
    pub fields: IssueFields,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueFields {
    #[serde(default)]
    pub summary: String,
}

/// Response from `POST /rest/api/2/issue`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedIssue {
    pub key: String,

    #[serde(default)]
    pub id: Option<String>,

    #[serde(rename = "self", default)]
    pub self_url: Option<String>,
}

/// Body of `POST /rest/api/2/issue` for a Test Execution.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct CreateIssueRequest<'a> {
    pub fields: CreateIssueFields<'a>,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct CreateIssueFields<'a> {
    pub project: KeyRef<'a>,
    pub summary: &'a str,
    pub description: &'a str,
    pub issuetype: NameRef<'a>,
    pub priority: NameRef<'a>,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct KeyRef<'a> {
    pub key: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct NameRef<'a> {
    pub name: &'a str,
}

/// Body of `POST /rest/raven/1.0/api/testexec/{key}/test`.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct AddTestsRequest<'a> {
    pub add: &'a [String],
}

/// Body of `POST /rest/raven/1.0/import/execution`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ImportRequest<'a> {
    pub test_execution_key: &'a str,
    pub tests: Vec<ImportTest>,
}

/// One result line of an execution import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportTest {
    pub test_key: String,
    pub status: String,
    pub comment: String,
}
