//! Jira Server/DC + Xray client for importing test results.
//!
//! This crate provides:
//!
//! - [`XrayClient`]: bearer-token HTTP client for test sets, test executions
//!   and result import
//! - [`MappingCache`]: the on-disk `test name → test key` table, refreshable
//!   from a Test Set
//!
//! # Configuration
//!
//! | Environment Variable | Description |
//! |---------------------|-------------|
//! | `JIRA_URL` | Jira base URL (required) |
//! | `JIRA_TOKEN` | Personal access token (required) |
//! | `QAPORT_XRAY_TIMEOUT` | Base request timeout in seconds (default: 30) |
//!
//! Requests are never retried: any failure is returned to the caller as is.

pub mod client;
pub mod config;
pub mod error;
pub mod mapping;
pub mod types;

pub use client::{XrayClient, XRAY_USER_AGENT};
pub use config::XrayConfig;
pub use error::{XrayError, XrayResult};
pub use mapping::{MappingCache, DEFAULT_MAPPING_FILE};
pub use types::{CreatedIssue, ImportTest, Issue, IssueFields, SearchResponse};
