#![allow(deprecated)]
//! Contract tests for `qaport import`: exit codes, printed steps, run-info file.

use std::fs;
use std::path::Path;

use assert_cmd::assert::OutputAssertExt;
use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{json, Value};
use tempfile::{tempdir, TempDir};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const REPORT: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<testsuites>
  <testsuite name="pytest" tests="3">
    <testcase classname="tests.test_auth" name="test_login[admin]" time="0.50"/>
    <testcase classname="tests.test_auth" name="test_login[guest]" time="0.25">
      <failure message="AssertionError: 403">assert resp.status == 200</failure>
    </testcase>
    <testcase classname="tests.test_misc" name="test_other" time="0.10">
      <skipped type="pytest.skip" message="no driver"/>
    </testcase>
  </testsuite>
</testsuites>
"#;

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new(mapping: Option<Value>) -> Self {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("report.xml"), REPORT).unwrap();
        if let Some(mapping) = mapping {
            fs::write(
                dir.path().join("mapping.json"),
                serde_json::to_string_pretty(&mapping).unwrap(),
            )
            .unwrap();
        }
        Self { dir }
    }

    fn path(&self, name: &str) -> std::path::PathBuf {
        self.dir.path().join(name)
    }

    fn import(&self, jira_url: &str) -> Command {
        let mut cmd = Command::cargo_bin("qaport").unwrap();
        cmd.current_dir(self.dir.path())
            .env("JIRA_URL", jira_url)
            .env("JIRA_TOKEN", "test-token")
            .env_remove("RUST_LOG")
            .args(["import", "--junit-xml", "report.xml"])
            .args(["--mapping-file", "mapping.json"])
            .args(["--info-out", "info.json"]);
        cmd
    }
}

/// Run the binary off the async runtime so the mock server keeps serving.
async fn run_blocking(mut cmd: Command) -> std::process::Output {
    tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap()
}

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn test_missing_credentials_fail_first() {
    let ws = Workspace::new(None);

    Command::cargo_bin("qaport")
        .unwrap()
        .current_dir(ws.dir.path())
        .env_remove("JIRA_URL")
        .env_remove("JIRA_TOKEN")
        .args(["import", "--junit-xml", "missing.xml"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("JIRA_URL"))
        .stdout(predicate::str::contains("STEP 1").not());
}

#[test]
fn test_dry_run_stops_before_remote_calls() {
    let ws = Workspace::new(Some(json!({ "test_login": "LCTEST-1" })));

    // Port 1 refuses connections, so any remote call would fail the run.
    ws.import("http://127.0.0.1:1")
        .arg("--dry-run")
        .assert()
        .code(0)
        .stdout(predicate::str::contains("[OK] Loaded 1 tests from cache"))
        .stdout(predicate::str::contains(
            "Total: 3 | Passed: 1 | Failed: 1 | Skipped: 1",
        ))
        .stdout(predicate::str::contains("Matched: 1 | Unmatched: 1"))
        .stdout(predicate::str::contains("- test_other"))
        .stdout(predicate::str::contains("DRY RUN - No execution created"));

    assert!(!ws.path("info.json").exists());
}

#[test]
fn test_missing_junit_file() {
    let ws = Workspace::new(Some(json!({ "test_login": "LCTEST-1" })));
    fs::remove_file(ws.path("report.xml")).unwrap();

    ws.import("http://127.0.0.1:1")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("report.xml"))
        .stdout(predicate::str::contains("STEP 3").not());
}

#[test]
fn test_malformed_junit_file() {
    let ws = Workspace::new(Some(json!({ "test_login": "LCTEST-1" })));
    fs::write(ws.path("report.xml"), "<testsuite><testcase name=\"a\">").unwrap();

    ws.import("http://127.0.0.1:1").assert().code(1);
}

#[test]
fn test_no_matched_tests_is_fatal() {
    let ws = Workspace::new(Some(json!({ "test_unrelated": "LCTEST-9" })));

    ws.import("http://127.0.0.1:1")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Matched: 0 | Unmatched: 2"))
        .stderr(predicate::str::contains("No matched tests to report"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_import_end_to_end() {
    let mock_server = MockServer::start().await;
    let ws = Workspace::new(Some(json!({ "test_login": "LCTEST-1" })));

    Mock::given(method("POST"))
        .and(path("/rest/api/2/issue"))
        .and(header("authorization", "Bearer test-token"))
        .and(body_partial_json(json!({
            "fields": {
                "project": { "key": "LCTEST" },
                "summary": "Nightly qa7",
                "issuetype": { "name": "Test Execution" }
            }
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": "1", "key": "LCTEST-500" })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rest/raven/1.0/api/testexec/LCTEST-500/test"))
        .and(body_partial_json(json!({ "add": ["LCTEST-1"] })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rest/raven/1.0/import/execution"))
        .and(body_partial_json(json!({
            "testExecutionKey": "LCTEST-500",
            "tests": [{ "testKey": "LCTEST-1", "status": "FAIL" }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let uri = mock_server.uri();
    let mut cmd = ws.import(&uri);
    cmd.args(["--execution-summary", "Nightly qa7"])
        .args(["--test-environment", "qa7"])
        .args(["--version", "2.1.0"]);

    run_blocking(cmd)
        .await
        .assert()
        .code(0)
        .stdout(predicate::str::contains("[OK] Created: LCTEST-500"))
        .stdout(predicate::str::contains("Tests: 1 imported"))
        .stdout(predicate::str::contains(format!("URL: {}/browse/LCTEST-500", uri)));

    let info = read_json(&ws.path("info.json"));
    assert_eq!(info["execution_key"], "LCTEST-500");
    assert_eq!(info["execution_url"], format!("{}/browse/LCTEST-500", uri));
    assert_eq!(info["environment"], "qa7");
    assert_eq!(info["version"], "2.1.0");
    assert_eq!(
        info["results"],
        json!({ "total": 3, "passed": 1, "failed": 1, "skipped": 1, "matched": 1, "unmatched": 1 })
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_refresh_mapping_and_existing_execution() {
    let mock_server = MockServer::start().await;
    let ws = Workspace::new(Some(json!({ "stale": "LCTEST-0" })));

    Mock::given(method("GET"))
        .and(path("/rest/api/2/search"))
        .and(wiremock::matchers::query_param("maxResults", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "issues": [{ "key": "LCTEST-7", "fields": { "summary": "rs-automation" } }]
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/api/2/search"))
        .and(wiremock::matchers::query_param("fields", "key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "issues": [{ "key": "LCTEST-1" }, { "key": "LCTEST-2" }]
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/api/2/search"))
        .and(wiremock::matchers::query_param("fields", "summary"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "issues": [
                { "key": "LCTEST-1", "fields": { "summary": "test_login" } },
                { "key": "LCTEST-2", "fields": { "summary": "test_other" } }
            ]
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rest/raven/1.0/api/testexec/LCTEST-42/test"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rest/raven/1.0/import/execution"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let mut cmd = ws.import(&mock_server.uri());
    cmd.args(["--refresh-mapping", "--execution-key", "LCTEST-42"]);

    run_blocking(cmd)
        .await
        .assert()
        .code(0)
        .stdout(predicate::str::contains("[OK] Built mapping for 2 tests"))
        .stdout(predicate::str::contains("Using existing: LCTEST-42"))
        .stdout(predicate::str::contains("Tests: 2 imported"));

    let mapping = read_json(&ws.path("mapping.json"));
    assert_eq!(
        mapping,
        json!({ "test_login": "LCTEST-1", "test_other": "LCTEST-2" })
    );

    let requests = mock_server.received_requests().await.unwrap();
    assert!(requests
        .iter()
        .all(|r| r.url.path() != "/rest/api/2/issue"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_remote_failure_is_fatal() {
    let mock_server = MockServer::start().await;
    let ws = Workspace::new(Some(json!({ "test_login": "LCTEST-1" })));

    Mock::given(method("POST"))
        .and(path("/rest/api/2/issue"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&mock_server)
        .await;

    let cmd = ws.import(&mock_server.uri());
    run_blocking(cmd)
        .await
        .assert()
        .code(1)
        .stderr(predicate::str::contains("failed to create Test Execution"))
        .stderr(predicate::str::contains("unauthorized"));

    assert!(!ws.path("info.json").exists());
}
