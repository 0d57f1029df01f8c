//! JUnit XML report parsing.
//!
//! Every `<testcase>` element at any depth becomes one [`TestRecord`], in
//! document order. Only the direct `failure`, `error` and `skipped` children of
//! a testcase decide its status.

use std::path::Path;

use encoding_rs::Encoding;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde::Serialize;
use tracing::debug;

use crate::error::{ParseError, ParseResult};
use crate::status::TestStatus;

const TAG_TEST_CASE: &[u8] = b"testcase";
const TAG_FAILURE: &[u8] = b"failure";
const TAG_ERROR: &[u8] = b"error";
const TAG_SKIPPED: &[u8] = b"skipped";

/// Characters of failure body text kept in a record's detail.
const MAX_BODY_CHARS: usize = 2000;

/// One parsed `<testcase>`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestRecord {
    /// Base name shared by all parametrized variations of the test.
    pub clean_name: String,
    /// Name as reported, parameters included.
    pub full_name: String,
    pub status: TestStatus,
    /// Failure or skip explanation; empty for plain passes.
    pub detail: String,
    /// Elapsed seconds, never negative.
    pub duration: f64,
}

/// Counters over all records of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunCounts {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl RunCounts {
    fn record(&mut self, status: TestStatus) {
        self.total += 1;
        if status.counts_as_passed() {
            self.passed += 1;
        } else if status == TestStatus::Fail {
            self.failed += 1;
        } else {
            self.skipped += 1;
        }
    }
}

/// Output of the parser: records in encounter order plus counters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedResults {
    pub records: Vec<TestRecord>,
    pub counts: RunCounts,
}

impl ParsedResults {
    fn from_records(records: Vec<TestRecord>) -> Self {
        let mut counts = RunCounts::default();
        for record in &records {
            counts.record(record.status);
        }
        Self { records, counts }
    }
}

/// Strip parametrization and trailing description from a reported name.
///
/// Cuts at the first space, then at the first `[`.
pub fn clean_name(full_name: &str) -> &str {
    let head = full_name.split(' ').next().unwrap_or(full_name);
    head.split('[').next().unwrap_or(head)
}

/// Parse a JUnit XML file from disk.
pub fn parse_file(path: impl AsRef<Path>) -> ParseResult<ParsedResults> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(ParseError::not_found(path));
    }

    let source_name = path.display().to_string();
    let bytes = std::fs::read(path).map_err(|e| ParseError::Io {
        path: source_name.clone(),
        message: e.to_string(),
    })?;
    let xml = decode(bytes, &source_name)?;

    let parsed = parse_str(&xml, &source_name)?;
    debug!(
        path = %source_name,
        total = parsed.counts.total,
        failed = parsed.counts.failed,
        "parsed junit report"
    );
    Ok(parsed)
}

/// UTF-8 passes through; anything else must name its encoding in the XML
/// declaration.
fn decode(bytes: Vec<u8>, source_name: &str) -> ParseResult<String> {
    let bytes = match String::from_utf8(bytes) {
        Ok(xml) => return Ok(xml),
        Err(e) => e.into_bytes(),
    };

    let label = declared_encoding(&bytes).ok_or_else(|| {
        ParseError::malformed(source_name, "not valid UTF-8 and no encoding declared")
    })?;
    let encoding = Encoding::for_label(label.as_bytes()).ok_or_else(|| {
        ParseError::malformed(source_name, format!("unknown encoding '{label}'"))
    })?;

    let (xml, _, had_errors) = encoding.decode(&bytes);
    if had_errors {
        return Err(ParseError::malformed(
            source_name,
            format!("not valid {}", encoding.name()),
        ));
    }
    debug!(path = source_name, encoding = encoding.name(), "decoded junit report");
    Ok(xml.into_owned())
}

fn declared_encoding(bytes: &[u8]) -> Option<String> {
    let mut reader = Reader::from_reader(bytes);
    match reader.read_event() {
        Ok(Event::Decl(decl)) => match decl.encoding()? {
            Ok(label) => Some(String::from_utf8_lossy(&label).into_owned()),
            Err(_) => None,
        },
        _ => None,
    }
}

/// Parse JUnit XML held in memory. `source_name` only appears in errors.
pub fn parse_str(xml: &str, source_name: &str) -> ParseResult<ParsedResults> {
    let mut walker = Walker::new(source_name);
    let mut reader = Reader::from_str(xml);

    loop {
        let event = reader.read_event().map_err(|e| {
            ParseError::malformed(
                source_name,
                format!("{e} (at byte {})", reader.buffer_position()),
            )
        })?;

        match event {
            Event::Start(e) => walker.open(&e, false)?,
            Event::Empty(e) => walker.open(&e, true)?,
            Event::End(_) => walker.close()?,
            Event::Text(t) => {
                let text = t
                    .unescape()
                    .map_err(|e| ParseError::malformed(source_name, e.to_string()))?;
                walker.text(&text)?;
            }
            Event::CData(c) => walker.text(&String::from_utf8_lossy(&c))?,
            Event::Eof => break,
            _ => {}
        }
    }

    walker.finish()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChildKind {
    Failure,
    Error,
    Skipped,
}

impl ChildKind {
    fn from_tag(tag: &[u8]) -> Option<Self> {
        match tag {
            TAG_FAILURE => Some(Self::Failure),
            TAG_ERROR => Some(Self::Error),
            TAG_SKIPPED => Some(Self::Skipped),
            _ => None,
        }
    }
}

/// A `failure`, `error` or `skipped` child element.
#[derive(Debug, Default)]
struct Outcome {
    message: String,
    kind: String,
    body: String,
}

impl Outcome {
    fn failure_detail(&self) -> String {
        if self.body.is_empty() {
            return self.message.clone();
        }
        let body: String = self.body.chars().take(MAX_BODY_CHARS).collect();
        format!("{}\n\n{}", self.message, body)
    }
}

#[derive(Debug)]
struct CaseBuilder {
    full_name: String,
    duration: f64,
    depth: usize,
    failure: Option<Outcome>,
    error: Option<Outcome>,
    skipped: Option<Outcome>,
}

impl CaseBuilder {
    fn slot(&mut self, kind: ChildKind) -> &mut Option<Outcome> {
        match kind {
            ChildKind::Failure => &mut self.failure,
            ChildKind::Error => &mut self.error,
            ChildKind::Skipped => &mut self.skipped,
        }
    }

    fn build(self) -> TestRecord {
        let clean = clean_name(&self.full_name).to_string();

        let (status, detail) = if let Some(outcome) = self.failure.or(self.error) {
            (TestStatus::Fail, outcome.failure_detail())
        } else if let Some(skip) = self.skipped {
            let kind = skip.kind.to_lowercase();
            if kind.contains("xfail") && !kind.contains("skip") {
                (
                    TestStatus::ConditionalPass,
                    format!("XFAIL: {}", skip.message),
                )
            } else if skip.message.is_empty() {
                (TestStatus::Todo, "Skipped".to_string())
            } else {
                (TestStatus::Todo, skip.message)
            }
        } else {
            (TestStatus::Pass, String::new())
        };

        TestRecord {
            clean_name: clean,
            full_name: self.full_name,
            status,
            detail,
            duration: self.duration,
        }
    }
}

/// Body text being collected for an outcome element. Like the `text` of an
/// element tree node, it stops at the first nested element.
#[derive(Debug)]
struct BodyCapture {
    case: usize,
    kind: ChildKind,
    depth: usize,
    stopped: bool,
}

struct Walker<'a> {
    source_name: &'a str,
    depth: usize,
    seen_root: bool,
    cases: Vec<CaseBuilder>,
    open_cases: Vec<usize>,
    capture: Option<BodyCapture>,
}

impl<'a> Walker<'a> {
    fn new(source_name: &'a str) -> Self {
        Self {
            source_name,
            depth: 0,
            seen_root: false,
            cases: Vec::new(),
            open_cases: Vec::new(),
            capture: None,
        }
    }

    fn open(&mut self, e: &BytesStart<'_>, empty: bool) -> ParseResult<()> {
        self.check_attributes(e)?;
        if self.depth == 0 {
            if self.seen_root {
                return Err(self.malformed("multiple root elements"));
            }
            self.seen_root = true;
        }
        self.depth += 1;
        let depth = self.depth;

        if let Some(capture) = self.capture.as_mut() {
            if depth > capture.depth {
                capture.stopped = true;
            }
        }

        let tag = e.name();
        if tag.as_ref() == TAG_TEST_CASE {
            let case = self.new_case(e, depth)?;
            self.cases.push(case);
            if !empty {
                self.open_cases.push(self.cases.len() - 1);
            }
        } else if let Some(kind) = ChildKind::from_tag(tag.as_ref()) {
            self.open_outcome(e, kind, depth, empty)?;
        }

        if empty {
            self.depth -= 1;
        }
        Ok(())
    }

    fn open_outcome(
        &mut self,
        e: &BytesStart<'_>,
        kind: ChildKind,
        depth: usize,
        empty: bool,
    ) -> ParseResult<()> {
        let Some(&case_idx) = self.open_cases.last() else {
            return Ok(());
        };
        if self.cases[case_idx].depth + 1 != depth || self.cases[case_idx].slot(kind).is_some() {
            return Ok(());
        }

        let outcome = Outcome {
            message: self.attr(e, "message")?.unwrap_or_default(),
            kind: self.attr(e, "type")?.unwrap_or_default(),
            body: String::new(),
        };
        *self.cases[case_idx].slot(kind) = Some(outcome);

        if !empty {
            self.capture = Some(BodyCapture {
                case: case_idx,
                kind,
                depth,
                stopped: false,
            });
        }
        Ok(())
    }

    fn close(&mut self) -> ParseResult<()> {
        if self.depth == 0 {
            return Err(self.malformed("closing tag without matching opening tag"));
        }

        if self
            .capture
            .as_ref()
            .is_some_and(|capture| capture.depth == self.depth)
        {
            self.capture = None;
        }
        if let Some(&case_idx) = self.open_cases.last() {
            if self.cases[case_idx].depth == self.depth {
                self.open_cases.pop();
            }
        }

        self.depth -= 1;
        Ok(())
    }

    fn text(&mut self, text: &str) -> ParseResult<()> {
        if self.depth == 0 {
            if text.trim().is_empty() {
                return Ok(());
            }
            return Err(self.malformed("text outside the root element"));
        }

        let Some(capture) = self.capture.as_ref() else {
            return Ok(());
        };
        if capture.stopped || capture.depth != self.depth {
            return Ok(());
        }
        let (case, kind) = (capture.case, capture.kind);
        if let Some(outcome) = self.cases[case].slot(kind).as_mut() {
            outcome.body.push_str(text);
        }
        Ok(())
    }

    fn finish(self) -> ParseResult<ParsedResults> {
        if !self.seen_root {
            return Err(self.malformed("no root element"));
        }
        if self.depth != 0 {
            return Err(self.malformed(&format!(
                "unexpected end of document with {} unclosed element(s)",
                self.depth
            )));
        }

        let records = self.cases.into_iter().map(CaseBuilder::build).collect();
        Ok(ParsedResults::from_records(records))
    }

    fn new_case(&self, e: &BytesStart<'_>, depth: usize) -> ParseResult<CaseBuilder> {
        let full_name = self.attr(e, "name")?.unwrap_or_default();
        let duration = match self.attr(e, "time")? {
            Some(raw) => parse_duration(&raw),
            None => 0.0,
        };

        Ok(CaseBuilder {
            full_name,
            duration,
            depth,
            failure: None,
            error: None,
            skipped: None,
        })
    }

    /// Well-formedness of every attribute, including ones nothing reads.
    fn check_attributes(&self, e: &BytesStart<'_>) -> ParseResult<()> {
        if let Some(pos) = missing_attribute_space(e.attributes_raw()) {
            return Err(self.malformed(&format!(
                "attributes of <{}> must be separated by whitespace (at offset {pos})",
                String::from_utf8_lossy(e.name().as_ref())
            )));
        }

        for attr in e.attributes() {
            let attr = attr.map_err(|err| self.malformed(&err.to_string()))?;
            if attr.value.contains(&b'<') {
                return Err(self.malformed(&format!(
                    "'<' in value of attribute '{}'",
                    String::from_utf8_lossy(attr.key.as_ref())
                )));
            }
            attr.unescape_value()
                .map_err(|err| self.malformed(&err.to_string()))?;
        }
        Ok(())
    }

    fn attr(&self, e: &BytesStart<'_>, name: &str) -> ParseResult<Option<String>> {
        let attr = e
            .try_get_attribute(name)
            .map_err(|err| self.malformed(&err.to_string()))?;
        match attr {
            Some(attr) => {
                let value = attr
                    .unescape_value()
                    .map_err(|err| self.malformed(&err.to_string()))?;
                Ok(Some(value.into_owned()))
            }
            None => Ok(None),
        }
    }

    fn malformed(&self, message: &str) -> ParseError {
        ParseError::malformed(self.source_name, message)
    }
}

/// Offset of the first byte that directly follows a closing quote when it is
/// neither whitespace nor the `/` of an empty element.
fn missing_attribute_space(raw: &[u8]) -> Option<usize> {
    let mut quote = None;
    for (i, &b) in raw.iter().enumerate() {
        match quote {
            Some(q) if b == q => {
                quote = None;
                match raw.get(i + 1) {
                    None => {}
                    Some(next) if next.is_ascii_whitespace() || *next == b'/' => {}
                    Some(_) => return Some(i + 1),
                }
            }
            Some(_) => {}
            None if b == b'"' || b == b'\'' => quote = Some(b),
            None => {}
        }
    }
    None
}

fn parse_duration(raw: &str) -> f64 {
    match raw.trim().parse::<f64>() {
        Ok(secs) if secs.is_finite() && secs > 0.0 => secs,
        Ok(_) => 0.0,
        Err(_) => {
            debug!(time = raw, "unparsable testcase time, using 0");
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn parse(xml: &str) -> ParsedResults {
        parse_str(xml, "test.xml").expect("parse failed")
    }

    /// Generated report tree: a testcase with one of five outcomes, or a suite.
    #[derive(Debug, Clone)]
    enum Node {
        Case(u8),
        Suite(Vec<Node>),
    }

    fn node_strategy() -> impl Strategy<Value = Node> {
        (0u8..5).prop_map(Node::Case).prop_recursive(4, 48, 6, |inner| {
            proptest::collection::vec(inner, 0..6).prop_map(Node::Suite)
        })
    }

    fn render(node: &Node, xml: &mut String, expected: &mut RunCounts) {
        match node {
            Node::Case(outcome) => {
                let child = match outcome {
                    0 => {
                        expected.passed += 1;
                        ""
                    }
                    1 => {
                        expected.failed += 1;
                        r#"<failure message="m">body</failure>"#
                    }
                    2 => {
                        expected.failed += 1;
                        r#"<error message="e"/>"#
                    }
                    3 => {
                        expected.skipped += 1;
                        r#"<skipped type="pytest.skip" message="s"/>"#
                    }
                    _ => {
                        expected.passed += 1;
                        r#"<skipped type="pytest.xfail"/>"#
                    }
                };
                xml.push_str(&format!(
                    r#"<testcase name="t{}[p]" time="0.1">{child}</testcase>"#,
                    expected.total
                ));
                expected.total += 1;
            }
            Node::Suite(children) => {
                xml.push_str("<testsuite>");
                for child in children {
                    render(child, xml, expected);
                }
                xml.push_str("</testsuite>");
            }
        }
    }

    #[test]
    fn test_clean_name() {
        assert_eq!(clean_name("test_login[chrome]"), "test_login");
        assert_eq!(clean_name("test_login some description"), "test_login");
        assert_eq!(clean_name("test_x[a b]"), "test_x");
        assert_eq!(clean_name("test_plain"), "test_plain");
        assert_eq!(clean_name(""), "");
    }

    #[test]
    fn test_clean_name_is_idempotent() {
        for name in ["test_login[chrome]", "a b[c]", "plain", "x[1] y"] {
            let once = clean_name(name);
            assert_eq!(clean_name(once), once);
        }
    }

    #[test]
    fn test_plain_pass() {
        let parsed = parse(r#"<testsuite><testcase name="test_login" time="0.5"/></testsuite>"#);
        assert_eq!(parsed.records.len(), 1);
        let record = &parsed.records[0];
        assert_eq!(record.status, TestStatus::Pass);
        assert_eq!(record.detail, "");
        assert_eq!(record.clean_name, "test_login");
        assert_eq!(record.duration, 0.5);
        assert_eq!(parsed.counts.passed, 1);
    }

    #[test]
    fn test_failure_with_body() {
        let parsed = parse(
            r#"<testsuite>
                <testcase name="test_login[chrome]" time="1.25">
                    <failure message="timeout">stack...</failure>
                </testcase>
            </testsuite>"#,
        );
        let record = &parsed.records[0];
        assert_eq!(record.clean_name, "test_login");
        assert_eq!(record.full_name, "test_login[chrome]");
        assert_eq!(record.status, TestStatus::Fail);
        assert!(record.detail.starts_with("timeout"));
        assert_eq!(record.detail, "timeout\n\nstack...");
        assert_eq!(parsed.counts.failed, 1);
    }

    #[test]
    fn test_error_child_counts_as_failure() {
        let parsed = parse(
            r#"<testsuite><testcase name="t"><error message="boom"/></testcase></testsuite>"#,
        );
        assert_eq!(parsed.records[0].status, TestStatus::Fail);
        assert_eq!(parsed.records[0].detail, "boom");
    }

    #[test]
    fn test_failure_preferred_over_error() {
        let parsed = parse(
            r#"<testsuite><testcase name="t">
                <error message="from error"/>
                <failure message="from failure"/>
            </testcase></testsuite>"#,
        );
        assert_eq!(parsed.records[0].detail, "from failure");
    }

    #[test]
    fn test_failure_body_truncated() {
        let body = "x".repeat(MAX_BODY_CHARS + 500);
        let xml = format!(
            r#"<testsuite><testcase name="t"><failure message="m">{body}</failure></testcase></testsuite>"#
        );
        let parsed = parse(&xml);
        assert_eq!(
            parsed.records[0].detail.len(),
            "m\n\n".len() + MAX_BODY_CHARS
        );
    }

    #[test]
    fn test_cdata_body_and_entities() {
        let parsed = parse(
            r#"<testsuite><testcase name="t"><failure message="a &amp; b"><![CDATA[x < y]]></failure></testcase></testsuite>"#,
        );
        assert_eq!(parsed.records[0].detail, "a & b\n\nx < y");
    }

    #[test]
    fn test_xfail_is_conditional_pass() {
        let parsed = parse(
            r#"<testsuite><testcase name="t"><skipped type="xfail" message="known bug"/></testcase></testsuite>"#,
        );
        let record = &parsed.records[0];
        assert_eq!(record.status, TestStatus::ConditionalPass);
        assert_eq!(record.detail, "XFAIL: known bug");
        assert_eq!(parsed.counts.passed, 1);
        assert_eq!(parsed.counts.skipped, 0);
    }

    #[test]
    fn test_skip_types() {
        let parsed = parse(
            r#"<testsuite>
                <testcase name="a"><skipped type="pytest.skip" message="no driver"/></testcase>
                <testcase name="b"><skipped type="XFAIL-skip"/></testcase>
                <testcase name="c"><skipped/></testcase>
                <testcase name="d"><skipped type="pytest.XFAIL"/></testcase>
            </testsuite>"#,
        );
        let statuses: Vec<_> = parsed.records.iter().map(|r| r.status).collect();
        assert_eq!(
            statuses,
            vec![
                TestStatus::Todo,
                TestStatus::Todo,
                TestStatus::Todo,
                TestStatus::ConditionalPass
            ]
        );
        assert_eq!(parsed.records[0].detail, "no driver");
        assert_eq!(parsed.records[2].detail, "Skipped");
        assert_eq!(parsed.records[3].detail, "XFAIL: ");
        assert_eq!(parsed.counts.skipped, 3);
        assert_eq!(parsed.counts.passed, 1);
    }

    #[test]
    fn test_nested_suites_and_order() {
        let parsed = parse(
            r#"<?xml version="1.0" encoding="utf-8"?>
            <testsuites>
                <testsuite name="outer">
                    <testcase name="first"/>
                    <testsuite name="inner">
                        <testclass>
                            <testcase name="second"><failure/></testcase>
                        </testclass>
                    </testsuite>
                    <testcase name="third"/>
                </testsuite>
            </testsuites>"#,
        );
        let names: Vec<_> = parsed.records.iter().map(|r| r.full_name.as_str()).collect();
        assert_eq!(names, vec!["first", "second", "third"]);
        assert_eq!(parsed.counts.total, 3);
        assert_eq!(parsed.counts.failed, 1);
    }

    #[test]
    fn test_grandchild_failure_is_ignored() {
        let parsed = parse(
            r#"<testsuite><testcase name="t"><properties><failure message="no"/></properties></testcase></testsuite>"#,
        );
        assert_eq!(parsed.records[0].status, TestStatus::Pass);
    }

    #[test]
    fn test_body_stops_at_nested_element() {
        let parsed = parse(
            r#"<testsuite><testcase name="t"><failure message="m">head<detail>inner</detail>tail</failure></testcase></testsuite>"#,
        );
        assert_eq!(parsed.records[0].detail, "m\n\nhead");
    }

    #[test]
    fn test_duration_edge_cases() {
        let parsed = parse(
            r#"<testsuite>
                <testcase name="a"/>
                <testcase name="b" time="abc"/>
                <testcase name="c" time="-1.5"/>
                <testcase name="d" time="2"/>
            </testsuite>"#,
        );
        let durations: Vec<_> = parsed.records.iter().map(|r| r.duration).collect();
        assert_eq!(durations, vec![0.0, 0.0, 0.0, 2.0]);
    }

    #[test]
    fn test_empty_suite() {
        let parsed = parse("<testsuites/>");
        assert!(parsed.records.is_empty());
        assert_eq!(parsed.counts, RunCounts::default());
    }

    #[test]
    fn test_malformed_inputs() {
        for xml in [
            "",
            "not xml at all",
            "<testsuite><testcase name=\"a\"></testsuite>",
            "<testsuite>",
            "<a/><b/>",
            r#"<testsuite><testcase name="a" name="b"/></testsuite>"#,
            r#"<testsuite tests=3><testcase name="a"/></testsuite>"#,
            r#"<testsuite x="a<b"><testcase name="a"/></testsuite>"#,
            r#"<testsuite><testcase name="a" time="1"time="2"/></testsuite>"#,
            r#"<testsuite><testcase name="a" file="x.py"line="3"/></testsuite>"#,
            r#"<testsuite name="a &bogus; b"><testcase name="a"/></testsuite>"#,
        ] {
            let err = parse_str(xml, "bad.xml").expect_err(xml);
            assert!(
                matches!(err, ParseError::Malformed { .. }),
                "{xml:?} gave {err:?}"
            );
        }
    }

    #[test]
    fn test_well_formed_attributes_accepted() {
        let parsed = parse(
            r#"<testsuite name='suite' tests="1"><testcase name="a" classname="t.m"
                time = "0.5" /></testsuite>"#,
        );
        assert_eq!(parsed.records[0].duration, 0.5);
    }

    #[test]
    fn test_missing_attribute_space() {
        assert_eq!(missing_attribute_space(br#" a="1" b='2'"#), None);
        assert_eq!(missing_attribute_space(br#" a="1"/"#), None);
        assert_eq!(missing_attribute_space(br#" a="it's""#), None);
        assert_eq!(missing_attribute_space(br#" a="1"b="2""#), Some(6));
    }

    #[test]
    fn test_parse_file_declared_latin1() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("junit.xml");
        let mut bytes =
            br#"<?xml version="1.0" encoding="ISO-8859-1"?><testsuite><testcase name="caf"#.to_vec();
        bytes.push(0xE9);
        bytes.extend_from_slice(br#""><failure message="na"#);
        bytes.push(0xEF);
        bytes.extend_from_slice(br#"ve"/></testcase></testsuite>"#);
        std::fs::write(&path, bytes).unwrap();

        let parsed = parse_file(&path).unwrap();
        assert_eq!(parsed.records[0].full_name, "caf\u{e9}");
        assert_eq!(parsed.records[0].detail, "na\u{ef}ve");
    }

    #[test]
    fn test_parse_file_undeclared_non_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("junit.xml");
        std::fs::write(&path, b"<testsuite><testcase name=\"caf\xE9\"/></testsuite>").unwrap();

        let err = parse_file(&path).unwrap_err();
        assert!(matches!(err, ParseError::Malformed { .. }));
    }

    proptest! {
        #[test]
        fn prop_counts_cover_every_testcase(
            nodes in proptest::collection::vec(node_strategy(), 0..4)
        ) {
            let mut xml = String::from("<testsuites>");
            let mut expected = RunCounts::default();
            for node in &nodes {
                render(node, &mut xml, &mut expected);
            }
            xml.push_str("</testsuites>");

            let parsed = parse_str(&xml, "generated.xml").unwrap();
            let counts = parsed.counts;
            prop_assert_eq!(counts.passed + counts.failed + counts.skipped, counts.total);
            prop_assert_eq!(counts.total, parsed.records.len());
            prop_assert_eq!(counts, expected);
        }
    }

    #[test]
    fn test_parse_file_not_found() {
        let err = parse_file("/definitely/not/here.xml").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_parse_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("junit.xml");
        std::fs::write(
            &path,
            r#"<testsuite><testcase name="a"/><testcase name="b"><skipped/></testcase></testsuite>"#,
        )
        .unwrap();

        let parsed = parse_file(&path).unwrap();
        assert_eq!(parsed.counts.total, 2);
        assert_eq!(parsed.counts.skipped, 1);
    }
}
