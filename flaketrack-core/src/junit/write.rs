// Copyright (c) The flaketrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Serialize generated test suites to JUnit XML.

use crate::junit::{FAILURE_TAG, TESTCASE_TAG, TESTSUITE_TAG, TESTSUITES_TAG};
use chrono::{DateTime, FixedOffset};
use quick_xml::{
    events::{BytesDecl, BytesEnd, BytesStart, Event},
    Writer,
};
use std::io;

/// One generated testcase.
#[derive(Clone, Debug)]
pub struct SampleCase {
    /// The classname qualifier.
    pub classname: String,

    /// The bare test name.
    pub name: String,

    /// Execution time in seconds.
    pub time: f64,

    /// A failure message, when the case failed.
    pub failure_message: Option<String>,
}

/// One generated testsuite, serialized as a `<testsuites>` document with a
/// single `<testsuite>` child — the shape CI systems emit per run.
#[derive(Clone, Debug)]
pub struct SampleSuite {
    /// The suite name, e.g. `TestRun_03`.
    pub name: String,

    /// When the run nominally happened.
    pub timestamp: DateTime<FixedOffset>,

    /// The testcases in the suite.
    pub cases: Vec<SampleCase>,
}

impl SampleSuite {
    fn failure_count(&self) -> usize {
        self.cases
            .iter()
            .filter(|case| case.failure_message.is_some())
            .count()
    }
}

/// Serializes the suite to the given writer as indented JUnit XML.
pub fn serialize_suite(
    suite: &SampleSuite,
    writer: impl io::Write,
) -> quick_xml::Result<()> {
    let mut writer = Writer::new_with_indent(writer, b' ', 2);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    writer.write_event(Event::Start(BytesStart::new(TESTSUITES_TAG)))?;

    let tests = suite.cases.len().to_string();
    let failures = suite.failure_count().to_string();
    let timestamp = format!("{}", suite.timestamp.format("%+"));

    let mut testsuite_tag = BytesStart::new(TESTSUITE_TAG);
    testsuite_tag.extend_attributes([
        ("name", suite.name.as_str()),
        ("tests", tests.as_str()),
        ("failures", failures.as_str()),
        ("errors", "0"),
        ("skipped", "0"),
        ("timestamp", timestamp.as_str()),
    ]);
    writer.write_event(Event::Start(testsuite_tag))?;

    for case in &suite.cases {
        serialize_case(case, &mut writer)?;
    }

    writer.write_event(Event::End(BytesEnd::new(TESTSUITE_TAG)))?;
    writer.write_event(Event::End(BytesEnd::new(TESTSUITES_TAG)))?;
    writer.write_event(Event::Eof)?;
    Ok(())
}

fn serialize_case(
    case: &SampleCase,
    writer: &mut Writer<impl io::Write>,
) -> quick_xml::Result<()> {
    let time = format!("{:.3}", case.time);

    let mut testcase_tag = BytesStart::new(TESTCASE_TAG);
    testcase_tag.extend_attributes([
        ("classname", case.classname.as_str()),
        ("name", case.name.as_str()),
        ("time", time.as_str()),
    ]);

    match &case.failure_message {
        Some(message) => {
            writer.write_event(Event::Start(testcase_tag))?;
            let mut failure_tag = BytesStart::new(FAILURE_TAG);
            failure_tag.push_attribute(("message", message.as_str()));
            writer.write_event(Event::Empty(failure_tag))?;
            writer.write_event(Event::End(BytesEnd::new(TESTCASE_TAG)))?;
        }
        None => {
            writer.write_event(Event::Empty(testcase_tag))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{junit::parse_report_str, record::TestOutcome};
    use chrono::DateTime;

    #[test]
    fn serialized_suite_parses_back() {
        let suite = SampleSuite {
            name: "TestRun_01".to_owned(),
            timestamp: DateTime::parse_from_rfc3339("2026-08-01T10:00:00+00:00").unwrap(),
            cases: vec![
                SampleCase {
                    classname: "com.example.tests.api".to_owned(),
                    name: "test_api_integration".to_owned(),
                    time: 1.234,
                    failure_message: Some(
                        "ConnectionRefusedError: unable to connect to database".to_owned(),
                    ),
                },
                SampleCase {
                    classname: "com.example.tests.home".to_owned(),
                    name: "test_home_page_load".to_owned(),
                    time: 0.3,
                    failure_message: None,
                },
            ],
        };

        let mut buf = Vec::new();
        serialize_suite(&suite, &mut buf).unwrap();
        let xml = String::from_utf8(buf).unwrap();
        assert!(xml.starts_with("<?xml"));

        let records = parse_report_str(&xml).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(
            records[0].test_identity,
            "com.example.tests.api.test_api_integration"
        );
        assert_eq!(records[0].outcome, TestOutcome::Failed);
        assert_eq!(records[1].outcome, TestOutcome::Passed);
        assert_eq!(records[0].timestamp, suite.timestamp);
    }

    #[test]
    fn failure_messages_are_escaped() {
        let suite = SampleSuite {
            name: "run".to_owned(),
            timestamp: DateTime::parse_from_rfc3339("2026-08-01T10:00:00+00:00").unwrap(),
            cases: vec![SampleCase {
                classname: "pkg".to_owned(),
                name: "t".to_owned(),
                time: 0.1,
                failure_message: Some("AssertionError: expected <a> & got \"b\"".to_owned()),
            }],
        };

        let mut buf = Vec::new();
        serialize_suite(&suite, &mut buf).unwrap();
        let records = parse_report_str(&String::from_utf8(buf).unwrap()).unwrap();
        assert_eq!(
            records[0].error_message.as_deref(),
            Some("AssertionError: expected <a> & got \"b\"")
        );
    }
}
