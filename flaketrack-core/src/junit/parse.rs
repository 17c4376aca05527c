// Copyright (c) The flaketrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Parse JUnit XML reports into execution records.

use crate::{
    errors::{ParseReportError, ParseReportErrorKind},
    junit::{ERROR_TAG, FAILURE_TAG, SKIPPED_TAG, TESTCASE_TAG, TESTSUITE_TAG},
    record::{ExecutionRecord, TestOutcome},
};
use camino::Utf8Path;
use chrono::{DateTime, FixedOffset, Local, NaiveDateTime};
use quick_xml::{
    events::{BytesStart, Event},
    Reader,
};
use std::time::Duration;

/// Parses one JUnit XML report file into execution records.
///
/// Errors are per-file: a missing or malformed file yields a
/// [`ParseReportError`] and the caller is expected to log and move on.
pub fn parse_report_file(path: &Utf8Path) -> Result<Vec<ExecutionRecord>, ParseReportError> {
    let input = fs_err::read_to_string(path)
        .map_err(|err| ParseReportError::new(path, ParseReportErrorKind::Read(err)))?;
    parse_report_str(&input)
        .map_err(|err| ParseReportError::new(path, ParseReportErrorKind::Xml(err)))
}

/// Parses JUnit XML from a string.
///
/// Accepts both a `<testsuites>` and a bare `<testsuite>` root. Each
/// `<testcase>` becomes one record:
///
/// - identity is `classname.name`, matching how the reports qualify tests;
/// - a nested `<failure>` or `<error>` maps to [`TestOutcome::Failed`], with
///   the message taken from the `message` attribute, falling back to the
///   element text;
/// - a nested `<skipped>` maps to [`TestOutcome::Skipped`];
/// - no marker means [`TestOutcome::Passed`].
///
/// Records are stamped with the enclosing testsuite's `timestamp` attribute
/// when present, and with ingestion time otherwise.
pub fn parse_report_str(input: &str) -> Result<Vec<ExecutionRecord>, quick_xml::Error> {
    let mut reader = Reader::from_str(input);
    reader.trim_text(true);

    let mut records = Vec::new();
    let mut suite_timestamp: Option<DateTime<FixedOffset>> = None;
    let mut pending: Option<PendingCase> = None;

    loop {
        match reader.read_event()? {
            Event::Start(tag) if tag.name().as_ref() == TESTSUITE_TAG.as_bytes() => {
                suite_timestamp = suite_timestamp_attr(&tag)?;
            }
            Event::Start(tag) if tag.name().as_ref() == TESTCASE_TAG.as_bytes() => {
                pending = Some(PendingCase::from_attrs(&tag)?);
            }
            Event::Empty(tag) if tag.name().as_ref() == TESTCASE_TAG.as_bytes() => {
                // A childless testcase is a pass.
                records.push(PendingCase::from_attrs(&tag)?.into_record(suite_timestamp));
            }
            Event::Start(tag) => {
                let name = tag.name();
                if let Some(case) = pending.as_mut() {
                    match name.as_ref() {
                        tag_name if tag_name == FAILURE_TAG.as_bytes()
                            || tag_name == ERROR_TAG.as_bytes() =>
                        {
                            let message = message_attr(&tag)?;
                            let text = reader.read_text(name)?;
                            case.mark_failed(message, text.trim());
                        }
                        tag_name if tag_name == SKIPPED_TAG.as_bytes() => {
                            case.outcome = TestOutcome::Skipped;
                            reader.read_to_end(name)?;
                        }
                        // system-out, properties and anything else nested in
                        // a testcase is irrelevant here.
                        _ => {
                            reader.read_to_end(name)?;
                        }
                    }
                }
            }
            Event::Empty(tag) => {
                if let Some(case) = pending.as_mut() {
                    match tag.name().as_ref() {
                        tag_name if tag_name == FAILURE_TAG.as_bytes()
                            || tag_name == ERROR_TAG.as_bytes() =>
                        {
                            let message = message_attr(&tag)?;
                            case.mark_failed(message, "");
                        }
                        tag_name if tag_name == SKIPPED_TAG.as_bytes() => {
                            case.outcome = TestOutcome::Skipped;
                        }
                        _ => {}
                    }
                }
            }
            Event::End(tag) if tag.name().as_ref() == TESTCASE_TAG.as_bytes() => {
                if let Some(case) = pending.take() {
                    records.push(case.into_record(suite_timestamp));
                }
            }
            Event::End(tag) if tag.name().as_ref() == TESTSUITE_TAG.as_bytes() => {
                suite_timestamp = None;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(records)
}

/// A testcase whose closing tag has not been seen yet.
struct PendingCase {
    identity: String,
    duration: Duration,
    outcome: TestOutcome,
    error_message: Option<String>,
}

impl PendingCase {
    fn from_attrs(tag: &BytesStart<'_>) -> Result<Self, quick_xml::Error> {
        let mut classname = String::new();
        let mut name = String::new();
        let mut duration = Duration::ZERO;

        for attr in tag.attributes() {
            let attr = attr.map_err(quick_xml::Error::from)?;
            match attr.key.as_ref() {
                b"classname" => classname = attr.unescape_value()?.into_owned(),
                b"name" => name = attr.unescape_value()?.into_owned(),
                b"time" => {
                    // An unparsable or negative time is treated as "not
                    // timed" rather than failing the whole file.
                    if let Ok(seconds) = attr.unescape_value()?.parse::<f64>() {
                        if seconds.is_finite() && seconds > 0.0 {
                            duration = Duration::from_secs_f64(seconds);
                        }
                    }
                }
                _ => {}
            }
        }

        Ok(Self {
            identity: format!("{classname}.{name}"),
            duration,
            outcome: TestOutcome::Passed,
            error_message: None,
        })
    }

    fn mark_failed(&mut self, message: Option<String>, text: &str) {
        self.outcome = TestOutcome::Failed;
        self.error_message = message
            .filter(|m| !m.is_empty())
            .or_else(|| (!text.is_empty()).then(|| text.to_owned()));
    }

    fn into_record(self, suite_timestamp: Option<DateTime<FixedOffset>>) -> ExecutionRecord {
        let record = ExecutionRecord::new(
            self.identity,
            self.outcome,
            self.error_message,
            self.duration,
        );
        match suite_timestamp {
            Some(timestamp) => record.with_timestamp(timestamp),
            None => record,
        }
    }
}

fn message_attr(tag: &BytesStart<'_>) -> Result<Option<String>, quick_xml::Error> {
    for attr in tag.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        if attr.key.as_ref() == b"message" {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

fn suite_timestamp_attr(
    tag: &BytesStart<'_>,
) -> Result<Option<DateTime<FixedOffset>>, quick_xml::Error> {
    for attr in tag.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        if attr.key.as_ref() == b"timestamp" {
            return Ok(parse_timestamp(&attr.unescape_value()?));
        }
    }
    Ok(None)
}

// JUnit timestamps come in two flavors: RFC 3339 with an offset, and the
// naive ISO 8601 form most Java tooling emits. Naive timestamps are read in
// the local timezone.
fn parse_timestamp(value: &str) -> Option<DateTime<FixedOffset>> {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(value) {
        return Some(timestamp);
    }
    let naive = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f").ok()?;
    naive
        .and_local_timezone(Local)
        .single()
        .map(|timestamp| timestamp.fixed_offset())
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_testsuites_root() {
        let input = indoc! {r#"
            <?xml version="1.0" encoding="UTF-8"?>
            <testsuites>
                <testsuite name="TestRun_1" tests="3" failures="1" errors="0" skipped="1" timestamp="2026-08-01T10:00:00">
                    <testcase classname="com.example.api" name="test_login" time="0.52"/>
                    <testcase classname="com.example.api" name="test_timeout" time="1.20">
                        <failure message="TimeoutException: request timed out after 30s"/>
                    </testcase>
                    <testcase classname="com.example.api" name="test_disabled">
                        <skipped/>
                    </testcase>
                </testsuite>
            </testsuites>
        "#};

        let records = parse_report_str(input).unwrap();
        assert_eq!(records.len(), 3);

        assert_eq!(records[0].test_identity, "com.example.api.test_login");
        assert_eq!(records[0].outcome, TestOutcome::Passed);
        assert_eq!(records[0].duration, Duration::from_secs_f64(0.52));

        assert_eq!(records[1].outcome, TestOutcome::Failed);
        assert_eq!(
            records[1].error_message.as_deref(),
            Some("TimeoutException: request timed out after 30s")
        );

        assert_eq!(records[2].outcome, TestOutcome::Skipped);
        assert!(records[2].error_message.is_none());
    }

    #[test]
    fn parses_bare_testsuite_root() {
        let input = indoc! {r#"
            <testsuite name="suite" tests="1">
                <testcase classname="pkg.Class" name="test_ok" time="0.1"/>
            </testsuite>
        "#};

        let records = parse_report_str(input).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].test_identity, "pkg.Class.test_ok");
    }

    #[test]
    fn error_element_maps_to_failed_with_text_fallback() {
        let input = indoc! {r#"
            <testsuite name="suite" tests="1">
                <testcase classname="pkg" name="test_err" time="0.3">
                    <error>NullPointerException: object reference not set</error>
                </testcase>
            </testsuite>
        "#};

        let records = parse_report_str(input).unwrap();
        assert_eq!(records[0].outcome, TestOutcome::Failed);
        assert_eq!(
            records[0].error_message.as_deref(),
            Some("NullPointerException: object reference not set")
        );
    }

    #[test]
    fn message_attr_wins_over_text() {
        let input = indoc! {r#"
            <testsuite name="suite" tests="1">
                <testcase classname="pkg" name="t" time="0.3">
                    <failure message="short message">long stack trace here</failure>
                </testcase>
            </testsuite>
        "#};

        let records = parse_report_str(input).unwrap();
        assert_eq!(records[0].error_message.as_deref(), Some("short message"));
    }

    #[test]
    fn missing_time_and_classname_tolerated() {
        let input = indoc! {r#"
            <testsuite name="suite" tests="1">
                <testcase name="bare_test"/>
            </testsuite>
        "#};

        let records = parse_report_str(input).unwrap();
        // An empty classname still yields the dot-joined identity.
        assert_eq!(records[0].test_identity, ".bare_test");
        assert_eq!(records[0].duration, Duration::ZERO);
    }

    #[test]
    fn suite_timestamp_applied_to_records() {
        let input = indoc! {r#"
            <testsuite name="suite" tests="1" timestamp="2026-08-01T10:00:00+00:00">
                <testcase classname="pkg" name="t" time="0.1"/>
            </testsuite>
        "#};

        let records = parse_report_str(input).unwrap();
        assert_eq!(
            records[0].timestamp,
            DateTime::parse_from_rfc3339("2026-08-01T10:00:00+00:00").unwrap()
        );
    }

    #[test]
    fn system_out_is_skipped() {
        let input = indoc! {r#"
            <testsuite name="suite" tests="1">
                <testcase classname="pkg" name="t" time="0.1">
                    <system-out>noise that looks like &lt;failure&gt;</system-out>
                </testcase>
            </testsuite>
        "#};

        let records = parse_report_str(input).unwrap();
        assert_eq!(records[0].outcome, TestOutcome::Passed);
    }

    #[test]
    fn malformed_xml_is_an_error() {
        assert!(parse_report_str("<testsuite><testcase").is_err());
    }

    #[test]
    fn missing_file_reports_path() {
        let err = parse_report_file(Utf8Path::new("no/such/report.xml")).unwrap_err();
        assert_eq!(err.file().as_str(), "no/such/report.xml");
    }
}
