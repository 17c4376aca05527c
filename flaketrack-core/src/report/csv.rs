// Copyright (c) The flaketrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The CSV report renderer.

use crate::errors::WriteReportError;
use camino::Utf8Path;
use flaketrack_metadata::TestPatternSummary;
use std::borrow::Cow;
use swrite::{swrite, swriteln, SWrite};

static CSV_HEADER: &str = "Test Name,Failed/Total Runs,Pass Count,Fail Count,Skip Count,\
                           Failure Rate (%),Classification,Confidence Score (%),\
                           Avg Duration (s),Unique Errors";

/// Renders the ranked report as CSV text.
///
/// Rows are emitted in the order given; the engine's ranked report already
/// puts the most actionable tests first.
pub fn render_csv(rows: &[TestPatternSummary]) -> String {
    let mut out = String::new();
    swriteln!(out, "{CSV_HEADER}");
    for row in rows {
        swrite!(out, "{}", escape_field(&row.identity));
        swrite!(out, ",{}/{}", row.fail_count, row.total_runs);
        swrite!(out, ",{},{},{}", row.pass_count, row.fail_count, row.skip_count);
        swrite!(out, ",{:.2}", row.failure_rate);
        swrite!(out, ",{}", row.classification);
        swrite!(out, ",{:.2}", row.confidence_score);
        swrite!(out, ",{:.3}", row.avg_duration);
        swriteln!(out, ",{}", row.distinct_error_count);
    }
    out
}

/// Writes the CSV report to the given path.
pub fn write_csv_report(
    path: &Utf8Path,
    rows: &[TestPatternSummary],
) -> Result<(), WriteReportError> {
    fs_err::write(path, render_csv(rows)).map_err(|error| WriteReportError::Fs {
        file: path.to_path_buf(),
        error,
    })
}

// Quotes a field when it contains a delimiter, quote or newline.
fn escape_field(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}
