// Copyright (c) The flaketrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The JSON report renderer.

use crate::{config::DetectorConfig, errors::WriteReportError};
use camino::Utf8Path;
use chrono::Local;
use flaketrack_metadata::{AggregateStatistics, InsightsReport, TestPatternSummary};

/// Builds the `insights.json` document from an analysis run.
pub fn build_insights(
    config: &DetectorConfig,
    stats: &AggregateStatistics,
    rows: &[TestPatternSummary],
) -> InsightsReport {
    InsightsReport {
        generated_at: Local::now().fixed_offset(),
        configuration: config.thresholds(),
        statistics: stats.clone(),
        test_patterns: rows.to_vec(),
    }
}

/// Writes the JSON report to the given path.
pub fn write_insights_report(
    path: &Utf8Path,
    config: &DetectorConfig,
    stats: &AggregateStatistics,
    rows: &[TestPatternSummary],
) -> Result<(), WriteReportError> {
    let report = build_insights(config, stats, rows);
    let file = fs_err::File::create(path).map_err(|error| WriteReportError::Fs {
        file: path.to_path_buf(),
        error,
    })?;
    report
        .to_writer_pretty(file)
        .map_err(|error| WriteReportError::Json {
            file: path.to_path_buf(),
            error,
        })
}
