// Copyright (c) The flaketrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Report renderers.
//!
//! Renderers consume the ranked report and aggregate statistics produced by
//! the engine as read-only input; none of them re-derives classification
//! logic. Which renderers run is controlled by the `generate-*` settings.

mod csv;
mod html;
mod json;

pub use csv::*;
pub use html::*;
pub use json::*;

use crate::{config::DetectorConfig, errors::WriteReportError};
use camino::Utf8PathBuf;
use flaketrack_metadata::{AggregateStatistics, TestPatternSummary};
use tracing::info;

/// The file name of the CSV report.
pub const CSV_REPORT_FILE: &str = "pattern_report.csv";

/// The file name of the JSON report.
pub const JSON_REPORT_FILE: &str = "insights.json";

/// The file name of the HTML dashboard.
pub const HTML_REPORT_FILE: &str = "dashboard.html";

/// Paths of the reports written by [`render_reports`].
#[derive(Clone, Debug, Default)]
pub struct ReportOutputs {
    /// The CSV report, if the CSV renderer ran.
    pub csv: Option<Utf8PathBuf>,

    /// The JSON report, if the JSON renderer ran.
    pub json: Option<Utf8PathBuf>,

    /// The HTML dashboard, if the HTML renderer ran.
    pub html: Option<Utf8PathBuf>,
}

impl ReportOutputs {
    /// Iterates over `(kind, path)` pairs for the reports that were written.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Utf8PathBuf)> {
        [
            ("CSV", self.csv.as_ref()),
            ("JSON", self.json.as_ref()),
            ("HTML", self.html.as_ref()),
        ]
        .into_iter()
        .filter_map(|(kind, path)| path.map(|path| (kind, path)))
    }
}

/// Writes all configured reports into the configured output directory.
pub fn render_reports(
    config: &DetectorConfig,
    stats: &AggregateStatistics,
    rows: &[TestPatternSummary],
    critical: &[TestPatternSummary],
) -> Result<ReportOutputs, WriteReportError> {
    fs_err::create_dir_all(&config.output_dir).map_err(|error| WriteReportError::Fs {
        file: config.output_dir.clone(),
        error,
    })?;

    let mut outputs = ReportOutputs::default();

    if config.generate_csv {
        let path = config.output_dir.join(CSV_REPORT_FILE);
        write_csv_report(&path, rows)?;
        info!("CSV report generated: {path}");
        outputs.csv = Some(path);
    }

    if config.generate_json {
        let path = config.output_dir.join(JSON_REPORT_FILE);
        write_insights_report(&path, config, stats, rows)?;
        info!("JSON report generated: {path}");
        outputs.json = Some(path);
    }

    if config.generate_html {
        let path = config.output_dir.join(HTML_REPORT_FILE);
        write_dashboard(&path, stats, rows, critical)?;
        info!("HTML dashboard generated: {path}");
        outputs.html = Some(path);
    }

    Ok(outputs)
}
