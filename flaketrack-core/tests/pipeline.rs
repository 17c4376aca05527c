// Copyright (c) The flaketrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end pipeline tests: JUnit files in, rendered reports out.

use camino_tempfile::Utf8TempDir;
use flaketrack_core::{
    config::{ConfigOverrides, DetectorConfig},
    engine::DetectionEngine,
    junit::parse_report_file,
    report::{render_reports, CSV_REPORT_FILE, HTML_REPORT_FILE, JSON_REPORT_FILE},
};
use flaketrack_metadata::{InsightsReport, PatternClassification};

/// Writes one JUnit report per run: `broken` always fails, `flaky` fails on
/// even runs, `solid` always passes.
fn write_runs(dir: &Utf8TempDir, runs: usize) -> Vec<camino::Utf8PathBuf> {
    let mut paths = Vec::new();
    for run in 0..runs {
        let flaky_case = if run % 2 == 0 {
            r#"<testcase classname="suite" name="flaky" time="0.4">
                   <failure message="TimeoutException: request timed out after 30s"/>
               </testcase>"#
        } else {
            r#"<testcase classname="suite" name="flaky" time="0.4"/>"#
        };
        let xml = format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<testsuites>
    <testsuite name="TestRun_{run}" tests="3" failures="1">
        <testcase classname="suite" name="solid" time="0.1"/>
        {flaky_case}
        <testcase classname="suite" name="broken" time="0.2">
            <failure message="AssertionError: expected 200 but got 500"/>
        </testcase>
    </testsuite>
</testsuites>
"#
        );
        let path = dir.path().join(format!("run_{run:02}.xml"));
        fs_err::write(&path, xml).unwrap();
        paths.push(path);
    }
    paths
}

fn analyzed_engine(dir: &Utf8TempDir, runs: usize) -> DetectionEngine {
    let config = DetectorConfig::from_sources(None, &ConfigOverrides::default()).unwrap();
    let mut engine = DetectionEngine::new(config);
    for path in write_runs(dir, runs) {
        engine.ingest(parse_report_file(&path).unwrap());
    }
    engine.analyze();
    engine
}

#[test]
fn classifies_across_multiple_report_files() {
    let dir = Utf8TempDir::new().unwrap();
    let engine = analyzed_engine(&dir, 20);

    let rows = engine.ranked_report();
    let by_name: Vec<_> = rows
        .iter()
        .map(|row| (row.identity.as_str(), row.classification))
        .collect();
    assert_eq!(
        by_name,
        vec![
            ("suite.broken", PatternClassification::ConsistentlyFailing),
            ("suite.flaky", PatternClassification::Flaky),
            ("suite.solid", PatternClassification::Stable),
        ]
    );

    // 10 failures over 20 runs lands exactly on the coin-flip point.
    let flaky = &rows[1];
    assert_eq!(flaky.failure_rate, 50.0);
    assert_eq!(flaky.confidence_score, 75.0);
    assert_eq!(flaky.distinct_error_count, 1);

    let critical = engine.critical_tests();
    assert_eq!(critical.len(), 2);
    assert_eq!(critical[0].identity, "suite.broken");
}

#[test]
fn reports_written_and_json_parses_back() {
    let input_dir = Utf8TempDir::new().unwrap();
    let output_dir = Utf8TempDir::new().unwrap();

    let engine = {
        let mut engine = analyzed_engine(&input_dir, 20);
        engine.ingest(
            parse_report_file(&write_runs(&input_dir, 1)[0]).unwrap(),
        );
        engine.analyze();
        engine
    };

    let mut config = engine.config().clone();
    config.output_dir = output_dir.path().join("reports");

    let stats = engine.aggregate_statistics();
    let rows = engine.ranked_report();
    let critical = engine.critical_tests();
    let outputs = render_reports(&config, &stats, &rows, &critical).unwrap();

    assert_eq!(outputs.iter().count(), 3);
    assert!(config.output_dir.join(CSV_REPORT_FILE).exists());
    assert!(config.output_dir.join(HTML_REPORT_FILE).exists());

    let json = fs_err::read_to_string(config.output_dir.join(JSON_REPORT_FILE)).unwrap();
    let report: InsightsReport = serde_json::from_str(&json).unwrap();
    assert_eq!(report.statistics.total_tests, 3);
    assert_eq!(report.statistics.failing_tests, 1);
    assert_eq!(report.test_patterns.len(), 3);
    assert_eq!(report.configuration.min_runs, 5);
}
