// Copyright (c) The flaketrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::PatternClassification;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::io;

/// A single row of the ranked report: everything known about one test after
/// analysis.
///
/// Renderers must treat this as read-only input and must not re-derive
/// classification logic themselves.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TestPatternSummary {
    /// The fully-qualified test name, stable across runs.
    #[serde(rename = "test_name")]
    pub identity: String,

    /// Number of recorded executions.
    pub total_runs: usize,

    /// Number of passing executions.
    pub pass_count: usize,

    /// Number of failing executions.
    pub fail_count: usize,

    /// Number of skipped executions.
    pub skip_count: usize,

    /// Failure rate as a percentage in `[0, 100]`.
    pub failure_rate: f64,

    /// The classification assigned by the analysis pass.
    pub classification: PatternClassification,

    /// Confidence in the classification, `0`–`100`.
    pub confidence_score: f64,

    /// Mean duration in seconds over timed executions (zero-duration
    /// executions are treated as "not timed" and excluded).
    pub avg_duration: f64,

    /// Number of distinct error messages observed across failures.
    #[serde(rename = "error_pattern_count")]
    pub distinct_error_count: usize,

    /// Up to three distinct error messages, for triage context.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub error_samples: Vec<String>,
}

impl TestPatternSummary {
    /// The short name of the test: the final dot-separated segment of the
    /// identity. Used by renderers that truncate long qualified names.
    pub fn short_name(&self) -> &str {
        self.identity
            .rsplit('.')
            .next()
            .unwrap_or(&self.identity)
    }
}

/// Counts of tests per classification, plus the total.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateStatistics {
    /// Total number of distinct tests analyzed.
    pub total_tests: usize,

    /// Tests classified [`PatternClassification::Stable`].
    pub stable_tests: usize,

    /// Tests classified [`PatternClassification::Flaky`].
    pub flaky_tests: usize,

    /// Tests classified [`PatternClassification::ConsistentlyFailing`].
    pub failing_tests: usize,

    /// Tests classified [`PatternClassification::MostlyStable`].
    pub mostly_stable: usize,

    /// Tests classified [`PatternClassification::MostlyFailing`].
    pub mostly_failing: usize,

    /// Tests classified [`PatternClassification::InsufficientData`].
    pub insufficient_data: usize,
}

impl AggregateStatistics {
    /// Records one test with the given classification.
    pub fn record(&mut self, classification: PatternClassification) {
        self.total_tests += 1;
        match classification {
            PatternClassification::Stable => self.stable_tests += 1,
            PatternClassification::Flaky => self.flaky_tests += 1,
            PatternClassification::ConsistentlyFailing => self.failing_tests += 1,
            PatternClassification::MostlyStable => self.mostly_stable += 1,
            PatternClassification::MostlyFailing => self.mostly_failing += 1,
            PatternClassification::InsufficientData => self.insufficient_data += 1,
        }
    }

    /// Returns the count for a single classification.
    pub fn count(&self, classification: PatternClassification) -> usize {
        match classification {
            PatternClassification::Stable => self.stable_tests,
            PatternClassification::Flaky => self.flaky_tests,
            PatternClassification::ConsistentlyFailing => self.failing_tests,
            PatternClassification::MostlyStable => self.mostly_stable,
            PatternClassification::MostlyFailing => self.mostly_failing,
            PatternClassification::InsufficientData => self.insufficient_data,
        }
    }

    /// The suite health score: healthy tests (stable + mostly stable) as a
    /// percentage of the total. `None` when no tests were analyzed.
    pub fn health_score(&self) -> Option<f64> {
        if self.total_tests == 0 {
            return None;
        }
        let healthy = self.stable_tests + self.mostly_stable;
        Some(healthy as f64 / self.total_tests as f64 * 100.0)
    }
}

/// The effective configuration under which an analysis ran, echoed into
/// reports so results can be interpreted later.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConfigSummary {
    /// Minimum runs required before a test is classified.
    pub min_runs: usize,

    /// Lower edge of the flaky band, percent.
    pub flaky_low: f64,

    /// Upper edge of the flaky band, percent.
    pub flaky_high: f64,
}

/// The `insights.json` document: one analysis invocation, self-describing.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct InsightsReport {
    /// When the report was generated.
    pub generated_at: DateTime<FixedOffset>,

    /// The configuration the analysis ran with.
    pub configuration: ConfigSummary,

    /// Aggregate counts per classification.
    pub statistics: AggregateStatistics,

    /// The ranked rows, most actionable first.
    pub test_patterns: Vec<TestPatternSummary>,
}

impl InsightsReport {
    /// Serializes this report as pretty-printed JSON.
    pub fn to_writer_pretty(&self, writer: impl io::Write) -> serde_json::Result<()> {
        serde_json::to_writer_pretty(writer, self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_and_count_round_trip() {
        let mut stats = AggregateStatistics::default();
        for classification in PatternClassification::ALL {
            stats.record(classification);
            stats.record(classification);
        }
        assert_eq!(stats.total_tests, 12);
        for classification in PatternClassification::ALL {
            assert_eq!(stats.count(classification), 2);
        }
    }

    #[test]
    fn health_score_counts_stable_and_mostly_stable() {
        let mut stats = AggregateStatistics::default();
        stats.record(PatternClassification::Stable);
        stats.record(PatternClassification::MostlyStable);
        stats.record(PatternClassification::Flaky);
        stats.record(PatternClassification::ConsistentlyFailing);
        assert_eq!(stats.health_score(), Some(50.0));

        assert_eq!(AggregateStatistics::default().health_score(), None);
    }

    #[test]
    fn short_name_strips_qualifier() {
        let summary = TestPatternSummary {
            identity: "com.example.api.TestLogin.test_user_login".to_owned(),
            total_runs: 1,
            pass_count: 1,
            fail_count: 0,
            skip_count: 0,
            failure_rate: 0.0,
            classification: PatternClassification::InsufficientData,
            confidence_score: 0.0,
            avg_duration: 0.0,
            distinct_error_count: 0,
            error_samples: vec![],
        };
        assert_eq!(summary.short_name(), "test_user_login");
    }
}
