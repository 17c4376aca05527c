// Copyright (c) The flaketrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-test accumulation of execution history.

use crate::record::{ExecutionRecord, TestOutcome};
use flaketrack_metadata::{PatternClassification, TestPatternSummary};
use indexmap::IndexMap;
use std::time::Duration;

/// How many distinct error messages are echoed into reports per test.
const ERROR_SAMPLE_LIMIT: usize = 3;

/// A read-only snapshot of an accumulator's counters, used as classifier
/// input.
#[derive(Clone, Debug)]
pub struct PatternStats {
    /// Number of recorded executions.
    pub total_runs: usize,

    /// Number of passing executions.
    pub pass_count: usize,

    /// Number of failing executions.
    pub fail_count: usize,

    /// Number of skipped executions.
    pub skip_count: usize,

    /// Durations of all recorded executions, in insertion order.
    pub durations: Vec<Duration>,
}

impl PatternStats {
    /// The failure rate as a percentage in `[0, 100]`. Zero when no runs have
    /// been recorded.
    pub fn failure_rate(&self) -> f64 {
        if self.total_runs == 0 {
            0.0
        } else {
            self.fail_count as f64 / self.total_runs as f64 * 100.0
        }
    }

    /// The mean duration in seconds over timed executions. Durations of
    /// exactly zero are treated as "not timed" and excluded from the mean.
    pub fn avg_duration(&self) -> f64 {
        let timed: Vec<f64> = self
            .durations
            .iter()
            .filter(|d| !d.is_zero())
            .map(Duration::as_secs_f64)
            .collect();
        if timed.is_empty() {
            0.0
        } else {
            timed.iter().sum::<f64>() / timed.len() as f64
        }
    }
}

/// The result of classifying one accumulator.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ClassifiedPattern {
    /// The assigned classification.
    pub classification: PatternClassification,

    /// Confidence in the classification, `0`–`100`.
    pub confidence_score: f64,
}

/// Owns the growing execution history for a single named test.
///
/// Created lazily by the engine the first time a record for its identity
/// arrives, mutated only by record appends and the one-time analysis pass,
/// and never deleted within a run.
#[derive(Clone, Debug)]
pub struct PatternAccumulator {
    identity: String,
    records: Vec<ExecutionRecord>,
    pass_count: usize,
    fail_count: usize,
    skip_count: usize,
    // Multiset of failure messages, insertion-ordered. Used only to report a
    // distinct-error count and samples, never for classification.
    error_patterns: IndexMap<String, usize>,
    classified: Option<ClassifiedPattern>,
}

impl PatternAccumulator {
    /// Creates an empty accumulator for the given test identity.
    pub fn new(identity: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            records: Vec::new(),
            pass_count: 0,
            fail_count: 0,
            skip_count: 0,
            error_patterns: IndexMap::new(),
            classified: None,
        }
    }

    /// The test identity this accumulator tracks.
    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// Appends one execution record.
    ///
    /// The record's identity must match this accumulator's identity; routing
    /// is the engine's responsibility. Duplicate identical records are
    /// accepted and counted independently: each record is one execution.
    pub fn append(&mut self, record: ExecutionRecord) {
        debug_assert_eq!(
            record.test_identity, self.identity,
            "record routed to wrong accumulator"
        );
        match record.outcome {
            TestOutcome::Passed => self.pass_count += 1,
            TestOutcome::Failed => {
                self.fail_count += 1;
                if let Some(message) = record.error_message.as_deref() {
                    if !message.is_empty() {
                        *self.error_patterns.entry(message.to_owned()).or_insert(0) += 1;
                    }
                }
            }
            TestOutcome::Skipped => self.skip_count += 1,
        }
        self.records.push(record);
        // Any previously-computed classification is stale now.
        self.classified = None;
    }

    /// Total recorded executions. Always equals
    /// `pass_count + fail_count + skip_count` and `records().len()`.
    pub fn total_runs(&self) -> usize {
        self.pass_count + self.fail_count + self.skip_count
    }

    /// The recorded executions, in insertion order.
    pub fn records(&self) -> &[ExecutionRecord] {
        &self.records
    }

    /// Returns a read-only snapshot of the counters. Pure, no side effect.
    pub fn snapshot(&self) -> PatternStats {
        PatternStats {
            total_runs: self.total_runs(),
            pass_count: self.pass_count,
            fail_count: self.fail_count,
            skip_count: self.skip_count,
            durations: self.records.iter().map(|r| r.duration).collect(),
        }
    }

    /// The number of distinct error messages observed across failures.
    pub fn distinct_error_count(&self) -> usize {
        self.error_patterns.len()
    }

    /// Stores the result of the analysis pass.
    pub(crate) fn set_classified(&mut self, classified: ClassifiedPattern) {
        self.classified = Some(classified);
    }

    /// The stored classification, if analysis has run since the last append.
    pub fn classified(&self) -> Option<ClassifiedPattern> {
        self.classified
    }

    /// Builds the report row for this accumulator.
    ///
    /// An accumulator that has not been analyzed since its last append
    /// reports [`PatternClassification::InsufficientData`] with confidence
    /// zero: an unanalyzed label is by definition not to be trusted.
    pub fn summary(&self) -> TestPatternSummary {
        let stats = self.snapshot();
        let classified = self.classified.unwrap_or(ClassifiedPattern {
            classification: PatternClassification::InsufficientData,
            confidence_score: 0.0,
        });
        TestPatternSummary {
            identity: self.identity.clone(),
            total_runs: stats.total_runs,
            pass_count: stats.pass_count,
            fail_count: stats.fail_count,
            skip_count: stats.skip_count,
            failure_rate: stats.failure_rate(),
            classification: classified.classification,
            confidence_score: classified.confidence_score,
            avg_duration: stats.avg_duration(),
            distinct_error_count: self.error_patterns.len(),
            error_samples: self
                .error_patterns
                .keys()
                .take(ERROR_SAMPLE_LIMIT)
                .cloned()
                .collect(),
        }
    }
}
