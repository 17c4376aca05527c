// Copyright (c) The flaketrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The detection engine: routes records to accumulators, runs the classifier,
//! and exposes ranked and aggregated views.

use crate::{
    classify::classify,
    config::DetectorConfig,
    pattern::PatternAccumulator,
    record::ExecutionRecord,
};
use flaketrack_metadata::{AggregateStatistics, TestPatternSummary};
use indexmap::IndexMap;
use std::cmp::Ordering;

/// Accumulates execution records across many named tests and classifies each
/// test's pattern.
///
/// An engine is a fresh, self-contained computation: it owns its accumulators
/// exclusively, carries no cross-invocation state, and derives every view
/// from the records supplied to it.
#[derive(Debug)]
pub struct DetectionEngine {
    config: DetectorConfig,
    // Insertion-ordered so that ranked-report ties resolve to first-seen
    // order under a stable sort.
    patterns: IndexMap<String, PatternAccumulator>,
}

impl DetectionEngine {
    /// Creates an engine with the given configuration.
    pub fn new(config: DetectorConfig) -> Self {
        Self {
            config,
            patterns: IndexMap::new(),
        }
    }

    /// The configuration this engine runs with.
    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Routes each record to the accumulator for its test identity, creating
    /// accumulators on first sight.
    ///
    /// Never fails on a well-formed record: an unrecognized identity simply
    /// creates a new accumulator.
    pub fn ingest(&mut self, records: impl IntoIterator<Item = ExecutionRecord>) {
        for record in records {
            self.patterns
                .entry(record.test_identity.clone())
                .or_insert_with(|| PatternAccumulator::new(record.test_identity.clone()))
                .append(record);
        }
    }

    /// The number of distinct tests seen so far.
    pub fn test_count(&self) -> usize {
        self.patterns.len()
    }

    /// Returns true if no records have been ingested.
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Runs the classifier over every accumulator.
    ///
    /// Idempotent: the classifier is pure and reads do not change accumulator
    /// state, so calling this twice without an intervening
    /// [`ingest`](Self::ingest) produces identical classifications.
    pub fn analyze(&mut self) {
        let thresholds = self.config.thresholds();
        for pattern in self.patterns.values_mut() {
            let classified = classify(&pattern.snapshot(), thresholds);
            pattern.set_classified(classified);
        }
    }

    /// Counts per classification across all accumulators.
    pub fn aggregate_statistics(&self) -> AggregateStatistics {
        let mut stats = AggregateStatistics::default();
        for pattern in self.patterns.values() {
            stats.record(pattern.summary().classification);
        }
        stats
    }

    /// The full ranked report: one row per test, sorted by classification
    /// priority (most actionable first), then by failure rate descending
    /// within the same classification. Ties keep insertion order.
    pub fn ranked_report(&self) -> Vec<TestPatternSummary> {
        let mut rows: Vec<_> = self.patterns.values().map(PatternAccumulator::summary).collect();
        // Vec::sort_by is stable, which the tie-break contract relies on.
        rows.sort_by(|a, b| {
            a.classification
                .priority()
                .cmp(&b.classification.priority())
                .then_with(|| {
                    b.failure_rate
                        .partial_cmp(&a.failure_rate)
                        .unwrap_or(Ordering::Equal)
                })
        });
        rows
    }

    /// The "needs attention now" subset: tests classified consistently
    /// failing or flaky, in ranked order.
    pub fn critical_tests(&self) -> Vec<TestPatternSummary> {
        self.ranked_report()
            .into_iter()
            .filter(|row| row.classification.is_critical())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::{ConfigOverrides, DetectorConfig},
        record::TestOutcome,
    };
    use flaketrack_metadata::PatternClassification;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn engine() -> DetectionEngine {
        let config = DetectorConfig::from_sources(None, &ConfigOverrides::default()).unwrap();
        DetectionEngine::new(config)
    }

    fn runs(identity: &str, passes: usize, fails: usize) -> Vec<ExecutionRecord> {
        let mut records = Vec::new();
        for _ in 0..passes {
            records.push(ExecutionRecord::new(
                identity,
                TestOutcome::Passed,
                None,
                Duration::from_millis(100),
            ));
        }
        for _ in 0..fails {
            records.push(ExecutionRecord::new(
                identity,
                TestOutcome::Failed,
                Some("AssertionError: expected 200 but got 500".to_owned()),
                Duration::from_millis(100),
            ));
        }
        records
    }

    #[test]
    fn records_route_by_identity() {
        let mut engine = engine();
        engine.ingest(runs("a", 2, 0));
        engine.ingest(runs("b", 0, 3));
        engine.ingest(runs("a", 1, 0));
        assert_eq!(engine.test_count(), 2);
    }

    #[test]
    fn consistently_failing_scenario() {
        // 20 runs, all failing: classification ConsistentlyFailing with full
        // confidence (label 100 blended with sample 100).
        let mut engine = engine();
        engine.ingest(runs("t", 0, 20));
        engine.analyze();

        let rows = engine.ranked_report();
        assert_eq!(rows.len(), 1);
        assert_eq!(
            rows[0].classification,
            PatternClassification::ConsistentlyFailing
        );
        assert_eq!(rows[0].confidence_score, 100.0);
        assert_eq!(rows[0].failure_rate, 100.0);
    }

    #[test]
    fn flaky_scenario_blends_confidence() {
        // 20 runs, 10 failing: Flaky with label confidence 50, sample
        // confidence 100, final 75.
        let mut engine = engine();
        engine.ingest(runs("u", 10, 10));
        engine.analyze();

        let rows = engine.ranked_report();
        assert_eq!(rows[0].classification, PatternClassification::Flaky);
        assert_eq!(rows[0].confidence_score, 75.0);
    }

    #[test]
    fn insufficient_data_scenario() {
        // 3 runs, one failing, min_runs 5: InsufficientData with confidence 0
        // regardless of failure rate.
        let mut engine = engine();
        engine.ingest(runs("v", 2, 1));
        engine.analyze();

        let rows = engine.ranked_report();
        assert_eq!(
            rows[0].classification,
            PatternClassification::InsufficientData
        );
        assert_eq!(rows[0].confidence_score, 0.0);
    }

    #[test]
    fn analyze_is_idempotent() {
        let mut engine = engine();
        engine.ingest(runs("a", 10, 10));
        engine.ingest(runs("b", 0, 8));
        engine.analyze();
        let first = engine.ranked_report();
        engine.analyze();
        let second = engine.ranked_report();
        assert_eq!(first, second);
    }

    #[test]
    fn ranking_orders_by_priority_then_rate() {
        let mut engine = engine();
        engine.ingest(runs("stable", 20, 0));
        engine.ingest(runs("flaky_mild", 14, 6)); // 30% failure
        engine.ingest(runs("broken", 0, 20));
        engine.ingest(runs("flaky_bad", 6, 14)); // 70% failure
        engine.analyze();

        let order: Vec<_> = engine
            .ranked_report()
            .into_iter()
            .map(|row| row.identity)
            .collect();
        assert_eq!(order, vec!["broken", "flaky_bad", "flaky_mild", "stable"]);
    }

    #[test]
    fn equal_rates_keep_insertion_order() {
        let mut engine = engine();
        engine.ingest(runs("first", 10, 10));
        engine.ingest(runs("second", 10, 10));
        engine.analyze();

        let order: Vec<_> = engine
            .ranked_report()
            .into_iter()
            .map(|row| row.identity)
            .collect();
        assert_eq!(order, vec!["first", "second"]);
    }

    #[test]
    fn critical_tests_scenario() {
        // One stable, one flaky, one consistently failing: the critical view
        // returns exactly the latter two, worst first.
        let mut engine = engine();
        engine.ingest(runs("stable", 20, 0));
        engine.ingest(runs("flaky", 10, 10));
        engine.ingest(runs("broken", 0, 20));
        engine.analyze();

        let critical: Vec<_> = engine
            .critical_tests()
            .into_iter()
            .map(|row| (row.identity, row.classification))
            .collect();
        assert_eq!(
            critical,
            vec![
                (
                    "broken".to_owned(),
                    PatternClassification::ConsistentlyFailing
                ),
                ("flaky".to_owned(), PatternClassification::Flaky),
            ]
        );
    }

    #[test]
    fn aggregate_statistics_counts_labels() {
        let mut engine = engine();
        engine.ingest(runs("stable", 20, 0));
        engine.ingest(runs("flaky", 10, 10));
        engine.ingest(runs("broken", 0, 20));
        engine.ingest(runs("thin", 2, 1));
        engine.analyze();

        let stats = engine.aggregate_statistics();
        assert_eq!(stats.total_tests, 4);
        assert_eq!(stats.stable_tests, 1);
        assert_eq!(stats.flaky_tests, 1);
        assert_eq!(stats.failing_tests, 1);
        assert_eq!(stats.insufficient_data, 1);
        assert_eq!(stats.health_score(), Some(25.0));
    }

    #[test]
    fn ingest_after_analyze_invalidates_labels() {
        let mut engine = engine();
        engine.ingest(runs("t", 20, 0));
        engine.analyze();
        assert_eq!(
            engine.ranked_report()[0].classification,
            PatternClassification::Stable
        );

        // New records make the stored label stale; until analyze runs again
        // the row falls back to the untrusted default.
        engine.ingest(runs("t", 0, 1));
        assert_eq!(
            engine.ranked_report()[0].classification,
            PatternClassification::InsufficientData
        );
        engine.analyze();
        assert_eq!(
            engine.ranked_report()[0].classification,
            PatternClassification::MostlyStable
        );
    }
}
