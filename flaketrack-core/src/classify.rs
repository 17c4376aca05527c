// Copyright (c) The flaketrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The classification policy: statistics in, label and confidence out.

use crate::pattern::{ClassifiedPattern, PatternStats};
use flaketrack_metadata::{ConfigSummary, PatternClassification};

/// The run count at which sample-size confidence reaches 100.
///
/// Classifications backed by fewer runs are penalized even when the failure
/// rate alone would suggest high certainty. The blend with label confidence
/// is an unweighted average; treat both as policy constants, not laws.
const FULL_CONFIDENCE_RUNS: f64 = 20.0;

/// Classifies one test's accumulated statistics.
///
/// This is a pure function of `(total_runs, fail_count, min_runs, flaky_low,
/// flaky_high)`: two accumulators with identical statistics and the same
/// configuration always yield the same result, independent of accumulation
/// order.
///
/// The decision policy is evaluated in order, first match wins. The ordering
/// is a deliberate tie-break: the exact 0% and 100% cases take precedence
/// over the flaky band even when the band includes them.
///
/// 1. Fewer than `min_runs` runs (or none at all) → `InsufficientData`,
///    confidence 0, with no sample-size blend applied.
/// 2. Failure rate exactly 0 → `Stable`, 100.
/// 3. Failure rate exactly 100 → `ConsistentlyFailing`, 100.
/// 4. Failure rate within `[flaky_low, flaky_high]` → `Flaky`, with
///    confidence `100 - |50 - rate|`: maximal at the edges of the band and
///    minimal (50) at the coin-flip point.
/// 5. Below the band → `MostlyStable`, 90.
/// 6. Above the band → `MostlyFailing`, 90.
///
/// The label confidence from steps 2–6 is then averaged with a sample-size
/// confidence of `min(100, total_runs / 20 * 100)`.
pub fn classify(stats: &PatternStats, config: ConfigSummary) -> ClassifiedPattern {
    // The zero-run check is not subsumed by min_runs: it must short-circuit
    // before any division regardless of how min_runs is configured.
    if stats.total_runs == 0 || stats.total_runs < config.min_runs {
        return ClassifiedPattern {
            classification: PatternClassification::InsufficientData,
            confidence_score: 0.0,
        };
    }

    let failure_rate = stats.failure_rate();
    // The 0% and 100% boundaries compare on integer counts so they cannot be
    // missed to float rounding.
    let (classification, label_confidence) = if stats.fail_count == 0 {
        (PatternClassification::Stable, 100.0)
    } else if stats.fail_count == stats.total_runs {
        (PatternClassification::ConsistentlyFailing, 100.0)
    } else if config.flaky_low <= failure_rate && failure_rate <= config.flaky_high {
        (
            PatternClassification::Flaky,
            100.0 - (50.0 - failure_rate).abs(),
        )
    } else if failure_rate < config.flaky_low {
        (PatternClassification::MostlyStable, 90.0)
    } else {
        (PatternClassification::MostlyFailing, 90.0)
    };

    let sample_confidence = (stats.total_runs as f64 / FULL_CONFIDENCE_RUNS * 100.0).min(100.0);
    ClassifiedPattern {
        classification,
        confidence_score: (label_confidence + sample_confidence) / 2.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn stats(pass: usize, fail: usize, skip: usize) -> PatternStats {
        PatternStats {
            total_runs: pass + fail + skip,
            pass_count: pass,
            fail_count: fail,
            skip_count: skip,
            durations: vec![],
        }
    }

    fn config() -> ConfigSummary {
        ConfigSummary {
            min_runs: 5,
            flaky_low: 5.0,
            flaky_high: 95.0,
        }
    }

    #[test_case(20, 0, 0, PatternClassification::Stable, 100.0; "all passes")]
    #[test_case(0, 20, 0, PatternClassification::ConsistentlyFailing, 100.0; "all failures")]
    #[test_case(10, 10, 0, PatternClassification::Flaky, 75.0; "coin flip")]
    #[test_case(19, 1, 0, PatternClassification::Flaky, 77.5; "lower band edge")]
    #[test_case(1, 19, 0, PatternClassification::Flaky, 77.5; "upper band edge")]
    #[test_case(49, 1, 0, PatternClassification::MostlyStable, 95.0; "below band")]
    #[test_case(1, 49, 0, PatternClassification::MostlyFailing, 95.0; "above band")]
    fn decision_table(
        pass: usize,
        fail: usize,
        skip: usize,
        expected: PatternClassification,
        confidence: f64,
    ) {
        let result = classify(&stats(pass, fail, skip), config());
        assert_eq!(result.classification, expected);
        assert_eq!(result.confidence_score, confidence);
    }

    #[test]
    fn insufficient_data_skips_blend() {
        // 3 runs with one failure: the failure rate is irrelevant below
        // min_runs, and no sample-size blend applies.
        let result = classify(&stats(2, 1, 0), config());
        assert_eq!(
            result.classification,
            PatternClassification::InsufficientData
        );
        assert_eq!(result.confidence_score, 0.0);
    }

    #[test]
    fn zero_runs_short_circuit() {
        let zero_min = ConfigSummary {
            min_runs: 0,
            ..config()
        };
        let result = classify(&stats(0, 0, 0), zero_min);
        assert_eq!(
            result.classification,
            PatternClassification::InsufficientData
        );
        assert_eq!(result.confidence_score, 0.0);
    }

    #[test]
    fn thin_history_penalized() {
        // 5 runs, all passing: label confidence 100, sample confidence 25.
        let result = classify(&stats(5, 0, 0), config());
        assert_eq!(result.classification, PatternClassification::Stable);
        assert_eq!(result.confidence_score, 62.5);
    }

    #[test]
    fn skips_dilute_failure_rate() {
        // 10 fails + 10 skips: skips raise total_runs but are not failures,
        // so the rate is 50%, not 100%.
        let result = classify(&stats(0, 10, 10), config());
        assert_eq!(result.classification, PatternClassification::Flaky);
        assert_eq!(result.confidence_score, 75.0);
    }

    #[test]
    fn pure_function_of_stats_and_config() {
        let a = classify(&stats(7, 3, 1), config());
        let b = classify(&stats(7, 3, 1), config());
        assert_eq!(a, b);
    }
}
