// Copyright (c) The flaketrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Execution records: one observed outcome of one test in one run.

use chrono::{DateTime, FixedOffset, Local};
use std::time::Duration;

/// The three-way outcome of a single test execution.
///
/// The ingestion adapter is responsible for mapping a source file's notion of
/// "passed/failed/skipped" (including nested failure vs. error markers) onto
/// this enum.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum TestOutcome {
    /// The test passed.
    Passed,

    /// The test failed, either through an expected assertion failure or an
    /// unexpected error.
    Failed,

    /// The test was not run.
    Skipped,
}

/// A single test execution result.
///
/// Immutable once constructed. A record is owned exclusively by whichever
/// accumulator it is appended to; it is never shared or mutated after
/// creation.
#[derive(Clone, Debug)]
pub struct ExecutionRecord {
    /// The fully-qualified test name, stable across runs. For JUnit sources
    /// this is `classname.name`.
    pub test_identity: String,

    /// The outcome of this execution.
    pub outcome: TestOutcome,

    /// The failure message, present only when [`Self::outcome`] is
    /// [`TestOutcome::Failed`] and the source carried one.
    pub error_message: Option<String>,

    /// How long the execution took. Zero means "not timed".
    pub duration: Duration,

    /// When the execution happened. Defaults to ingestion time if the source
    /// lacks a timestamp.
    pub timestamp: DateTime<FixedOffset>,
}

impl ExecutionRecord {
    /// Creates a new record, stamping it with the current local time.
    pub fn new(
        test_identity: impl Into<String>,
        outcome: TestOutcome,
        error_message: Option<String>,
        duration: Duration,
    ) -> Self {
        Self {
            test_identity: test_identity.into(),
            outcome,
            error_message,
            duration,
            timestamp: Local::now().fixed_offset(),
        }
    }

    /// Sets an explicit timestamp, replacing the ingestion-time default.
    pub fn with_timestamp(mut self, timestamp: impl Into<DateTime<FixedOffset>>) -> Self {
        self.timestamp = timestamp.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_record_carries_message() {
        let record = ExecutionRecord::new(
            "com.example.TestApi.test_timeout",
            TestOutcome::Failed,
            Some("TimeoutException: request timed out after 30s".to_owned()),
            Duration::from_millis(1200),
        );
        assert_eq!(record.outcome, TestOutcome::Failed);
        assert!(record.error_message.as_deref().unwrap().starts_with("TimeoutException"));
    }
}
