// Copyright (c) The flaketrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use serde::{Deserialize, Serialize};
use std::fmt;

/// The reliability classification assigned to a test after analysis.
///
/// Classification is a closed enumeration so that ranking and rendering can
/// match on it exhaustively. The variants are ordered by triage priority:
/// [`Self::priority`] returns the rank used by ranked reports, with the most
/// actionable classifications first.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PatternClassification {
    /// The test failed in every recorded run.
    ConsistentlyFailing,

    /// The test fails intermittently: its failure rate falls inside the
    /// configured flaky band.
    Flaky,

    /// The test fails more often than the upper edge of the flaky band, but
    /// not always.
    MostlyFailing,

    /// The test fails occasionally, below the lower edge of the flaky band.
    MostlyStable,

    /// The test passed in every recorded run.
    Stable,

    /// Too few runs were recorded to classify the test.
    InsufficientData,
}

impl PatternClassification {
    /// All classifications, in ranking order.
    pub const ALL: [Self; 6] = [
        Self::ConsistentlyFailing,
        Self::Flaky,
        Self::MostlyFailing,
        Self::MostlyStable,
        Self::Stable,
        Self::InsufficientData,
    ];

    /// Returns the ranking priority for this classification.
    ///
    /// Lower values sort first in ranked reports. This ordering is a contract
    /// renderers depend on: the most actionable tests surface first regardless
    /// of output format.
    pub fn priority(self) -> u8 {
        match self {
            Self::ConsistentlyFailing => 0,
            Self::Flaky => 1,
            Self::MostlyFailing => 2,
            Self::MostlyStable => 3,
            Self::Stable => 4,
            Self::InsufficientData => 5,
        }
    }

    /// Returns true for classifications that need attention now.
    ///
    /// These form the critical subset: tests that are either always broken or
    /// unreliable enough to undermine trust in the suite.
    pub fn is_critical(self) -> bool {
        matches!(self, Self::ConsistentlyFailing | Self::Flaky)
    }

    /// Returns true for classifications counted as healthy in the suite
    /// health score.
    pub fn is_healthy(self) -> bool {
        matches!(self, Self::Stable | Self::MostlyStable)
    }

    /// The human-readable display name, e.g. `Consistently Failing`.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::ConsistentlyFailing => "Consistently Failing",
            Self::Flaky => "Flaky",
            Self::MostlyFailing => "Mostly Failing",
            Self::MostlyStable => "Mostly Stable",
            Self::Stable => "Stable",
            Self::InsufficientData => "Insufficient Data",
        }
    }

    /// String representations of all variants, in ranking order.
    pub fn variants() -> [&'static str; 6] {
        Self::ALL.map(Self::display_name)
    }
}

impl fmt::Display for PatternClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}
