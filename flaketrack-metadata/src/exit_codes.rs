// Copyright (c) The flaketrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

/// Documented exit codes for `flaketrack` failures.
///
/// `flaketrack` runs may fail for a variety of reasons. This structure
/// documents the exit codes that may occur in case of expected failures.
///
/// Unknown/unexpected failures will always result in exit code 1.
pub enum FlaketrackExitCode {}

impl FlaketrackExitCode {
    /// No errors occurred and flaketrack exited normally.
    pub const OK: i32 = 0;

    /// A user issue happened while setting up a flaketrack invocation, such as
    /// an invalid configuration file or threshold values.
    pub const SETUP_ERROR: i32 = 96;

    /// No valid execution records were found in any of the supplied inputs.
    pub const NO_VALID_INPUT: i32 = 4;

    /// Writing a report to the output directory produced an error.
    pub const WRITE_OUTPUT_ERROR: i32 = 110;

    /// Generating sample data produced an error.
    pub const SAMPLE_GENERATION_FAILED: i32 = 103;
}
