// Copyright (c) The flaketrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use flaketrack_core::errors::{ConfigParseError, ParseReportError, SampleDataError, WriteReportError};
use flaketrack_metadata::FlaketrackExitCode;
use std::error::Error;
use thiserror::Error;

pub(crate) type Result<T, E = ExpectedError> = std::result::Result<T, E>;

// Note that the #[error()] strings are mostly placeholder messages -- the
// expected way to print out errors is with the display_to_stderr method.

/// A failure mode flaketrack knows how to report and map to an exit code.
#[derive(Debug, Error)]
#[doc(hidden)]
pub enum ExpectedError {
    #[error("config parse error")]
    ConfigParseError {
        #[from]
        err: ConfigParseError,
    },
    #[error("invalid input pattern")]
    InputPatternError {
        pattern: String,
        #[source]
        err: globset::Error,
    },
    #[error("no valid input")]
    NoValidInput { attempted: usize },
    #[error("writing reports failed")]
    WriteReportError {
        #[from]
        err: WriteReportError,
    },
    #[error("sample data generation failed")]
    SampleDataError {
        #[from]
        err: SampleDataError,
    },
    #[error("writing to stdout failed")]
    StdoutError {
        #[source]
        err: std::io::Error,
    },
    #[error("error reading prompt")]
    DialoguerError {
        #[source]
        err: dialoguer::Error,
    },
}

impl ExpectedError {
    /// Returns the exit code for the process.
    pub fn process_exit_code(&self) -> i32 {
        match self {
            Self::ConfigParseError { .. }
            | Self::InputPatternError { .. }
            | Self::DialoguerError { .. } => FlaketrackExitCode::SETUP_ERROR,
            Self::NoValidInput { .. } => FlaketrackExitCode::NO_VALID_INPUT,
            Self::WriteReportError { .. } | Self::StdoutError { .. } => {
                FlaketrackExitCode::WRITE_OUTPUT_ERROR
            }
            Self::SampleDataError { .. } => FlaketrackExitCode::SAMPLE_GENERATION_FAILED,
        }
    }

    /// Displays this error to stderr.
    pub fn display_to_stderr(&self) {
        let mut next_error = match &self {
            Self::ConfigParseError { err } => {
                tracing::error!("{}", err);
                err.source()
            }
            Self::InputPatternError { pattern, err } => {
                tracing::error!("invalid input pattern `{pattern}`");
                Some(err as &dyn Error)
            }
            Self::NoValidInput { attempted } => {
                tracing::error!(
                    "no valid test execution records found in {attempted} input file(s)"
                );
                None
            }
            Self::WriteReportError { err } => {
                tracing::error!("{}", err);
                err.source()
            }
            Self::SampleDataError { err } => {
                tracing::error!("{}", err);
                err.source()
            }
            Self::StdoutError { err } => {
                tracing::error!("failed to write to stdout");
                Some(err as &dyn Error)
            }
            Self::DialoguerError { err } => {
                tracing::error!("error reading input prompt");
                Some(err as &dyn Error)
            }
        };

        while let Some(err) = next_error {
            tracing::error!(target: "flaketrack::no_heading", "\nCaused by:\n  {}", err);
            next_error = err.source();
        }
    }
}

// Per-file parse failures are reported as warnings, not errors: the run
// continues with the remaining files.
pub(crate) fn warn_skipped_file(err: &ParseReportError) {
    tracing::warn!("{}", err);
    let mut next_error = err.source();
    while let Some(err) = next_error {
        tracing::warn!(target: "flaketrack::no_heading", "  caused by: {}", err);
        next_error = err.source();
    }
}
