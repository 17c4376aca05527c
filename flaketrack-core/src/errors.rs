// Copyright (c) The flaketrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Errors produced by flaketrack-core.

use camino::Utf8PathBuf;
use config::ConfigError;
use std::io;
use thiserror::Error;

/// An error that occurred while parsing a JUnit XML report file.
///
/// Parse errors are reported per-file: the caller is expected to log and skip
/// the offending file, feeding the engine only well-formed records.
#[derive(Debug, Error)]
#[error("failed to parse test report `{file}`")]
pub struct ParseReportError {
    file: Utf8PathBuf,
    #[source]
    kind: ParseReportErrorKind,
}

impl ParseReportError {
    pub(crate) fn new(file: impl Into<Utf8PathBuf>, kind: ParseReportErrorKind) -> Self {
        Self {
            file: file.into(),
            kind,
        }
    }

    /// The file that failed to parse.
    pub fn file(&self) -> &Utf8PathBuf {
        &self.file
    }
}

/// The underlying cause of a [`ParseReportError`].
#[derive(Debug, Error)]
pub enum ParseReportErrorKind {
    /// The file could not be read.
    #[error("error reading file")]
    Read(#[from] io::Error),

    /// The file is not well-formed XML.
    #[error("invalid XML")]
    Xml(#[from] quick_xml::Error),
}

/// An error that occurred while parsing the flaketrack config.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigParseError {
    /// The config sources failed to load or deserialize.
    #[error("failed to parse flaketrack config at `{config_file}`")]
    Parse {
        /// The config file that was read (the default `flaketrack.toml` when
        /// no explicit path was given).
        config_file: Utf8PathBuf,
        /// The underlying error.
        #[source]
        err: ConfigError,
    },

    /// The loaded settings violate a threshold constraint.
    #[error("invalid thresholds: {reason} (min-runs {min_runs}, flaky band [{flaky_low}, {flaky_high}])")]
    InvalidThresholds {
        /// Why the thresholds were rejected.
        reason: &'static str,
        /// The configured minimum run count.
        min_runs: usize,
        /// The configured lower band edge.
        flaky_low: f64,
        /// The configured upper band edge.
        flaky_high: f64,
    },
}

/// An error that occurred while writing a report to the output directory.
#[derive(Debug, Error)]
pub enum WriteReportError {
    /// A filesystem operation failed.
    #[error("error writing to `{file}`")]
    Fs {
        /// The file or directory being written.
        file: Utf8PathBuf,
        /// The underlying error.
        #[source]
        error: io::Error,
    },

    /// JSON serialization failed.
    #[error("error serializing JSON report `{file}`")]
    Json {
        /// The file being written.
        file: Utf8PathBuf,
        /// The underlying error.
        #[source]
        error: serde_json::Error,
    },
}

/// An error that occurred while generating sample test data.
#[derive(Debug, Error)]
pub enum SampleDataError {
    /// A filesystem operation failed.
    #[error("error writing sample data to `{file}`")]
    Fs {
        /// The file or directory being written.
        file: Utf8PathBuf,
        /// The underlying error.
        #[source]
        error: io::Error,
    },

    /// XML serialization failed.
    #[error("error serializing sample report `{file}`")]
    Xml {
        /// The file being written.
        file: Utf8PathBuf,
        /// The underlying error.
        #[source]
        error: quick_xml::Error,
    },
}
