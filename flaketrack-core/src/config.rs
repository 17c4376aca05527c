// Copyright (c) The flaketrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loading.
//!
//! Configuration is layered: embedded defaults, then an optional
//! `flaketrack.toml` file, then command-line overrides. The engine receives
//! the resolved [`DetectorConfig`] explicitly — there is no process-wide
//! mutable settings object.

use crate::errors::ConfigParseError;
use camino::{Utf8Path, Utf8PathBuf};
use config::{Config, File, FileFormat};
use flaketrack_metadata::ConfigSummary;
use serde::Deserialize;

/// The name of the config file looked up in the working directory when no
/// explicit path is given.
pub const CONFIG_FILE_NAME: &str = "flaketrack.toml";

/// The resolved configuration for one analysis invocation.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct DetectorConfig {
    /// Minimum runs required before a test is classified.
    pub min_runs: usize,

    /// Lower edge of the flaky band, percent.
    pub flaky_low: f64,

    /// Upper edge of the flaky band, percent.
    pub flaky_high: f64,

    /// Directory reports are written to.
    pub output_dir: Utf8PathBuf,

    /// Whether the CSV renderer runs.
    pub generate_csv: bool,

    /// Whether the JSON renderer runs.
    pub generate_json: bool,

    /// Whether the HTML dashboard renderer runs.
    pub generate_html: bool,
}

/// Command-line overrides applied on top of file-based configuration.
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    /// Overrides `min_runs`.
    pub min_runs: Option<usize>,

    /// Overrides `flaky_low`.
    pub flaky_low: Option<f64>,

    /// Overrides `flaky_high`.
    pub flaky_high: Option<f64>,

    /// Overrides `output_dir`.
    pub output_dir: Option<Utf8PathBuf>,
}

impl DetectorConfig {
    /// The default config, included with this binary.
    pub const DEFAULT_CONFIG: &'static str = include_str!("../default-config/flaketrack.toml");

    /// Reads the configuration from the given sources.
    ///
    /// With an explicit `config_file` the file must exist; otherwise
    /// `flaketrack.toml` in the working directory is used when present.
    /// Threshold validation runs after the overrides are applied, so invalid
    /// values are rejected no matter which layer supplied them.
    pub fn from_sources(
        config_file: Option<&Utf8Path>,
        overrides: &ConfigOverrides,
    ) -> Result<Self, ConfigParseError> {
        let mut builder =
            Config::builder().add_source(File::from_str(Self::DEFAULT_CONFIG, FileFormat::Toml));
        builder = match config_file {
            Some(file) => builder.add_source(File::new(file.as_str(), FileFormat::Toml)),
            None => {
                builder.add_source(File::new(CONFIG_FILE_NAME, FileFormat::Toml).required(false))
            }
        };

        let mut config: Self = builder
            .build()
            .and_then(Config::try_deserialize)
            .map_err(|err| ConfigParseError::Parse {
                config_file: config_file
                    .map(Utf8Path::to_path_buf)
                    .unwrap_or_else(|| CONFIG_FILE_NAME.into()),
                err,
            })?;

        if let Some(min_runs) = overrides.min_runs {
            config.min_runs = min_runs;
        }
        if let Some(flaky_low) = overrides.flaky_low {
            config.flaky_low = flaky_low;
        }
        if let Some(flaky_high) = overrides.flaky_high {
            config.flaky_high = flaky_high;
        }
        if let Some(output_dir) = &overrides.output_dir {
            config.output_dir = output_dir.clone();
        }

        config.validate()?;
        Ok(config)
    }

    /// Checks the threshold constraints: `min_runs >= 1` and
    /// `0 <= flaky_low < flaky_high <= 100`.
    pub fn validate(&self) -> Result<(), ConfigParseError> {
        let reason = if self.min_runs < 1 {
            Some("min-runs must be at least 1")
        } else if !(0.0..=100.0).contains(&self.flaky_low)
            || !(0.0..=100.0).contains(&self.flaky_high)
        {
            Some("flaky band edges must be percentages in [0, 100]")
        } else if self.flaky_low >= self.flaky_high {
            Some("flaky-low must be less than flaky-high")
        } else {
            None
        };

        match reason {
            Some(reason) => Err(ConfigParseError::InvalidThresholds {
                reason,
                min_runs: self.min_runs,
                flaky_low: self.flaky_low,
                flaky_high: self.flaky_high,
            }),
            None => Ok(()),
        }
    }

    /// The classifier-facing view of this configuration.
    pub fn thresholds(&self) -> ConfigSummary {
        ConfigSummary {
            min_runs: self.min_runs,
            flaky_low: self.flaky_low,
            flaky_high: self.flaky_high,
        }
    }
}
