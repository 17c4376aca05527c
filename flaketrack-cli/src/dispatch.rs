// Copyright (c) The flaketrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{
    errors::{warn_skipped_file, ExpectedError, Result},
    menu,
    output::{OutputContext, OutputOpts},
};
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Args, Parser, Subcommand};
use flaketrack_core::{
    config::{ConfigOverrides, DetectorConfig},
    engine::DetectionEngine,
    helpers::plural,
    junit::parse_report_file,
    report::{render_reports, ReportOutputs},
    sample::write_sample_data,
};
use flaketrack_metadata::AggregateStatistics;
use globset::Glob;
use owo_colors::OwoColorize;
use rand::RngExt;
use std::io::{self, BufWriter, Write};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Detect flaky and failing test patterns from JUnit XML reports.
///
/// flaketrack ingests one report per CI run, classifies every test by its
/// observed reliability across runs, and writes ranked CSV/JSON/HTML reports
/// for triage.
#[derive(Debug, Parser)]
#[command(name = "flaketrack", version)]
pub struct FlaketrackApp {
    #[command(flatten)]
    output: OutputOpts,

    #[command(subcommand)]
    command: Command,
}

impl FlaketrackApp {
    /// Executes the app.
    pub fn exec(self) -> Result<()> {
        let output = self.output.init();

        match self.command {
            Command::Analyze(opts) => opts.exec(output),
            Command::Generate(opts) => opts.exec(output),
            Command::Menu => menu::run(output),
        }
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Analyze JUnit XML reports and generate ranked reports
    ///
    /// Reads every input file, accumulates per-test execution history across
    /// runs, classifies each test, and writes the configured reports to the
    /// output directory.
    Analyze(AnalyzeOpts),

    /// Generate sample JUnit XML data for a demo run
    ///
    /// Produces one report file per synthetic run over a fixed roster of
    /// tests with known reliability, covering every classification.
    Generate(GenerateOpts),

    /// Interactive menu for first-time use
    Menu,
}

#[derive(Debug, Args)]
pub(crate) struct AnalyzeOpts {
    /// Input JUnit XML files or glob patterns
    #[arg(
        long = "input",
        value_name = "PATH",
        required = true,
        num_args = 1..
    )]
    inputs: Vec<String>,

    /// Config file [default: flaketrack.toml if present]
    #[arg(long, value_name = "PATH")]
    config_file: Option<Utf8PathBuf>,

    #[command(flatten)]
    thresholds: ThresholdOpts,

    /// Output directory for reports
    #[arg(long, value_name = "DIR")]
    output_dir: Option<Utf8PathBuf>,

    /// Skip the CSV report
    #[arg(long)]
    no_csv: bool,

    /// Skip the JSON report
    #[arg(long)]
    no_json: bool,

    /// Skip the HTML dashboard
    #[arg(long)]
    no_html: bool,
}

#[derive(Debug, Default, Args)]
#[command(next_help_heading = "Threshold options")]
struct ThresholdOpts {
    /// Minimum runs required for classification
    #[arg(long, value_name = "N")]
    min_runs: Option<usize>,

    /// Lower edge of the flaky band, percent
    #[arg(long, value_name = "PCT")]
    flaky_low: Option<f64>,

    /// Upper edge of the flaky band, percent
    #[arg(long, value_name = "PCT")]
    flaky_high: Option<f64>,
}

impl AnalyzeOpts {
    /// Builds the options the interactive menu uses: input patterns and an
    /// optional min-runs override, everything else at defaults.
    pub(crate) fn from_inputs(inputs: Vec<String>, min_runs: Option<usize>) -> Self {
        Self {
            inputs,
            config_file: None,
            thresholds: ThresholdOpts {
                min_runs,
                ..ThresholdOpts::default()
            },
            output_dir: None,
            no_csv: false,
            no_json: false,
            no_html: false,
        }
    }

    pub(crate) fn exec(&self, output: OutputContext) -> Result<()> {
        let overrides = ConfigOverrides {
            min_runs: self.thresholds.min_runs,
            flaky_low: self.thresholds.flaky_low,
            flaky_high: self.thresholds.flaky_high,
            output_dir: self.output_dir.clone(),
        };
        let mut config = DetectorConfig::from_sources(self.config_file.as_deref(), &overrides)?;
        if self.no_csv {
            config.generate_csv = false;
        }
        if self.no_json {
            config.generate_json = false;
        }
        if self.no_html {
            config.generate_html = false;
        }

        let files = expand_inputs(&self.inputs)?;
        info!(
            "processing {} test result {}",
            files.len(),
            plural::files_str(files.len())
        );

        let mut engine = DetectionEngine::new(config);
        for file in &files {
            match parse_report_file(file) {
                Ok(records) => {
                    debug!("parsed {} records from {}", records.len(), file);
                    engine.ingest(records);
                }
                Err(err) => warn_skipped_file(&err),
            }
        }

        if engine.is_empty() {
            return Err(ExpectedError::NoValidInput {
                attempted: files.len(),
            });
        }
        info!(
            "analyzing {} unique {}",
            engine.test_count(),
            plural::tests_str(engine.test_count())
        );

        engine.analyze();
        let stats = engine.aggregate_statistics();
        let rows = engine.ranked_report();
        let critical = engine.critical_tests();

        let outputs = render_reports(engine.config(), &stats, &rows, &critical)?;

        let stdout = io::stdout();
        let mut writer = BufWriter::new(stdout.lock());
        write_summary(&mut writer, output, &stats, critical.len(), &outputs)
            .and_then(|()| writer.flush())
            .map_err(|err| ExpectedError::StdoutError { err })?;

        if output.verbose {
            for row in &critical {
                info!(
                    "critical: {} ({}, {:.1}% failure rate)",
                    row.identity, row.classification, row.failure_rate
                );
            }
        }
        Ok(())
    }
}

#[derive(Debug, Args)]
pub(crate) struct GenerateOpts {
    /// Number of synthetic runs to generate
    #[arg(long, default_value_t = 15, value_name = "N")]
    runs: usize,

    /// Directory sample reports are written to
    #[arg(long, default_value = "sample_data", value_name = "DIR")]
    output_dir: Utf8PathBuf,

    /// Seed for deterministic generation [default: random]
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,
}

impl GenerateOpts {
    pub(crate) fn for_menu(output_dir: Utf8PathBuf, runs: usize) -> Self {
        Self {
            runs,
            output_dir,
            seed: None,
        }
    }

    pub(crate) fn exec(&self, _output: OutputContext) -> Result<()> {
        let seed = self.seed.unwrap_or_else(|| rand::rng().random());
        debug!("generating sample data with seed {seed}");

        let paths = write_sample_data(&self.output_dir, self.runs, seed)?;
        info!(
            "generated {} sample {} in {}",
            paths.len(),
            plural::runs_str(paths.len()),
            self.output_dir
        );
        info!(
            "analyze with: flaketrack analyze --input '{}/*.xml'",
            self.output_dir
        );
        Ok(())
    }
}

/// Expands input arguments into concrete file paths.
///
/// Existing paths are taken as-is; anything else is treated as a glob
/// pattern matched against the working directory tree. A pattern that
/// matches nothing is reported as a warning, not an error: partial-failure
/// semantics apply to inputs as a whole.
fn expand_inputs(inputs: &[String]) -> Result<Vec<Utf8PathBuf>> {
    let mut files: Vec<Utf8PathBuf> = Vec::new();
    for input in inputs {
        let path = Utf8Path::new(input);
        if path.is_file() {
            if !files.iter().any(|known| known.as_path() == path) {
                files.push(path.to_path_buf());
            }
            continue;
        }

        let matcher = Glob::new(input)
            .map_err(|err| ExpectedError::InputPatternError {
                pattern: input.clone(),
                err,
            })?
            .compile_matcher();

        let mut matched: Vec<Utf8PathBuf> = WalkDir::new(".")
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| {
                let rel = entry.path().strip_prefix(".").unwrap_or(entry.path());
                Utf8Path::from_path(rel).map(Utf8Path::to_path_buf)
            })
            .filter(|rel| matcher.is_match(rel))
            .collect();
        matched.sort();

        if matched.is_empty() {
            warn!("no files matched `{input}`");
        }
        for path in matched {
            if !files.contains(&path) {
                files.push(path);
            }
        }
    }
    Ok(files)
}

fn write_summary(
    writer: &mut impl Write,
    output: OutputContext,
    stats: &AggregateStatistics,
    critical_count: usize,
    outputs: &ReportOutputs,
) -> io::Result<()> {
    let styles = output.stdout_styles();

    writeln!(writer, "{}", "Analysis summary".style(styles.heading))?;
    writeln!(
        writer,
        "  Total tests analyzed:  {}",
        stats.total_tests.style(styles.bold)
    )?;
    writeln!(
        writer,
        "  Stable:                {}",
        stats.stable_tests.style(styles.success)
    )?;
    writeln!(
        writer,
        "  Mostly stable:         {}",
        stats.mostly_stable.style(styles.success)
    )?;
    writeln!(
        writer,
        "  Flaky:                 {}",
        stats.flaky_tests.style(styles.warning)
    )?;
    writeln!(
        writer,
        "  Mostly failing:        {}",
        stats.mostly_failing.style(styles.warning)
    )?;
    writeln!(
        writer,
        "  Consistently failing:  {}",
        stats.failing_tests.style(styles.failure)
    )?;
    writeln!(
        writer,
        "  Insufficient data:     {}",
        stats.insufficient_data
    )?;
    writeln!(
        writer,
        "  Critical tests:        {}",
        critical_count.style(styles.bold)
    )?;

    writeln!(writer)?;
    writeln!(writer, "{}", "Generated reports".style(styles.heading))?;
    for (kind, path) in outputs.iter() {
        writeln!(writer, "  {kind}: {path}")?;
    }

    if let Some(score) = stats.health_score() {
        let verdict = if score >= 90.0 {
            "excellent, your test suite is very healthy"
        } else if score >= 75.0 {
            "good, but some tests need attention"
        } else if score >= 50.0 {
            "warning, multiple problematic tests detected"
        } else {
            "critical, the test suite needs immediate attention"
        };
        writeln!(writer)?;
        writeln!(
            writer,
            "Test suite health score: {} ({verdict})",
            format!("{score:.1}%").style(styles.bold)
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino_tempfile::Utf8TempDir;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        FlaketrackApp::command().debug_assert();
    }

    #[test]
    fn expand_inputs_takes_existing_paths_verbatim() {
        let dir = Utf8TempDir::new().unwrap();
        let path = dir.path().join("report.xml");
        fs_err::write(&path, "<testsuite/>").unwrap();

        let files = expand_inputs(&[path.to_string(), path.to_string()]).unwrap();
        // Duplicates collapse.
        assert_eq!(files, vec![path]);
    }

    #[test]
    fn expand_inputs_rejects_invalid_globs() {
        let err = expand_inputs(&["results/[".to_owned()]).unwrap_err();
        assert!(matches!(err, ExpectedError::InputPatternError { .. }));
    }

    #[test]
    fn unmatched_glob_is_not_fatal() {
        let files = expand_inputs(&["no_such_dir_zzz/*.xml".to_owned()]).unwrap();
        assert!(files.is_empty());
    }
}
