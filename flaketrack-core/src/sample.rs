// Copyright (c) The flaketrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Sample JUnit data generation for demos.
//!
//! Produces a set of per-run report files over a fixed roster of synthetic
//! tests with known pass probabilities, so an analysis over the output
//! exercises every classification.

use crate::{
    errors::SampleDataError,
    junit::{serialize_suite, SampleCase, SampleSuite},
};
use camino::{Utf8Path, Utf8PathBuf};
use chrono::{Duration as TimeDelta, Local};
use rand::{rngs::StdRng, RngExt, SeedableRng};
use tracing::info;

/// A synthetic test: name, probability of passing, and a baseline duration.
struct Scenario {
    name: &'static str,
    pass_probability: f64,
    duration_base: f64,
}

// The roster covers the full classification spectrum: stable, flaky at
// various rates, mostly-stable, consistently failing, and mostly failing.
static SCENARIOS: &[Scenario] = &[
    Scenario { name: "test_user_login", pass_probability: 1.0, duration_base: 0.5 },
    Scenario { name: "test_home_page_load", pass_probability: 1.0, duration_base: 0.3 },
    Scenario { name: "test_static_content", pass_probability: 1.0, duration_base: 0.2 },
    Scenario { name: "test_health_check", pass_probability: 1.0, duration_base: 0.1 },
    Scenario { name: "test_api_integration", pass_probability: 0.6, duration_base: 1.2 },
    Scenario { name: "test_database_connection", pass_probability: 0.7, duration_base: 0.8 },
    Scenario { name: "test_cache_invalidation", pass_probability: 0.5, duration_base: 1.5 },
    Scenario { name: "test_concurrent_users", pass_probability: 0.65, duration_base: 2.0 },
    Scenario { name: "test_file_upload", pass_probability: 0.95, duration_base: 1.0 },
    Scenario { name: "test_email_notification", pass_probability: 0.97, duration_base: 0.9 },
    Scenario { name: "test_broken_feature", pass_probability: 0.0, duration_base: 0.5 },
    Scenario { name: "test_deprecated_api", pass_probability: 0.0, duration_base: 0.7 },
    Scenario { name: "test_unstable_service", pass_probability: 0.1, duration_base: 1.3 },
    Scenario { name: "test_memory_leak", pass_probability: 0.05, duration_base: 2.5 },
    Scenario { name: "test_authentication", pass_probability: 0.85, duration_base: 0.6 },
    Scenario { name: "test_authorization", pass_probability: 0.75, duration_base: 0.8 },
    Scenario { name: "test_data_validation", pass_probability: 0.9, duration_base: 0.4 },
    Scenario { name: "test_error_handling", pass_probability: 0.8, duration_base: 0.7 },
    Scenario { name: "test_performance", pass_probability: 0.55, duration_base: 3.0 },
    Scenario { name: "test_load_balancer", pass_probability: 0.7, duration_base: 1.1 },
];

static FAILURE_MESSAGES: &[&str] = &[
    "AssertionError: Expected 200 but got 500",
    "TimeoutException: Request timed out after 30s",
    "NullPointerException: Object reference not set",
    "ConnectionRefusedError: Unable to connect to database",
    "ValidationError: Invalid input data",
    "ResourceNotFoundError: File not found",
];

/// Generates `num_runs` synthetic test suites.
///
/// The same seed always produces the same suites. Run timestamps count back
/// one hour per remaining run, so the newest run is the last file.
pub fn generate_suites(num_runs: usize, seed: u64) -> Vec<SampleSuite> {
    let mut rng = StdRng::seed_from_u64(seed);
    let now = Local::now().fixed_offset();

    (1..=num_runs)
        .map(|run| {
            let cases = SCENARIOS
                .iter()
                .map(|scenario| {
                    let failed = rng.random::<f64>() > scenario.pass_probability;
                    let failure_message = failed.then(|| {
                        FAILURE_MESSAGES[rng.random_range(0..FAILURE_MESSAGES.len())].to_owned()
                    });
                    let jitter: f64 = rng.random_range(-0.5..0.5);
                    SampleCase {
                        classname: format!(
                            "com.example.tests.{}",
                            scenario.name.split('_').nth(1).unwrap_or("misc")
                        ),
                        name: scenario.name.to_owned(),
                        time: (scenario.duration_base + jitter).max(0.001),
                        failure_message,
                    }
                })
                .collect();

            SampleSuite {
                name: format!("TestRun_{run}"),
                timestamp: now - TimeDelta::hours((num_runs - run) as i64),
                cases,
            }
        })
        .collect()
}

/// Generates sample data and writes one JUnit XML file per run into
/// `output_dir`, returning the paths written.
pub fn write_sample_data(
    output_dir: &Utf8Path,
    num_runs: usize,
    seed: u64,
) -> Result<Vec<Utf8PathBuf>, SampleDataError> {
    fs_err::create_dir_all(output_dir).map_err(|error| SampleDataError::Fs {
        file: output_dir.to_path_buf(),
        error,
    })?;

    let mut paths = Vec::with_capacity(num_runs);
    for (ix, suite) in generate_suites(num_runs, seed).iter().enumerate() {
        let path = output_dir.join(format!("test_results_run_{:02}.xml", ix + 1));
        let file = fs_err::File::create(&path).map_err(|error| SampleDataError::Fs {
            file: path.clone(),
            error,
        })?;
        serialize_suite(suite, file).map_err(|error| SampleDataError::Xml {
            file: path.clone(),
            error,
        })?;
        info!("generated {path}");
        paths.push(path);
    }
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::junit::parse_report_file;

    #[test]
    fn generation_is_deterministic() {
        let a = generate_suites(5, 42);
        let b = generate_suites(5, 42);
        for (suite_a, suite_b) in a.iter().zip(&b) {
            assert_eq!(suite_a.name, suite_b.name);
            for (case_a, case_b) in suite_a.cases.iter().zip(&suite_b.cases) {
                assert_eq!(case_a.name, case_b.name);
                assert_eq!(case_a.failure_message, case_b.failure_message);
                assert_eq!(case_a.time, case_b.time);
            }
        }
    }

    #[test]
    fn always_failing_scenarios_always_fail() {
        for suite in generate_suites(10, 7) {
            let broken = suite
                .cases
                .iter()
                .find(|case| case.name == "test_broken_feature")
                .unwrap();
            assert!(broken.failure_message.is_some());

            let stable = suite
                .cases
                .iter()
                .find(|case| case.name == "test_health_check")
                .unwrap();
            assert!(stable.failure_message.is_none());
        }
    }

    #[test]
    fn written_files_parse_back() {
        let dir = camino_tempfile::Utf8TempDir::new().unwrap();
        let paths = write_sample_data(dir.path(), 3, 42).unwrap();
        assert_eq!(paths.len(), 3);
        for path in &paths {
            let records = parse_report_file(path).unwrap();
            assert_eq!(records.len(), SCENARIOS.len());
        }
    }
}
