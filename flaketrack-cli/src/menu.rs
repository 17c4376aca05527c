// Copyright (c) The flaketrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The interactive front-end: a guided menu over the analyze and generate
//! commands, for people who would rather not assemble flags.

use crate::{
    dispatch::{AnalyzeOpts, GenerateOpts},
    errors::{ExpectedError, Result},
    output::OutputContext,
};
use dialoguer::{Confirm, Input, Select};
use tracing::info;

static MAIN_MENU: &[&str] = &[
    "Quick start with demo data",
    "Analyze my test results",
    "Generate sample data",
    "Help",
    "Exit",
];

static ANALYSIS_DEPTHS: &[&str] = &[
    "Quick analysis (min 5 runs)",
    "Accurate analysis (min 10 runs)",
    "High confidence (min 15 runs)",
    "Custom",
];

pub(crate) fn run(output: OutputContext) -> Result<()> {
    loop {
        let choice = Select::new()
            .with_prompt("What do you want to do?")
            .items(MAIN_MENU)
            .default(0)
            .interact()
            .map_err(prompt_err)?;

        let result = match choice {
            0 => quick_start(output),
            1 => analyze_flow(output),
            2 => generate_flow(output),
            3 => {
                print_help();
                Ok(())
            }
            _ => return Ok(()),
        };

        // A failed analysis or generation is reported but does not end the
        // session; prompt failures do.
        if let Err(err) = result {
            if matches!(err, ExpectedError::DialoguerError { .. }) {
                return Err(err);
            }
            err.display_to_stderr();
        }
    }
}

fn quick_start(output: OutputContext) -> Result<()> {
    let proceed = Confirm::new()
        .with_prompt("Generate sample data and run a demo analysis?")
        .default(true)
        .interact()
        .map_err(prompt_err)?;
    if !proceed {
        return Ok(());
    }

    GenerateOpts::for_menu("sample_data".into(), 15).exec(output)?;
    AnalyzeOpts::from_inputs(vec!["sample_data/*.xml".to_owned()], None).exec(output)?;
    info!("demo complete; open output/dashboard.html in a browser");
    Ok(())
}

fn analyze_flow(output: OutputContext) -> Result<()> {
    let pattern: String = Input::new()
        .with_prompt("Where are your JUnit XML files? (path or glob)")
        .default("**/*.xml".to_owned())
        .interact_text()
        .map_err(prompt_err)?;

    let depth = Select::new()
        .with_prompt("Analysis depth")
        .items(ANALYSIS_DEPTHS)
        .default(0)
        .interact()
        .map_err(prompt_err)?;
    let min_runs = match depth {
        0 => 5,
        1 => 10,
        2 => 15,
        _ => Input::<usize>::new()
            .with_prompt("Minimum runs required")
            .default(5)
            .interact_text()
            .map_err(prompt_err)?,
    };

    AnalyzeOpts::from_inputs(vec![pattern], Some(min_runs)).exec(output)
}

fn generate_flow(output: OutputContext) -> Result<()> {
    let runs: usize = Input::new()
        .with_prompt("How many synthetic runs?")
        .default(15)
        .interact_text()
        .map_err(prompt_err)?;

    GenerateOpts::for_menu("sample_data".into(), runs).exec(output)
}

fn print_help() {
    info!("flaketrack reads JUnit XML reports, one file per CI run");
    info!("supported producers: JUnit, TestNG, pytest --junitxml, Jest and NUnit reporters");
    info!("common report locations: target/surefire-reports/, build/test-results/, test-results/");
    info!("at least 5 runs per test are needed before a classification is trusted");
    info!("reports land in output/: dashboard.html, pattern_report.csv, insights.json");
}

fn prompt_err(err: dialoguer::Error) -> ExpectedError {
    ExpectedError::DialoguerError { err }
}
