// Copyright (c) The flaketrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use clap::Parser;
use color_eyre::Result;
use flaketrack_cli::FlaketrackApp;
use flaketrack_metadata::FlaketrackExitCode;

fn main() -> Result<()> {
    color_eyre::install()?;
    let _ = enable_ansi_support::enable_ansi_support();

    let app = FlaketrackApp::parse();
    match app.exec() {
        Ok(()) => std::process::exit(FlaketrackExitCode::OK),
        Err(error) => {
            error.display_to_stderr();
            std::process::exit(error.process_exit_code())
        }
    }
}
