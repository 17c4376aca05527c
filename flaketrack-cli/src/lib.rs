// Copyright (c) The flaketrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Detect flaky and failing test patterns from JUnit XML reports.
//!
//! This crate provides the `flaketrack` command-line tool. The analysis
//! engine lives in [`flaketrack_core`]; machine-readable output types live in
//! [`flaketrack_metadata`].

mod dispatch;
mod errors;
mod menu;
mod output;

#[doc(hidden)]
pub use dispatch::*;
#[doc(hidden)]
pub use errors::*;
#[doc(hidden)]
pub use output::*;
