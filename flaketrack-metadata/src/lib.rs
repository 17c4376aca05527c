// Copyright (c) The flaketrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Structured, machine-readable output for [flaketrack](https://github.com/flaketrack-rs/flaketrack).
//!
//! This crate defines the data model shared between the flaketrack engine and
//! external consumers: the classification enum, per-test summary rows, the
//! aggregate statistics block, the `insights.json` document, and documented
//! process exit codes. The types in this crate are serialization-stable:
//! fields are only ever added, never renamed or removed.

#![warn(missing_docs)]

mod classification;
mod exit_codes;
mod summary;

pub use classification::*;
pub use exit_codes::*;
pub use summary::*;
