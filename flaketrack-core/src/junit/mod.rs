// Copyright (c) The flaketrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The JUnit XML boundary: parsing reports into execution records, and
//! serializing generated sample suites back out.
//!
//! The parser accepts the common dialect produced by JUnit, TestNG, pytest
//! (`--junitxml`), Jest and NUnit reporters: a `<testsuites>` or bare
//! `<testsuite>` root containing `<testcase>` elements with optional nested
//! `<failure>`, `<error>` or `<skipped>` markers.

mod parse;
mod write;

pub use parse::*;
pub use write::*;

pub(crate) static TESTSUITES_TAG: &str = "testsuites";
pub(crate) static TESTSUITE_TAG: &str = "testsuite";
pub(crate) static TESTCASE_TAG: &str = "testcase";
pub(crate) static FAILURE_TAG: &str = "failure";
pub(crate) static ERROR_TAG: &str = "error";
pub(crate) static SKIPPED_TAG: &str = "skipped";
