//! Shared test harness modules for the Kerbside CLI.
#![expect(
    clippy::panic,
    reason = "Tests assert panic branches to surface unexpected CLI outcomes"
)]
#![expect(clippy::expect_used, reason = "tests fail fast on setup errors")]

use super::*;

mod helpers;
