//! Scenario tests for the status clock, run against the public library API
//! and the binary's argument parsing.

mod cli_tests;
