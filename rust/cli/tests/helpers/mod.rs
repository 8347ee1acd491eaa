//! Shared helpers for the CLI integration tests.
//!
//! `CliRunner` drives [`lowdraw_cli::run`] in-process with captured streams;
//! `EnvGuard` sets `LOWDRAW_*` variables for one test and restores them on drop.
//! Tests that touch the environment (or load configuration) run under
//! `#[serial]`.

pub mod cli_runner;

pub use cli_runner::{CliRunner, EnvGuard};
