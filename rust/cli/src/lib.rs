//! # lowdraw CLI Library
//!
//! Terminal front end for the deuce-to-seven triple draw engine.
//!
//! The entry point is [`run`], which parses arguments and dispatches to a
//! subcommand handler. Output and error streams are injected so the whole
//! CLI can be driven from tests.
//!
//! ## Example Usage
//!
//! ```no_run
//! use std::io;
//! let args = vec!["lowdraw", "sim", "--hands", "100", "--seed", "7"];
//! let code = lowdraw_cli::run(args, &mut io::stdout(), &mut io::stderr());
//! assert_eq!(code, 0);
//! ```
//!
//! ## Available Subcommands
//!
//! - `play`: Play hands against the scripted opponent on stdin
//! - `sim`: Baseline against baseline, written as a JSONL hand history
//! - `eval`: Rank one hand or compare two
//! - `deal`: Deal both hands for inspection
//! - `stats`: Aggregate a JSONL hand history and check chip conservation
//! - `cfg`: Display the resolved configuration and its sources

use clap::Parser;
use std::io::Write;
pub mod cli;
mod commands;
pub mod config;
mod error;
pub mod exit_code;
pub mod formatters;
pub mod io_utils;
#[macro_use]
mod macros;
pub mod ui;
pub mod validation;

use cli::{Commands, LowdrawCli};
use commands::{
    handle_cfg_command, handle_deal_command, handle_eval_command, handle_play_command,
    handle_sim_command, handle_stats_command,
};

pub use commands::SimSummary;
pub use error::{BatchValidationError, CliError};

const COMMANDS: &[&str] = &["play", "sim", "eval", "deal", "stats", "cfg"];

/// Parses `args` and runs the selected command.
///
/// Returns the process exit code: [`exit_code::SUCCESS`] or [`exit_code::ERROR`].
/// `--help` and `--version` print to `out` and succeed.
///
/// ```
/// use std::io;
/// let args = vec!["lowdraw", "deal", "--seed", "42"];
/// let code = lowdraw_cli::run(args, &mut io::stdout(), &mut io::stderr());
/// assert_eq!(code, 0);
/// ```
pub fn run<I, S>(args: I, out: &mut dyn Write, err: &mut dyn Write) -> i32
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let argv: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();

    let cli = match LowdrawCli::try_parse_from(&argv) {
        Ok(cli) => cli,
        Err(e) => return report_parse_error(e, out, err),
    };

    let result = match cli.cmd {
        Commands::Play { hands, seed } => {
            let stdin = std::io::stdin();
            let mut stdin_lock = stdin.lock();
            handle_play_command(hands, seed, out, err, &mut stdin_lock)
        }
        Commands::Sim {
            hands,
            output,
            seed,
        } => handle_sim_command(hands, output, seed, out, err),
        Commands::Eval {
            hand,
            other,
            tie_rule,
        } => handle_eval_command(&hand, other.as_deref(), tie_rule.as_deref(), out),
        Commands::Deal { seed } => handle_deal_command(seed, out),
        Commands::Stats { input } => handle_stats_command(input, out, err),
        Commands::Cfg => handle_cfg_command(out, err),
    };

    match result {
        Ok(()) => exit_code::SUCCESS,
        Err(e) => {
            write_or_exit!(err, "Error: {}", e);
            exit_code::ERROR
        }
    }
}

fn report_parse_error(e: clap::Error, out: &mut dyn Write, err: &mut dyn Write) -> i32 {
    use clap::error::ErrorKind;

    // help and version go to stdout and succeed
    if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
        if write!(out, "{}", e).is_err() {
            return exit_code::ERROR;
        }
        return exit_code::SUCCESS;
    }

    write_or_exit!(err, "{}", e);
    write_or_exit!(err, "lowdraw: 2-7 triple draw");
    write_or_exit!(err, "Usage: lowdraw <command> [options]\n");
    write_or_exit!(err, "Commands:");
    for c in COMMANDS {
        write_or_exit!(err, "  {}", c);
    }
    write_or_exit!(err, "\nFor full help, run: lowdraw --help");
    exit_code::ERROR
}
