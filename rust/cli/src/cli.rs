//! Command-line surface of the `lowdraw` binary.

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "lowdraw",
    version,
    about = "Deuce-to-seven triple draw against a scripted opponent"
)]
pub struct LowdrawCli {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Play hands interactively against the configured opponent
    Play {
        /// Stop after this many hands (default: until a stack runs out or you quit)
        #[arg(long)]
        hands: Option<u32>,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Let the baseline policy play both seats and record every hand
    Sim {
        #[arg(long)]
        hands: u64,
        /// JSONL hand history to write
        #[arg(long)]
        output: Option<String>,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Rank a hand, or compare two, e.g. `eval "7S 5H 4D 3C 2S" "8S 6H 4D 3C 2S"`
    Eval {
        hand: String,
        other: Option<String>,
        /// primary_rank or full_vector (default: from configuration)
        #[arg(long)]
        tie_rule: Option<String>,
    },
    /// Deal one hand for each seat
    Deal {
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Summarise a JSONL (or .jsonl.zst) hand history
    Stats {
        #[arg(long)]
        input: String,
    },
    /// Show the effective configuration and where each value came from
    Cfg,
}
