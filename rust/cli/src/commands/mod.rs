//! Command handler modules for the `lowdraw` CLI.
//!
//! Each command lives in its own file and follows the same pattern:
//!
//! - Public handler: `pub fn handle_COMMAND_command(...) -> Result<(), CliError>`
//! - Output streams (`&mut dyn Write`) and stdin are passed in, never opened here
//! - Errors propagate as [`CliError`](crate::CliError); `run` turns them into exit code 2

mod cfg;
mod deal;
mod eval;
mod play;
mod sim;
mod stats;

pub use cfg::handle_cfg_command;
pub use deal::handle_deal_command;
pub use eval::handle_eval_command;
pub use play::handle_play_command;
pub use sim::{SimSummary, handle_sim_command};
pub use stats::handle_stats_command;
