//! Statistics over a JSONL hand history.
//!
//! Counts outcomes for complete records and checks chip conservation on each
//! one: the chips on the table at the start of a hand must all still be there
//! at the end. A line that fails to parse is counted as corrupted, except a
//! final line without a trailing newline, which is treated as a truncated
//! write and skipped with a warning.

use crate::error::{BatchValidationError, CliError};
use crate::io_utils::read_text_auto;
use crate::ui;
use lowdraw_engine::game::{HandResult, PayoutKind};
use lowdraw_engine::logger::HandRecord;
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Default, Serialize)]
struct Summary {
    hands: u64,
    player_wins: u64,
    opponent_wins: u64,
    splits: u64,
    folds: u64,
    /// Net chips won by the player across all hands
    player_net: i64,
    #[serde(skip)]
    corrupted: u64,
    #[serde(skip)]
    truncated: u64,
    #[serde(skip)]
    incomplete: u64,
    #[serde(skip)]
    violations: Vec<BatchValidationError<String>>,
}

impl Summary {
    fn consume(&mut self, content: &str) {
        let has_trailing_nl = content.ends_with('\n');
        let lines: Vec<&str> = content.lines().filter(|l| !l.trim().is_empty()).collect();
        for (i, line) in lines.iter().enumerate() {
            let record: HandRecord = match serde_json::from_str(line) {
                Ok(r) => r,
                Err(_) => {
                    if i == lines.len() - 1 && !has_trailing_nl {
                        self.truncated += 1;
                    } else {
                        self.corrupted += 1;
                    }
                    continue;
                }
            };
            self.add(record);
        }
    }

    fn add(&mut self, record: HandRecord) {
        let Some(final_stacks) = record.final_stacks.filter(|_| record.is_complete()) else {
            self.incomplete += 1;
            return;
        };
        if final_stacks.total() != record.starting_stacks.total() {
            self.violations.push(BatchValidationError {
                item_context: record.hand_id.clone(),
                message: format!(
                    "chip conservation violated ({} chips at start, {} at end)",
                    record.starting_stacks.total(),
                    final_stacks.total()
                ),
            });
        }

        self.hands += 1;
        match record.result {
            Some(HandResult::Win) => self.player_wins += 1,
            Some(HandResult::Lose) => self.opponent_wins += 1,
            Some(HandResult::Draw) => self.splits += 1,
            None => {}
        }
        if record.payout.is_some_and(|p| p.kind == PayoutKind::Fold) {
            self.folds += 1;
        }
        self.player_net += record.player_net().unwrap_or(0);
    }
}

pub fn handle_stats_command(
    input: String,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    let content = match read_text_auto(&input) {
        Ok(s) => s,
        Err(e) => {
            ui::write_error(err, &format!("Failed to read {}: {}", input, e))?;
            return Err(CliError::InvalidInput(format!(
                "Failed to read {}: {}",
                input, e
            )));
        }
    };

    let mut summary = Summary::default();
    summary.consume(&content);

    if summary.corrupted > 0 {
        ui::write_error(
            err,
            &format!("Skipped {} corrupted record(s)", summary.corrupted),
        )?;
    }
    if summary.truncated > 0 {
        ui::display_warning(
            err,
            &format!("Discarded {} incomplete final line(s)", summary.truncated),
        )?;
    }
    if summary.incomplete > 0 {
        ui::display_warning(
            err,
            &format!("Skipped {} unfinished hand(s)", summary.incomplete),
        )?;
    }
    for violation in &summary.violations {
        ui::write_error(err, &violation.to_string())?;
    }
    if summary.hands == 0 && (summary.corrupted > 0 || summary.truncated > 0) {
        ui::write_error(err, "Invalid record")?;
        return Err(CliError::InvalidInput("Invalid record".to_string()));
    }

    let json = serde_json::to_string_pretty(&summary).map_err(std::io::Error::other)?;
    writeln!(out, "{}", json)?;
    if summary.violations.is_empty() {
        Ok(())
    } else {
        Err(CliError::InvalidInput(
            "Statistics validation failed".to_string(),
        ))
    }
}
