//! `sim`: the baseline policy plays both seats for N independent hands.
//!
//! Hand `i` (0-based) is a fresh session at the configured starting stacks
//! with base seed `seed + i`, so any single hand can be reproduced from its
//! recorded seed. Records go to `--output` as JSONL when given.

use crate::config::{self, Config};
use crate::error::CliError;
use crate::ui;
use lowdraw_ai::{BaselinePolicy, create_policy};
use lowdraw_engine::engine::{GameSession, TableConfig};
use lowdraw_engine::errors::GameError;
use lowdraw_engine::game::{HandResult, PayoutKind};
use lowdraw_engine::logger::{HandLogger, HandRecord, format_hand_id, today};
use lowdraw_engine::opponent::{OpponentAction, OpponentPolicy};
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct SimSummary {
    pub hands: u64,
    pub player_wins: u64,
    pub opponent_wins: u64,
    pub splits: u64,
    pub folds: u64,
    pub showdowns: u64,
}

impl SimSummary {
    fn tally(&mut self, record: &HandRecord) {
        self.hands += 1;
        match record.result {
            Some(HandResult::Win) => self.player_wins += 1,
            Some(HandResult::Lose) => self.opponent_wins += 1,
            Some(HandResult::Draw) => self.splits += 1,
            None => {}
        }
        match record.payout.map(|p| p.kind) {
            Some(PayoutKind::Fold) => self.folds += 1,
            Some(PayoutKind::Showdown) | Some(PayoutKind::Split) => self.showdowns += 1,
            None => {}
        }
    }
}

pub fn handle_sim_command(
    hands: u64,
    output: Option<String>,
    seed: Option<u64>,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    if hands == 0 {
        ui::write_error(err, "hands must be >= 1")?;
        return Err(CliError::InvalidInput("hands must be >= 1".to_string()));
    }
    let cfg = match config::load() {
        Ok(c) => c,
        Err(e) => {
            ui::write_error(err, &format!("Invalid configuration: {}", e))?;
            return Err(CliError::Config(e.to_string()));
        }
    };
    let seed = seed.or(cfg.seed).unwrap_or_else(rand::random);

    let mut logger = match &output {
        Some(path) => HandLogger::create(path)?,
        None => HandLogger::discard(),
    };
    let summary = run_simulation(&cfg, hands, seed, &mut logger)?;

    if let Some(path) = &output {
        writeln!(out, "Wrote {} hands to {}", logger.written(), path)?;
    }
    let json = serde_json::to_string_pretty(&summary).map_err(std::io::Error::other)?;
    writeln!(out, "{}", json)?;
    Ok(())
}

fn run_simulation(
    cfg: &Config,
    hands: u64,
    seed: u64,
    logger: &mut HandLogger,
) -> Result<SimSummary, CliError> {
    let player = BaselinePolicy::new();
    let date = today();
    let mut summary = SimSummary::default();

    for i in 0..hands {
        let table = TableConfig {
            tie_rule: cfg.tie_rule,
            seed: Some(seed.wrapping_add(i)),
            ..TableConfig::default()
        };
        let opponent = create_policy(&cfg.policy)?;
        let mut session =
            GameSession::start_hand(table, opponent, cfg.starting_stack, cfg.starting_stack)?;
        play_out(&mut session, &player)?;

        let mut record = session.record().clone();
        record.hand_id = format_hand_id(&date, i + 1);
        logger.write(&record)?;
        summary.tally(&record);
    }
    Ok(summary)
}

/// Drives the player seat with `player` until the hand is paid out.
fn play_out(session: &mut GameSession, player: &dyn OpponentPolicy) -> Result<(), GameError> {
    loop {
        if session.is_hand_over() {
            return Ok(());
        }
        if session.awaiting_showdown() {
            session.resolve_showdown()?;
            return Ok(());
        }
        if session.state().draw_phase {
            let keep = player.choose_keep(session.player_hand());
            session.apply_discards(&keep)?;
            continue;
        }
        let legal = session.legal_actions();
        if legal.is_empty() {
            if session.advance_until_human_turn_or_round_end() == 0 && !session.advance_street() {
                return Err(GameError::InvalidState("no seat can act"));
            }
            continue;
        }
        let view = session.player_view();
        let chosen = player.choose_action(session.player_hand(), &view);
        let action = if legal.contains(&chosen) {
            chosen
        } else {
            OpponentAction::fallback(&view)
        };
        session.apply_player_action(action)?;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_hand_is_recorded_and_complete() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hands.jsonl");
        let mut logger = HandLogger::create(&path).unwrap();

        let summary = run_simulation(&Config::default(), 20, 3, &mut logger).unwrap();
        assert_eq!(summary.hands, 20);
        assert_eq!(
            summary.player_wins + summary.opponent_wins + summary.splits,
            20
        );
        assert_eq!(summary.folds + summary.showdowns, 20);

        let text = std::fs::read_to_string(&path).unwrap();
        let records: Vec<HandRecord> = text
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(records.len(), 20);
        for (i, record) in records.iter().enumerate() {
            assert!(record.is_complete());
            assert!(record.hand_id.ends_with(&format!("{:06}", i + 1)));
            assert_eq!(
                record.starting_stacks.total(),
                record.final_stacks.unwrap().total()
            );
            assert_eq!(record.seed, Some(3 + i as u64 + 1));
        }
    }

    #[test]
    fn same_seed_same_summary() {
        let a = run_simulation(&Config::default(), 10, 99, &mut HandLogger::discard()).unwrap();
        let b = run_simulation(&Config::default(), 10, 99, &mut HandLogger::discard()).unwrap();
        assert_eq!(a, b);
    }
}
