//! # Play Command
//!
//! Interactive triple draw against the configured opponent policy.
//!
//! Each hand runs the engine's [`GameSession`]: the player is prompted for a
//! betting action when it is their turn and for a keep set at each draw.
//! Opponent actions are printed as they happen, and the opponent's cards are
//! only shown at showdown. The match ends when the hand limit is reached, a
//! stack can no longer cover a hand, or the player quits (`q`, or EOF).

use crate::config::{self, Config};
use crate::error::CliError;
use crate::formatters::{format_action_record, format_hand, format_indexed_hand, format_result};
use crate::io_utils::read_stdin_line;
use crate::ui;
use crate::validation::{DrawInput, ParseResult, parse_draw_input, parse_player_action};
use lowdraw_ai::create_policy;
use lowdraw_engine::engine::{GameSession, TableConfig};
use lowdraw_engine::errors::GameError;
use lowdraw_engine::hand::HAND_SIZE;
use std::io::{BufRead, Write};

/// Plays up to `hands` hands (unbounded when `None`). `seed` overrides the
/// configured seed.
pub fn handle_play_command(
    hands: Option<u32>,
    seed: Option<u64>,
    out: &mut dyn Write,
    err: &mut dyn Write,
    stdin: &mut dyn BufRead,
) -> Result<(), CliError> {
    if hands == Some(0) {
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

    execute_play_command(&cfg, hands, seed, stdin, out, err)
}

enum HandEnd {
    Finished,
    Quit,
}

fn execute_play_command(
    cfg: &Config,
    hands: Option<u32>,
    seed: u64,
    stdin: &mut dyn BufRead,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    let table = TableConfig {
        tie_rule: cfg.tie_rule,
        seed: Some(seed),
        ..TableConfig::default()
    };
    let policy = create_policy(&cfg.policy)?;
    writeln!(
        out,
        "play: opponent={} stack={} tie_rule={} seed={}",
        policy.name(),
        cfg.starting_stack,
        cfg.tie_rule.as_str(),
        seed
    )?;

    let mut session =
        GameSession::start_hand(table, policy, cfg.starting_stack, cfg.starting_stack)?;
    let mut played = 0u32;

    loop {
        writeln!(out, "\nHand {}", session.hand_number())?;
        let end = play_hand(&mut session, stdin, out, err)?;
        if matches!(end, HandEnd::Quit) {
            writeln!(out, "Quit.")?;
            break;
        }
        played += 1;
        let state = session.state();
        writeln!(
            out,
            "Stacks: you {} / opponent {}",
            state.player_stack, state.opponent_stack
        )?;
        if hands.is_some_and(|limit| played >= limit) {
            break;
        }
        match session.next_hand() {
            Ok(_) => {}
            Err(GameError::InsufficientChips { seat, .. }) => {
                writeln!(out, "{} cannot cover another hand. Match over.", seat)?;
                break;
            }
            Err(e) => return Err(e.into()),
        }
    }

    writeln!(out, "Hands played: {}", played)?;
    Ok(())
}

fn play_hand(
    session: &mut GameSession,
    stdin: &mut dyn BufRead,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<HandEnd, CliError> {
    let mut shown_actions = 0;
    let mut shown_hand = None;

    loop {
        let actions = &session.record().actions;
        for record in &actions[shown_actions..] {
            writeln!(out, "  {}", format_action_record(record))?;
        }
        shown_actions = actions.len();

        if session.is_hand_over() {
            if let Some(result) = session.record().result {
                writeln!(out, "{}", format_result(result))?;
            }
            return Ok(HandEnd::Finished);
        }

        if session.awaiting_showdown() {
            let outcome = session.resolve_showdown()?;
            writeln!(out, "Showdown:")?;
            writeln!(out, "  You:      {}", format_hand(&outcome.player_hand))?;
            writeln!(out, "  Opponent: {}", format_hand(&outcome.opponent_hand))?;
            writeln!(out, "{} ({} chips)", format_result(outcome.result), outcome.payout.amount)?;
            return Ok(HandEnd::Finished);
        }

        let snapshot = session.snapshot();
        if shown_hand != Some((snapshot.street, snapshot.draw_phase)) {
            writeln!(
                out,
                "Street {} | pot {} | you {} | opponent {}",
                snapshot.street, snapshot.pot, snapshot.player_stack, snapshot.opponent_stack
            )?;
            writeln!(out, "Your hand: {}", format_indexed_hand(session.player_hand()))?;
            shown_hand = Some((snapshot.street, snapshot.draw_phase));
        }

        if snapshot.draw_phase {
            ui::prompt(out, "Keep which cards? (indexes, 'pat', or q): ")?;
            let Some(line) = read_stdin_line(stdin) else {
                return Ok(HandEnd::Quit);
            };
            match parse_draw_input(&line) {
                DrawInput::Keep(keep) => match session.apply_discards(&keep) {
                    Ok(_) => {
                        writeln!(out, "You drew {}.", HAND_SIZE - keep.len())?;
                    }
                    Err(e) => ui::write_error(err, &e.to_string())?,
                },
                DrawInput::Quit => return Ok(HandEnd::Quit),
                DrawInput::Invalid(msg) => ui::write_error(err, &msg)?,
            }
            continue;
        }

        if snapshot.legal_actions.is_empty() {
            // opponent to act, or a street waiting to open
            if session.advance_until_human_turn_or_round_end() == 0 && !session.advance_street() {
                return Err(CliError::Engine(GameError::InvalidState(
                    "no seat can act",
                )));
            }
            continue;
        }

        let legal: Vec<&str> = snapshot.legal_actions.iter().map(|a| a.as_str()).collect();
        ui::prompt(out, &format!("Action ({}/q): ", legal.join("/")))?;
        let Some(line) = read_stdin_line(stdin) else {
            return Ok(HandEnd::Quit);
        };
        match parse_player_action(&line) {
            ParseResult::Action(action) => {
                if let Err(e) = session.apply_player_action(action) {
                    ui::write_error(err, &e.to_string())?;
                }
            }
            ParseResult::Quit => return Ok(HandEnd::Quit),
            ParseResult::Invalid(msg) => ui::write_error(err, &msg)?,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn play(script: &str, hands: Option<u32>) -> (String, String) {
        let cfg = Config::default();
        let mut input = Cursor::new(script.as_bytes().to_vec());
        let mut out = Vec::new();
        let mut err = Vec::new();
        execute_play_command(&cfg, hands, 7, &mut input, &mut out, &mut err).unwrap();
        (
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    #[test]
    fn fold_ends_the_hand() {
        let (out, _) = play("fold\n", Some(1));
        assert!(out.contains("You: fold"));
        assert!(out.contains("Opponent wins"));
        assert!(out.contains("Stacks: you 99 / opponent 101"));
        assert!(out.contains("Hands played: 1"));
    }

    #[test]
    fn quit_at_first_prompt() {
        let (out, _) = play("q\n", None);
        assert!(out.contains("Quit."));
        assert!(out.contains("Hands played: 0"));
    }

    #[test]
    fn eof_is_treated_as_quit() {
        let (out, _) = play("", None);
        assert!(out.contains("Quit."));
    }

    #[test]
    fn invalid_input_reprompts() {
        let (out, err) = play("allin\nfold\n", Some(1));
        assert!(!err.is_empty());
        assert!(out.contains("You: fold"));
    }

    #[test]
    fn zero_hands_is_rejected() {
        let mut input = Cursor::new(Vec::new());
        let mut out = Vec::new();
        let mut err = Vec::new();
        let result = handle_play_command(Some(0), Some(1), &mut out, &mut err, &mut input);
        assert!(matches!(result, Err(CliError::InvalidInput(_))));
    }
}
