//! `eval`: lowball rank of a hand, or which of two hands wins.

use crate::config;
use crate::error::CliError;
use crate::formatters::format_hand;
use crate::validation::parse_hand_text;
use lowdraw_engine::hand::{TieRule, compare_hands};
use std::cmp::Ordering;
use std::io::Write;

/// Prints the rank of `hand`; with `other`, prints both and the winner.
///
/// Without `--tie-rule` the configured rule applies (primary rank unless
/// `LOWDRAW_TIE_RULE` or the config file says otherwise).
pub fn handle_eval_command(
    hand: &str,
    other: Option<&str>,
    tie_rule: Option<&str>,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let rule = match tie_rule {
        Some(text) => TieRule::parse(text).ok_or_else(|| {
            CliError::InvalidInput(format!(
                "unknown tie rule '{}' (expected primary_rank or full_vector)",
                text
            ))
        })?,
        None => config::load()
            .map_err(|e| CliError::Config(e.to_string()))?
            .tie_rule,
    };

    let first = parse_hand_text(hand).map_err(CliError::InvalidInput)?;
    let Some(other) = other else {
        writeln!(out, "{}", format_hand(&first))?;
        return Ok(());
    };
    let second = parse_hand_text(other).map_err(CliError::InvalidInput)?;

    writeln!(out, "A: {}", format_hand(&first))?;
    writeln!(out, "B: {}", format_hand(&second))?;
    let verdict = match compare_hands(&first.rank(), &second.rank(), rule) {
        Ordering::Greater => "A wins",
        Ordering::Less => "B wins",
        Ordering::Equal => "Tie",
    };
    writeln!(out, "{} ({})", verdict, rule.as_str())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(a: &str, b: Option<&str>, rule: &str) -> String {
        let mut out = Vec::new();
        handle_eval_command(a, b, Some(rule), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn lower_hand_wins() {
        let text = eval("7S 5H 4D 3C 2S", Some("8S 6H 4D 3C 2H"), "primary_rank");
        assert!(text.contains("A wins"));
    }

    #[test]
    fn tie_rule_decides_equal_primaries() {
        let a = "8S 6H 4D 3C 2S";
        let b = "8H 7D 4C 3S 2H";
        assert!(eval(a, Some(b), "primary_rank").contains("Tie (primary_rank)"));
        assert!(eval(a, Some(b), "full_vector").contains("A wins (full_vector)"));
    }

    #[test]
    fn disqualified_hand_loses() {
        let text = eval("7S 7H 4D 3C 2S", Some("KS QH JD 9C 8S"), "primary_rank");
        assert!(text.contains("disqualified"));
        assert!(text.contains("B wins"));
    }

    #[test]
    fn bad_input_is_rejected() {
        let mut out = Vec::new();
        assert!(handle_eval_command("7S 5H", None, Some("primary_rank"), &mut out).is_err());
        assert!(
            handle_eval_command("7S 5H 4D 3C 2S", None, Some("coin_flip"), &mut out).is_err()
        );
    }
}
