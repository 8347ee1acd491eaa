//! `deal`: shuffle one deck and show both starting hands with their ranks.

use crate::error::CliError;
use crate::formatters::format_hand;
use lowdraw_engine::deck::Deck;
use lowdraw_engine::hand::Hand;
use std::io::Write;

/// Deals the player's hand first, then the opponent's, exactly as a session
/// does for hand 1 with the same deck seed.
pub fn handle_deal_command(seed: Option<u64>, out: &mut dyn Write) -> Result<(), CliError> {
    let seed = seed.unwrap_or_else(rand::random);
    let mut deck = Deck::new_with_seed(seed);
    let player = Hand::deal(&mut deck)?;
    let opponent = Hand::deal(&mut deck)?;

    writeln!(out, "Seed: {}", seed)?;
    writeln!(out, "Player:   {}", format_hand(&player))?;
    writeln!(out, "Opponent: {}", format_hand(&opponent))?;
    Ok(())
}
