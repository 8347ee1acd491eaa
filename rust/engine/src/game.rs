use serde::{Deserialize, Serialize};

use crate::player::Seat;

/// Per-street betting state. Reset at the start of every street.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundState {
    /// Total chips a seat must have put in this street to be even
    pub current_bet: u32,
    pub player_contrib: u32,
    pub opponent_contrib: u32,
    /// Raises made this street, never above the structure's cap
    pub raises_this_round: u8,
    /// Seat expected to act next; `None` once nobody owes an action
    pub to_act: Option<Seat>,
    /// Seat that has already checked this street
    pub check_pending: Option<Seat>,
    pub betting_open: bool,
}

impl RoundState {
    /// Fresh round after a draw: nothing owed, the big blind acts first.
    pub fn after_draw() -> Self {
        Self {
            current_bet: 0,
            player_contrib: 0,
            opponent_contrib: 0,
            raises_this_round: 0,
            to_act: Some(Seat::Opponent),
            check_pending: None,
            betting_open: true,
        }
    }

    pub fn contrib(&self, seat: Seat) -> u32 {
        match seat {
            Seat::Player => self.player_contrib,
            Seat::Opponent => self.opponent_contrib,
        }
    }

    pub(crate) fn contrib_mut(&mut self, seat: Seat) -> &mut u32 {
        match seat {
            Seat::Player => &mut self.player_contrib,
            Seat::Opponent => &mut self.opponent_contrib,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayoutKind {
    Fold,
    Showdown,
    Split,
}

/// How the last pot was paid out.
///
/// For a split `winner` is `None` and `amount` is the share credited to the player;
/// the opponent receives the rest, including any odd chip.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payout {
    pub kind: PayoutKind,
    pub winner: Option<Seat>,
    pub amount: u32,
}

/// Outcome of a hand from the human player's point of view.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HandResult {
    Win,
    Lose,
    Draw,
}

impl HandResult {
    pub fn from_winner(winner: Option<Seat>) -> Self {
        match winner {
            Some(Seat::Player) => HandResult::Win,
            Some(Seat::Opponent) => HandResult::Lose,
            None => HandResult::Draw,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            HandResult::Win => "win",
            HandResult::Lose => "lose",
            HandResult::Draw => "draw",
        }
    }
}

/// Hand-level state: street progress, chips, and terminal status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    /// 0 = pre-draw, 1..=3 = after the n-th draw
    pub street: u8,
    /// Completed discard rounds
    pub draw_count: u8,
    pub pot: u32,
    pub player_stack: u32,
    pub opponent_stack: u32,
    pub draw_phase: bool,
    pub hand_over: bool,
    pub last_payout: Option<Payout>,
}

impl GameState {
    pub fn new(player_stack: u32, opponent_stack: u32) -> Self {
        Self {
            street: 0,
            draw_count: 0,
            pot: 0,
            player_stack,
            opponent_stack,
            draw_phase: false,
            hand_over: false,
            last_payout: None,
        }
    }

    pub fn stack(&self, seat: Seat) -> u32 {
        match seat {
            Seat::Player => self.player_stack,
            Seat::Opponent => self.opponent_stack,
        }
    }

    pub(crate) fn stack_mut(&mut self, seat: Seat) -> &mut u32 {
        match seat {
            Seat::Player => &mut self.player_stack,
            Seat::Opponent => &mut self.opponent_stack,
        }
    }

    /// Pot plus both stacks; constant for the whole hand.
    pub fn chips_in_play(&self) -> u64 {
        u64::from(self.pot) + u64::from(self.player_stack) + u64::from(self.opponent_stack)
    }
}
