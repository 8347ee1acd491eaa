use serde::{Deserialize, Serialize};

use crate::hand::Hand;
use crate::player::PlayerAction;

/// Read-only picture of the current betting round, from one seat's side.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BettingView {
    pub street: u8,
    pub current_bet: u32,
    pub own_contrib: u32,
    pub other_contrib: u32,
    pub raises_this_round: u8,
    pub max_raises: u8,
    /// Size of a bet or raise on this street
    pub bet_unit: u32,
    pub small_bet: u32,
    pub big_bet: u32,
    pub pot: u32,
}

impl BettingView {
    pub fn facing_bet(&self) -> bool {
        self.current_bet > self.own_contrib
    }

    pub fn can_raise(&self) -> bool {
        self.facing_bet() && self.raises_this_round < self.max_raises
    }

    pub fn to_call(&self) -> u32 {
        self.current_bet.saturating_sub(self.own_contrib)
    }
}

/// Decision-maker for the non-human seat.
///
/// Implementations only see their own hand and the betting view; the session
/// checks every choice against the legal set before applying it.
pub trait OpponentPolicy: Send + Sync {
    fn name(&self) -> &str;

    /// Indexes (into `hand.cards()`) of the cards to keep for the next draw.
    fn choose_keep(&self, hand: &Hand) -> Vec<usize>;

    fn choose_action(&self, hand: &Hand, view: &BettingView) -> PlayerAction;
}

/// The opponent's most recent action as shown to the player.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpponentAction {
    /// Action actually applied to the round
    pub action: PlayerAction,
    /// The policy's original choice when it was illegal and had to be replaced
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub substituted_from: Option<PlayerAction>,
}

impl OpponentAction {
    /// Stand-in for an illegal choice: call a bet, otherwise check.
    pub fn fallback(view: &BettingView) -> PlayerAction {
        if view.facing_bet() {
            PlayerAction::Call
        } else {
            PlayerAction::Check
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(current_bet: u32, own: u32) -> BettingView {
        BettingView {
            street: 1,
            current_bet,
            own_contrib: own,
            other_contrib: current_bet,
            raises_this_round: 0,
            max_raises: 3,
            bet_unit: 2,
            small_bet: 2,
            big_bet: 4,
            pot: 6,
        }
    }

    #[test]
    fn fallback_depends_on_facing_a_bet() {
        assert_eq!(OpponentAction::fallback(&view(2, 0)), PlayerAction::Call);
        assert_eq!(OpponentAction::fallback(&view(0, 0)), PlayerAction::Check);
    }

    #[test]
    fn substitution_is_omitted_from_json_when_absent() {
        let a = OpponentAction {
            action: PlayerAction::Check,
            substituted_from: None,
        };
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            r#"{"action":"check"}"#
        );
    }
}
