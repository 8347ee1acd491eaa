use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One of the two seats at the table.
/// The human `Player` always holds the button and posts the small blind;
/// the scripted `Opponent` posts the big blind and acts first after each draw.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Seat {
    Player,
    Opponent,
}

impl Seat {
    pub fn other(self) -> Seat {
        match self {
            Seat::Player => Seat::Opponent,
            Seat::Opponent => Seat::Player,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Seat::Player => "player",
            Seat::Opponent => "opponent",
        }
    }
}

impl fmt::Display for Seat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fixed-limit betting action. Sizes are implied by the street, so no amounts are carried.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerAction {
    /// Fold and forfeit the pot
    Fold,
    /// Pass without betting (only with no outstanding bet)
    Check,
    /// Match the outstanding bet
    Call,
    /// Open the betting for one unit (only with no outstanding bet)
    Bet,
    /// Increase the outstanding bet by one unit
    Raise,
}

impl PlayerAction {
    pub const ALL: [PlayerAction; 5] = [
        PlayerAction::Fold,
        PlayerAction::Check,
        PlayerAction::Call,
        PlayerAction::Bet,
        PlayerAction::Raise,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PlayerAction::Fold => "fold",
            PlayerAction::Check => "check",
            PlayerAction::Call => "call",
            PlayerAction::Bet => "bet",
            PlayerAction::Raise => "raise",
        }
    }
}

impl fmt::Display for PlayerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlayerAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        PlayerAction::ALL
            .into_iter()
            .find(|a| a.as_str() == lowered)
            .ok_or_else(|| format!("unknown action '{}'", s.trim()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seats_alternate() {
        assert_eq!(Seat::Player.other(), Seat::Opponent);
        assert_eq!(Seat::Opponent.other(), Seat::Player);
    }

    #[test]
    fn actions_serialize_lowercase() {
        let json = serde_json::to_string(&PlayerAction::Raise).unwrap();
        assert_eq!(json, "\"raise\"");
        let back: PlayerAction = serde_json::from_str("\"check\"").unwrap();
        assert_eq!(back, PlayerAction::Check);
    }

    #[test]
    fn actions_parse_case_insensitively() {
        assert_eq!("CALL".parse::<PlayerAction>(), Ok(PlayerAction::Call));
        assert!("allin".parse::<PlayerAction>().is_err());
    }
}
