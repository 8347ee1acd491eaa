use serde::{Deserialize, Serialize};

use crate::errors::GameError;
use crate::player::PlayerAction;

/// Number of betting streets: one before the first draw, three after.
pub const STREETS: u8 = 4;

/// Index of the final street; betting there is followed by showdown, not a draw.
pub const FINAL_STREET: u8 = STREETS - 1;

/// Fixed-limit stakes for one table.
///
/// Streets 0 and 1 bet in `small_bet` units, streets 2 and 3 in
/// [`BettingStructure::big_bet`] units, which is always twice the small bet.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct BettingStructure {
    pub small_blind: u32,
    pub big_blind: u32,
    pub small_bet: u32,
    /// Raises allowed per street on top of the opening bet (or big blind).
    pub max_raises: u8,
}

impl Default for BettingStructure {
    fn default() -> Self {
        Self {
            small_blind: 1,
            big_blind: 2,
            small_bet: 2,
            max_raises: 3,
        }
    }
}

impl BettingStructure {
    pub fn big_bet(&self) -> u32 {
        self.small_bet * 2
    }

    pub fn bet_unit(&self, street: u8) -> u32 {
        if street < 2 {
            self.small_bet
        } else {
            self.big_bet()
        }
    }

    /// Most chips one seat can put in over a whole hand.
    pub fn max_exposure(&self) -> u32 {
        let raises = u32::from(self.max_raises);
        let pre_draw = self.big_blind + raises * self.small_bet;
        let first_draw = (1 + raises) * self.small_bet;
        let late = 2 * (1 + raises) * self.big_bet();
        pre_draw + first_draw + late
    }

    pub fn validate(&self) -> Result<(), GameError> {
        if self.small_blind == 0 || self.big_blind < self.small_blind {
            return Err(GameError::InvalidConfig(
                "blinds must satisfy 0 < small_blind <= big_blind".into(),
            ));
        }
        if self.small_bet == 0 {
            return Err(GameError::InvalidConfig("small_bet must be > 0".into()));
        }
        Ok(())
    }
}

/// Actions open to a seat that has put in `contrib` against an outstanding `current_bet`.
pub fn legal_actions(
    contrib: u32,
    current_bet: u32,
    raises_this_round: u8,
    max_raises: u8,
) -> Vec<PlayerAction> {
    if current_bet > contrib {
        let mut actions = vec![PlayerAction::Fold, PlayerAction::Call];
        if raises_this_round < max_raises {
            actions.push(PlayerAction::Raise);
        }
        actions
    } else {
        vec![PlayerAction::Check, PlayerAction::Bet]
    }
}
