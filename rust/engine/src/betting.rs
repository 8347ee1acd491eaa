use tracing::debug;

use crate::errors::GameError;
use crate::game::{GameState, Payout, PayoutKind, RoundState};
use crate::opponent::BettingView;
use crate::player::{PlayerAction, Seat};
use crate::rules::{self, BettingStructure, FINAL_STREET};

/// What an accepted action did to the round.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// Betting continues with this seat to act.
    NextToAct(Seat),
    /// Contributions are even and nobody owes an action.
    RoundClosed,
    /// A fold ended the hand.
    HandEnded(Payout),
}

/// Fixed-limit betting state machine for one hand.
///
/// Owns the chips: every transfer between a stack and the pot goes through here,
/// so `pot + player_stack + opponent_stack` never changes during a hand.
#[derive(Debug, Clone)]
pub struct BettingEngine {
    structure: BettingStructure,
    state: GameState,
    round: RoundState,
    chips: u64,
}

impl BettingEngine {
    /// Posts the blinds and opens pre-draw betting with the player (small blind) to act.
    ///
    /// Both stacks must cover the structure's maximum exposure, so no seat can
    /// run out of chips mid-hand. Their sum must fit in a `u32`, which bounds
    /// every pot and every stack after a payout.
    pub fn start_hand(
        structure: BettingStructure,
        player_stack: u32,
        opponent_stack: u32,
    ) -> Result<Self, GameError> {
        structure.validate()?;
        let required = structure.max_exposure();
        for (seat, available) in [
            (Seat::Player, player_stack),
            (Seat::Opponent, opponent_stack),
        ] {
            if available < required {
                return Err(GameError::InsufficientChips {
                    seat,
                    required,
                    available,
                });
            }
        }
        if player_stack.checked_add(opponent_stack).is_none() {
            return Err(GameError::InvalidConfig(format!(
                "combined stacks {player_stack} + {opponent_stack} exceed {}",
                u32::MAX
            )));
        }

        let mut state = GameState::new(player_stack, opponent_stack);
        state.player_stack -= structure.small_blind;
        state.opponent_stack -= structure.big_blind;
        state.pot = structure.small_blind + structure.big_blind;

        let round = RoundState {
            current_bet: structure.big_blind,
            player_contrib: structure.small_blind,
            opponent_contrib: structure.big_blind,
            raises_this_round: 0,
            to_act: Some(Seat::Player),
            check_pending: None,
            betting_open: true,
        };

        let chips = state.chips_in_play();
        Ok(Self {
            structure,
            state,
            round,
            chips,
        })
    }

    pub fn structure(&self) -> &BettingStructure {
        &self.structure
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn round(&self) -> &RoundState {
        &self.round
    }

    pub fn to_act(&self) -> Option<Seat> {
        if self.state.hand_over || !self.round.betting_open {
            return None;
        }
        self.round.to_act
    }

    pub fn bet_unit(&self) -> u32 {
        self.structure.bet_unit(self.state.street)
    }

    /// Legal actions for `seat`; empty unless it is that seat's turn in an open round.
    pub fn legal_actions(&self, seat: Seat) -> Vec<PlayerAction> {
        if self.to_act() != Some(seat) {
            return Vec::new();
        }
        rules::legal_actions(
            self.round.contrib(seat),
            self.round.current_bet,
            self.round.raises_this_round,
            self.structure.max_raises,
        )
    }

    /// What a decision-maker in `seat` may see of the current round.
    pub fn view(&self, seat: Seat) -> BettingView {
        BettingView {
            street: self.state.street,
            current_bet: self.round.current_bet,
            own_contrib: self.round.contrib(seat),
            other_contrib: self.round.contrib(seat.other()),
            raises_this_round: self.round.raises_this_round,
            max_raises: self.structure.max_raises,
            bet_unit: self.bet_unit(),
            small_bet: self.structure.small_bet,
            big_bet: self.structure.big_bet(),
            pot: self.state.pot,
        }
    }

    /// Applies one action. On error nothing is changed.
    pub fn apply(&mut self, seat: Seat, action: PlayerAction) -> Result<ActionOutcome, GameError> {
        if self.state.hand_over {
            return Err(GameError::InvalidState("hand is over"));
        }
        if !self.round.betting_open {
            return Err(GameError::InvalidState("betting is closed"));
        }
        if self.round.to_act != Some(seat) {
            return Err(GameError::InvalidState("not this seat's turn"));
        }
        if !self.legal_actions(seat).contains(&action) {
            return Err(GameError::IllegalAction { seat, action });
        }

        let outcome = match action {
            PlayerAction::Fold => {
                let payout = self.award_pot(seat.other(), PayoutKind::Fold);
                ActionOutcome::HandEnded(payout)
            }
            PlayerAction::Check => {
                if self.round.check_pending.is_some() {
                    self.round.to_act = None;
                } else {
                    self.round.check_pending = Some(seat);
                    self.round.to_act = Some(seat.other());
                }
                self.close_if_settled()
            }
            PlayerAction::Call => {
                self.put_in_to(seat, self.round.current_bet)?;
                self.round.check_pending = None;
                self.round.to_act = None;
                self.close_if_settled()
            }
            PlayerAction::Bet => {
                let target = self.bet_unit();
                self.put_in_to(seat, target)?;
                self.round.current_bet = target;
                self.round.check_pending = None;
                self.round.to_act = Some(seat.other());
                self.close_if_settled()
            }
            PlayerAction::Raise => {
                let target = self.round.current_bet + self.bet_unit();
                self.put_in_to(seat, target)?;
                self.round.current_bet = target;
                self.round.raises_this_round += 1;
                self.round.check_pending = None;
                self.round.to_act = Some(seat.other());
                self.close_if_settled()
            }
        };

        debug!(
            seat = %seat,
            action = %action,
            street = self.state.street,
            pot = self.state.pot,
            current_bet = self.round.current_bet,
            "action applied"
        );
        Ok(outcome)
    }

    /// Marks one discard round as finished. Only valid during the draw phase.
    pub fn complete_draw(&mut self) -> Result<(), GameError> {
        if self.state.hand_over {
            return Err(GameError::InvalidState("hand is over"));
        }
        if !self.state.draw_phase {
            return Err(GameError::InvalidState("not in the draw phase"));
        }
        self.state.draw_count += 1;
        self.state.draw_phase = false;
        Ok(())
    }

    /// Opens the next street's betting round with the opponent first to act.
    ///
    /// Does nothing (and returns `false`) while betting is open, while a draw is
    /// still owed, once the hand is over, or when already on the final street.
    pub fn advance_street(&mut self) -> bool {
        if self.state.hand_over || self.round.betting_open || self.state.draw_phase {
            return false;
        }
        if self.state.street >= FINAL_STREET {
            debug!(street = self.state.street, "no street after the final one");
            return false;
        }
        self.state.street += 1;
        self.round = RoundState::after_draw();
        true
    }

    /// True once the final street's betting has closed and the hand awaits showdown.
    pub fn awaiting_showdown(&self) -> bool {
        !self.state.hand_over && !self.round.betting_open && self.state.street == FINAL_STREET
    }

    /// Pays out the pot at showdown. `winner == None` splits it.
    pub fn settle_showdown(&mut self, winner: Option<Seat>) -> Result<Payout, GameError> {
        if !self.awaiting_showdown() {
            return Err(GameError::InvalidState(
                "showdown requires the final betting round to be closed",
            ));
        }
        let payout = match winner {
            Some(seat) => self.award_pot(seat, PayoutKind::Showdown),
            None => {
                let pot = self.state.pot;
                let player_share = pot / 2;
                // the odd chip goes to the big blind
                self.state.player_stack += player_share;
                self.state.opponent_stack += pot - player_share;
                self.finish(Payout {
                    kind: PayoutKind::Split,
                    winner: None,
                    amount: player_share,
                })
            }
        };
        Ok(payout)
    }

    fn put_in_to(&mut self, seat: Seat, target: u32) -> Result<(), GameError> {
        let owed = target.saturating_sub(self.round.contrib(seat));
        let available = self.state.stack(seat);
        if owed > available {
            return Err(GameError::InsufficientChips {
                seat,
                required: owed,
                available,
            });
        }
        *self.state.stack_mut(seat) -= owed;
        *self.round.contrib_mut(seat) += owed;
        self.state.pot += owed;
        Ok(())
    }

    fn close_if_settled(&mut self) -> ActionOutcome {
        let even = self.round.player_contrib == self.round.opponent_contrib;
        match self.round.to_act {
            None if even => {
                self.round.betting_open = false;
                self.round.check_pending = None;
                self.state.draw_phase = self.state.street < FINAL_STREET;
                debug!(street = self.state.street, pot = self.state.pot, "betting round closed");
                ActionOutcome::RoundClosed
            }
            Some(next) => ActionOutcome::NextToAct(next),
            // unreachable: a call always evens the contributions
            None => ActionOutcome::NextToAct(self.behind_seat()),
        }
    }

    fn behind_seat(&self) -> Seat {
        if self.round.player_contrib < self.round.opponent_contrib {
            Seat::Player
        } else {
            Seat::Opponent
        }
    }

    fn award_pot(&mut self, winner: Seat, kind: PayoutKind) -> Payout {
        let amount = self.state.pot;
        *self.state.stack_mut(winner) += amount;
        self.finish(Payout {
            kind,
            winner: Some(winner),
            amount,
        })
    }

    fn finish(&mut self, payout: Payout) -> Payout {
        self.state.pot = 0;
        debug_assert_eq!(self.state.chips_in_play(), self.chips, "chips leaked");
        self.state.hand_over = true;
        self.state.draw_phase = false;
        self.state.last_payout = Some(payout);
        self.round.betting_open = false;
        self.round.to_act = None;
        self.round.check_pending = None;
        payout
    }
}
