use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::betting::{ActionOutcome, BettingEngine};
use crate::deck::Deck;
use crate::errors::GameError;
use crate::game::{GameState, HandResult, Payout, RoundState};
use crate::hand::{compare_hands, Hand, LowballRank, TieRule, HAND_SIZE};
use crate::logger::{format_hand_id, today, ActionRecord, DrawRecord, HandRecord, Stacks};
use crate::opponent::{BettingView, OpponentAction, OpponentPolicy};
use crate::player::{PlayerAction, Seat};
use crate::rules::BettingStructure;

/// Table-level settings shared by every hand of a session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableConfig {
    #[serde(default)]
    pub structure: BettingStructure,
    #[serde(default)]
    pub tie_rule: TieRule,
    /// Base seed; hand `n` shuffles with `seed + n`. Random decks when absent.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl TableConfig {
    pub fn validate(&self) -> Result<(), GameError> {
        self.structure.validate()
    }

    fn hand_seed(&self, hand_number: u64) -> Option<u64> {
        self.seed.map(|s| s.wrapping_add(hand_number))
    }
}

/// Everything a client may see about the current hand. Never includes the
/// opponent's cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub hand_number: u64,
    pub pot: u32,
    pub player_stack: u32,
    pub opponent_stack: u32,
    pub street: u8,
    pub draw_count: u8,
    pub to_act: Option<Seat>,
    pub betting_open: bool,
    pub draw_phase: bool,
    pub hand_over: bool,
    pub current_bet: u32,
    pub player_contrib: u32,
    pub opponent_contrib: u32,
    pub raises_this_round: u8,
    /// Legal actions for the player; empty when it is not the player's turn
    pub legal_actions: Vec<PlayerAction>,
    pub opponent_last_action: Option<OpponentAction>,
    pub last_payout: Option<Payout>,
}

/// Result of [`GameSession::resolve_showdown`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowdownOutcome {
    pub result: HandResult,
    pub player_hand: Hand,
    pub opponent_hand: Hand,
    pub player_rank: LowballRank,
    pub opponent_rank: LowballRank,
    pub payout: Payout,
    pub state: StateSnapshot,
}

/// Per-hand data, replaced wholesale by [`GameSession::next_hand`].
#[derive(Debug)]
struct HandState {
    deck: Deck,
    player_hand: Hand,
    opponent_hand: Hand,
    betting: BettingEngine,
    opponent_last_action: Option<OpponentAction>,
    record: HandRecord,
}

impl HandState {
    fn deal(
        config: &TableConfig,
        hand_number: u64,
        player_stack: u32,
        opponent_stack: u32,
    ) -> Result<Self, GameError> {
        // chips are checked before any card leaves the deck
        let betting = BettingEngine::start_hand(config.structure, player_stack, opponent_stack)?;
        let seed = config.hand_seed(hand_number);
        let mut deck = match seed {
            Some(s) => Deck::new_with_seed(s),
            None => Deck::new(),
        };
        let player_hand = Hand::deal(&mut deck)?;
        let opponent_hand = Hand::deal(&mut deck)?;

        let record = HandRecord {
            hand_id: format_hand_id(&today(), hand_number),
            seed: Some(deck.seed()),
            starting_stacks: Stacks {
                player: player_stack,
                opponent: opponent_stack,
            },
            actions: Vec::new(),
            draws: Vec::new(),
            player_hand: player_hand.cards().to_vec(),
            opponent_hand: opponent_hand.cards().to_vec(),
            result: None,
            payout: None,
            final_stacks: None,
            ts: None,
        };

        info!(
            hand_id = %record.hand_id,
            seed = deck.seed(),
            player_stack,
            opponent_stack,
            "hand dealt"
        );

        Ok(Self {
            deck,
            player_hand,
            opponent_hand,
            betting,
            opponent_last_action: None,
            record,
        })
    }
}

/// One heads-up deuce-to-seven triple draw match between the player and a
/// scripted opponent.
///
/// The player holds the button (small blind) in every hand. All operations
/// that reject input leave the session unchanged.
///
/// # Examples
///
/// ```
/// use lowdraw_engine::engine::{GameSession, TableConfig};
/// use lowdraw_engine::opponent::{BettingView, OpponentPolicy};
/// use lowdraw_engine::hand::Hand;
/// use lowdraw_engine::player::PlayerAction;
///
/// struct Passive;
/// impl OpponentPolicy for Passive {
///     fn name(&self) -> &str { "passive" }
///     fn choose_keep(&self, _hand: &Hand) -> Vec<usize> { vec![0, 1, 2, 3, 4] }
///     fn choose_action(&self, _hand: &Hand, view: &BettingView) -> PlayerAction {
///         if view.facing_bet() { PlayerAction::Call } else { PlayerAction::Check }
///     }
/// }
///
/// let config = TableConfig { seed: Some(7), ..TableConfig::default() };
/// let mut session = GameSession::start_hand(config, Box::new(Passive), 100, 100).unwrap();
/// let state = session.apply_player_action(PlayerAction::Call).unwrap();
/// assert!(state.draw_phase);
/// assert_eq!(state.pot, 4);
/// ```
pub struct GameSession {
    config: TableConfig,
    policy: Box<dyn OpponentPolicy>,
    hand_number: u64,
    hand: HandState,
}

impl std::fmt::Debug for GameSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameSession")
            .field("config", &self.config)
            .field("policy", &self.policy.name())
            .field("hand_number", &self.hand_number)
            .field("state", self.hand.betting.state())
            .finish()
    }
}

impl GameSession {
    /// Deals hand 1 and posts the blinds. The player acts first.
    pub fn start_hand(
        config: TableConfig,
        policy: Box<dyn OpponentPolicy>,
        player_stack: u32,
        opponent_stack: u32,
    ) -> Result<Self, GameError> {
        config.validate()?;
        let hand = HandState::deal(&config, 1, player_stack, opponent_stack)?;
        Ok(Self {
            config,
            policy,
            hand_number: 1,
            hand,
        })
    }

    /// Deals the next hand with the stacks carried over. Only after the current hand is over.
    pub fn next_hand(&mut self) -> Result<StateSnapshot, GameError> {
        if !self.hand.betting.state().hand_over {
            return Err(GameError::InvalidState("current hand is still in progress"));
        }
        let (player_stack, opponent_stack) = {
            let state = self.hand.betting.state();
            (state.player_stack, state.opponent_stack)
        };
        let next = self.hand_number + 1;
        self.hand = HandState::deal(&self.config, next, player_stack, opponent_stack)?;
        self.hand_number = next;
        Ok(self.snapshot())
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub fn policy_name(&self) -> &str {
        self.policy.name()
    }

    pub fn hand_number(&self) -> u64 {
        self.hand_number
    }

    pub fn player_hand(&self) -> &Hand {
        &self.hand.player_hand
    }

    /// The opponent's cards. Transports must only reveal these at showdown.
    pub fn opponent_hand(&self) -> &Hand {
        &self.hand.opponent_hand
    }

    pub fn state(&self) -> &GameState {
        self.hand.betting.state()
    }

    pub fn round(&self) -> &RoundState {
        self.hand.betting.round()
    }

    pub fn deck_remaining(&self) -> usize {
        self.hand.deck.remaining()
    }

    pub fn record(&self) -> &HandRecord {
        &self.hand.record
    }

    pub fn is_hand_over(&self) -> bool {
        self.state().hand_over
    }

    pub fn awaiting_showdown(&self) -> bool {
        self.hand.betting.awaiting_showdown()
    }

    pub fn legal_actions(&self) -> Vec<PlayerAction> {
        self.hand.betting.legal_actions(Seat::Player)
    }

    /// The betting round from the player's seat, in the shape policies receive.
    pub fn player_view(&self) -> BettingView {
        self.hand.betting.view(Seat::Player)
    }

    /// Applies the player's action, then lets the opponent act until the player
    /// is to act again or the round ends.
    pub fn apply_player_action(&mut self, action: PlayerAction) -> Result<StateSnapshot, GameError> {
        let outcome = self.hand.betting.apply(Seat::Player, action)?;
        self.record_action(Seat::Player, action, None);
        self.after_action(outcome);
        self.advance_until_human_turn_or_round_end();
        Ok(self.snapshot())
    }

    /// Runs the opponent's turns. A no-op unless the opponent is to act.
    /// Returns the number of opponent actions applied.
    pub fn advance_until_human_turn_or_round_end(&mut self) -> usize {
        let mut applied = 0;
        while self.hand.betting.to_act() == Some(Seat::Opponent) {
            let view = self.hand.betting.view(Seat::Opponent);
            let chosen = self.policy.choose_action(&self.hand.opponent_hand, &view);
            let legal = self.hand.betting.legal_actions(Seat::Opponent);
            let (action, substituted_from) = if legal.contains(&chosen) {
                (chosen, None)
            } else {
                let fallback = OpponentAction::fallback(&view);
                warn!(
                    policy = self.policy.name(),
                    chosen = %chosen,
                    fallback = %fallback,
                    street = view.street,
                    "opponent chose an illegal action, substituting"
                );
                (fallback, Some(chosen))
            };

            match self.hand.betting.apply(Seat::Opponent, action) {
                Ok(outcome) => {
                    self.hand.opponent_last_action = Some(OpponentAction {
                        action,
                        substituted_from,
                    });
                    self.record_action(Seat::Opponent, action, substituted_from);
                    self.after_action(outcome);
                    applied += 1;
                }
                Err(err) => {
                    error!(error = %err, "opponent fallback action rejected");
                    break;
                }
            }
        }
        applied
    }

    /// Replaces the player's non-kept cards, lets the opponent draw, and opens
    /// the next betting round.
    pub fn apply_discards(&mut self, keep: &[usize]) -> Result<StateSnapshot, GameError> {
        let state = self.hand.betting.state();
        if state.hand_over {
            return Err(GameError::InvalidState("hand is over"));
        }
        if !state.draw_phase {
            return Err(GameError::InvalidState("not in the draw phase"));
        }
        let keep = Hand::validate_keep(keep)?;

        let opponent_keep = self.policy.choose_keep(&self.hand.opponent_hand);
        let opponent_keep = match Hand::validate_keep(&opponent_keep) {
            Ok(k) => k,
            Err(err) => {
                warn!(policy = self.policy.name(), error = %err, "opponent keep set rejected, standing pat");
                (0..HAND_SIZE).collect()
            }
        };

        let needed = (HAND_SIZE - keep.len()) + (HAND_SIZE - opponent_keep.len());
        let remaining = self.hand.deck.remaining();
        if needed > remaining {
            error!(needed, remaining, "deck cannot cover the draw");
            return Err(GameError::DeckExhausted {
                requested: needed,
                remaining,
            });
        }

        let draw = state.draw_count + 1;
        let player_discarded = self
            .hand
            .player_hand
            .discard_and_draw(&keep, &mut self.hand.deck)?;
        let opponent_discarded = self
            .hand
            .opponent_hand
            .discard_and_draw(&opponent_keep, &mut self.hand.deck)?;
        self.hand.betting.complete_draw()?;

        self.hand.record.draws.push(DrawRecord {
            seat: Seat::Player,
            draw,
            discarded: player_discarded,
        });
        self.hand.record.draws.push(DrawRecord {
            seat: Seat::Opponent,
            draw,
            discarded: opponent_discarded,
        });
        debug!(draw, player_discarded, opponent_discarded, "draw completed");

        self.advance_street();
        Ok(self.snapshot())
    }

    /// Opens the next street (opponent first) and runs the opponent's turns.
    /// A no-op while betting or a draw is pending, and on the final street.
    pub fn advance_street(&mut self) -> bool {
        if !self.hand.betting.advance_street() {
            return false;
        }
        self.hand.opponent_last_action = None;
        self.advance_until_human_turn_or_round_end();
        true
    }

    /// Compares hands after the final betting round and pays the pot.
    pub fn resolve_showdown(&mut self) -> Result<ShowdownOutcome, GameError> {
        if self.state().hand_over {
            return Err(GameError::InvalidState("hand is over"));
        }
        let player_rank = self.hand.player_hand.rank();
        let opponent_rank = self.hand.opponent_hand.rank();
        let winner = match compare_hands(&player_rank, &opponent_rank, self.config.tie_rule) {
            std::cmp::Ordering::Greater => Some(Seat::Player),
            std::cmp::Ordering::Less => Some(Seat::Opponent),
            std::cmp::Ordering::Equal => None,
        };
        let payout = self.hand.betting.settle_showdown(winner)?;
        self.finish_record(payout);

        let result = HandResult::from_winner(winner);
        info!(
            hand_id = %self.hand.record.hand_id,
            result = result.as_str(),
            player_rank = %player_rank,
            opponent_rank = %opponent_rank,
            amount = payout.amount,
            "showdown"
        );

        Ok(ShowdownOutcome {
            result,
            player_hand: self.hand.player_hand.clone(),
            opponent_hand: self.hand.opponent_hand.clone(),
            player_rank,
            opponent_rank,
            payout,
            state: self.snapshot(),
        })
    }

    pub fn snapshot(&self) -> StateSnapshot {
        let state = self.hand.betting.state();
        let round = self.hand.betting.round();
        StateSnapshot {
            hand_number: self.hand_number,
            pot: state.pot,
            player_stack: state.player_stack,
            opponent_stack: state.opponent_stack,
            street: state.street,
            draw_count: state.draw_count,
            to_act: self.hand.betting.to_act(),
            betting_open: round.betting_open,
            draw_phase: state.draw_phase,
            hand_over: state.hand_over,
            current_bet: round.current_bet,
            player_contrib: round.player_contrib,
            opponent_contrib: round.opponent_contrib,
            raises_this_round: round.raises_this_round,
            legal_actions: self.legal_actions(),
            opponent_last_action: self.hand.opponent_last_action,
            last_payout: state.last_payout,
        }
    }

    fn record_action(
        &mut self,
        seat: Seat,
        action: PlayerAction,
        substituted_from: Option<PlayerAction>,
    ) {
        let street = self.hand.betting.state().street;
        self.hand.record.actions.push(ActionRecord {
            seat,
            street,
            action,
            substituted_from,
        });
    }

    fn after_action(&mut self, outcome: ActionOutcome) {
        if let ActionOutcome::HandEnded(payout) = outcome {
            self.finish_record(payout);
            info!(
                hand_id = %self.hand.record.hand_id,
                winner = ?payout.winner,
                amount = payout.amount,
                "hand ended on a fold"
            );
        }
    }

    fn finish_record(&mut self, payout: Payout) {
        let state = self.hand.betting.state();
        let record = &mut self.hand.record;
        record.player_hand = self.hand.player_hand.cards().to_vec();
        record.opponent_hand = self.hand.opponent_hand.cards().to_vec();
        record.result = Some(HandResult::from_winner(payout.winner));
        record.payout = Some(payout);
        record.final_stacks = Some(Stacks {
            player: state.player_stack,
            opponent: state.opponent_stack,
        });
    }
}
