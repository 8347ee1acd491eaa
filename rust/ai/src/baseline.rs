//! Baseline opponent: stands pat on an 8-low or better, draws away from
//! pairs and high cards otherwise, and bets purely on its current rank.
//!
//! Both decisions are free functions over the hand and the betting view, so
//! they can be tested without a session.

use lowdraw_engine::hand::{Hand, HAND_SIZE};
use lowdraw_engine::opponent::{BettingView, OpponentPolicy};
use lowdraw_engine::player::PlayerAction;
use tracing::trace;

/// Hands at or below this primary rank stand pat and play aggressively.
pub const STRONG_RANK: u8 = 8;
/// Hands at or below this primary rank (and above [`STRONG_RANK`]) call bets.
pub const CALLING_RANK: u8 = 11;
/// Cards above this value are discarded from unpaired hands.
pub const HIGH_CARD: u8 = 7;
/// Fewest cards the policy ever keeps.
pub const MIN_KEEP: usize = 2;

#[derive(Debug, Clone, Default)]
pub struct BaselinePolicy;

impl BaselinePolicy {
    pub fn new() -> Self {
        Self
    }
}

impl OpponentPolicy for BaselinePolicy {
    fn name(&self) -> &str {
        "baseline"
    }

    fn choose_keep(&self, hand: &Hand) -> Vec<usize> {
        select_discard(hand)
    }

    fn choose_action(&self, hand: &Hand, view: &BettingView) -> PlayerAction {
        let action = choose_action(hand, view);
        trace!(rank = hand.rank().primary, street = view.street, action = %action, "baseline decision");
        action
    }
}

/// Indexes to keep, ascending.
///
/// Paired cards go first; an unpaired hand throws everything above a seven.
/// At least [`MIN_KEEP`] cards stay, the lowest ones if it comes to that.
pub fn select_discard(hand: &Hand) -> Vec<usize> {
    if hand.rank().primary <= STRONG_RANK {
        return (0..HAND_SIZE).collect();
    }
    let values: Vec<u8> = hand.cards().iter().map(|c| c.rank.value()).collect();
    let paired = |v: u8| values.iter().filter(|&&x| x == v).count() > 1;

    let mut keep: Vec<usize> = (0..HAND_SIZE).filter(|&i| !paired(values[i])).collect();
    if keep.len() == HAND_SIZE {
        keep.retain(|&i| values[i] <= HIGH_CARD);
    }
    if keep.len() < MIN_KEEP {
        let mut by_value: Vec<usize> = (0..HAND_SIZE).collect();
        by_value.sort_by_key(|&i| values[i]);
        keep = by_value.into_iter().take(MIN_KEEP).collect();
        keep.sort_unstable();
    }
    keep
}

/// Betting decision from the current rank alone.
///
/// Facing a bet: strong hands raise while raises remain, middling hands call,
/// weak hands fold to a big-bet-sized bet and call a small one. Unopened:
/// strong hands bet, everything else checks.
pub fn choose_action(hand: &Hand, view: &BettingView) -> PlayerAction {
    let rank = hand.rank().primary;
    if view.facing_bet() {
        if rank <= STRONG_RANK {
            if view.can_raise() {
                PlayerAction::Raise
            } else {
                PlayerAction::Call
            }
        } else if rank <= CALLING_RANK {
            PlayerAction::Call
        } else if view.bet_unit >= view.big_bet {
            PlayerAction::Fold
        } else {
            PlayerAction::Call
        }
    } else if rank <= STRONG_RANK {
        PlayerAction::Bet
    } else {
        PlayerAction::Check
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lowdraw_engine::cards::parse_cards;

    fn hand(text: &str) -> Hand {
        Hand::new(parse_cards(text).unwrap())
    }

    fn view(street: u8, current_bet: u32, raises: u8) -> BettingView {
        let bet_unit = if street < 2 { 2 } else { 4 };
        BettingView {
            street,
            current_bet,
            own_contrib: 0,
            other_contrib: current_bet,
            raises_this_round: raises,
            max_raises: 3,
            bet_unit,
            small_bet: 2,
            big_bet: 4,
            pot: 10,
        }
    }

    #[test]
    fn strong_hand_stands_pat() {
        assert_eq!(select_discard(&hand("8S 6H 4D 3C 2S")), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn pairs_are_discarded_first() {
        // K K 9 4 2: both kings go, the nine stays because a pair was found
        assert_eq!(select_discard(&hand("KS KH 9D 4C 2S")), vec![2, 3, 4]);
    }

    #[test]
    fn unpaired_hands_throw_high_cards() {
        assert_eq!(select_discard(&hand("QS 9H 7D 4C 2S")), vec![2, 3, 4]);
    }

    #[test]
    fn at_least_two_cards_are_kept() {
        // every card is above seven: keep the two lowest
        assert_eq!(select_discard(&hand("AS KH QD 9C 8S")), vec![3, 4]);
        // two pairs and a high card: keep the two lowest values
        assert_eq!(select_discard(&hand("3S 3H 2D 2C 9S")), vec![2, 3]);
    }

    #[test]
    fn strong_hands_raise_until_the_cap() {
        let h = hand("7S 5H 4D 3C 2S");
        assert_eq!(choose_action(&h, &view(1, 2, 0)), PlayerAction::Raise);
        assert_eq!(choose_action(&h, &view(1, 8, 3)), PlayerAction::Call);
        assert_eq!(choose_action(&h, &view(1, 0, 0)), PlayerAction::Bet);
    }

    #[test]
    fn middling_hands_call_and_check() {
        let h = hand("JS 9H 6D 3C 2S");
        assert_eq!(choose_action(&h, &view(3, 4, 0)), PlayerAction::Call);
        assert_eq!(choose_action(&h, &view(3, 0, 0)), PlayerAction::Check);
    }

    #[test]
    fn weak_hands_fold_only_to_big_bets() {
        let h = hand("KS KH 9D 4C 2S");
        assert_eq!(choose_action(&h, &view(2, 4, 0)), PlayerAction::Fold);
        assert_eq!(choose_action(&h, &view(1, 2, 0)), PlayerAction::Call);
        assert_eq!(choose_action(&h, &view(0, 2, 0)), PlayerAction::Call);
    }
}
