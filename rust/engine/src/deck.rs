use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use crate::cards::{full_deck, Card};
use crate::errors::GameError;

/// The 52-card set owned by one hand. Shuffled once at construction; cards
/// leave only through [`Deck::draw`].
#[derive(Debug)]
pub struct Deck {
    cards: Vec<Card>,
    seed: u64,
}

impl Deck {
    pub fn new_with_seed(seed: u64) -> Self {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let mut cards = full_deck();
        cards.shuffle(&mut rng);
        Self { cards, seed }
    }

    pub fn new() -> Self {
        Self::new_with_seed(rand::random())
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Removes and returns the last `n` remaining cards.
    pub fn draw(&mut self, n: usize) -> Result<Vec<Card>, GameError> {
        let remaining = self.cards.len();
        if n > remaining {
            return Err(GameError::DeckExhausted {
                requested: n,
                remaining,
            });
        }
        let mut drawn = self.cards.split_off(remaining - n);
        // pop order: the last card of the sequence comes out first
        drawn.reverse();
        Ok(drawn)
    }

    pub fn remaining(&self) -> usize {
        self.cards.len()
    }
}

impl Default for Deck {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draw_takes_from_the_end() {
        let mut deck = Deck::new_with_seed(3);
        let before = deck.cards.clone();
        let drawn = deck.draw(2).unwrap();
        assert_eq!(drawn, vec![before[51], before[50]]);
        assert_eq!(deck.remaining(), 50);
    }

    #[test]
    fn overdraw_fails_without_mutation() {
        let mut deck = Deck::new_with_seed(9);
        deck.draw(50).unwrap();
        let err = deck.draw(3).unwrap_err();
        assert_eq!(
            err,
            GameError::DeckExhausted {
                requested: 3,
                remaining: 2
            }
        );
        assert_eq!(deck.remaining(), 2);
    }

    #[test]
    fn drawing_zero_is_a_no_op() {
        let mut deck = Deck::new_with_seed(1);
        assert!(deck.draw(0).unwrap().is_empty());
        assert_eq!(deck.remaining(), 52);
    }
}
