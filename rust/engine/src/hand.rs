use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::deck::Deck;
use crate::errors::GameError;

/// Primary rank given to any hand holding a pair, straight or flush.
pub const DISQUALIFIED: u8 = 99;

/// Number of cards in a draw hand.
pub const HAND_SIZE: usize = 5;

/// Deuce-to-seven rank of a five-card hand. Lower is better.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct LowballRank {
    /// Highest card value (7..=14), or [`DISQUALIFIED`].
    pub primary: u8,
    /// All five card values, high -> low.
    pub kickers: [u8; 5],
}

impl LowballRank {
    pub fn is_qualified(&self) -> bool {
        self.primary != DISQUALIFIED
    }
}

impl fmt::Display for LowballRank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_qualified() {
            return f.write_str("disqualified");
        }
        let values: Vec<String> = self.kickers.iter().map(|v| v.to_string()).collect();
        write!(f, "{}-low ({})", self.primary, values.join("-"))
    }
}

/// How two hands with the same primary rank are separated at showdown.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieRule {
    /// Equal primary ranks split the pot even when lower cards differ.
    #[default]
    PrimaryRank,
    /// Equal primary ranks are separated by the descending card vector.
    FullVector,
}

impl TieRule {
    pub fn as_str(self) -> &'static str {
        match self {
            TieRule::PrimaryRank => "primary_rank",
            TieRule::FullVector => "full_vector",
        }
    }

    pub fn parse(s: &str) -> Option<TieRule> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "primary_rank" | "primary" => Some(TieRule::PrimaryRank),
            "full_vector" | "full" => Some(TieRule::FullVector),
            _ => None,
        }
    }
}

pub fn evaluate_hand(cards: &[Card; 5]) -> LowballRank {
    let mut values = [0u8; 5];
    for (slot, card) in values.iter_mut().zip(cards.iter()) {
        *slot = card.rank.value();
    }
    values.sort_unstable();

    let paired = values.windows(2).any(|w| w[0] == w[1]);
    let flush = cards.iter().all(|c| c.suit == cards[0].suit);
    // ace is always high, so A-2-3-4-5 is not a run
    let straight = !paired && values[4] - values[0] == 4;

    let mut kickers = values;
    kickers.reverse();
    if paired || flush || straight {
        return LowballRank {
            primary: DISQUALIFIED,
            kickers,
        };
    }
    LowballRank {
        primary: kickers[0],
        kickers,
    }
}

/// Orders two ranks by strength: `Greater` means `a` is the better (lower) hand.
///
/// Two disqualified hands always tie; their card vectors are not compared.
pub fn compare_hands(a: &LowballRank, b: &LowballRank, rule: TieRule) -> Ordering {
    match b.primary.cmp(&a.primary) {
        Ordering::Equal => match rule {
            TieRule::PrimaryRank => Ordering::Equal,
            TieRule::FullVector if !a.is_qualified() => Ordering::Equal,
            TieRule::FullVector => b.kickers.cmp(&a.kickers),
        },
        ord => ord,
    }
}

/// Five cards held by one seat.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Hand {
    cards: [Card; 5],
}

impl Hand {
    pub fn new(cards: [Card; 5]) -> Self {
        Self { cards }
    }

    pub fn deal(deck: &mut Deck) -> Result<Self, GameError> {
        let drawn = deck.draw(HAND_SIZE)?;
        Self::from_vec(drawn)
    }

    fn from_vec(cards: Vec<Card>) -> Result<Self, GameError> {
        let len = cards.len();
        let cards: [Card; 5] = cards
            .try_into()
            .map_err(|_| GameError::InvalidDiscard(format!("hand would hold {len} cards")))?;
        Ok(Self { cards })
    }

    pub fn cards(&self) -> &[Card; 5] {
        &self.cards
    }

    pub fn rank(&self) -> LowballRank {
        evaluate_hand(&self.cards)
    }

    /// Checks a keep-index set: every index in `0..5`, no duplicates.
    /// Returns the indexes in ascending order.
    pub fn validate_keep(keep: &[usize]) -> Result<Vec<usize>, GameError> {
        if keep.len() > HAND_SIZE {
            return Err(GameError::InvalidDiscard(format!(
                "cannot keep {} cards",
                keep.len()
            )));
        }
        let mut sorted = keep.to_vec();
        sorted.sort_unstable();
        if let Some(&bad) = sorted.iter().find(|&&i| i >= HAND_SIZE) {
            return Err(GameError::InvalidDiscard(format!(
                "index {bad} out of range 0..{HAND_SIZE}"
            )));
        }
        if let Some(w) = sorted.windows(2).find(|w| w[0] == w[1]) {
            return Err(GameError::InvalidDiscard(format!(
                "index {} listed twice",
                w[0]
            )));
        }
        Ok(sorted)
    }

    /// Keeps the cards at `keep` and replaces the rest from `deck`.
    /// Kept cards stay in their original order, followed by the fresh cards.
    /// Returns the number of cards replaced. Nothing changes on error.
    pub fn discard_and_draw(&mut self, keep: &[usize], deck: &mut Deck) -> Result<usize, GameError> {
        let keep = Self::validate_keep(keep)?;
        let replaced = HAND_SIZE - keep.len();
        let drawn = deck.draw(replaced)?;
        let mut next: Vec<Card> = keep.iter().map(|&i| self.cards[i]).collect();
        next.extend(drawn);
        *self = Self::from_vec(next)?;
        Ok(replaced)
    }
}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text: Vec<String> = self.cards.iter().map(|c| c.to_string()).collect();
        f.write_str(&text.join(" "))
    }
}
