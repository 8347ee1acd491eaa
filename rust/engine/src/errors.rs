use thiserror::Error;

use crate::player::{PlayerAction, Seat};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Illegal action {action} for {seat}")]
    IllegalAction { seat: Seat, action: PlayerAction },
    #[error("Invalid state: {0}")]
    InvalidState(&'static str),
    #[error("Invalid discard: {0}")]
    InvalidDiscard(String),
    /// Unreachable under the fixed three-draw schedule; callers treat it as fatal.
    #[error("Deck exhausted: requested {requested}, remaining {remaining}")]
    DeckExhausted { requested: usize, remaining: usize },
    #[error("{seat} needs {required} chips to cover the hand, has {available}")]
    InsufficientChips {
        seat: Seat,
        required: u32,
        available: u32,
    },
    #[error("Invalid card: {0}")]
    InvalidCard(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl GameError {
    /// True for errors that signal a broken invariant rather than a rejected request.
    pub fn is_fatal(&self) -> bool {
        matches!(self, GameError::DeckExhausted { .. })
    }
}
