//! # lowdraw-engine: Deuce-to-Seven Triple Draw Core
//!
//! A deterministic heads-up 2-7 triple draw lowball engine: one human player
//! against a scripted opponent, fixed-limit betting, three draws.
//!
//! ## Core Modules
//!
//! - [`cards`] - Card representation (Suit, Rank, Card) and text parsing
//! - [`deck`] - Deterministic deck shuffling with ChaCha20 RNG
//! - [`hand`] - Lowball hand evaluation, comparison and discards
//! - [`rules`] - Betting structure and legal action sets
//! - [`game`] - Hand and round state records, payouts
//! - [`betting`] - Fixed-limit betting state machine
//! - [`opponent`] - The policy seam for the non-human seat
//! - [`engine`] - Session orchestration across hands
//! - [`logger`] - HandRecord serialization to JSONL
//! - [`errors`] - Error types for game operations
//!
//! ## Quick Start
//!
//! ```rust
//! use lowdraw_engine::cards::parse_cards;
//! use lowdraw_engine::hand::{compare_hands, evaluate_hand, TieRule};
//! use std::cmp::Ordering;
//!
//! let seven = evaluate_hand(&parse_cards("7S 5H 4D 3C 2S").unwrap());
//! let nine = evaluate_hand(&parse_cards("9S 6H 4D 3C 2H").unwrap());
//! assert_eq!(seven.primary, 7);
//! assert_eq!(compare_hands(&seven, &nine, TieRule::PrimaryRank), Ordering::Greater);
//! ```
//!
//! ## Deterministic Gameplay
//!
//! ```rust
//! use lowdraw_engine::deck::Deck;
//!
//! let mut a = Deck::new_with_seed(42);
//! let mut b = Deck::new_with_seed(42);
//! assert_eq!(a.draw(10).unwrap(), b.draw(10).unwrap());
//! ```

pub mod betting;
pub mod cards;
pub mod deck;
pub mod engine;
pub mod errors;
pub mod game;
pub mod hand;
pub mod logger;
pub mod opponent;
pub mod player;
pub mod rules;
