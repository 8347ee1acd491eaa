//! Card, hand, and action formatters for terminal display.
//!
//! Cards render with Unicode suit symbols where the terminal supports them and
//! fall back to letters elsewhere.
//!
//! ## Example
//!
//! ```rust
//! use lowdraw_engine::cards::{Card, Rank, Suit};
//! use lowdraw_cli::formatters::format_card;
//!
//! let seven = Card { rank: Rank::Seven, suit: Suit::Spades };
//! assert!(format_card(&seven) == "7♠" || format_card(&seven) == "7s");
//! ```

use lowdraw_engine::cards::{Card, Rank, Suit};
use lowdraw_engine::game::HandResult;
use lowdraw_engine::hand::Hand;
use lowdraw_engine::logger::ActionRecord;
use lowdraw_engine::player::Seat;

/// Check if the terminal supports Unicode card symbols.
///
/// On Windows, checks for Windows Terminal (WT_SESSION), modern terminals (TERM_PROGRAM),
/// or VS Code (VSCODE_INJECTION). On Unix-like systems, assumes Unicode support.
pub fn supports_unicode() -> bool {
    if cfg!(windows) {
        std::env::var("WT_SESSION").is_ok()
            || std::env::var("TERM_PROGRAM").is_ok()
            || std::env::var("VSCODE_INJECTION").is_ok()
    } else {
        true
    }
}

pub fn format_suit(suit: &Suit) -> String {
    if supports_unicode() {
        match suit {
            Suit::Hearts => "♥",
            Suit::Diamonds => "♦",
            Suit::Clubs => "♣",
            Suit::Spades => "♠",
        }
        .to_string()
    } else {
        match suit {
            Suit::Hearts => "h",
            Suit::Diamonds => "d",
            Suit::Clubs => "c",
            Suit::Spades => "s",
        }
        .to_string()
    }
}

/// Single-character rank (2-9, T, J, Q, K, A).
pub fn format_rank(rank: &Rank) -> String {
    match rank {
        Rank::Two => "2",
        Rank::Three => "3",
        Rank::Four => "4",
        Rank::Five => "5",
        Rank::Six => "6",
        Rank::Seven => "7",
        Rank::Eight => "8",
        Rank::Nine => "9",
        Rank::Ten => "T",
        Rank::Jack => "J",
        Rank::Queen => "Q",
        Rank::King => "K",
        Rank::Ace => "A",
    }
    .to_string()
}

pub fn format_card(card: &Card) -> String {
    format!("{}{}", format_rank(&card.rank), format_suit(&card.suit))
}

/// Cards with their draw indexes, e.g. `[0]7♠ [1]5♥ [2]4♦ [3]3♣ [4]2♠`.
pub fn format_indexed_hand(hand: &Hand) -> String {
    hand.cards()
        .iter()
        .enumerate()
        .map(|(i, c)| format!("[{}]{}", i, format_card(c)))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Hand followed by its lowball rank: `7♠ 5♥ 4♦ 3♣ 2♠  (7-low (7-5-4-3-2))`.
pub fn format_hand(hand: &Hand) -> String {
    let cards: Vec<String> = hand.cards().iter().map(format_card).collect();
    format!("{}  ({})", cards.join(" "), hand.rank())
}

pub fn seat_label(seat: Seat) -> &'static str {
    match seat {
        Seat::Player => "You",
        Seat::Opponent => "Opponent",
    }
}

/// `Opponent: call` or, when a fallback replaced an illegal choice,
/// `Opponent: check (instead of raise)`.
pub fn format_action_record(record: &ActionRecord) -> String {
    match record.substituted_from {
        Some(chosen) => format!(
            "{}: {} (instead of {})",
            seat_label(record.seat),
            record.action,
            chosen
        ),
        None => format!("{}: {}", seat_label(record.seat), record.action),
    }
}

pub fn format_result(result: HandResult) -> &'static str {
    match result {
        HandResult::Win => "You win",
        HandResult::Lose => "Opponent wins",
        HandResult::Draw => "Split pot",
    }
}
