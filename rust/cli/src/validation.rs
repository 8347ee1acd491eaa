//! Parsing of interactive input for `play` and hand text for `eval`.

use lowdraw_engine::cards::{Card, parse_cards};
use lowdraw_engine::hand::{HAND_SIZE, Hand};
use lowdraw_engine::player::PlayerAction;

/// What a line typed at the action prompt means.
#[derive(Debug, PartialEq)]
pub enum ParseResult {
    Action(PlayerAction),
    /// User entered quit command (q or quit)
    Quit,
    Invalid(String),
}

/// What a line typed at the draw prompt means.
#[derive(Debug, PartialEq)]
pub enum DrawInput {
    /// Indexes of the cards to keep; empty means draw five
    Keep(Vec<usize>),
    Quit,
    Invalid(String),
}

/// Parse an action word. Case-insensitive; `f`, `x`, `c`, `b` and `r` are
/// accepted as shorthands.
///
/// ```rust
/// # use lowdraw_cli::validation::{parse_player_action, ParseResult};
/// use lowdraw_engine::player::PlayerAction;
///
/// assert_eq!(parse_player_action("Raise"), ParseResult::Action(PlayerAction::Raise));
/// assert_eq!(parse_player_action("x"), ParseResult::Action(PlayerAction::Check));
/// assert_eq!(parse_player_action("q"), ParseResult::Quit);
/// assert!(matches!(parse_player_action("allin"), ParseResult::Invalid(_)));
/// ```
pub fn parse_player_action(input: &str) -> ParseResult {
    let input = input.trim().to_lowercase();
    let Some(word) = input.split_whitespace().next() else {
        return ParseResult::Invalid("Empty input".to_string());
    };

    match word {
        "q" | "quit" => ParseResult::Quit,
        "f" => ParseResult::Action(PlayerAction::Fold),
        "x" => ParseResult::Action(PlayerAction::Check),
        "c" => ParseResult::Action(PlayerAction::Call),
        "b" => ParseResult::Action(PlayerAction::Bet),
        "r" => ParseResult::Action(PlayerAction::Raise),
        other => match other.parse::<PlayerAction>() {
            Ok(action) => ParseResult::Action(action),
            Err(_) => ParseResult::Invalid(format!(
                "Unrecognized action '{}'. Valid actions: fold, check, call, bet, raise, q",
                other
            )),
        },
    }
}

/// Parse a draw decision: `pat`, `keep 0 2 4`, bare indexes (`0 2 4`),
/// `draw 5` (keep nothing) or `q`.
///
/// ```rust
/// # use lowdraw_cli::validation::{parse_draw_input, DrawInput};
/// assert_eq!(parse_draw_input("pat"), DrawInput::Keep(vec![0, 1, 2, 3, 4]));
/// assert_eq!(parse_draw_input("keep 4 0"), DrawInput::Keep(vec![4, 0]));
/// assert_eq!(parse_draw_input("draw 5"), DrawInput::Keep(vec![]));
/// assert!(matches!(parse_draw_input("keep 9"), DrawInput::Invalid(_)));
/// assert!(matches!(parse_draw_input("keep"), DrawInput::Invalid(_)));
/// ```
pub fn parse_draw_input(input: &str) -> DrawInput {
    let input = input.trim().to_lowercase();
    let mut parts = input.split_whitespace().peekable();

    match parts.peek().copied() {
        None => return DrawInput::Invalid("Empty input".to_string()),
        Some("q" | "quit") => return DrawInput::Quit,
        Some("pat") => return DrawInput::Keep((0..HAND_SIZE).collect()),
        Some("draw") => {
            parts.next();
            return match parts.next().map(str::parse::<usize>) {
                Some(Ok(n)) if n == HAND_SIZE => DrawInput::Keep(Vec::new()),
                _ => DrawInput::Invalid(
                    "Use 'draw 5' to replace every card, or 'keep' with indexes".to_string(),
                ),
            };
        }
        Some("keep" | "k") => {
            parts.next();
            if parts.peek().is_none() {
                return DrawInput::Invalid(
                    "Give the indexes to keep, e.g. 'keep 0 2 4', or 'draw 5'".to_string(),
                );
            }
        }
        Some(_) => {}
    }

    let mut keep = Vec::new();
    for token in parts {
        match token.parse::<usize>() {
            Ok(i) if i < HAND_SIZE => keep.push(i),
            Ok(i) => {
                return DrawInput::Invalid(format!(
                    "Card index {} is out of range (0-{})",
                    i,
                    HAND_SIZE - 1
                ));
            }
            Err(_) => return DrawInput::Invalid(format!("'{}' is not a card index", token)),
        }
    }
    DrawInput::Keep(keep)
}

/// Parse five cards such as `"7S 5H 4D 3C 2S"`, rejecting duplicates.
pub fn parse_hand_text(text: &str) -> Result<Hand, String> {
    let cards: [Card; 5] = parse_cards(text).map_err(|e| e.to_string())?;
    for (i, card) in cards.iter().enumerate() {
        if cards[..i].contains(card) {
            return Err(format!("Card {} appears twice", card));
        }
    }
    Ok(Hand::new(cards))
}
