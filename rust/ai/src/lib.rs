//! # lowdraw-ai: Scripted Opponents for Triple Draw
//!
//! Implementations of the engine's [`OpponentPolicy`] seam.
//!
//! ## Core Components
//!
//! - [`baseline`] - Rank-threshold policy used by default
//! - [`create_policy`] - Factory function for creating policies by name
//!
//! ## Quick Start
//!
//! ```rust
//! use lowdraw_ai::create_policy;
//! use lowdraw_engine::cards::parse_cards;
//! use lowdraw_engine::hand::Hand;
//!
//! let policy = create_policy("baseline").unwrap();
//! let hand = Hand::new(parse_cards("7S 5H 4D 3C 2S").unwrap());
//! // a seven-low stands pat
//! assert_eq!(policy.choose_keep(&hand), vec![0, 1, 2, 3, 4]);
//! ```

use lowdraw_engine::errors::GameError;
use lowdraw_engine::opponent::OpponentPolicy;

pub mod baseline;

pub use baseline::BaselinePolicy;

/// Names accepted by [`create_policy`].
pub const POLICY_NAMES: &[&str] = &["baseline"];

/// Builds an opponent policy by name.
///
/// # Example
///
/// ```rust
/// use lowdraw_ai::create_policy;
///
/// assert_eq!(create_policy("baseline").unwrap().name(), "baseline");
/// assert!(create_policy("shark").is_err());
/// ```
pub fn create_policy(name: &str) -> Result<Box<dyn OpponentPolicy>, GameError> {
    match name.trim().to_ascii_lowercase().as_str() {
        "baseline" => Ok(Box::new(BaselinePolicy::new())),
        other => Err(GameError::InvalidConfig(format!(
            "unknown opponent policy '{}' (expected one of: {})",
            other,
            POLICY_NAMES.join(", ")
        ))),
    }
}
