#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;

use lowdraw_engine::engine::{GameSession, TableConfig};
use lowdraw_engine::hand::Hand;
use lowdraw_engine::opponent::{BettingView, OpponentAction, OpponentPolicy};
use lowdraw_engine::player::PlayerAction;

/// Plays queued actions in order, then falls back to check/call.
pub struct ScriptedPolicy {
    actions: Mutex<VecDeque<PlayerAction>>,
    keep: Vec<usize>,
}

impl ScriptedPolicy {
    pub fn new(actions: &[PlayerAction]) -> Self {
        Self {
            actions: Mutex::new(actions.iter().copied().collect()),
            keep: vec![0, 1, 2, 3, 4],
        }
    }

    pub fn passive() -> Self {
        Self::new(&[])
    }

    pub fn keeping(mut self, keep: &[usize]) -> Self {
        self.keep = keep.to_vec();
        self
    }
}

impl OpponentPolicy for ScriptedPolicy {
    fn name(&self) -> &str {
        "scripted"
    }

    fn choose_keep(&self, _hand: &Hand) -> Vec<usize> {
        self.keep.clone()
    }

    fn choose_action(&self, _hand: &Hand, view: &BettingView) -> PlayerAction {
        self.actions
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| OpponentAction::fallback(view))
    }
}

pub fn seeded(seed: u64) -> TableConfig {
    TableConfig {
        seed: Some(seed),
        ..TableConfig::default()
    }
}

pub fn session_with(policy: ScriptedPolicy, seed: u64) -> GameSession {
    GameSession::start_hand(seeded(seed), Box::new(policy), 100, 100).unwrap()
}

/// Calls pre-draw, then stands pat and checks through every later street.
pub fn check_down(session: &mut GameSession) {
    session.apply_player_action(PlayerAction::Call).unwrap();
    for _ in 0..3 {
        session.apply_discards(&[0, 1, 2, 3, 4]).unwrap();
        if session.legal_actions().contains(&PlayerAction::Check) {
            session.apply_player_action(PlayerAction::Check).unwrap();
        } else if !session.legal_actions().is_empty() {
            session.apply_player_action(PlayerAction::Call).unwrap();
        }
    }
}
