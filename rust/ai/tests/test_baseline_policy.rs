use lowdraw_ai::baseline::{select_discard, MIN_KEEP};
use lowdraw_ai::create_policy;
use lowdraw_engine::deck::Deck;
use lowdraw_engine::engine::{GameSession, TableConfig};
use lowdraw_engine::hand::Hand;
use lowdraw_engine::player::PlayerAction;
use proptest::prelude::*;

proptest! {
    #[test]
    fn keep_sets_are_valid_and_never_below_two(seed in any::<u64>()) {
        let mut deck = Deck::new_with_seed(seed);
        let hand = Hand::deal(&mut deck).unwrap();
        let keep = select_discard(&hand);
        prop_assert!(keep.len() >= MIN_KEEP);
        prop_assert_eq!(Hand::validate_keep(&keep).unwrap(), keep.clone());
        if hand.rank().primary <= 8 {
            prop_assert_eq!(keep.len(), 5);
        }
    }
}

#[test]
fn baseline_plays_whole_hands_without_substitution() {
    for seed in 0..50u64 {
        let config = TableConfig {
            seed: Some(seed),
            ..TableConfig::default()
        };
        let policy = create_policy("baseline").unwrap();
        let mut session = GameSession::start_hand(config, policy, 100, 100).unwrap();
        for _ in 0..40 {
            let state = session.snapshot();
            if state.hand_over {
                break;
            }
            if session.awaiting_showdown() {
                session.resolve_showdown().unwrap();
            } else if state.draw_phase {
                session.apply_discards(&[0, 1, 2, 3, 4]).unwrap();
            } else if state.legal_actions.contains(&PlayerAction::Call) {
                session.apply_player_action(PlayerAction::Call).unwrap();
            } else {
                session.apply_player_action(PlayerAction::Check).unwrap();
            }
        }
        assert!(session.is_hand_over(), "seed {seed}");
        assert!(
            session
                .record()
                .actions
                .iter()
                .all(|a| a.substituted_from.is_none()),
            "seed {seed}"
        );
    }
}

#[test]
fn unknown_policy_names_are_rejected() {
    assert!(create_policy("Baseline").is_ok());
    assert!(create_policy("random").is_err());
}
