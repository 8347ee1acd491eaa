mod common;

use std::fs;

use common::{check_down, session_with, ScriptedPolicy};
use lowdraw_engine::logger::{HandLogger, HandRecord};
use lowdraw_engine::player::{PlayerAction, Seat};

#[test]
fn writes_jsonl_with_lf_only() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("hands").join("log.jsonl");
    let mut logger = HandLogger::create(&path).expect("create logger");

    let mut session = session_with(ScriptedPolicy::passive(), 5);
    session.apply_player_action(PlayerAction::Fold).unwrap();
    logger.write(session.record()).expect("write");

    let bytes = fs::read(&path).expect("read file");
    assert!(bytes.ends_with(b"\n"));
    assert!(!bytes.contains(&b'\r'));
    assert_eq!(logger.written(), 1);
}

#[test]
fn ts_is_generated_when_missing_and_preserved_when_present() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("ts.jsonl");
    let mut logger = HandLogger::create(&path).expect("create logger");

    let mut session = session_with(ScriptedPolicy::passive(), 6);
    session.apply_player_action(PlayerAction::Fold).unwrap();
    let mut rec = session.record().clone();
    logger.write(&rec).unwrap();
    rec.ts = Some("2026-01-01T00:00:00Z".to_string());
    logger.write(&rec).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    let lines: Vec<HandRecord> = text
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].ts.is_some());
    assert_eq!(lines[1].ts.as_deref(), Some("2026-01-01T00:00:00Z"));
}

#[test]
fn record_tracks_actions_draws_and_outcome() {
    let mut session = session_with(ScriptedPolicy::passive(), 7);
    check_down(&mut session);
    session.resolve_showdown().unwrap();
    let rec = session.record();

    assert!(rec.is_complete());
    assert_eq!(rec.seed, Some(7 + 1));
    assert_eq!(rec.actions[0].seat, Seat::Player);
    assert_eq!(rec.actions[0].action, PlayerAction::Call);
    assert_eq!(rec.draws.len(), 6);
    assert_eq!(rec.player_hand, session.player_hand().cards().to_vec());
    let end = rec.final_stacks.unwrap();
    assert_eq!(end.total(), rec.starting_stacks.total());
    assert!(rec.hand_id.ends_with("-000001"));
}

#[test]
fn append_keeps_earlier_lines() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("append.jsonl");
    let mut session = session_with(ScriptedPolicy::passive(), 8);
    session.apply_player_action(PlayerAction::Fold).unwrap();

    HandLogger::create(&path).unwrap().write(session.record()).unwrap();
    HandLogger::append(&path).unwrap().write(session.record()).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap().lines().count(), 2);
}
