use crate::helpers::{CliRunner, EnvGuard};
use lowdraw_engine::logger::HandRecord;
use serial_test::serial;
use std::fs;

#[test]
#[serial]
fn sim_output_feeds_stats() {
    let _env = EnvGuard::clean();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("runs").join("hands.jsonl");
    let path_str = path.to_string_lossy().into_owned();
    let cli = CliRunner::new();

    let sim = cli.run(&["sim", "--hands", "25", "--seed", "42", "--output", path_str.as_str()]);
    assert_eq!(sim.exit_code, 0, "stderr={}", sim.stderr);
    assert!(sim.stdout.contains("Wrote 25 hands"));

    let content = fs::read_to_string(&path).unwrap();
    let records: Vec<HandRecord> = content
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(records.len(), 25);
    assert!(records.iter().all(|r| r.is_complete() && r.ts.is_some()));

    let stats = cli.run(&["stats", "--input", path_str.as_str()]);
    assert_eq!(stats.exit_code, 0, "stderr={}", stats.stderr);
    let json: serde_json::Value = serde_json::from_str(&stats.stdout).unwrap();
    assert_eq!(json["hands"], 25);
    let wins = json["player_wins"].as_u64().unwrap()
        + json["opponent_wins"].as_u64().unwrap()
        + json["splits"].as_u64().unwrap();
    assert_eq!(wins, 25);

    let net: i64 = records.iter().filter_map(|r| r.player_net()).sum();
    assert_eq!(json["player_net"], net);
}

#[test]
#[serial]
fn compressed_history_is_read() {
    let _env = EnvGuard::clean();
    let dir = tempfile::tempdir().unwrap();
    let plain = dir.path().join("hands.jsonl");
    let plain_str = plain.to_string_lossy().into_owned();
    let cli = CliRunner::new();
    let sim = cli.run(&["sim", "--hands", "5", "--seed", "1", "--output", plain_str.as_str()]);
    assert_eq!(sim.exit_code, 0);

    let packed = dir.path().join("hands.jsonl.zst");
    let compressed = zstd::stream::encode_all(fs::read(&plain).unwrap().as_slice(), 0).unwrap();
    fs::write(&packed, compressed).unwrap();

    let packed_str = packed.to_string_lossy().into_owned();
    let res = cli.run(&["stats", "--input", packed_str.as_str()]);
    assert_eq!(res.exit_code, 0, "stderr={}", res.stderr);
    assert!(res.stdout.contains("\"hands\": 5"));
}

#[test]
#[serial]
fn tampered_record_fails_conservation() {
    let _env = EnvGuard::clean();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hands.jsonl");
    let path_str = path.to_string_lossy().into_owned();
    let cli = CliRunner::new();
    assert_eq!(
        cli.run(&["sim", "--hands", "3", "--seed", "8", "--output", path_str.as_str()])
            .exit_code,
        0
    );

    let mut records: Vec<HandRecord> = fs::read_to_string(&path)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    if let Some(end) = records[1].final_stacks.as_mut() {
        end.player += 10;
    }
    let body: String = records
        .iter()
        .map(|r| serde_json::to_string(r).unwrap() + "\n")
        .collect();
    fs::write(&path, body).unwrap();

    let res = cli.run(&["stats", "--input", path_str.as_str()]);
    assert_eq!(res.exit_code, 2);
    assert!(res.stderr.contains(&records[1].hand_id));
    assert!(res.stderr.contains("chip conservation violated"));
}

#[test]
#[serial]
fn missing_input_is_an_error() {
    let _env = EnvGuard::clean();
    let res = CliRunner::new().run(&["stats", "--input", "/nonexistent/hands.jsonl"]);
    assert_eq!(res.exit_code, 2);
    assert!(res.stderr.contains("Failed to read"));
}

#[test]
#[serial]
fn zero_hands_is_rejected() {
    let _env = EnvGuard::clean();
    let res = CliRunner::new().run(&["sim", "--hands", "0"]);
    assert_eq!(res.exit_code, 2);
}
