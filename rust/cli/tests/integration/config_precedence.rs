use crate::helpers::{CliRunner, EnvGuard};
use serial_test::serial;
use std::io::Write;

fn config_file(body: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    file.write_all(body.as_bytes()).unwrap();
    file
}

#[test]
#[serial]
fn file_values_are_reported_as_file() {
    let file = config_file("starting_stack = 250\npolicy = \"baseline\"\n");
    let path = file.path().to_string_lossy().into_owned();
    let _env = EnvGuard::apply(&[("LOWDRAW_CONFIG", path.as_str())]);

    let res = CliRunner::new().run(&["cfg"]);
    assert_eq!(res.exit_code, 0, "stderr={}", res.stderr);
    let json: serde_json::Value = serde_json::from_str(&res.stdout).unwrap();
    assert_eq!(json["starting_stack"]["value"], 250);
    assert_eq!(json["starting_stack"]["source"], "file");
    assert_eq!(json["policy"]["source"], "file");
    assert_eq!(json["seed"]["source"], "default");
}

#[test]
#[serial]
fn env_beats_file_and_flags_beat_env() {
    let file = config_file("seed = 1\n");
    let path = file.path().to_string_lossy().into_owned();
    let cli = CliRunner::new();

    let _env = EnvGuard::apply(&[("LOWDRAW_CONFIG", path.as_str()), ("LOWDRAW_SEED", "2")]);
    let res = cli.run(&["cfg"]);
    let json: serde_json::Value = serde_json::from_str(&res.stdout).unwrap();
    assert_eq!(json["seed"]["value"], 2);
    assert_eq!(json["seed"]["source"], "env");

    // --seed on the command line wins over LOWDRAW_SEED
    let from_env = cli.run(&["sim", "--hands", "5"]);
    let from_flag = cli.run(&["sim", "--hands", "5", "--seed", "2"]);
    let other = cli.run(&["sim", "--hands", "5", "--seed", "3"]);
    assert_eq!(from_env.exit_code, 0, "stderr={}", from_env.stderr);
    assert_eq!(from_env.stdout, from_flag.stdout);
    assert_eq!(other.exit_code, 0);
}

#[test]
#[serial]
fn stack_below_hand_exposure_is_rejected() {
    let file = config_file("starting_stack = 40\n");
    let path = file.path().to_string_lossy().into_owned();
    let _env = EnvGuard::apply(&[("LOWDRAW_CONFIG", path.as_str())]);

    let res = CliRunner::new().run(&["sim", "--hands", "1", "--seed", "1"]);
    assert_eq!(res.exit_code, 2);
    assert!(res.stderr.contains("starting_stack must be >= 48"));
}

#[test]
#[serial]
fn malformed_file_is_a_config_error() {
    let file = config_file("starting_stack = \"many\"\n");
    let path = file.path().to_string_lossy().into_owned();
    let _env = EnvGuard::apply(&[("LOWDRAW_CONFIG", path.as_str())]);

    let res = CliRunner::new().run(&["cfg"]);
    assert_eq!(res.exit_code, 2);
    assert!(res.stderr.contains("cannot parse config file"));
}
