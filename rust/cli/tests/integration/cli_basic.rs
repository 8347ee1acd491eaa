use crate::helpers::{CliRunner, EnvGuard};
use serial_test::serial;

#[test]
fn version_and_help_exit_zero() {
    let cli = CliRunner::new();
    let res = cli.run(&["--version"]);
    assert_eq!(res.exit_code, 0);
    assert!(res.stdout.contains("lowdraw"));

    let res = cli.run(&["sim", "--help"]);
    assert_eq!(res.exit_code, 0);
    assert!(res.stdout.contains("--hands"));
}

#[test]
fn missing_command_prints_usage() {
    let res = CliRunner::new().run(&[]);
    assert_eq!(res.exit_code, 2);
    assert!(res.stderr.contains("Usage: lowdraw <command>"));
    assert!(res.stderr.contains("stats"));
}

#[test]
fn deal_is_reproducible() {
    let cli = CliRunner::new();
    let a = cli.run(&["deal", "--seed", "5"]);
    let b = cli.run(&["deal", "--seed", "5"]);
    assert_eq!(a.exit_code, 0);
    assert_eq!(a.stdout, b.stdout);
    assert_eq!(a.stdout.lines().count(), 3);
}

#[test]
#[serial]
fn cfg_reports_sources() {
    let _env = EnvGuard::apply(&[("LOWDRAW_SEED", "11")]);
    let res = CliRunner::new().run(&["cfg"]);
    assert_eq!(res.exit_code, 0, "stderr={}", res.stderr);

    let json: serde_json::Value = serde_json::from_str(&res.stdout).unwrap();
    assert_eq!(json["seed"]["value"], 11);
    assert_eq!(json["seed"]["source"], "env");
    assert_eq!(json["starting_stack"]["value"], 100);
    assert_eq!(json["starting_stack"]["source"], "default");
    assert_eq!(json["tie_rule"]["value"], "primary_rank");
    assert_eq!(json["policy"]["value"], "baseline");
}

#[test]
#[serial]
fn cfg_rejects_invalid_env() {
    let _env = EnvGuard::apply(&[("LOWDRAW_STARTING_STACK", "lots")]);
    let res = CliRunner::new().run(&["cfg"]);
    assert_eq!(res.exit_code, 2);
    assert!(res.stderr.contains("Invalid starting stack"));
}
