use crate::helpers::{CliRunner, EnvGuard};
use serial_test::serial;

#[test]
#[serial]
fn single_hand_prints_its_rank() {
    let _env = EnvGuard::clean();
    let res = CliRunner::new().run(&["eval", "7S 5H 4D 3C 2S"]);
    assert_eq!(res.exit_code, 0, "stderr={}", res.stderr);
    assert!(res.stdout.contains("7-low (7-5-4-3-2)"));
}

#[test]
#[serial]
fn configured_tie_rule_is_used_without_flag() {
    let cli = CliRunner::new();
    let args = ["eval", "8S 6H 4D 3C 2S", "8H 7D 4C 3S 2H"];

    let _env = EnvGuard::clean();
    let res = cli.run(&args);
    assert!(res.stdout.contains("Tie (primary_rank)"), "stdout={}", res.stdout);
    drop(_env);

    let _env = EnvGuard::apply(&[("LOWDRAW_TIE_RULE", "full_vector")]);
    let res = cli.run(&args);
    assert!(res.stdout.contains("A wins (full_vector)"), "stdout={}", res.stdout);
}

#[test]
#[serial]
fn ten_may_be_written_as_t() {
    let _env = EnvGuard::clean();
    let res = CliRunner::new().run(&["eval", "TS 5H 4D 3C 2S", "JH 6D 4C 3S 2H"]);
    assert_eq!(res.exit_code, 0, "stderr={}", res.stderr);
    assert!(res.stdout.contains("A wins"));
}

#[test]
#[serial]
fn duplicate_cards_are_rejected() {
    let _env = EnvGuard::clean();
    let res = CliRunner::new().run(&["eval", "7S 7S 4D 3C 2S"]);
    assert_eq!(res.exit_code, 2);
    assert!(res.stderr.contains("Invalid input"));
}
