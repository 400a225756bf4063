use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

const SCENARIO: &str = r#"
[selector]
kind = "min-ls"
good_enough_score = 50.0
seed = 11

[[sessions]]
id = "known"
address = "0x0000000000000000000000000000000000000009"
latency_score = 80.0

[[sessions]]
id = "u1"
address = "0x0000000000000000000000000000000000000001"
stake = 30

[[sessions]]
id = "u2"
address = "0x0000000000000000000000000000000000000002"
stake = 70
"#;

fn sessel_cmd() -> Command {
    Command::new(env!("CARGO_BIN_EXE_sessel"))
}

fn write_scenario(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).expect("write scenario");
    path
}

fn stdout_json(output: &std::process::Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).expect("stdout is JSON")
}

#[test]
fn simulate_json_drains_unscored_before_slow_known() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let scenario = write_scenario(tmp.path(), "pool.toml", SCENARIO);

    let output = sessel_cmd()
        .args(["--format", "json", "simulate"])
        .arg(&scenario)
        .output()
        .expect("run sessel simulate");
    assert!(output.status.success(), "simulate should succeed");

    let value = stdout_json(&output);
    assert_eq!(value["kind"], "min-ls");
    assert_eq!(value["remaining"], 0);

    let steps = value["steps"].as_array().expect("steps array");
    assert_eq!(steps.len(), 4);
    let mut first_two: Vec<&str> = steps[..2]
        .iter()
        .map(|s| s["id"].as_str().expect("selected id"))
        .collect();
    first_two.sort();
    assert_eq!(first_two, vec!["u1", "u2"]);
    assert_eq!(steps[2]["id"], "known");
    assert_eq!(steps[2]["latency_score"], 80.0);
    assert_eq!(steps[3]["outcome"], "exhausted");
}

#[test]
fn simulate_text_reports_rounds_and_remaining() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let scenario = write_scenario(tmp.path(), "pool.toml", SCENARIO);

    let output = sessel_cmd()
        .arg("simulate")
        .arg(&scenario)
        .args(["--rounds", "1"])
        .output()
        .expect("run sessel simulate");
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("round 1: selected u"));
    assert!(stdout.contains("(unscored)"));
    assert!(stdout.contains("remaining: 2"));
}

#[test]
fn simulate_failing_oracle_keeps_pool() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let content = format!("{SCENARIO}\n[oracle]\nfail = true\n");
    let scenario = write_scenario(tmp.path(), "failing.toml", &content);

    let output = sessel_cmd()
        .args(["--format", "json", "simulate"])
        .arg(&scenario)
        .args(["--rounds", "2"])
        .output()
        .expect("run sessel simulate");
    assert!(output.status.success(), "failed selections are reported, not fatal");

    let value = stdout_json(&output);
    assert_eq!(value["remaining"], 3);
    for step in value["steps"].as_array().expect("steps array") {
        assert_eq!(step["outcome"], "error");
        assert!(
            step["message"]
                .as_str()
                .expect("message")
                .contains("Failed to read stake weights")
        );
    }
}

#[test]
fn tally_json_reports_every_session() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let scenario = write_scenario(tmp.path(), "pool.toml", SCENARIO);

    let output = sessel_cmd()
        .args(["--format", "json", "tally"])
        .arg(&scenario)
        .args(["--trials", "500", "--seed", "5"])
        .output()
        .expect("run sessel tally");
    assert!(output.status.success());

    let value = stdout_json(&output);
    assert_eq!(value["trials"], 500);
    let sessions = value["sessions"].as_array().expect("sessions array");
    assert_eq!(sessions.len(), 3);

    let total: u64 = sessions
        .iter()
        .map(|s| s["selected"].as_u64().expect("selected count"))
        .sum();
    assert_eq!(total, 500);

    let known = sessions
        .iter()
        .find(|s| s["id"] == "known")
        .expect("known session");
    assert_eq!(known["selected"], 0);
    assert_eq!(known["expected"], 0.0);
}

#[test]
fn tally_rejects_zero_trials() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let scenario = write_scenario(tmp.path(), "pool.toml", SCENARIO);

    let output = sessel_cmd()
        .arg("tally")
        .arg(&scenario)
        .args(["--trials", "0"])
        .output()
        .expect("run sessel tally");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--trials"));
}

#[test]
fn check_prints_summary() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let scenario = write_scenario(tmp.path(), "pool.toml", SCENARIO);

    let output = sessel_cmd()
        .arg("check")
        .arg(&scenario)
        .output()
        .expect("run sessel check");
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("selector: min-ls"));
    assert!(stdout.contains("2 unscored, 1 scored"));
    assert!(stdout.contains("stake: 100 across 3 addresses"));
}

#[test]
fn check_rejects_duplicate_session_ids() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let content = format!(
        "{SCENARIO}\n[[sessions]]\nid = \"u1\"\naddress = \"0x0000000000000000000000000000000000000003\"\n"
    );
    let scenario = write_scenario(tmp.path(), "dup.toml", &content);

    let output = sessel_cmd()
        .arg("check")
        .arg(&scenario)
        .output()
        .expect("run sessel check");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to parse scenario"));
    assert!(stderr.contains("dup.toml"));
}

#[test]
fn missing_scenario_reports_read_error() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let missing = tmp.path().join("not-found.toml");

    let output = sessel_cmd()
        .arg("check")
        .arg(&missing)
        .output()
        .expect("run sessel check for missing file");
    assert!(!output.status.success(), "missing scenario should return non-zero");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to read scenario"));
    assert!(stderr.contains("not-found.toml"));
}
