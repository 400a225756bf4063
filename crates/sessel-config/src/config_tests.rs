use super::*;
use std::io::Write;
use tempfile::NamedTempFile;

const ADDR_A: &str = "0x00000000000000000000000000000000000000aa";
const ADDR_B: &str = "0x00000000000000000000000000000000000000bb";

fn scenario_toml() -> String {
    format!(
        r#"
[selector]
kind = "min-ls"
good_enough_score = 50.0
seed = 7
oracle_timeout_ms = 250

[[sessions]]
id = "o1"
address = "{ADDR_A}"
stake = 100

[[sessions]]
id = "o2"
address = "{ADDR_B}"
stake = 300
latency_score = 80.0
"#
    )
}

#[test]
fn test_selector_defaults() {
    let config = SelectorConfig::default();
    assert_eq!(config.kind, SelectorKind::MinLs);
    assert_eq!(config.good_enough_score, DEFAULT_GOOD_ENOUGH_SCORE);
    assert!(!config.offline);
    assert!(config.seed.is_none());
    assert!(config.oracle_timeout().is_none());
}

#[test]
fn test_empty_scenario_uses_defaults() {
    let config = ScenarioConfig::from_toml_str("").unwrap();
    assert_eq!(config, ScenarioConfig::default());
}

#[test]
fn test_parse_full_scenario() {
    let config = ScenarioConfig::from_toml_str(&scenario_toml()).unwrap();
    assert_eq!(config.selector.good_enough_score, 50.0);
    assert_eq!(config.selector.seed, Some(7));
    assert_eq!(
        config.selector.oracle_timeout(),
        Some(Duration::from_millis(250))
    );
    assert_eq!(config.sessions.len(), 2);
    assert!(!config.oracle.fail);
}

#[test]
fn test_parse_lifo_kind() {
    let config = ScenarioConfig::from_toml_str("[selector]\nkind = \"lifo\"\n").unwrap();
    assert_eq!(config.selector.kind, SelectorKind::Lifo);
}

#[test]
fn test_parse_rejects_unknown_kind() {
    let result = ScenarioConfig::from_toml_str("[selector]\nkind = \"round-robin\"\n");
    assert!(result.is_err());
}

#[test]
fn test_scored_and_unscored_partition() {
    let config = ScenarioConfig::from_toml_str(&scenario_toml()).unwrap();

    let unscored = config.unscored_sessions();
    assert_eq!(unscored.len(), 1);
    assert_eq!(unscored[0].id, "o1");
    assert!(unscored[0].latency_score.is_none());

    let scored = config.scored_sessions();
    assert_eq!(scored.len(), 1);
    assert_eq!(scored[0].id, "o2");
    assert_eq!(scored[0].latency_score, Some(80.0));
}

#[test]
fn test_stake_table() {
    let config = ScenarioConfig::from_toml_str(&scenario_toml()).unwrap();
    let table = config.stake_table();
    assert_eq!(table.get(&ADDR_A.parse().unwrap()), Some(&100));
    assert_eq!(table.get(&ADDR_B.parse().unwrap()), Some(&300));
}

#[test]
fn test_load_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(scenario_toml().as_bytes()).unwrap();

    let config = ScenarioConfig::load(file.path()).unwrap();
    assert_eq!(config.sessions[0].id, "o1");
}

#[test]
fn test_load_missing_file_names_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.toml");

    let err = ScenarioConfig::load(&path).unwrap_err();
    assert!(format!("{err:#}").contains("missing.toml"));
}

#[test]
fn test_load_invalid_scenario_reports_validation_error() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(b"[selector]\ngood_enough_score = -3.0\n")
        .unwrap();

    let err = ScenarioConfig::load(file.path()).unwrap_err();
    let message = format!("{err:#}");
    assert!(message.contains("Failed to parse scenario"));
    assert!(message.contains("good_enough_score"));
}

#[test]
fn test_round_trip_through_toml() {
    let config = ScenarioConfig::from_toml_str(&scenario_toml()).unwrap();
    let serialized = toml::to_string(&config).unwrap();
    let reparsed = ScenarioConfig::from_toml_str(&serialized).unwrap();
    assert_eq!(reparsed, config);
}
