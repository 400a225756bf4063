use anyhow::Result;
use serde::Serialize;
use sessel_config::ScenarioConfig;
use sessel_core::{OutputFormat, SelectorKind, StakeAddress};
use std::collections::HashSet;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct ScenarioSummary {
    pub kind: SelectorKind,
    pub good_enough_score: f64,
    pub offline: bool,
    pub oracle_fails: bool,
    pub scored: usize,
    pub unscored: usize,
    pub addresses: usize,
    /// Sum of stakes over distinct addresses.
    pub total_stake: u128,
}

impl ScenarioSummary {
    pub(crate) fn from_scenario(scenario: &ScenarioConfig) -> Self {
        let scored = scenario
            .sessions
            .iter()
            .filter(|s| s.latency_score.is_some())
            .count();
        let mut seen: HashSet<StakeAddress> = HashSet::new();
        let total_stake = scenario
            .sessions
            .iter()
            .filter(|s| seen.insert(s.address))
            .map(|s| u128::from(s.stake))
            .sum();

        Self {
            kind: scenario.selector.kind,
            good_enough_score: scenario.selector.good_enough_score,
            offline: scenario.selector.offline,
            oracle_fails: scenario.oracle.fail,
            scored,
            unscored: scenario.sessions.len() - scored,
            addresses: seen.len(),
            total_stake,
        }
    }
}

/// Handle `sessel check`.
pub(crate) fn handle_check(scenario_path: &Path, format: OutputFormat) -> Result<()> {
    let scenario = ScenarioConfig::load(scenario_path)?;
    let summary = ScenarioSummary::from_scenario(&scenario);

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
        OutputFormat::Text => {
            println!("{}: OK", scenario_path.display());
            println!("  selector: {}", summary.kind);
            if summary.kind == SelectorKind::MinLs {
                println!("  good_enough_score: {}", summary.good_enough_score);
                println!("  offline: {}", summary.offline);
            }
            println!(
                "  sessions: {} unscored, {} scored",
                summary.unscored, summary.scored
            );
            println!(
                "  stake: {} across {} addresses",
                summary.total_stake, summary.addresses
            );
        }
    }
    Ok(())
}
