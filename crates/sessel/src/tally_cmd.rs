use anyhow::{Result, bail};
use serde::Serialize;
use sessel_config::ScenarioConfig;
use sessel_core::{OutputFormat, SelectorKind, StakeAddress};
use sessel_selector::SessionSelector;
use std::collections::{HashMap, HashSet};
use std::path::Path;

use crate::pool::build_pool;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct SessionTally {
    pub id: String,
    pub stake: u64,
    pub selected: usize,
    pub frequency: f64,
    /// Exact win probability of the stake-weighted draw, when the first
    /// selection is routed to it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct TallyReport {
    pub kind: SelectorKind,
    pub trials: usize,
    pub errors: usize,
    pub exhausted: usize,
    pub sessions: Vec<SessionTally>,
}

/// Handle `sessel tally`.
pub(crate) fn handle_tally(
    scenario_path: &Path,
    trials: usize,
    seed: Option<u64>,
    format: OutputFormat,
) -> Result<()> {
    if trials == 0 {
        bail!("--trials must be > 0");
    }
    let scenario = ScenarioConfig::load(scenario_path)?;
    let report = run_tally(&scenario, trials, seed);

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => print_report_text(&report),
    }
    Ok(())
}

/// Run `trials` independent first selections, each on a freshly built pool.
pub(crate) fn run_tally(
    scenario: &ScenarioConfig,
    trials: usize,
    seed: Option<u64>,
) -> TallyReport {
    let base_seed = seed.or(scenario.selector.seed);
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut errors = 0;
    let mut exhausted = 0;

    for trial in 0..trials {
        let trial_seed = base_seed.map(|s| s.wrapping_add(trial as u64));
        let mut selector = build_pool(scenario, trial_seed);
        match selector.select() {
            Ok(Some(session)) => *counts.entry(session.id).or_default() += 1,
            Ok(None) => exhausted += 1,
            Err(_) => errors += 1,
        }
    }

    let expected = expected_shares(scenario);
    let sessions = scenario
        .sessions
        .iter()
        .map(|spec| {
            let selected = counts.get(&spec.id).copied().unwrap_or(0);
            SessionTally {
                id: spec.id.clone(),
                stake: spec.stake,
                selected,
                frequency: selected as f64 / trials as f64,
                expected: expected
                    .as_ref()
                    .map(|e| e.get(&spec.id).copied().unwrap_or(0.0)),
            }
        })
        .collect();

    TallyReport {
        kind: scenario.selector.kind,
        trials,
        errors,
        exhausted,
        sessions,
    }
}

/// Per-session probability of winning the first selection, when that
/// selection is a stake-weighted draw over the unscored sessions.
fn expected_shares(scenario: &ScenarioConfig) -> Option<HashMap<String, f64>> {
    let selector = &scenario.selector;
    if selector.kind != SelectorKind::MinLs || selector.offline || scenario.oracle.fail {
        return None;
    }

    let unscored: Vec<_> = scenario
        .sessions
        .iter()
        .filter(|s| s.latency_score.is_none())
        .collect();
    if unscored.is_empty() {
        return None;
    }
    let best_known = scenario
        .sessions
        .iter()
        .filter_map(|s| s.latency_score)
        .min_by(f64::total_cmp);
    if best_known.is_some_and(|score| score <= selector.good_enough_score) {
        return None;
    }

    let stakes: Vec<u64> = unscored.iter().map(|s| s.stake).collect();
    let mut seen: HashSet<StakeAddress> = HashSet::new();
    let total: u128 = unscored
        .iter()
        .filter(|s| seen.insert(s.address))
        .map(|s| u128::from(s.stake))
        .sum();

    Some(
        unscored
            .iter()
            .zip(win_probabilities(&stakes, total))
            .map(|(spec, p)| (spec.id.clone(), p))
            .collect(),
    )
}

/// Exact win probabilities of the walk used by the stake-weighted draw.
///
/// A draw `r` in `[0, total)` is consumed stake by stake in queue order and
/// the first session whose stake covers the remainder wins, so session `i`
/// wins for `r` in `(C[i-1], C[i]]` (`[0, C[0]]` for the head), where `C` is
/// the running stake sum. With zero total the head always wins.
pub(crate) fn win_probabilities(stakes: &[u64], total: u128) -> Vec<f64> {
    if total == 0 {
        return (0..stakes.len())
            .map(|i| if i == 0 { 1.0 } else { 0.0 })
            .collect();
    }

    let last = total - 1;
    let mut covered: Option<u128> = None;
    let mut cumulative: u128 = 0;
    stakes
        .iter()
        .map(|stake| {
            cumulative += u128::from(*stake);
            let upper = cumulative.min(last);
            let wins = match covered {
                None => upper + 1,
                Some(prev) if upper > prev => upper - prev,
                Some(_) => 0,
            };
            covered = Some(covered.map_or(upper, |prev| prev.max(upper)));
            wins as f64 / total as f64
        })
        .collect()
}

fn print_report_text(report: &TallyReport) {
    println!("{} selector, {} trials", report.kind, report.trials);
    for tally in &report.sessions {
        let expected = tally
            .expected
            .map(|e| format!("  expected {:.4}", e))
            .unwrap_or_default();
        println!(
            "  {:<16} stake {:>12}  selected {:>8}  freq {:.4}{}",
            tally.id, tally.stake, tally.selected, tally.frequency, expected
        );
    }
    if report.exhausted > 0 {
        println!("exhausted: {}", report.exhausted);
    }
    if report.errors > 0 {
        println!("errors: {}", report.errors);
    }
}

#[cfg(test)]
#[path = "tally_cmd_tests.rs"]
mod tests;
