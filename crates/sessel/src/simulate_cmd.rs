use anyhow::Result;
use serde::Serialize;
use sessel_config::ScenarioConfig;
use sessel_core::{OutputFormat, Session};
use sessel_selector::SessionSelector;
use std::path::Path;
use tracing::info;

use crate::pool::build_pool;

/// Outcome of one `select` call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "kebab-case")]
pub(crate) enum Step {
    Selected {
        round: usize,
        id: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        latency_score: Option<f64>,
    },
    Exhausted {
        round: usize,
    },
    Error {
        round: usize,
        message: String,
    },
}

/// Handle `sessel simulate`.
pub(crate) fn handle_simulate(
    scenario_path: &Path,
    rounds: Option<usize>,
    seed: Option<u64>,
    format: OutputFormat,
) -> Result<()> {
    let scenario = ScenarioConfig::load(scenario_path)?;
    let mut selector = build_pool(&scenario, seed);
    let rounds = rounds.unwrap_or(selector.size() + 1);

    let steps = run_simulation(&mut selector, rounds);
    info!(
        rounds = steps.len(),
        remaining = selector.size(),
        "Simulation finished"
    );

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "kind": selector.kind(),
                "steps": steps,
                "remaining": selector.size(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Text => {
            for step in &steps {
                println!("{}", describe_step(step));
            }
            println!("remaining: {}", selector.size());
        }
    }
    Ok(())
}

/// Call `select` up to `rounds` times, stopping early once the pool is exhausted.
/// Failed calls are recorded and the loop carries on, since they leave the
/// pool unchanged.
pub(crate) fn run_simulation(
    selector: &mut impl SessionSelector<Session>,
    rounds: usize,
) -> Vec<Step> {
    let mut steps = Vec::with_capacity(rounds);
    for round in 1..=rounds {
        match selector.select() {
            Ok(Some(session)) => steps.push(Step::Selected {
                round,
                id: session.id,
                latency_score: session.latency_score,
            }),
            Ok(None) => {
                steps.push(Step::Exhausted { round });
                break;
            }
            Err(e) => steps.push(Step::Error {
                round,
                message: e.to_string(),
            }),
        }
    }
    steps
}

fn describe_step(step: &Step) -> String {
    match step {
        Step::Selected {
            round,
            id,
            latency_score: Some(score),
        } => format!("round {round}: selected {id} (score {score})"),
        Step::Selected {
            round,
            id,
            latency_score: None,
        } => format!("round {round}: selected {id} (unscored)"),
        Step::Exhausted { round } => format!("round {round}: exhausted"),
        Step::Error { round, message } => format!("round {round}: error: {message}"),
    }
}
