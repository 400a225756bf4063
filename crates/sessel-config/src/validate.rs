use sessel_core::{ConfigError, SelectorKind};
use std::collections::{HashMap, HashSet};
use tracing::warn;

use crate::config::{ScenarioConfig, SelectorConfig};

/// Validate the settings of a single selector instance.
pub fn validate_selector(config: &SelectorConfig) -> Result<(), ConfigError> {
    let threshold = config.good_enough_score;
    if !threshold.is_finite() || threshold < 0.0 {
        return Err(ConfigError::InvalidThreshold(threshold));
    }
    if config.oracle_timeout_ms == Some(0) {
        return Err(ConfigError::ZeroOracleTimeout);
    }
    Ok(())
}

/// Validate a scenario: selector settings plus the declared session pool.
pub fn validate_scenario(config: &ScenarioConfig) -> Result<(), ConfigError> {
    validate_selector(&config.selector)?;

    let mut seen_ids = HashSet::new();
    let mut stakes = HashMap::new();
    for spec in &config.sessions {
        if !seen_ids.insert(spec.id.as_str()) {
            return Err(ConfigError::DuplicateSessionId(spec.id.clone()));
        }
        if let Some(score) = spec.latency_score {
            if !score.is_finite() || score < 0.0 {
                return Err(ConfigError::InvalidLatencyScore {
                    id: spec.id.clone(),
                    score,
                });
            }
        }
        // Sessions of the same worker share one stake entry.
        if let Some(&first) = stakes.get(&spec.address) {
            if first != spec.stake {
                return Err(ConfigError::ConflictingStake {
                    address: spec.address.to_string(),
                    first,
                    second: spec.stake,
                });
            }
        } else {
            stakes.insert(spec.address, spec.stake);
        }
    }

    warn_ignored_settings(config);
    Ok(())
}

fn warn_ignored_settings(config: &ScenarioConfig) {
    let has_stake = config.sessions.iter().any(|s| s.stake > 0);
    let stake_unused = config.selector.offline || config.selector.kind == SelectorKind::Lifo;
    if has_stake && stake_unused {
        warn!(
            kind = %config.selector.kind,
            offline = config.selector.offline,
            "Session stakes are ignored by this selector configuration"
        );
    }
    if config.oracle.fail && stake_unused {
        warn!("oracle.fail has no effect without a stake-weighted selector");
    }
}

#[cfg(test)]
#[path = "validate_tests.rs"]
mod tests;
