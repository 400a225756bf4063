use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sessel_core::{SelectorKind, Session, StakeAddress};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

use crate::validate::validate_scenario;

/// Default good-enough latency score.
pub const DEFAULT_GOOD_ENOUGH_SCORE: f64 = 1.0;

/// Settings for one selector instance.
///
/// ```toml
/// [selector]
/// kind = "min-ls"            # or "lifo"
/// good_enough_score = 1.0
/// offline = false
/// seed = 42                  # optional, reproducible stake draws
/// oracle_timeout_ms = 2000   # optional, bound stake lookups
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectorConfig {
    #[serde(default)]
    pub kind: SelectorKind,
    /// Known sessions with a score at or below this are preferred over
    /// drawing from the unscored pool.
    #[serde(default = "default_good_enough_score")]
    pub good_enough_score: f64,
    /// Run without a stake oracle; unscored sessions are served in arrival order.
    #[serde(default)]
    pub offline: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oracle_timeout_ms: Option<u64>,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            kind: SelectorKind::default(),
            good_enough_score: default_good_enough_score(),
            offline: false,
            seed: None,
            oracle_timeout_ms: None,
        }
    }
}

impl SelectorConfig {
    pub fn oracle_timeout(&self) -> Option<Duration> {
        self.oracle_timeout_ms.map(Duration::from_millis)
    }
}

fn default_good_enough_score() -> f64 {
    DEFAULT_GOOD_ENOUGH_SCORE
}

/// Behaviour of the in-memory stake oracle used by the harness.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OracleConfig {
    /// Every lookup fails. Used to exercise the non-destructive failure path.
    #[serde(default)]
    pub fail: bool,
}

/// A worker session declared in a scenario file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSpec {
    pub id: String,
    pub address: StakeAddress,
    /// Present for sessions that already completed a round; these are fed to
    /// `complete` instead of `add`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latency_score: Option<f64>,
    #[serde(default)]
    pub stake: u64,
}

impl SessionSpec {
    pub fn to_session(&self) -> Session {
        Session {
            id: self.id.clone(),
            stake_address: self.address,
            latency_score: self.latency_score,
        }
    }
}

/// A selector plus the pool it is driven with.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScenarioConfig {
    #[serde(default)]
    pub selector: SelectorConfig,
    #[serde(default)]
    pub oracle: OracleConfig,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sessions: Vec<SessionSpec>,
}

impl ScenarioConfig {
    /// Read, parse and validate a scenario file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read scenario: {}", path.display()))?;
        let config = Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse scenario: {}", path.display()))?;
        debug!(
            path = %path.display(),
            sessions = config.sessions.len(),
            kind = %config.selector.kind,
            "Loaded scenario"
        );
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        validate_scenario(&config)?;
        Ok(config)
    }

    /// Sessions that have never been scored, in declaration order.
    pub fn unscored_sessions(&self) -> Vec<Session> {
        self.sessions
            .iter()
            .filter(|s| s.latency_score.is_none())
            .map(SessionSpec::to_session)
            .collect()
    }

    /// Sessions carrying a latency score, in declaration order.
    pub fn scored_sessions(&self) -> Vec<Session> {
        self.sessions
            .iter()
            .filter(|s| s.latency_score.is_some())
            .map(SessionSpec::to_session)
            .collect()
    }

    /// Address to stake mapping for every declared session.
    pub fn stake_table(&self) -> HashMap<StakeAddress, u64> {
        self.sessions.iter().map(|s| (s.address, s.stake)).collect()
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
