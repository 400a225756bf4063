//! Stand-in for the pool manager: owns one selector and feeds it the
//! scenario's sessions.

use sessel_config::{ScenarioConfig, SelectorConfig};
use sessel_core::Session;
use sessel_selector::{AnySelector, SessionSelector, StakeOracle, StaticStakeOracle};
use std::sync::Arc;
use tracing::debug;

/// Build a selector for `scenario`, with `seed` overriding the configured one,
/// and populate it. Unscored sessions go through `add` in declaration order,
/// scored ones through `complete`.
pub(crate) fn build_pool(scenario: &ScenarioConfig, seed: Option<u64>) -> AnySelector<Session> {
    let config = SelectorConfig {
        seed: seed.or(scenario.selector.seed),
        ..scenario.selector.clone()
    };

    let oracle = StaticStakeOracle::new(scenario.stake_table());
    oracle.set_should_fail(scenario.oracle.fail);
    let oracle: Arc<dyn StakeOracle> = Arc::new(oracle);

    let mut selector = AnySelector::from_config(&config, Some(oracle));
    let unscored = scenario.unscored_sessions();
    let scored = scenario.scored_sessions();
    debug!(
        unscored = unscored.len(),
        scored = scored.len(),
        "Populating selector"
    );
    selector.add(unscored);
    for session in scored {
        selector.complete(session);
    }
    selector
}
