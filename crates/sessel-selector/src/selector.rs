//! The selection contract shared by every policy, and the closed set of
//! policies a pool manager can be configured with.

use rand::SeedableRng;
use rand::rngs::StdRng;
use sessel_config::SelectorConfig;
use sessel_core::{ScoredSession, SelectError, SelectorKind};
use std::sync::Arc;
use tracing::info;

use crate::lifo::LifoSelector;
use crate::min_ls::MinLsSelector;
use crate::oracle::{DeadlineStakeOracle, StakeOracle};

/// Chooses which session receives the next unit of work.
///
/// The pool manager hands sessions over with `add` (never used) or `complete`
/// (finished a round, carrying its current score) and takes one back with
/// `select`. Selectors never dispatch work or close sessions themselves.
pub trait SessionSelector<S> {
    /// Insert sessions that have not completed a round yet.
    fn add(&mut self, sessions: Vec<S>);

    /// Insert a session that just completed a round. No duplicate check.
    fn complete(&mut self, session: S);

    /// Remove and return the next session.
    ///
    /// `Ok(None)` means nothing is available right now. An error means this
    /// call could not decide; the pool is unchanged and the call can be retried.
    fn select(&mut self) -> Result<Option<S>, SelectError>;

    /// Number of sessions held, scored and unscored.
    fn size(&self) -> usize;

    /// Drop every held session and release external references.
    fn clear(&mut self);
}

impl<S, T: SessionSelector<S> + ?Sized> SessionSelector<S> for Box<T> {
    fn add(&mut self, sessions: Vec<S>) {
        (**self).add(sessions)
    }

    fn complete(&mut self, session: S) {
        (**self).complete(session)
    }

    fn select(&mut self) -> Result<Option<S>, SelectError> {
        (**self).select()
    }

    fn size(&self) -> usize {
        (**self).size()
    }

    fn clear(&mut self) {
        (**self).clear()
    }
}

/// One of the two supported selection policies.
#[derive(Debug)]
pub enum AnySelector<S: ScoredSession> {
    MinLs(MinLsSelector<S>),
    Lifo(LifoSelector<S>),
}

impl<S: ScoredSession> AnySelector<S> {
    /// Build the selector described by `config`.
    ///
    /// The oracle is dropped when the config is offline (or the policy does not
    /// use stake), and wrapped in a [`DeadlineStakeOracle`] when a timeout is set.
    pub fn from_config(
        config: &SelectorConfig,
        stake_oracle: Option<Arc<dyn StakeOracle>>,
    ) -> Self {
        match config.kind {
            SelectorKind::Lifo => Self::Lifo(LifoSelector::new()),
            SelectorKind::MinLs => {
                let oracle = if config.offline { None } else { stake_oracle };
                let oracle = match (oracle, config.oracle_timeout()) {
                    (Some(inner), Some(timeout)) => Some(
                        Arc::new(DeadlineStakeOracle::new(inner, timeout)) as Arc<dyn StakeOracle>,
                    ),
                    (oracle, _) => oracle,
                };
                let rng = match config.seed {
                    Some(seed) => StdRng::seed_from_u64(seed),
                    None => StdRng::from_entropy(),
                };
                info!(
                    threshold = config.good_enough_score,
                    offline = oracle.is_none(),
                    seeded = config.seed.is_some(),
                    "Created min-ls selector"
                );
                Self::MinLs(MinLsSelector::with_rng(oracle, config.good_enough_score, rng))
            }
        }
    }

    pub fn kind(&self) -> SelectorKind {
        match self {
            Self::MinLs(_) => SelectorKind::MinLs,
            Self::Lifo(_) => SelectorKind::Lifo,
        }
    }
}

impl<S: ScoredSession> SessionSelector<S> for AnySelector<S> {
    fn add(&mut self, sessions: Vec<S>) {
        match self {
            Self::MinLs(s) => s.add(sessions),
            Self::Lifo(s) => s.add(sessions),
        }
    }

    fn complete(&mut self, session: S) {
        match self {
            Self::MinLs(s) => s.complete(session),
            Self::Lifo(s) => s.complete(session),
        }
    }

    fn select(&mut self) -> Result<Option<S>, SelectError> {
        match self {
            Self::MinLs(s) => s.select(),
            Self::Lifo(s) => s.select(),
        }
    }

    fn size(&self) -> usize {
        match self {
            Self::MinLs(s) => s.size(),
            Self::Lifo(s) => s.size(),
        }
    }

    fn clear(&mut self) {
        match self {
            Self::MinLs(s) => s.clear(),
            Self::Lifo(s) => s.clear(),
        }
    }
}
