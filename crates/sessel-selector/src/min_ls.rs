//! Lowest-latency-score selection with a stake-weighted fallback.
//!
//! Sessions that completed a round live in a min-heap keyed by latency score.
//! Sessions that never completed one live in an arrival-ordered queue. The best
//! known session is used while it is good enough; otherwise an unknown session
//! gets a chance, drawn at random with probability proportional to its
//! worker's stake.

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use sessel_core::{ScoredSession, SelectError, StakeAddress};
use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use tracing::{debug, error, warn};

use crate::heap::SessionHeap;
use crate::oracle::StakeOracle;
use crate::selector::SessionSelector;

pub struct MinLsSelector<S, R = StdRng> {
    unknown: VecDeque<S>,
    known: SessionHeap<S>,
    stake_oracle: Option<Arc<dyn StakeOracle>>,
    good_enough_score: f64,
    rng: R,
}

impl<S: ScoredSession> MinLsSelector<S, StdRng> {
    /// Create a selector seeded from OS entropy.
    ///
    /// Without a stake oracle the selector runs offline and serves unknown
    /// sessions in arrival order.
    pub fn new(stake_oracle: Option<Arc<dyn StakeOracle>>, good_enough_score: f64) -> Self {
        Self::with_rng(stake_oracle, good_enough_score, StdRng::from_entropy())
    }
}

impl<S: ScoredSession, R: RngCore> MinLsSelector<S, R> {
    pub fn with_rng(
        stake_oracle: Option<Arc<dyn StakeOracle>>,
        good_enough_score: f64,
        rng: R,
    ) -> Self {
        Self {
            unknown: VecDeque::new(),
            known: SessionHeap::new(),
            stake_oracle,
            good_enough_score,
            rng,
        }
    }

    pub fn good_enough_score(&self) -> f64 {
        self.good_enough_score
    }

    pub fn is_offline(&self) -> bool {
        self.stake_oracle.is_none()
    }

    pub fn unknown_len(&self) -> usize {
        self.unknown.len()
    }

    pub fn known_len(&self) -> usize {
        self.known.len()
    }

    /// Draw from the unknown sessions.
    ///
    /// Offline this is plain FIFO. With an oracle it is a stake-weighted
    /// lottery; the winner is removed by swapping in the last entry, so arrival
    /// order is no longer preserved after the first weighted draw. Every error
    /// path leaves the queue untouched.
    fn select_unknown(&mut self) -> Result<Option<S>, SelectError> {
        if self.unknown.is_empty() {
            return Ok(None);
        }

        let Some(oracle) = self.stake_oracle.as_ref() else {
            debug!(
                remaining = self.unknown.len() - 1,
                "Selected unknown session in arrival order"
            );
            return Ok(self.unknown.pop_front());
        };

        let addrs: Vec<StakeAddress> = self
            .unknown
            .iter()
            .map(ScoredSession::stake_address)
            .collect();
        let mut seen = HashSet::with_capacity(addrs.len());
        let query: Vec<StakeAddress> = addrs
            .iter()
            .copied()
            .filter(|a| seen.insert(*a))
            .collect();

        let stakes = oracle.stakes(&query).map_err(|err| {
            let message = format!("{err:#}");
            error!(error = %message, "Failed to read stake weights for selection");
            SelectError::StakeLookup(message)
        })?;

        let total: u128 = stakes.values().map(|s| u128::from(*s)).sum();
        let draw = if total > 0 {
            self.rng.gen_range(0..total)
        } else {
            0
        };

        // Walk the queue consuming stake from the draw; the first session
        // whose stake covers what is left of it wins.
        let mut remaining = draw;
        for (i, addr) in addrs.iter().enumerate() {
            let stake = u128::from(stakes.get(addr).copied().unwrap_or(0));
            if stake >= remaining {
                debug!(
                    address = %addr,
                    stake = %stake,
                    total = %total,
                    draw = %draw,
                    "Selected unknown session by stake weight"
                );
                return Ok(self.unknown.swap_remove_back(i));
            }
            remaining -= stake;
        }

        // Only reachable if the oracle reported stake for addresses outside
        // the query, inflating the total.
        warn!(
            draw = %draw,
            total = %total,
            candidates = addrs.len(),
            "Stake-weighted draw matched no session"
        );
        Err(SelectError::DrawExhausted { draw, total })
    }
}

impl<S: ScoredSession, R: RngCore> SessionSelector<S> for MinLsSelector<S, R> {
    fn add(&mut self, sessions: Vec<S>) {
        self.unknown.extend(sessions);
    }

    fn complete(&mut self, session: S) {
        self.known.push(session);
    }

    /// Return the lowest-scored known session if it is good enough or nothing
    /// else is available; otherwise draw from the unknown sessions.
    fn select(&mut self) -> Result<Option<S>, SelectError> {
        let Some(best) = self.known.peek() else {
            return self.select_unknown();
        };

        let score = best.latency_score();
        let good_enough = score <= self.good_enough_score;
        if !good_enough && !self.unknown.is_empty() {
            debug!(
                score,
                threshold = self.good_enough_score,
                unknown = self.unknown.len(),
                "Best known session not good enough, trying unknown sessions"
            );
            return self.select_unknown();
        }

        debug!(score, known = self.known.len() - 1, "Selected known session");
        Ok(self.known.pop())
    }

    fn size(&self) -> usize {
        self.unknown.len() + self.known.len()
    }

    fn clear(&mut self) {
        self.unknown.clear();
        self.known.clear();
        self.stake_oracle = None;
    }
}

impl<S: ScoredSession, R> std::fmt::Debug for MinLsSelector<S, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MinLsSelector")
            .field("unknown", &self.unknown.len())
            .field("known", &self.known.len())
            .field("offline", &self.stake_oracle.is_none())
            .field("good_enough_score", &self.good_enough_score)
            .finish()
    }
}

#[cfg(test)]
#[path = "min_ls_tests.rs"]
mod tests;
