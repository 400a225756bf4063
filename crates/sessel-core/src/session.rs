use serde::{Deserialize, Serialize};

use crate::address::StakeAddress;

/// What a selector needs to read from a session.
///
/// Sessions are owned by the pool manager; selectors only move them between
/// their internal collections and hand them back on `select`.
pub trait ScoredSession {
    /// Latency score from the last completed round. Lower is better.
    fn latency_score(&self) -> f64;

    /// Key used to look up the worker's stake.
    fn stake_address(&self) -> StakeAddress;
}

/// A connection slot to a remote worker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub stake_address: StakeAddress,
    /// `None` until the session has completed a scored round.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latency_score: Option<f64>,
}

impl Session {
    pub fn new(id: impl Into<String>, stake_address: StakeAddress) -> Self {
        Self {
            id: id.into(),
            stake_address,
            latency_score: None,
        }
    }

    pub fn with_score(mut self, score: f64) -> Self {
        self.latency_score = Some(score);
        self
    }
}

impl ScoredSession for Session {
    /// Unscored sessions report `+inf` so they rank last and never pass a
    /// good-enough threshold.
    fn latency_score(&self) -> f64 {
        self.latency_score.unwrap_or(f64::INFINITY)
    }

    fn stake_address(&self) -> StakeAddress {
        self.stake_address
    }
}

impl<T: ScoredSession + ?Sized> ScoredSession for Box<T> {
    fn latency_score(&self) -> f64 {
        (**self).latency_score()
    }

    fn stake_address(&self) -> StakeAddress {
        (**self).stake_address()
    }
}

impl<T: ScoredSession + ?Sized> ScoredSession for std::sync::Arc<T> {
    fn latency_score(&self) -> f64 {
        (**self).latency_score()
    }

    fn stake_address(&self) -> StakeAddress {
        (**self).stake_address()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_unscored_session_reports_infinity() {
        let sess = Session::new("o1", StakeAddress::default());
        assert_eq!(ScoredSession::latency_score(&sess), f64::INFINITY);
    }

    #[test]
    fn test_with_score_sets_latency() {
        let sess = Session::new("o1", StakeAddress::default()).with_score(12.5);
        assert_eq!(ScoredSession::latency_score(&sess), 12.5);
    }

    #[test]
    fn test_shared_session_delegates() {
        let addr = StakeAddress::from_recipient_bytes(&[9]);
        let sess = Arc::new(Session::new("o1", addr).with_score(3.0));
        assert_eq!(sess.stake_address(), addr);
        assert_eq!(ScoredSession::latency_score(&sess), 3.0);
    }
}
