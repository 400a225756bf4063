//! Min-heap of scored sessions keyed by latency score.

use sessel_core::ScoredSession;
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

/// Sessions ordered so that the lowest latency score is on top.
///
/// Ties between equal scores come out in unspecified order. NaN scores rank
/// after every other score, including `+inf`.
#[derive(Debug)]
pub struct SessionHeap<S> {
    inner: BinaryHeap<Reverse<ByScore<S>>>,
}

impl<S: ScoredSession> Default for SessionHeap<S> {
    fn default() -> Self {
        Self {
            inner: BinaryHeap::new(),
        }
    }
}

impl<S: ScoredSession> SessionHeap<S> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, session: S) {
        self.inner.push(Reverse(ByScore(session)));
    }

    /// Session with the lowest score, without removing it.
    pub fn peek(&self) -> Option<&S> {
        self.inner.peek().map(|Reverse(ByScore(s))| s)
    }

    /// Remove and return the session with the lowest score.
    pub fn pop(&mut self) -> Option<S> {
        self.inner.pop().map(|Reverse(ByScore(s))| s)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn clear(&mut self) {
        self.inner.clear();
    }
}

#[derive(Debug)]
struct ByScore<S>(S);

impl<S: ScoredSession> PartialEq for ByScore<S> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<S: ScoredSession> Eq for ByScore<S> {}

impl<S: ScoredSession> PartialOrd for ByScore<S> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<S: ScoredSession> Ord for ByScore<S> {
    fn cmp(&self, other: &Self) -> Ordering {
        compare_scores(self.0.latency_score(), other.0.latency_score())
    }
}

/// Total order on scores with NaN (of either sign) greater than everything.
fn compare_scores(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.total_cmp(&b),
    }
}
