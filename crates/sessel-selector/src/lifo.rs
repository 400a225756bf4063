//! LIFO selection: reuse warm sessions before activating new ones.

use sessel_core::SelectError;
use std::collections::VecDeque;
use tracing::debug;

use crate::selector::SessionSelector;

/// Sessions in a single sequence. `add` prepends, `complete` appends and
/// `select` takes from the back, so a session that just finished a round is
/// picked before any unused one, and earlier batches are consumed before
/// later ones.
#[derive(Debug)]
pub struct LifoSelector<S> {
    sessions: VecDeque<S>,
}

impl<S> Default for LifoSelector<S> {
    fn default() -> Self {
        Self {
            sessions: VecDeque::new(),
        }
    }
}

impl<S> LifoSelector<S> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<S> SessionSelector<S> for LifoSelector<S> {
    /// Prepend the batch as a block, keeping its relative order.
    fn add(&mut self, sessions: Vec<S>) {
        for session in sessions.into_iter().rev() {
            self.sessions.push_front(session);
        }
    }

    fn complete(&mut self, session: S) {
        self.sessions.push_back(session);
    }

    /// Empty pool yields `Ok(None)`.
    fn select(&mut self) -> Result<Option<S>, SelectError> {
        let session = self.sessions.pop_back();
        if session.is_none() {
            debug!("LIFO selector is empty");
        }
        Ok(session)
    }

    fn size(&self) -> usize {
        self.sessions.len()
    }

    fn clear(&mut self) {
        self.sessions.clear();
    }
}
