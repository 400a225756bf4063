//! Session selection: latency-ranked selection with a stake-weighted random
//! fallback for unscored sessions, and a LIFO variant that favours warm sessions.
//!
//! Selectors are not internally synchronized. Every operation takes `&mut self`,
//! so the pool manager that owns an instance serializes access by construction.

pub mod heap;
pub mod lifo;
pub mod min_ls;
pub mod oracle;
pub mod selector;

pub use heap::SessionHeap;
pub use lifo::LifoSelector;
pub use min_ls::MinLsSelector;
pub use oracle::{DeadlineStakeOracle, StakeOracle, StaticStakeOracle};
pub use selector::{AnySelector, SessionSelector};
