//! Stake oracle contract and the in-process implementations.

use anyhow::{Context, Result, anyhow};
use sessel_core::StakeAddress;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::sync::{Arc, Mutex, RwLock};
use std::time::{Duration, Instant};
use tracing::warn;

/// Read-only source of worker stake.
///
/// `stakes` receives a deduplicated address list. Addresses missing from the
/// returned map count as zero stake. Lookups may block on remote I/O; no
/// timeout is applied unless the oracle is wrapped in [`DeadlineStakeOracle`].
pub trait StakeOracle: Send + Sync {
    fn stakes(&self, addresses: &[StakeAddress]) -> Result<HashMap<StakeAddress, u64>>;
}

impl<T: StakeOracle + ?Sized> StakeOracle for Arc<T> {
    fn stakes(&self, addresses: &[StakeAddress]) -> Result<HashMap<StakeAddress, u64>> {
        (**self).stakes(addresses)
    }
}

/// In-memory stake table.
///
/// Failure can be switched on to exercise callers' error paths; every call is
/// counted either way.
#[derive(Debug, Default)]
pub struct StaticStakeOracle {
    stakes: RwLock<HashMap<StakeAddress, u64>>,
    should_fail: AtomicBool,
    calls: AtomicUsize,
}

impl StaticStakeOracle {
    pub fn new(stakes: HashMap<StakeAddress, u64>) -> Self {
        Self {
            stakes: RwLock::new(stakes),
            ..Default::default()
        }
    }

    pub fn set_stake(&self, address: StakeAddress, stake: u64) {
        let mut table = self.stakes.write().unwrap_or_else(|e| e.into_inner());
        table.insert(address, stake);
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail.store(should_fail, Ordering::SeqCst);
    }

    /// Number of `stakes` calls made so far, failed ones included.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl FromIterator<(StakeAddress, u64)> for StaticStakeOracle {
    fn from_iter<I: IntoIterator<Item = (StakeAddress, u64)>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl StakeOracle for StaticStakeOracle {
    fn stakes(&self, addresses: &[StakeAddress]) -> Result<HashMap<StakeAddress, u64>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.should_fail.load(Ordering::SeqCst) {
            anyhow::bail!("stake table unavailable");
        }
        let table = self.stakes.read().unwrap_or_else(|e| e.into_inner());
        Ok(addresses
            .iter()
            .filter_map(|addr| table.get(addr).map(|stake| (*addr, *stake)))
            .collect())
    }
}

type Lookup = Result<HashMap<StakeAddress, u64>>;

/// Bounds the latency of another oracle.
///
/// The inner lookup runs on a helper thread. If it has not answered within
/// `timeout` the call fails and the lookup is kept as pending; at most one
/// lookup is in flight at a time. A later call first waits, within its own
/// deadline, for the pending lookup to finish and discards its answer. If it
/// is still running the call fails without starting another one.
pub struct DeadlineStakeOracle {
    inner: Arc<dyn StakeOracle>,
    timeout: Duration,
    pending: Mutex<Option<Receiver<Lookup>>>,
}

impl DeadlineStakeOracle {
    pub fn new(inner: Arc<dyn StakeOracle>, timeout: Duration) -> Self {
        Self {
            inner,
            timeout,
            pending: Mutex::new(None),
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Whether a timed-out lookup is still outstanding.
    pub fn has_pending(&self) -> bool {
        self.pending
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .is_some()
    }
}

impl std::fmt::Debug for DeadlineStakeOracle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeadlineStakeOracle")
            .field("timeout", &self.timeout)
            .field("pending", &self.has_pending())
            .finish()
    }
}

impl StakeOracle for DeadlineStakeOracle {
    fn stakes(&self, addresses: &[StakeAddress]) -> Result<HashMap<StakeAddress, u64>> {
        let deadline = Instant::now() + self.timeout;
        let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());

        if let Some(rx) = pending.as_ref() {
            match rx.recv_timeout(deadline.saturating_duration_since(Instant::now())) {
                Err(RecvTimeoutError::Timeout) => {
                    warn!(
                        timeout_ms = self.timeout.as_millis() as u64,
                        "Previous stake lookup still running"
                    );
                    return Err(anyhow!(
                        "stake lookup still pending after {:?}",
                        self.timeout
                    ));
                }
                // Answer to an earlier query; dropped.
                Ok(_) | Err(RecvTimeoutError::Disconnected) => *pending = None,
            }
        }

        let (tx, rx) = mpsc::sync_channel(1);
        let inner = Arc::clone(&self.inner);
        let addresses = addresses.to_vec();
        std::thread::Builder::new()
            .name("stake-lookup".to_string())
            .spawn(move || {
                // The receiver is gone if the oracle was dropped meanwhile.
                let _ = tx.send(inner.stakes(&addresses));
            })
            .context("Failed to spawn stake lookup thread")?;

        match rx.recv_timeout(deadline.saturating_duration_since(Instant::now())) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => {
                warn!(timeout_ms = self.timeout.as_millis() as u64, "Stake lookup timed out");
                *pending = Some(rx);
                Err(anyhow!("stake lookup timed out after {:?}", self.timeout))
            }
            Err(RecvTimeoutError::Disconnected) => {
                Err(anyhow!("stake lookup thread exited without a result"))
            }
        }
    }
}
