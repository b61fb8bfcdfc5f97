//! Per-client admission control with a fixed cool-down window
//!
//! Each client may be admitted at most once per cooldown window. The
//! record of last admissions is an LRU capped at a fixed capacity, and
//! [`RateGate::sweep`] drops entries whose window has already elapsed.

mod clock;

use std::num::NonZeroUsize;
use std::sync::{Mutex, MutexGuard, PoisonError};

use lru::LruCache;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::client::ClientKey;

pub use clock::{Clock, ManualClock, MonotonicClock};

/// Default minimum interval between admitted requests from one client
pub const DEFAULT_COOLDOWN_MS: u64 = 5_000;

/// Default number of clients tracked before the least recent is evicted
pub const DEFAULT_CAPACITY: usize = 10_000;

/// Outcome of an admission check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Allowed,
    Denied {
        /// Time left until this client's window elapses
        retry_after_ms: u64,
    },
}

impl Admission {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Admission::Allowed)
    }
}

/// Rate gate settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateGateConfig {
    pub cooldown_ms: u64,
    pub capacity: usize,
}

impl Default for RateGateConfig {
    fn default() -> Self {
        Self {
            cooldown_ms: DEFAULT_COOLDOWN_MS,
            capacity: DEFAULT_CAPACITY,
        }
    }
}

/// Fixed-window admission control keyed by [`ClientKey`]
pub struct RateGate {
    cooldown_ms: u64,
    records: Mutex<LruCache<ClientKey, u64>>,
}

impl RateGate {
    pub fn new(config: RateGateConfig) -> Self {
        let capacity = NonZeroUsize::new(config.capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            cooldown_ms: config.cooldown_ms,
            records: Mutex::new(LruCache::new(capacity)),
        }
    }

    pub fn cooldown_ms(&self) -> u64 {
        self.cooldown_ms
    }

    /// Decide whether `key` may proceed at `now_ms`
    ///
    /// The record is only written on the allowed path. The check and the
    /// write happen under one lock, so two racing requests from the same
    /// client cannot both be admitted inside one window.
    pub fn admit(&self, key: &ClientKey, now_ms: u64) -> Admission {
        let mut records = self.lock();

        if let Some(&last) = records.get(key) {
            // A clock that went backwards counts as no time elapsed.
            let elapsed = now_ms.saturating_sub(last);
            if elapsed < self.cooldown_ms {
                let retry_after_ms = self.cooldown_ms - elapsed;
                debug!(client = %key, retry_after_ms, "rate gate denied request");
                return Admission::Denied { retry_after_ms };
            }
        }

        records.put(key.clone(), now_ms);
        Admission::Allowed
    }

    /// Remove clients whose cooldown has elapsed, returning how many went
    pub fn sweep(&self, now_ms: u64) -> usize {
        let mut records = self.lock();

        let expired: Vec<ClientKey> = records
            .iter()
            .filter(|(_, last)| now_ms.saturating_sub(**last) >= self.cooldown_ms)
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            records.pop(key);
        }

        debug!(
            removed = expired.len(),
            remaining = records.len(),
            "rate gate sweep"
        );
        expired.len()
    }

    /// Number of clients currently tracked
    pub fn tracked_clients(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> MutexGuard<'_, LruCache<ClientKey, u64>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for RateGate {
    fn default() -> Self {
        Self::new(RateGateConfig::default())
    }
}
