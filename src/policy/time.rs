//! Millisecond clocks for the TTL policies.
//!
//! Deadlines are stored as milliseconds since a process-wide epoch that is
//! fixed the first time a [`MonotonicClock`] is read. Tests inject a
//! [`ManualClock`] and move time explicitly.

use std::fmt::Debug;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Instant;

use once_cell::sync::Lazy;

static CLOCK_EPOCH: Lazy<Instant> = Lazy::new(Instant::now);

/// Source of monotonic milliseconds.
pub trait Clock: Send + Sync + Debug {
    fn now_millis(&self) -> i64;
}

/// Wall-independent clock backed by [`Instant`].
#[derive(Debug, Default, Clone, Copy)]
pub struct MonotonicClock;

impl Clock for MonotonicClock {
    #[inline]
    fn now_millis(&self) -> i64 {
        let elapsed = Instant::now().saturating_duration_since(*CLOCK_EPOCH);
        i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX)
    }
}

/// Clock that only moves when told to. Clones share the same time.
#[derive(Debug, Default, Clone)]
pub struct ManualClock {
    now: Arc<AtomicI64>,
}

impl ManualClock {
    pub fn new(start_millis: i64) -> Self {
        Self {
            now: Arc::new(AtomicI64::new(start_millis)),
        }
    }

    pub fn advance(&self, millis: i64) {
        self.now.fetch_add(millis, Ordering::SeqCst);
    }

    pub fn set(&self, millis: i64) {
        self.now.store(millis, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}

/// Deadline `ttl_millis` after `now`, saturating at `i64::MAX`.
#[inline]
pub fn deadline(now: i64, ttl_millis: i64) -> i64 {
    now.saturating_add(ttl_millis)
}

/// An entry is expired once the clock reaches its deadline.
#[inline]
pub fn is_expired(deadline: i64, now: i64) -> bool {
    now >= deadline
}
