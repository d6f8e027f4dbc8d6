//! Thread-safe cache wrapper.
//!
//! The eviction order spans the whole store, so every operation takes one
//! coarse `parking_lot::Mutex` around the [`Cache`]. Even reads need the
//! exclusive lock because `get` may reorder entries or refresh deadlines.
//!
//! ```text
//!   thread A ──┐
//!   thread B ──┼──► Arc<Mutex<Cache<K, V>>> ──► OrderedStore
//!   thread C ──┘
//! ```
//!
//! Values leave the lock by clone ([`SyncCache::get`]) or through a closure
//! ([`SyncCache::get_with`]).
//!
//! ## Example
//!
//! ```
//! use evictkit::builder::CacheBuilder;
//! use evictkit::sync::SyncCache;
//!
//! let cache = SyncCache::new(CacheBuilder::new().capacity(64).build::<u32, String>().unwrap());
//!
//! std::thread::scope(|s| {
//!     for t in 0..4u32 {
//!         let cache = cache.clone();
//!         s.spawn(move || {
//!             cache.insert(t, format!("worker-{t}")).unwrap();
//!         });
//!     }
//! });
//! assert_eq!(cache.len(), 4);
//! ```

use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::cache::{Admission, Cache};
use crate::entry::CacheEntry;
use crate::error::CacheError;
use crate::metrics::CacheMetricsSnapshot;
use crate::traits::ConcurrentCache;

/// Shared handle to a mutex-guarded [`Cache`]. Clones share the same cache.
pub struct SyncCache<K, V> {
    inner: Arc<Mutex<Cache<K, V>>>,
}

impl<K, V> Clone for SyncCache<K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, V> SyncCache<K, V>
where
    K: Eq + Hash + Clone,
{
    pub fn new(cache: Cache<K, V>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(cache)),
        }
    }

    pub fn put(&self, entry: impl Into<CacheEntry<K, V>>) -> Result<Admission<K, V>, CacheError> {
        self.inner.lock().put(entry)
    }

    pub fn insert(&self, key: K, value: V) -> Result<Admission<K, V>, CacheError> {
        self.inner.lock().insert(key, value)
    }

    /// Clones the value out, applying the read effect.
    pub fn get(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        self.inner.lock().get(key).cloned()
    }

    /// Applies `f` to the value while the lock is held.
    pub fn get_with<R>(&self, key: &K, f: impl FnOnce(&V) -> R) -> Option<R> {
        self.inner.lock().get(key).map(f)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.inner.lock().contains(key)
    }

    pub fn remove(&self, key: &K) -> Option<V> {
        self.inner.lock().remove(key)
    }

    pub fn pop_top(&self) -> Option<(K, V)> {
        self.inner.lock().pop_top()
    }

    pub fn pop_bottom(&self) -> Option<(K, V)> {
        self.inner.lock().pop_bottom()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.inner.lock().capacity()
    }

    pub fn clear(&self) {
        self.inner.lock().clear();
    }

    pub fn evict_expired(&self) -> usize {
        self.inner.lock().evict_expired()
    }

    pub fn metrics(&self) -> Result<CacheMetricsSnapshot, CacheError> {
        self.inner.lock().metrics()
    }

    /// Runs `f` with exclusive access, for multi-step operations that must
    /// not interleave with other threads.
    pub fn with<R>(&self, f: impl FnOnce(&mut Cache<K, V>) -> R) -> R {
        f(&mut self.inner.lock())
    }

    /// Unwraps the cache if this is the last handle.
    pub fn try_into_inner(self) -> Result<Cache<K, V>, Self> {
        Arc::try_unwrap(self.inner)
            .map(Mutex::into_inner)
            .map_err(|inner| Self { inner })
    }
}

impl<K, V> fmt::Debug for SyncCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.try_lock() {
            Some(cache) => f.debug_tuple("SyncCache").field(&*cache).finish(),
            None => f.write_str("SyncCache(<locked>)"),
        }
    }
}

impl<K, V> From<Cache<K, V>> for SyncCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn from(cache: Cache<K, V>) -> Self {
        Self::new(cache)
    }
}

impl<K, V> ConcurrentCache for SyncCache<K, V>
where
    K: Send,
    V: Send,
{
}
