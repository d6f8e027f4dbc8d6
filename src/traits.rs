//! # Cache Capability Traits
//!
//! Generic code written against these traits works with any
//! [`Cache`], whatever its policy, and with test doubles.
//!
//! ## Architecture
//!
//! ```text
//!                ┌─────────────────────────────────────────┐
//!                │          ReadOnlyCache<K, V>            │
//!                │                                         │
//!                │  contains_live(&, &K) → bool            │
//!                │  len(&) → usize                         │
//!                │  is_empty(&) → bool                     │
//!                │  capacity(&) → usize                    │
//!                └──────────────────┬──────────────────────┘
//!                                   │
//!                                   ▼
//!                ┌─────────────────────────────────────────┐
//!                │            CoreCache<K, V>              │
//!                │                                         │
//!                │  insert(&mut, K, V) → Result<Admission> │
//!                │  get(&mut, &K) → Option<&V>             │
//!                │  remove(&mut, &K) → Option<V>           │
//!                │  clear(&mut)                            │
//!                └──────────────────┬──────────────────────┘
//!                                   │
//!                                   ▼
//!                ┌─────────────────────────────────────────┐
//!                │          OrderedCache<K, V>             │
//!                │                                         │
//!                │  peek_top / peek_bottom  (read effect)  │
//!                │  pop_top / pop_bottom                   │
//!                │  view_top / view_bottom  (pure)         │
//!                └─────────────────────────────────────────┘
//! ```
//!
//! ## Trait Summary
//!
//! | Trait             | Extends         | Purpose                                  |
//! |-------------------|-----------------|------------------------------------------|
//! | `ReadOnlyCache`   | -               | Queries that never touch eviction order  |
//! | `CoreCache`       | `ReadOnlyCache` | Insert, read, remove, clear              |
//! | `OrderedCache`    | `CoreCache`     | Access to both ends of the order         |
//! | `ConcurrentCache` | `Send + Sync`   | Marker for thread-safe wrappers          |
//!
//! Which end is "top" depends on the policy; see the table in
//! [`crate::cache`].

use std::hash::Hash;

use crate::cache::{Admission, Cache};
use crate::error::CacheError;

/// Queries that never change eviction order or metadata.
pub trait ReadOnlyCache<K, V> {
    /// Checks membership without counting as an access. Expired entries
    /// read as absent.
    fn contains_live(&self, key: &K) -> bool;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn capacity(&self) -> usize;
}

/// Operations every policy supports.
///
/// # Example
///
/// ```
/// use evictkit::builder::CacheBuilder;
/// use evictkit::policy::CachePolicy;
/// use evictkit::traits::{CoreCache, ReadOnlyCache};
///
/// fn warm_cache<C: CoreCache<u64, String>>(cache: &mut C, data: &[(u64, String)]) {
///     for (key, value) in data {
///         let _ = cache.insert(*key, value.clone());
///     }
/// }
///
/// let mut cache = CacheBuilder::new()
///     .policy(CachePolicy::Fifo)
///     .capacity(100)
///     .build::<u64, String>()
///     .unwrap();
/// warm_cache(&mut cache, &[(1, "one".to_string()), (2, "two".to_string())]);
/// assert_eq!(cache.len(), 2);
/// ```
pub trait CoreCache<K, V>: ReadOnlyCache<K, V> {
    /// Inserts or updates a plain key-value pair.
    ///
    /// # Errors
    ///
    /// [`CacheError::IllegalState`] for policies that need a richer entry
    /// shape (Priority, Expire).
    fn insert(&mut self, key: K, value: V) -> Result<Admission<K, V>, CacheError>;

    /// Reads a value, applying the policy's read effect.
    fn get(&mut self, key: &K) -> Option<&V>;

    fn remove(&mut self, key: &K) -> Option<V>;

    /// Removes several keys, returning results in input order.
    fn remove_batch(&mut self, keys: &[K]) -> Vec<Option<V>> {
        keys.iter().map(|k| self.remove(k)).collect()
    }

    fn clear(&mut self);
}

/// Access to both ends of the eviction order.
pub trait OrderedCache<K, V>: CoreCache<K, V> {
    fn peek_top(&mut self) -> Option<&V>;

    fn peek_bottom(&mut self) -> Option<&V>;

    fn pop_top(&mut self) -> Option<(K, V)>;

    fn pop_bottom(&mut self) -> Option<(K, V)>;

    /// Top entry without side effects.
    fn view_top(&self) -> Option<(&K, &V)>;

    /// Bottom entry without side effects.
    fn view_bottom(&self) -> Option<(&K, &V)>;

    /// Pops up to `count` entries from the bottom.
    fn pop_bottom_batch(&mut self, count: usize) -> Vec<(K, V)> {
        let mut out = Vec::with_capacity(count);
        for _ in 0..count {
            match self.pop_bottom() {
                Some(entry) => out.push(entry),
                None => break,
            }
        }
        out
    }
}

/// Marker trait for caches that are safe to share across threads.
pub trait ConcurrentCache: Send + Sync {}

impl<K, V> ReadOnlyCache<K, V> for Cache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn contains_live(&self, key: &K) -> bool {
        Cache::contains_live(self, key)
    }

    fn len(&self) -> usize {
        Cache::len(self)
    }

    fn capacity(&self) -> usize {
        Cache::capacity(self)
    }
}

impl<K, V> CoreCache<K, V> for Cache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn insert(&mut self, key: K, value: V) -> Result<Admission<K, V>, CacheError> {
        Cache::insert(self, key, value)
    }

    fn get(&mut self, key: &K) -> Option<&V> {
        Cache::get(self, key)
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        Cache::remove(self, key)
    }

    fn clear(&mut self) {
        Cache::clear(self)
    }
}

impl<K, V> OrderedCache<K, V> for Cache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn peek_top(&mut self) -> Option<&V> {
        Cache::peek_top(self)
    }

    fn peek_bottom(&mut self) -> Option<&V> {
        Cache::peek_bottom(self)
    }

    fn pop_top(&mut self) -> Option<(K, V)> {
        Cache::pop_top(self)
    }

    fn pop_bottom(&mut self) -> Option<(K, V)> {
        Cache::pop_bottom(self)
    }

    fn view_top(&self) -> Option<(&K, &V)> {
        Cache::view_top(self)
    }

    fn view_bottom(&self) -> Option<(&K, &V)> {
        Cache::view_bottom(self)
    }
}
