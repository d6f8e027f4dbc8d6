//! Policy-driven bounded cache.
//!
//! [`Cache`] binds one [`OrderedStore`] to one [`Strategy`] row and exposes
//! the contract every policy shares: lookups, puts, removal, access to the
//! two order extremes, snapshots and metrics.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                             Cache<K, V>                                 │
//! │                                                                         │
//! │   policy ──► Strategy { layout, read, write, overflow, accepts }        │
//! │                                                                         │
//! │   ┌──────────────────────┐   ┌───────────────┐   ┌──────────────────┐   │
//! │   │ OrderedStore<K, V>   │   │ Arc<dyn Clock>│   │ Recorder         │   │
//! │   │ index + order        │   │ (TTL only)    │   │ (metrics on/off) │   │
//! │   └──────────────────────┘   └───────────────┘   └──────────────────┘   │
//! │                                                                         │
//! │   VictimPicker (Random only)                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Put Flow
//!
//! ```text
//!   put(entry)
//!     1. shape check           → IllegalState on mismatch
//!     2. field check           → InvalidEntry (negative per-entry TTL)
//!     3. key present & live?   → replace value, apply write effect → Updated
//!     4. key present, expired  → evict it, continue as new key
//!     5. full?                 → TTL: sweep expired entries first
//!                              → overflow rule picks a victim or rejects
//!     6. push with initial metadata                        → Inserted / Evicted
//! ```
//!
//! ## Top and Bottom
//!
//! | Policy          | Top                     | Bottom                   |
//! |-----------------|-------------------------|--------------------------|
//! | LRU / MRU       | most recently touched   | least recently touched   |
//! | FIFO / LIFO     | newest arrival          | oldest arrival           |
//! | LFU / MFU       | highest count           | lowest count             |
//! | Priority        | highest rank            | lowest rank              |
//! | Time / Expire   | latest deadline         | earliest deadline        |
//! | Random          | most recently placed    | earliest placed          |
//!
//! Ties between equal counts, ranks or deadlines go to the entry whose
//! metadata changed most recently (it sits nearer the top).
//!
//! ## Reads
//!
//! `get`, `peek_*` and `element_*` are reads: they apply the policy's read
//! effect (recency bump, count or rank increment, sliding deadline). Use
//! [`Cache::contains_live`], [`Cache::view_top`] or [`Cache::view_bottom`]
//! to look without touching.
//!
//! ## Expiry
//!
//! Timed policies discover expiry lazily. An expired entry still counts
//! toward [`Cache::len`] until a read, a membership test, a put, a
//! top/bottom operation or [`Cache::evict_expired`] meets it.
//!
//! ## Example Usage
//!
//! ```
//! use evictkit::builder::CacheBuilder;
//! use evictkit::policy::CachePolicy;
//!
//! let mut cache = CacheBuilder::new()
//!     .policy(CachePolicy::Lru)
//!     .capacity(2)
//!     .build::<&str, i32>()
//!     .unwrap();
//!
//! cache.insert("a", 1).unwrap();
//! cache.insert("b", 2).unwrap();
//! cache.get(&"a");
//! cache.insert("c", 3).unwrap();
//!
//! assert!(!cache.contains(&"b"));
//! assert_eq!(cache.keys(), vec!["c", "a"]);
//! ```

use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use tracing::trace;

use crate::builder::{CacheBuilder, CacheConfig};
use crate::ds::SlotId;
use crate::entry::{CacheEntry, EntryMeta};
use crate::error::{CacheError, InvariantError};
use crate::metrics::{CacheMetricsSnapshot, CoreMetricsRecorder, MetricType, MetricsReset, Recorder};
use crate::policy::random::VictimPicker;
use crate::policy::strategy::{Overflow, ReadEffect, Strategy, WriteEffect, bump};
use crate::policy::time::{self, Clock};
use crate::policy::{CachePolicy, ExpireMode};
use crate::store::{OrderedStore, StoredEntry};

/// Outcome of a [`Cache::put`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission<K, V> {
    /// New key admitted without displacing anyone.
    Inserted,
    /// Existing key updated; carries the previous value.
    Updated(V),
    /// New key admitted; carries the entry evicted to make room.
    Evicted { key: K, value: V },
    /// New key refused by the overflow rule; carries the refused entry.
    Rejected { key: K, value: V },
}

impl<K, V> Admission<K, V> {
    /// `true` unless the entry was rejected.
    pub fn is_admitted(&self) -> bool {
        !matches!(self, Admission::Rejected { .. })
    }

    /// The entry displaced by this put, if any.
    pub fn evicted(&self) -> Option<(&K, &V)> {
        match self {
            Admission::Evicted { key, value } => Some((key, value)),
            _ => None,
        }
    }
}

/// Bounded key-value cache with a pluggable eviction policy.
pub struct Cache<K, V> {
    policy: CachePolicy,
    strategy: Strategy,
    capacity: usize,
    store: OrderedStore<K, V>,
    expire_after_millis: i64,
    expire_mode: ExpireMode,
    clock: Arc<dyn Clock>,
    picker: Option<VictimPicker>,
    recorder: Recorder,
}

impl<K, V> Cache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates a cache with `policy`, `capacity` and every other option at
    /// its default.
    ///
    /// # Errors
    ///
    /// [`CacheError::IllegalState`] if `capacity` is zero.
    pub fn new(policy: CachePolicy, capacity: usize) -> Result<Self, CacheError> {
        CacheBuilder::new().policy(policy).capacity(capacity).build()
    }

    /// Assembles a cache from a configuration the builder already validated.
    pub(crate) fn from_config(config: &CacheConfig, clock: Arc<dyn Clock>) -> Self {
        let strategy = Strategy::for_policy(config.policy, config.expire_mode);
        let picker = matches!(strategy.overflow, Overflow::EvictRandom)
            .then(|| VictimPicker::new(config.seed));
        Self {
            policy: config.policy,
            strategy,
            capacity: config.capacity,
            store: OrderedStore::new(strategy.layout, config.capacity),
            expire_after_millis: config.expire_after_millis,
            expire_mode: config.expire_mode,
            clock,
            picker,
            recorder: Recorder::new(config.metrics_enabled),
        }
    }

    // -- reporters ---------------------------------------------------------

    /// The eviction policy this cache was built with.
    #[inline]
    pub fn policy(&self) -> CachePolicy {
        self.policy
    }

    /// Number of stored entries, including expired ones not yet discovered.
    #[inline]
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// `true` when [`len`](Self::len) is zero.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Maximum number of entries; fixed for the cache's lifetime.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Deadline refresh rule for the timed policies.
    pub fn expire_mode(&self) -> ExpireMode {
        self.expire_mode
    }

    /// Cache-wide time-to-live in milliseconds (used by the Time policy).
    pub fn expire_after_millis(&self) -> i64 {
        self.expire_after_millis
    }

    /// Membership test. Does not touch ordering or metadata, but an expired
    /// key is evicted on discovery and reported absent.
    pub fn contains(&mut self, key: &K) -> bool {
        let Some(id) = self.store.slot_of(key) else {
            return false;
        };
        if self.slot_expired(id, self.now()) {
            self.evict_slot(id, "expired");
            self.debug_validate();
            return false;
        }
        true
    }

    /// Membership test without any side effect. An expired key is reported
    /// absent but stays in the store until a mutating call meets it.
    pub fn contains_live(&self, key: &K) -> bool {
        match self.store.entry_by_key(key) {
            Some(entry) => !self.is_expired(entry, self.now()),
            None => false,
        }
    }

    // -- reads -------------------------------------------------------------

    /// Returns the value for `key` and applies the policy's read effect.
    ///
    /// Timed policies evict the entry instead if it has expired.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        let id = self.read_key(key)?;
        self.store.entry(id).map(StoredEntry::value)
    }

    /// [`get`](Self::get), falling back to `default`.
    pub fn get_or<'a>(&'a mut self, key: &K, default: &'a V) -> &'a V {
        self.get(key).unwrap_or(default)
    }

    /// Reads the top entry (see the module table).
    pub fn peek_top(&mut self) -> Option<&V> {
        self.sweep_if_timed();
        let id = self.store.top_id();
        self.read_extreme(id)
    }

    /// Reads the bottom entry (see the module table).
    pub fn peek_bottom(&mut self) -> Option<&V> {
        self.sweep_if_timed();
        let id = self.store.bottom_id();
        self.read_extreme(id)
    }

    /// [`peek_top`](Self::peek_top), failing on an empty cache.
    ///
    /// # Errors
    ///
    /// [`CacheError::Underflow`] if the cache holds no live entry.
    pub fn element_top(&mut self) -> Result<&V, CacheError> {
        self.peek_top()
            .ok_or(CacheError::Underflow("cannot read the top of an empty cache"))
    }

    /// [`peek_bottom`](Self::peek_bottom), failing on an empty cache.
    ///
    /// # Errors
    ///
    /// [`CacheError::Underflow`] if the cache holds no live entry.
    pub fn element_bottom(&mut self) -> Result<&V, CacheError> {
        self.peek_bottom()
            .ok_or(CacheError::Underflow("cannot read the bottom of an empty cache"))
    }

    /// Top entry without any side effect.
    pub fn view_top(&self) -> Option<(&K, &V)> {
        let now = self.now();
        self.store
            .iter()
            .find(|entry| !self.is_expired(entry, now))
            .map(|entry| (&entry.key, &entry.value))
    }

    /// Bottom entry without any side effect.
    pub fn view_bottom(&self) -> Option<(&K, &V)> {
        if !self.policy.is_timed() {
            return self
                .store
                .bottom_id()
                .and_then(|id| self.store.entry(id))
                .map(|entry| (&entry.key, &entry.value));
        }
        let now = self.now();
        self.store
            .iter()
            .filter(|entry| !self.is_expired(entry, now))
            .last()
            .map(|entry| (&entry.key, &entry.value))
    }

    // -- writes ------------------------------------------------------------

    /// Inserts or updates an entry.
    ///
    /// # Errors
    ///
    /// - [`CacheError::IllegalState`] if the entry's shape is not the one
    ///   this policy accepts.
    /// - [`CacheError::InvalidEntry`] if an `Expire` entry carries a negative
    ///   TTL.
    ///
    /// The cache is untouched when an error is returned.
    pub fn put(&mut self, entry: impl Into<CacheEntry<K, V>>) -> Result<Admission<K, V>, CacheError> {
        let entry = entry.into();
        let kind = entry.kind();
        if kind != self.strategy.accepts {
            return Err(CacheError::illegal_state(format!(
                "{} policy accepts {} entries, got {}",
                self.policy, self.strategy.accepts, kind
            )));
        }

        let (key, value, rank, entry_ttl) = match entry {
            CacheEntry::Basic { key, value } => (key, value, None, None),
            CacheEntry::Priority {
                key,
                value,
                priority,
            } => (key, value, Some(priority), None),
            CacheEntry::Expire {
                key,
                value,
                ttl,
                unit,
            } => {
                if ttl < 0 {
                    return Err(CacheError::invalid_entry(format!(
                        "ttl cannot be negative, got {ttl}"
                    )));
                }
                (key, value, None, Some(unit.to_millis(ttl)))
            },
        };

        let now = self.now();
        let outcome = match self.store.slot_of(&key) {
            Some(id) if self.slot_expired(id, now) => {
                self.evict_slot(id, "expired");
                self.admit(key, value, rank, entry_ttl, now)
            },
            Some(id) => self.update(id, value, rank, entry_ttl, now),
            None => self.admit(key, value, rank, entry_ttl, now),
        };

        self.recorder.record_put();
        self.debug_validate();
        Ok(outcome)
    }

    /// Shorthand for `put(CacheEntry::basic(key, value))`.
    ///
    /// # Errors
    ///
    /// [`CacheError::IllegalState`] for the Priority and Expire policies,
    /// which need the extra entry fields.
    pub fn insert(&mut self, key: K, value: V) -> Result<Admission<K, V>, CacheError> {
        self.put(CacheEntry::basic(key, value))
    }

    /// Removes `key`. Absent keys are a no-op.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let Some(id) = self.store.slot_of(key) else {
            self.recorder.record_miss();
            return None;
        };
        if self.slot_expired(id, self.now()) {
            self.evict_slot(id, "expired");
            return None;
        }
        let entry = self.store.remove_slot(id)?;
        self.recorder.record_remove();
        self.debug_validate();
        Some(entry.value)
    }

    /// Removes and returns the top entry.
    pub fn pop_top(&mut self) -> Option<(K, V)> {
        self.sweep_if_timed();
        let id = self.store.top_id();
        self.take_extreme(id)
    }

    /// Removes and returns the bottom entry.
    pub fn pop_bottom(&mut self) -> Option<(K, V)> {
        self.sweep_if_timed();
        let id = self.store.bottom_id();
        self.take_extreme(id)
    }

    /// [`pop_top`](Self::pop_top), failing on an empty cache.
    ///
    /// # Errors
    ///
    /// [`CacheError::Underflow`] if the cache holds no live entry.
    pub fn poll_top(&mut self) -> Result<(K, V), CacheError> {
        self.pop_top()
            .ok_or(CacheError::Underflow("cannot poll the top of an empty cache"))
    }

    /// [`pop_bottom`](Self::pop_bottom), failing on an empty cache.
    ///
    /// # Errors
    ///
    /// [`CacheError::Underflow`] if the cache holds no live entry.
    pub fn poll_bottom(&mut self) -> Result<(K, V), CacheError> {
        self.pop_bottom()
            .ok_or(CacheError::Underflow("cannot poll the bottom of an empty cache"))
    }

    /// Drops every entry. Capacity is unchanged.
    pub fn clear(&mut self) {
        let dropped = self.store.len();
        self.store.clear();
        self.recorder.record_clear();
        trace!(policy = %self.policy, dropped, "cache cleared");
    }

    /// Evicts every expired entry and returns how many left. Always zero
    /// for untimed policies.
    pub fn evict_expired(&mut self) -> usize {
        if !self.policy.is_timed() {
            return 0;
        }
        let now = self.now();
        let expired = self.store.ids_scored_at_or_below(i128::from(now));
        let count = expired.len();
        for id in expired {
            self.evict_slot(id, "expired");
        }
        if count > 0 {
            self.debug_validate();
        }
        count
    }

    // -- snapshots ---------------------------------------------------------

    /// `(key, value)` pairs from top to bottom.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> + '_ {
        self.store.iter().map(|entry| (&entry.key, &entry.value))
    }

    /// Keys from top to bottom. The returned vector is a copy.
    pub fn keys(&self) -> Vec<K> {
        self.store.iter().map(|entry| entry.key.clone()).collect()
    }

    /// Values from top to bottom. The returned vector is a copy.
    pub fn values(&self) -> Vec<V>
    where
        V: Clone,
    {
        self.store.iter().map(|entry| entry.value.clone()).collect()
    }

    /// Policy metadata from top to bottom: counts for LFU/MFU, ranks for
    /// Priority, deadlines for Time/Expire, [`EntryMeta::None`] otherwise.
    pub fn metadata(&self) -> Vec<EntryMeta> {
        self.store.iter().map(StoredEntry::meta).collect()
    }

    /// Policy metadata of `key`, without touching it.
    pub fn meta_of(&self, key: &K) -> Option<EntryMeta> {
        self.store.entry_by_key(key).map(StoredEntry::meta)
    }

    // -- metrics -----------------------------------------------------------

    /// Current counters plus size and capacity.
    ///
    /// # Errors
    ///
    /// [`CacheError::IllegalState`] if metrics were not enabled at build time.
    pub fn metrics(&self) -> Result<CacheMetricsSnapshot, CacheError> {
        self.recorder
            .counters()
            .map(|counters| counters.snapshot(self.len(), self.capacity))
            .ok_or_else(|| CacheError::illegal_state("metrics are disabled for this cache"))
    }

    /// A single metric by identifier.
    ///
    /// # Errors
    ///
    /// [`CacheError::IllegalState`] if metrics were not enabled at build time.
    pub fn metric(&self, metric: MetricType) -> Result<u64, CacheError> {
        self.metrics().map(|snapshot| snapshot.get(metric))
    }

    /// Zeroes every counter.
    ///
    /// # Errors
    ///
    /// [`CacheError::IllegalState`] if metrics were not enabled at build time.
    pub fn reset_metrics(&mut self) -> Result<(), CacheError> {
        if !self.recorder.is_enabled() {
            return Err(CacheError::illegal_state("metrics are disabled for this cache"));
        }
        self.recorder.reset_metrics();
        Ok(())
    }

    // -- invariants --------------------------------------------------------

    /// Validates the store structure, the size bound and the metadata kind
    /// of every entry.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        self.store.validate()?;
        if self.store.len() > self.capacity {
            return Err(InvariantError::new(format!(
                "size {} exceeds capacity {}",
                self.store.len(),
                self.capacity
            )));
        }
        for entry in self.store.iter() {
            let fits = match self.policy {
                CachePolicy::Lfu | CachePolicy::Mfu => {
                    matches!(entry.meta, EntryMeta::Frequency(n) if n >= 1)
                },
                CachePolicy::Priority => matches!(entry.meta, EntryMeta::Priority(_)),
                CachePolicy::Time | CachePolicy::Expire => {
                    matches!(entry.meta, EntryMeta::Timestamp(_))
                },
                _ => entry.meta == EntryMeta::None,
            };
            if !fits {
                return Err(InvariantError::new(format!(
                    "{} entry carries {:?} metadata",
                    self.policy, entry.meta
                )));
            }
        }
        Ok(())
    }

    #[inline]
    fn debug_validate(&self) {
        if cfg!(debug_assertions) {
            if let Err(err) = self.check_invariants() {
                panic!("cache invariant violated: {err}");
            }
        }
    }

    // -- internals ---------------------------------------------------------

    fn now(&self) -> i64 {
        if self.policy.is_timed() {
            self.clock.now_millis()
        } else {
            0
        }
    }

    fn is_expired(&self, entry: &StoredEntry<K, V>, now: i64) -> bool {
        match entry.meta {
            EntryMeta::Timestamp(deadline) if self.policy.is_timed() => {
                time::is_expired(deadline, now)
            },
            _ => false,
        }
    }

    fn slot_expired(&self, id: SlotId, now: i64) -> bool {
        self.store
            .entry(id)
            .is_some_and(|entry| self.is_expired(entry, now))
    }

    fn ttl_of(&self, id: SlotId) -> i64 {
        self.store
            .entry(id)
            .and_then(StoredEntry::ttl_millis)
            .unwrap_or(self.expire_after_millis)
    }

    fn sweep_if_timed(&mut self) {
        if self.policy.is_timed() {
            self.evict_expired();
        }
    }

    fn evict_slot(&mut self, id: SlotId, reason: &'static str) -> Option<(K, V)> {
        let entry = self.store.remove_slot(id)?;
        self.recorder.record_eviction();
        trace!(policy = %self.policy, reason, "evicted entry");
        Some(entry.into_pair())
    }

    /// Looks up a key as a read: misses, expiry and the read effect included.
    fn read_key(&mut self, key: &K) -> Option<SlotId> {
        let Some(id) = self.store.slot_of(key) else {
            self.recorder.record_miss();
            return None;
        };
        let now = self.now();
        if self.slot_expired(id, now) {
            self.evict_slot(id, "expired");
            self.recorder.record_miss();
            self.debug_validate();
            return None;
        }
        self.apply_read(id, now);
        self.recorder.record_hit();
        Some(id)
    }

    fn read_extreme(&mut self, id: Option<SlotId>) -> Option<&V> {
        let Some(id) = id else {
            self.recorder.record_miss();
            return None;
        };
        let now = self.now();
        self.apply_read(id, now);
        self.recorder.record_hit();
        self.store.entry(id).map(StoredEntry::value)
    }

    fn take_extreme(&mut self, id: Option<SlotId>) -> Option<(K, V)> {
        let Some(entry) = id.and_then(|id| self.store.remove_slot(id)) else {
            self.recorder.record_miss();
            return None;
        };
        self.recorder.record_remove();
        self.debug_validate();
        Some(entry.into_pair())
    }

    fn apply_read(&mut self, id: SlotId, now: i64) {
        match self.strategy.read {
            ReadEffect::None => {},
            ReadEffect::PromoteToTop => {
                self.store.promote(id);
            },
            ReadEffect::BumpScore => {
                if let Some(meta) = self.store.entry(id).map(StoredEntry::meta) {
                    self.store.set_meta(id, bump(meta));
                }
            },
            ReadEffect::RefreshDeadline => {
                let ttl = self.ttl_of(id);
                self.store
                    .set_meta(id, EntryMeta::Timestamp(time::deadline(now, ttl)));
            },
        }
        if self.strategy.read != ReadEffect::None {
            self.debug_validate();
        }
    }

    fn update(
        &mut self,
        id: SlotId,
        value: V,
        rank: Option<i64>,
        entry_ttl: Option<i64>,
        now: i64,
    ) -> Admission<K, V> {
        if let Some(ttl) = entry_ttl {
            self.store.set_ttl(id, ttl);
        }
        let Some(old) = self.store.replace_value(id, value) else {
            return Admission::Inserted;
        };
        match self.strategy.write {
            WriteEffect::None => {},
            WriteEffect::PromoteToTop => {
                self.store.promote(id);
            },
            WriteEffect::BumpScore => {
                if let Some(meta) = self.store.entry(id).map(StoredEntry::meta) {
                    self.store.set_meta(id, bump(meta));
                }
            },
            WriteEffect::ReplaceScore => {
                if let Some(rank) = rank {
                    self.store.set_meta(id, EntryMeta::Priority(rank));
                }
            },
            WriteEffect::RefreshDeadline => {
                let ttl = self.ttl_of(id);
                self.store
                    .set_meta(id, EntryMeta::Timestamp(time::deadline(now, ttl)));
            },
        }
        Admission::Updated(old)
    }

    fn admit(
        &mut self,
        key: K,
        value: V,
        rank: Option<i64>,
        entry_ttl: Option<i64>,
        now: i64,
    ) -> Admission<K, V> {
        if self.store.len() >= self.capacity && self.policy.is_timed() {
            self.evict_expired();
        }

        let mut evicted = None;
        if self.store.len() >= self.capacity {
            let victim = match self.strategy.overflow {
                Overflow::EvictBottom => self.store.bottom_id(),
                Overflow::EvictTop => self.store.top_id(),
                Overflow::EvictRandom => {
                    let len = self.store.len();
                    self.picker
                        .as_mut()
                        .and_then(|picker| picker.pick(len))
                        .and_then(|pos| self.store.id_at(pos))
                },
                Overflow::RejectUnlessOutranks => {
                    let bottom = self.store.bottom_id();
                    let floor = bottom
                        .and_then(|id| self.store.entry(id))
                        .map(|entry| entry.meta.score());
                    let incoming = i128::from(rank.unwrap_or(i64::MIN));
                    if floor.is_some_and(|floor| incoming <= floor) {
                        trace!(policy = %self.policy, "rejected low-priority entry");
                        return Admission::Rejected { key, value };
                    }
                    bottom
                },
            };
            evicted = victim.and_then(|id| self.evict_slot(id, "capacity"));
        }

        let meta = match self.policy {
            CachePolicy::Lfu | CachePolicy::Mfu => EntryMeta::Frequency(1),
            CachePolicy::Priority => EntryMeta::Priority(rank.unwrap_or(0)),
            CachePolicy::Time => {
                EntryMeta::Timestamp(time::deadline(now, self.expire_after_millis))
            },
            CachePolicy::Expire => EntryMeta::Timestamp(time::deadline(
                now,
                entry_ttl.unwrap_or(self.expire_after_millis),
            )),
            CachePolicy::Lru
            | CachePolicy::Mru
            | CachePolicy::Fifo
            | CachePolicy::Lifo
            | CachePolicy::Random => EntryMeta::None,
        };
        let id = self.store.push(key, value, meta);
        if let Some(ttl) = entry_ttl {
            self.store.set_ttl(id, ttl);
        }

        match evicted {
            Some((key, value)) => Admission::Evicted { key, value },
            None => Admission::Inserted,
        }
    }
}

impl<K, V> PartialEq for Cache<K, V>
where
    K: Eq + Hash + Clone,
    V: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.policy == other.policy
            && self.capacity == other.capacity
            && self.len() == other.len()
            && self.store.iter().zip(other.store.iter()).all(|(a, b)| {
                a.key == b.key && a.value == b.value && a.meta == b.meta
            })
    }
}

impl<K, V> fmt::Display for Cache<K, V>
where
    K: Eq + Hash + Clone + fmt::Display,
    V: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, entry) in self.store.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", entry.key, entry.value)?;
            if self.strategy.shows_meta() {
                write!(f, " ({})", entry.meta)?;
            }
        }
        f.write_str("]")
    }
}

impl<K, V> fmt::Debug for Cache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cache")
            .field("policy", &self.policy)
            .field("len", &self.len())
            .field("capacity", &self.capacity)
            .field("expire_mode", &self.expire_mode)
            .field("metrics", &self.recorder.is_enabled())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::TimeUnit;
    use crate::policy::time::ManualClock;

    fn cache(policy: CachePolicy, capacity: usize) -> Cache<&'static str, i32> {
        CacheBuilder::new()
            .policy(policy)
            .capacity(capacity)
            .seed(7)
            .build()
            .unwrap()
    }

    fn timed(
        policy: CachePolicy,
        capacity: usize,
        ttl_millis: i64,
        mode: ExpireMode,
    ) -> (Cache<&'static str, i32>, ManualClock) {
        let clock = ManualClock::new(1_000);
        let cache = CacheBuilder::new()
            .policy(policy)
            .capacity(capacity)
            .expire_after(ttl_millis, TimeUnit::Milliseconds)
            .expire_mode(mode)
            .clock(Arc::new(clock.clone()))
            .build()
            .unwrap();
        (cache, clock)
    }

    fn fill(cache: &mut Cache<&'static str, i32>, keys: &[&'static str]) {
        for (i, key) in keys.iter().enumerate() {
            cache.insert(*key, i as i32 + 1).unwrap();
        }
    }

    // ==============================================
    // Common contract
    // ==============================================

    mod basic_operations {
        use super::*;

        #[test]
        fn new_cache_is_empty() {
            let cache = cache(CachePolicy::Lru, 3);
            assert!(cache.is_empty());
            assert_eq!(cache.len(), 0);
            assert_eq!(cache.capacity(), 3);
            assert_eq!(cache.policy(), CachePolicy::Lru);
        }

        #[test]
        fn insert_and_get() {
            let mut cache = cache(CachePolicy::Fifo, 3);
            assert_eq!(cache.insert("a", 1), Ok(Admission::Inserted));
            assert_eq!(cache.get(&"a"), Some(&1));
            assert_eq!(cache.get(&"missing"), None);
        }

        #[test]
        fn update_returns_previous_value_without_growing() {
            let mut cache = cache(CachePolicy::Lru, 3);
            cache.insert("a", 1).unwrap();
            assert_eq!(cache.insert("a", 10), Ok(Admission::Updated(1)));
            assert_eq!(cache.len(), 1);
            assert_eq!(cache.get(&"a"), Some(&10));
        }

        #[test]
        fn get_or_falls_back() {
            let mut cache = cache(CachePolicy::Lru, 2);
            cache.insert("a", 1).unwrap();
            assert_eq!(*cache.get_or(&"a", &0), 1);
            assert_eq!(*cache.get_or(&"b", &0), 0);
        }

        #[test]
        fn remove_present_and_absent() {
            let mut cache = cache(CachePolicy::Lru, 2);
            cache.insert("a", 1).unwrap();
            assert_eq!(cache.remove(&"a"), Some(1));
            assert_eq!(cache.remove(&"a"), None);
            assert!(cache.is_empty());
        }

        #[test]
        fn contains_does_not_reorder() {
            let mut cache = cache(CachePolicy::Lru, 3);
            fill(&mut cache, &["a", "b", "c"]);
            assert!(cache.contains(&"a"));
            assert_eq!(cache.keys(), vec!["c", "b", "a"]);
        }

        #[test]
        fn clear_keeps_capacity() {
            let mut cache = cache(CachePolicy::Lfu, 3);
            fill(&mut cache, &["a", "b", "c"]);
            cache.clear();
            assert_eq!(cache.len(), 0);
            assert_eq!(cache.capacity(), 3);
            assert!(!cache.contains(&"a"));
            assert_eq!(cache.peek_top(), None);
        }

        #[test]
        fn keys_and_values_are_copies() {
            let mut cache = cache(CachePolicy::Fifo, 3);
            fill(&mut cache, &["a", "b"]);
            let mut keys = cache.keys();
            keys.push("z");
            assert_eq!(cache.keys(), vec!["b", "a"]);
            assert_eq!(cache.values(), vec![2, 1]);
        }

        #[test]
        fn tuple_put_is_basic() {
            let mut cache = cache(CachePolicy::Lru, 2);
            assert_eq!(cache.put(("a", 1)), Ok(Admission::Inserted));
            assert_eq!(cache.get(&"a"), Some(&1));
        }
    }

    mod top_and_bottom {
        use super::*;

        #[test]
        fn empty_cache_underflows() {
            let mut cache = cache(CachePolicy::Lru, 2);
            assert_eq!(cache.peek_top(), None);
            assert_eq!(cache.peek_bottom(), None);
            assert_eq!(cache.pop_top(), None);
            assert_eq!(cache.pop_bottom(), None);
            assert!(matches!(cache.element_top(), Err(CacheError::Underflow(_))));
            assert!(matches!(cache.element_bottom(), Err(CacheError::Underflow(_))));
            assert!(matches!(cache.poll_top(), Err(CacheError::Underflow(_))));
            assert!(matches!(cache.poll_bottom(), Err(CacheError::Underflow(_))));
        }

        #[test]
        fn fifo_extremes() {
            let mut cache = cache(CachePolicy::Fifo, 3);
            fill(&mut cache, &["a", "b", "c"]);
            assert_eq!(cache.peek_top(), Some(&3));
            assert_eq!(cache.peek_bottom(), Some(&1));
            assert_eq!(cache.element_top(), Ok(&3));
            assert_eq!(cache.poll_bottom(), Ok(("a", 1)));
            assert_eq!(cache.pop_top(), Some(("c", 3)));
            assert_eq!(cache.keys(), vec!["b"]);
        }

        #[test]
        fn random_removal_keeps_placement_order() {
            let mut cache = cache(CachePolicy::Random, 4);
            fill(&mut cache, &["a", "b", "c", "d"]);
            assert_eq!(cache.remove(&"b"), Some(2));

            assert_eq!(cache.keys(), vec!["d", "c", "a"]);
            assert_eq!(cache.view_top(), Some((&"d", &4)));
            assert_eq!(cache.view_bottom(), Some((&"a", &1)));
            assert_eq!(cache.pop_top(), Some(("d", 4)));
            assert_eq!(cache.pop_bottom(), Some(("a", 1)));
            assert!(cache.check_invariants().is_ok());
        }

        #[test]
        fn lru_peek_bottom_promotes() {
            let mut cache = cache(CachePolicy::Lru, 3);
            fill(&mut cache, &["a", "b", "c"]);
            assert_eq!(cache.peek_bottom(), Some(&1));
            assert_eq!(cache.keys(), vec!["a", "c", "b"]);
        }

        #[test]
        fn view_is_pure() {
            let mut cache = cache(CachePolicy::Lru, 3);
            fill(&mut cache, &["a", "b", "c"]);
            assert_eq!(cache.view_bottom(), Some((&"a", &1)));
            assert_eq!(cache.view_top(), Some((&"c", &3)));
            assert_eq!(cache.keys(), vec!["c", "b", "a"]);
        }

        #[test]
        fn lfu_peek_increments_count() {
            let mut cache = cache(CachePolicy::Lfu, 3);
            fill(&mut cache, &["a", "b"]);
            cache.peek_bottom();
            assert_eq!(cache.meta_of(&"a"), Some(EntryMeta::Frequency(2)));
        }
    }

    // ==============================================
    // Per-policy eviction
    // ==============================================

    mod eviction_behavior {
        use super::*;

        #[test]
        fn lru_evicts_least_recent() {
            let mut cache = cache(CachePolicy::Lru, 3);
            fill(&mut cache, &["a", "b", "c"]);
            cache.get(&"a");
            let outcome = cache.insert("d", 4).unwrap();
            assert_eq!(outcome, Admission::Evicted { key: "b", value: 2 });
            assert_eq!(cache.keys(), vec!["d", "a", "c"]);
            assert_ne!(cache.view_top().map(|(k, _)| *k), Some("a"));
        }

        #[test]
        fn mru_evicts_most_recent() {
            let mut cache = cache(CachePolicy::Mru, 3);
            fill(&mut cache, &["a", "b", "c"]);
            cache.get(&"a");
            cache.insert("d", 4).unwrap();
            assert!(!cache.contains(&"a"));
            assert_eq!(cache.keys(), vec!["d", "c", "b"]);
        }

        #[test]
        fn fifo_and_lifo_differ() {
            let mut fifo = cache(CachePolicy::Fifo, 2);
            fill(&mut fifo, &["a", "b", "c"]);
            let mut lifo = cache(CachePolicy::Lifo, 2);
            fill(&mut lifo, &["a", "b", "c"]);

            let mut fifo_keys = fifo.keys();
            fifo_keys.sort();
            let mut lifo_keys = lifo.keys();
            lifo_keys.sort();
            assert_eq!(fifo_keys, vec!["b", "c"]);
            assert_eq!(lifo_keys, vec!["a", "c"]);
        }

        #[test]
        fn fifo_read_and_write_do_not_reorder() {
            let mut cache = cache(CachePolicy::Fifo, 3);
            fill(&mut cache, &["a", "b", "c"]);
            cache.get(&"a");
            cache.insert("a", 10).unwrap();
            assert_eq!(cache.keys(), vec!["c", "b", "a"]);
            assert_eq!(cache.insert("d", 4).unwrap().evicted(), Some((&"a", &10)));
        }

        #[test]
        fn lfu_evicts_lowest_count() {
            let mut cache = cache(CachePolicy::Lfu, 3);
            fill(&mut cache, &["a", "b", "c"]);
            cache.get(&"a");
            cache.get(&"a");
            cache.get(&"c");
            cache.insert("d", 4).unwrap();
            assert!(!cache.contains(&"b"));
            assert_eq!(cache.keys(), vec!["a", "c", "d"]);
            assert_eq!(
                cache.metadata(),
                vec![
                    EntryMeta::Frequency(3),
                    EntryMeta::Frequency(2),
                    EntryMeta::Frequency(1)
                ]
            );
        }

        #[test]
        fn lfu_ties_evict_oldest_touch() {
            let mut cache = cache(CachePolicy::Lfu, 2);
            fill(&mut cache, &["a", "b"]);
            cache.insert("c", 3).unwrap();
            assert!(!cache.contains(&"a"));
        }

        #[test]
        fn lfu_write_counts_as_access() {
            let mut cache = cache(CachePolicy::Lfu, 2);
            fill(&mut cache, &["a", "b"]);
            cache.insert("a", 5).unwrap();
            assert_eq!(cache.meta_of(&"a"), Some(EntryMeta::Frequency(2)));
            cache.insert("c", 3).unwrap();
            assert!(!cache.contains(&"b"));
        }

        #[test]
        fn mfu_evicts_highest_count() {
            let mut cache = cache(CachePolicy::Mfu, 3);
            fill(&mut cache, &["a", "b", "c"]);
            cache.get(&"b");
            cache.get(&"b");
            cache.insert("d", 4).unwrap();
            assert!(!cache.contains(&"b"));
            assert_eq!(cache.len(), 3);
        }

        #[test]
        fn random_evicts_one_held_key() {
            let mut cache = cache(CachePolicy::Random, 3);
            fill(&mut cache, &["a", "b", "c"]);
            let outcome = cache.insert("d", 4).unwrap();
            let (victim, _) = outcome.evicted().unwrap();
            assert!(["a", "b", "c"].contains(victim));
            assert!(cache.contains(&"d"));
            assert_eq!(cache.len(), 3);
            assert_eq!(cache.view_top(), Some((&"d", &4)));
        }

        #[test]
        fn random_is_reproducible_with_seed() {
            let run = || {
                let mut cache = cache(CachePolicy::Random, 4);
                for (i, key) in ["a", "b", "c", "d", "e", "f", "g", "h"].iter().enumerate() {
                    cache.insert(*key, i as i32).unwrap();
                }
                let mut keys = cache.keys();
                keys.sort();
                keys
            };
            assert_eq!(run(), run());
        }
    }

    mod priority {
        use super::*;

        #[test]
        fn rejects_plain_entries() {
            let mut cache = cache(CachePolicy::Priority, 2);
            let err = cache.insert("a", 1).unwrap_err();
            assert!(matches!(err, CacheError::IllegalState(_)));
            assert!(cache.is_empty());
        }

        #[test]
        fn rejects_lower_or_equal_rank_when_full() {
            let mut cache = cache(CachePolicy::Priority, 1);
            cache.put(CacheEntry::priority("a", 1, 5)).unwrap();
            let outcome = cache.put(CacheEntry::priority("b", 2, 3)).unwrap();
            assert_eq!(outcome, Admission::Rejected { key: "b", value: 2 });
            assert!(!outcome.is_admitted());
            assert!(!cache.contains(&"b"));
            assert!(cache.contains(&"a"));

            let tie = cache.put(CacheEntry::priority("t", 0, 5)).unwrap();
            assert!(!tie.is_admitted());

            let outcome = cache.put(CacheEntry::priority("c", 3, 9)).unwrap();
            assert_eq!(outcome, Admission::Evicted { key: "a", value: 1 });
            assert!(cache.contains(&"c"));
        }

        #[test]
        fn write_replaces_rank_and_read_bumps_it() {
            let mut cache = cache(CachePolicy::Priority, 3);
            cache.put(CacheEntry::priority("a", 1, 5)).unwrap();
            cache.put(CacheEntry::priority("b", 2, 7)).unwrap();
            assert_eq!(cache.keys(), vec!["b", "a"]);

            cache.put(CacheEntry::priority("a", 1, 9)).unwrap();
            assert_eq!(cache.keys(), vec!["a", "b"]);

            cache.get(&"b");
            assert_eq!(cache.meta_of(&"b"), Some(EntryMeta::Priority(8)));
        }

        #[test]
        fn rank_saturates() {
            let mut cache = cache(CachePolicy::Priority, 1);
            cache.put(CacheEntry::priority("a", 1, i64::MAX)).unwrap();
            cache.get(&"a");
            assert_eq!(cache.meta_of(&"a"), Some(EntryMeta::Priority(i64::MAX)));
        }
    }

    mod expiry {
        use super::*;

        #[test]
        fn zero_ttl_expires_on_next_read() {
            let (mut cache, _clock) = timed(CachePolicy::Time, 4, 0, ExpireMode::AfterWrite);
            cache.insert("a", 1).unwrap();
            assert_eq!(cache.get(&"a"), None);
            assert!(!cache.contains(&"a"));
            assert!(cache.is_empty());
        }

        #[test]
        fn entries_live_until_deadline() {
            let (mut cache, clock) = timed(CachePolicy::Time, 4, 100, ExpireMode::AfterWrite);
            cache.insert("a", 1).unwrap();
            clock.advance(99);
            assert_eq!(cache.get(&"a"), Some(&1));
            clock.advance(1);
            assert!(!cache.contains_live(&"a"));
            assert_eq!(cache.len(), 1);
            assert_eq!(cache.get(&"a"), None);
            assert_eq!(cache.len(), 0);
        }

        #[test]
        fn contains_evicts_expired_entry() {
            let (mut cache, _clock) = timed(CachePolicy::Time, 4, 0, ExpireMode::AfterWrite);
            cache.insert("a", 1).unwrap();
            assert!(!cache.contains(&"a"));
            assert_eq!(cache.len(), 0);
            assert!(cache.is_empty());
            assert!(cache.check_invariants().is_ok());
        }

        #[test]
        fn contains_keeps_live_entries() {
            let (mut cache, clock) = timed(CachePolicy::Expire, 4, 0, ExpireMode::AfterWrite);
            cache
                .put(CacheEntry::expire("a", 1, 50, TimeUnit::Milliseconds))
                .unwrap();
            clock.advance(49);
            assert!(cache.contains(&"a"));
            assert_eq!(cache.meta_of(&"a"), Some(EntryMeta::Timestamp(1_050)));
            clock.advance(1);
            assert!(!cache.contains_live(&"a"));
            assert_eq!(cache.len(), 1);
            assert!(!cache.contains(&"a"));
            assert_eq!(cache.len(), 0);
        }

        #[test]
        fn after_write_ignores_updates() {
            let (mut cache, clock) = timed(CachePolicy::Time, 4, 100, ExpireMode::AfterWrite);
            cache.insert("a", 1).unwrap();
            clock.advance(60);
            cache.insert("a", 2).unwrap();
            clock.advance(60);
            assert_eq!(cache.get(&"a"), None);
        }

        #[test]
        fn after_update_refreshes_on_put() {
            let (mut cache, clock) = timed(CachePolicy::Time, 4, 100, ExpireMode::AfterUpdate);
            cache.insert("a", 1).unwrap();
            clock.advance(60);
            cache.get(&"a");
            cache.insert("a", 2).unwrap();
            clock.advance(60);
            assert_eq!(cache.get(&"a"), Some(&2));
            clock.advance(60);
            assert_eq!(cache.get(&"a"), None);
        }

        #[test]
        fn after_access_slides_on_read() {
            let (mut cache, clock) = timed(CachePolicy::Time, 4, 100, ExpireMode::AfterAccess);
            cache.insert("a", 1).unwrap();
            cache.insert("b", 2).unwrap();
            for _ in 0..5 {
                clock.advance(60);
                assert_eq!(cache.get(&"a"), Some(&1));
            }
            assert!(!cache.contains(&"b"));
            assert_eq!(cache.view_top(), Some((&"a", &1)));
        }

        #[test]
        fn put_over_expired_key_inserts_fresh() {
            let (mut cache, clock) = timed(CachePolicy::Time, 4, 10, ExpireMode::AfterWrite);
            cache.insert("a", 1).unwrap();
            clock.advance(10);
            assert_eq!(cache.insert("a", 2), Ok(Admission::Inserted));
            assert_eq!(cache.get(&"a"), Some(&2));
        }

        #[test]
        fn full_cache_prefers_expired_victims() {
            let (mut cache, clock) = timed(CachePolicy::Time, 2, 100, ExpireMode::AfterWrite);
            cache.insert("a", 1).unwrap();
            clock.advance(50);
            cache.insert("b", 2).unwrap();
            clock.advance(50);
            assert_eq!(cache.insert("c", 3), Ok(Admission::Inserted));
            assert_eq!(cache.keys(), vec!["c", "b"]);
        }

        #[test]
        fn full_cache_falls_back_to_earliest_deadline() {
            let (mut cache, clock) = timed(CachePolicy::Time, 2, 100, ExpireMode::AfterWrite);
            cache.insert("a", 1).unwrap();
            clock.advance(10);
            cache.insert("b", 2).unwrap();
            let outcome = cache.insert("c", 3).unwrap();
            assert_eq!(outcome, Admission::Evicted { key: "a", value: 1 });
        }

        #[test]
        fn evict_expired_sweeps_everything_due() {
            let (mut cache, clock) = timed(CachePolicy::Time, 4, 100, ExpireMode::AfterWrite);
            cache.insert("a", 1).unwrap();
            cache.insert("b", 2).unwrap();
            clock.advance(50);
            cache.insert("c", 3).unwrap();
            clock.advance(50);
            assert_eq!(cache.evict_expired(), 2);
            assert_eq!(cache.keys(), vec!["c"]);
        }

        #[test]
        fn top_bottom_skip_expired() {
            let (mut cache, clock) = timed(CachePolicy::Time, 4, 100, ExpireMode::AfterWrite);
            cache.insert("a", 1).unwrap();
            clock.advance(50);
            cache.insert("b", 2).unwrap();
            clock.advance(50);
            assert_eq!(cache.view_bottom(), Some((&"b", &2)));
            assert_eq!(cache.peek_bottom(), Some(&2));
            clock.advance(50);
            assert_eq!(cache.pop_top(), None);
            assert!(matches!(cache.poll_bottom(), Err(CacheError::Underflow(_))));
        }

        #[test]
        fn remove_of_expired_key_is_none() {
            let (mut cache, clock) = timed(CachePolicy::Time, 2, 5, ExpireMode::AfterWrite);
            cache.insert("a", 1).unwrap();
            clock.advance(5);
            assert_eq!(cache.remove(&"a"), None);
            assert!(cache.is_empty());
        }

        #[test]
        fn expire_policy_uses_per_entry_ttl() {
            let (mut cache, clock) = timed(CachePolicy::Expire, 4, 1_000, ExpireMode::AfterAccess);
            cache
                .put(CacheEntry::expire("short", 1, 10, TimeUnit::Milliseconds))
                .unwrap();
            cache
                .put(CacheEntry::expire("long", 2, 1, TimeUnit::Seconds))
                .unwrap();
            assert_eq!(cache.keys(), vec!["long", "short"]);

            clock.advance(8);
            assert_eq!(cache.get(&"short"), Some(&1));
            clock.advance(8);
            assert_eq!(cache.get(&"short"), Some(&1));
            clock.advance(10);
            assert_eq!(cache.get(&"short"), None);
            assert_eq!(cache.get(&"long"), Some(&2));
        }

        #[test]
        fn expire_policy_validates_entries() {
            let (mut cache, _clock) = timed(CachePolicy::Expire, 4, 1_000, ExpireMode::AfterWrite);
            assert!(matches!(cache.insert("a", 1), Err(CacheError::IllegalState(_))));
            let err = cache
                .put(CacheEntry::expire("a", 1, -1, TimeUnit::Seconds))
                .unwrap_err();
            assert!(matches!(err, CacheError::InvalidEntry(_)));
            assert!(cache.is_empty());
        }

        #[test]
        fn time_policy_rejects_expire_entries() {
            let (mut cache, _clock) = timed(CachePolicy::Time, 4, 1_000, ExpireMode::AfterWrite);
            let err = cache
                .put(CacheEntry::expire("a", 1, 5, TimeUnit::Seconds))
                .unwrap_err();
            assert!(matches!(err, CacheError::IllegalState(_)));
        }
    }

    // ==============================================
    // Metrics
    // ==============================================

    mod metrics {
        use super::*;

        fn metered(policy: CachePolicy, capacity: usize) -> Cache<&'static str, i32> {
            CacheBuilder::new()
                .policy(policy)
                .capacity(capacity)
                .metrics(true)
                .build()
                .unwrap()
        }

        #[test]
        fn disabled_metrics_are_illegal_state() {
            let cache = cache(CachePolicy::Lru, 2);
            assert!(matches!(cache.metrics(), Err(CacheError::IllegalState(_))));
            assert!(cache.metric(MetricType::Hits).is_err());
        }

        #[test]
        fn one_event_per_outcome() {
            let mut cache = metered(CachePolicy::Lru, 2);
            cache.insert("a", 1).unwrap();
            cache.insert("b", 2).unwrap();
            cache.get(&"a");
            cache.get(&"zz");
            cache.insert("c", 3).unwrap();
            cache.remove(&"a");
            cache.remove(&"nope");
            cache.clear();

            let snap = cache.metrics().unwrap();
            assert_eq!(snap.hits, 1);
            assert_eq!(snap.misses, 2);
            assert_eq!(snap.puts, 3);
            assert_eq!(snap.evictions, 1);
            assert_eq!(snap.removes, 1);
            assert_eq!(snap.clears, 1);
            assert_eq!(snap.size, 0);
            assert_eq!(snap.capacity, 2);
        }

        #[test]
        fn expired_read_counts_miss_and_eviction() {
            let clock = ManualClock::new(0);
            let mut cache = CacheBuilder::new()
                .policy(CachePolicy::Time)
                .capacity(4)
                .expire_after(10, TimeUnit::Milliseconds)
                .metrics(true)
                .clock(Arc::new(clock.clone()))
                .build::<&str, i32>()
                .unwrap();
            cache.insert("a", 1).unwrap();
            cache.insert("b", 2).unwrap();
            clock.advance(10);

            assert_eq!(cache.get(&"a"), None);
            let snap = cache.metrics().unwrap();
            assert_eq!(snap.hits, 0);
            assert_eq!(snap.misses, 1);
            assert_eq!(snap.evictions, 1);
            assert_eq!(snap.size, 1);

            // a membership test evicts without counting a read
            assert!(!cache.contains(&"b"));
            let snap = cache.metrics().unwrap();
            assert_eq!(snap.misses, 1);
            assert_eq!(snap.evictions, 2);
            assert_eq!(snap.size, 0);
        }

        #[test]
        fn rejection_counts_only_a_put() {
            let mut cache = metered(CachePolicy::Priority, 1);
            cache.put(CacheEntry::priority("a", 1, 5)).unwrap();
            cache.put(CacheEntry::priority("b", 1, 1)).unwrap();
            let snap = cache.metrics().unwrap();
            assert_eq!(snap.puts, 2);
            assert_eq!(snap.evictions, 0);
        }

        #[test]
        fn failed_put_records_nothing() {
            let mut cache = metered(CachePolicy::Priority, 1);
            assert!(cache.insert("a", 1).is_err());
            assert_eq!(cache.metric(MetricType::Puts), Ok(0));
        }

        #[test]
        fn reset_zeroes_counters() {
            let mut cache = metered(CachePolicy::Fifo, 2);
            cache.insert("a", 1).unwrap();
            cache.reset_metrics().unwrap();
            assert_eq!(cache.metric(MetricType::Puts), Ok(0));
            assert_eq!(cache.metric(MetricType::Size), Ok(1));
        }
    }

    // ==============================================
    // Equality and rendering
    // ==============================================

    mod rendering {
        use super::*;

        #[test]
        fn display_lists_top_to_bottom() {
            let mut cache = cache(CachePolicy::Lru, 3);
            fill(&mut cache, &["a", "b"]);
            assert_eq!(cache.to_string(), "[b: 2, a: 1]");
            assert_eq!(super::cache(CachePolicy::Fifo, 1).to_string(), "[]");
        }

        #[test]
        fn display_shows_metadata_for_ranked_policies() {
            let mut cache = cache(CachePolicy::Lfu, 3);
            fill(&mut cache, &["a", "b"]);
            cache.get(&"a");
            assert_eq!(cache.to_string(), "[a: 1 (2), b: 2 (1)]");
        }

        #[test]
        fn equality_compares_order_and_metadata() {
            let mut a = cache(CachePolicy::Lru, 3);
            let mut b = cache(CachePolicy::Lru, 3);
            fill(&mut a, &["x", "y"]);
            fill(&mut b, &["x", "y"]);
            assert_eq!(a, b);

            b.get(&"x");
            assert_ne!(a, b);

            let mut c = cache(CachePolicy::Fifo, 3);
            fill(&mut c, &["x", "y"]);
            assert_ne!(a, c);

            let mut d = cache(CachePolicy::Lru, 4);
            fill(&mut d, &["x", "y"]);
            assert_ne!(a, d);
        }

        #[test]
        fn debug_is_compact() {
            let cache = cache(CachePolicy::Mru, 2);
            let text = format!("{cache:?}");
            assert!(text.starts_with("Cache {"));
            assert!(text.contains("policy: Mru"));
        }
    }

    #[test]
    fn invariants_hold_after_mixed_operations() {
        for policy in CachePolicy::ALL {
            let mut cache: Cache<u32, u32> = CacheBuilder::new()
                .policy(policy)
                .capacity(5)
                .seed(1)
                .build()
                .unwrap();
            for i in 0..40u32 {
                let key = i % 9;
                let _ = match policy {
                    CachePolicy::Priority => cache.put(CacheEntry::priority(key, i, i64::from(i % 4))),
                    CachePolicy::Expire => {
                        cache.put(CacheEntry::expire(key, i, 60, TimeUnit::Seconds))
                    },
                    _ => cache.insert(key, i),
                };
                if i % 3 == 0 {
                    cache.get(&(i % 7));
                }
                if i % 5 == 0 {
                    cache.remove(&(i % 6));
                }
                if i % 11 == 0 {
                    cache.pop_bottom();
                }
                assert!(cache.check_invariants().is_ok(), "{policy}");
                assert!(cache.len() <= cache.capacity());
            }
        }
    }
}
