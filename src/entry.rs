//! Entry payloads accepted by [`Cache::put`](crate::cache::Cache::put) and the
//! per-entry metadata kept by eviction policies.
//!
//! [`CacheEntry`] is a closed union: each policy accepts exactly one shape.
//!
//! | Shape      | Accepted by                                        |
//! |------------|----------------------------------------------------|
//! | `Basic`    | LRU, MRU, LFU, MFU, FIFO, LIFO, Random, Time       |
//! | `Priority` | Priority                                           |
//! | `Expire`   | Expire                                             |
//!
//! [`EntryMeta`] is what the store keeps next to each key/value pair and what
//! orders ranked policies.

use std::fmt;

/// Entry handed to [`Cache::put`](crate::cache::Cache::put).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheEntry<K, V> {
    /// Plain key/value pair.
    Basic { key: K, value: V },
    /// Key/value pair carrying an explicit rank. Higher ranks are kept longer.
    Priority { key: K, value: V, priority: i64 },
    /// Key/value pair carrying its own time-to-live.
    Expire {
        key: K,
        value: V,
        ttl: i64,
        unit: TimeUnit,
    },
}

impl<K, V> CacheEntry<K, V> {
    /// Creates a [`CacheEntry::Basic`].
    #[inline]
    pub fn basic(key: K, value: V) -> Self {
        Self::Basic { key, value }
    }

    /// Creates a [`CacheEntry::Priority`].
    #[inline]
    pub fn priority(key: K, value: V, priority: i64) -> Self {
        Self::Priority {
            key,
            value,
            priority,
        }
    }

    /// Creates a [`CacheEntry::Expire`].
    #[inline]
    pub fn expire(key: K, value: V, ttl: i64, unit: TimeUnit) -> Self {
        Self::Expire {
            key,
            value,
            ttl,
            unit,
        }
    }

    /// Returns the entry's key.
    pub fn key(&self) -> &K {
        match self {
            Self::Basic { key, .. } | Self::Priority { key, .. } | Self::Expire { key, .. } => key,
        }
    }

    /// Returns the entry's shape.
    pub fn kind(&self) -> EntryKind {
        match self {
            Self::Basic { .. } => EntryKind::Basic,
            Self::Priority { .. } => EntryKind::Priority,
            Self::Expire { .. } => EntryKind::Expire,
        }
    }
}

impl<K, V> From<(K, V)> for CacheEntry<K, V> {
    fn from((key, value): (K, V)) -> Self {
        Self::Basic { key, value }
    }
}

/// Discriminant of [`CacheEntry`], used in shape-mismatch errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    Basic,
    Priority,
    Expire,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Basic => "Basic",
            Self::Priority => "Priority",
            Self::Expire => "Expire",
        })
    }
}

/// Policy-specific metadata stored alongside each entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EntryMeta {
    /// Recency, arrival and random policies keep no metadata.
    #[default]
    None,
    /// Access count (LFU / MFU). Saturates at `u64::MAX`.
    Frequency(u64),
    /// Expiry deadline in clock milliseconds (Time / Expire).
    Timestamp(i64),
    /// Explicit rank (Priority). Saturates at `i64::MAX`.
    Priority(i64),
}

impl EntryMeta {
    /// Sort score for ranked layouts. `None` scores zero.
    #[inline]
    pub(crate) fn score(self) -> i128 {
        match self {
            Self::None => 0,
            Self::Frequency(count) => i128::from(count),
            Self::Timestamp(deadline) => i128::from(deadline),
            Self::Priority(rank) => i128::from(rank),
        }
    }
}

impl fmt::Display for EntryMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => Ok(()),
            Self::Frequency(v) => write!(f, "{v}"),
            Self::Timestamp(v) => write!(f, "{v}"),
            Self::Priority(v) => write!(f, "{v}"),
        }
    }
}

/// Unit for TTL amounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TimeUnit {
    Nanoseconds,
    Microseconds,
    Milliseconds,
    Seconds,
    Minutes,
    Hours,
    Days,
}

impl TimeUnit {
    /// Converts `amount` of this unit to milliseconds, truncating sub-millisecond
    /// remainders and saturating at the `i64` bounds.
    pub fn to_millis(self, amount: i64) -> i64 {
        match self {
            Self::Nanoseconds => amount / 1_000_000,
            Self::Microseconds => amount / 1_000,
            Self::Milliseconds => amount,
            Self::Seconds => amount.saturating_mul(1_000),
            Self::Minutes => amount.saturating_mul(60_000),
            Self::Hours => amount.saturating_mul(3_600_000),
            Self::Days => amount.saturating_mul(86_400_000),
        }
    }
}
