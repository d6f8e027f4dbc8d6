//! Eviction policies.
//!
//! Every policy runs on the same [`OrderedStore`](crate::store::OrderedStore);
//! what differs is the [`Strategy`](strategy::Strategy) row it selects:
//! which layout orders the entries, what a read or a write does to an
//! entry's position, and who leaves when a new key arrives at capacity.
//!
//! | Policy     | Order key        | Read            | Write              | Overflow victim |
//! |------------|------------------|-----------------|--------------------|-----------------|
//! | `Lru`      | recency          | move to top     | move to top        | bottom          |
//! | `Mru`      | recency          | move to top     | move to top        | top             |
//! | `Lfu`      | access count     | count + 1       | count + 1          | bottom          |
//! | `Mfu`      | access count     | count + 1       | count + 1          | top             |
//! | `Fifo`     | arrival          | -               | -                  | bottom          |
//! | `Lifo`     | arrival          | -               | -                  | top             |
//! | `Priority` | explicit rank    | rank + 1        | replace rank       | bottom, or reject incoming |
//! | `Random`   | placement        | -               | -                  | uniformly random |
//! | `Time`     | expiry deadline  | per [`ExpireMode`] | per [`ExpireMode`] | bottom (earliest deadline) |
//! | `Expire`   | expiry deadline  | per [`ExpireMode`] | per [`ExpireMode`] | bottom (earliest deadline) |

pub mod random;
pub mod strategy;
pub mod time;

use std::fmt;

/// Available cache eviction policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CachePolicy {
    /// Least Recently Used eviction.
    #[default]
    Lru,
    /// Most Recently Used eviction.
    Mru,
    /// Least Frequently Used eviction.
    Lfu,
    /// Most Frequently Used eviction.
    Mfu,
    /// First In, First Out eviction.
    Fifo,
    /// Last In, First Out eviction.
    Lifo,
    /// Explicit per-entry rank; low-ranked newcomers are rejected when full.
    Priority,
    /// Uniformly random victim.
    Random,
    /// Cache-wide time-to-live.
    Time,
    /// Per-entry time-to-live carried by [`CacheEntry::Expire`](crate::entry::CacheEntry::Expire).
    Expire,
}

impl CachePolicy {
    /// Every policy, in declaration order.
    pub const ALL: [CachePolicy; 10] = [
        CachePolicy::Lru,
        CachePolicy::Mru,
        CachePolicy::Lfu,
        CachePolicy::Mfu,
        CachePolicy::Fifo,
        CachePolicy::Lifo,
        CachePolicy::Priority,
        CachePolicy::Random,
        CachePolicy::Time,
        CachePolicy::Expire,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Lru => "LRU",
            Self::Mru => "MRU",
            Self::Lfu => "LFU",
            Self::Mfu => "MFU",
            Self::Fifo => "FIFO",
            Self::Lifo => "LIFO",
            Self::Priority => "PRIORITY",
            Self::Random => "RANDOM",
            Self::Time => "TIME",
            Self::Expire => "EXPIRE",
        }
    }

    /// `true` for the policies that expire entries by deadline.
    pub fn is_timed(self) -> bool {
        matches!(self, Self::Time | Self::Expire)
    }
}

impl fmt::Display for CachePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// When a timed entry's deadline is (re)computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExpireMode {
    /// Deadline fixed when the key is first inserted.
    #[default]
    AfterWrite,
    /// Deadline refreshed on every `put` of the key.
    AfterUpdate,
    /// Deadline refreshed on every `put` and every read (sliding window).
    AfterAccess,
}
