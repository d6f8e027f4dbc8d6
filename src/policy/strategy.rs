//! Per-policy strategy table.
//!
//! A [`Strategy`] is the whole difference between two policies: the layout
//! that orders entries, the effect of a read, the effect of a write to an
//! existing key, the overflow rule, and the entry shape `put` accepts.
//! [`Cache`](crate::cache::Cache) looks the row up once at construction and
//! dispatches on it afterwards.

use crate::entry::{EntryKind, EntryMeta};
use crate::policy::{CachePolicy, ExpireMode};
use crate::store::Layout;

/// What `get` / `peek` does to a present, live entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadEffect {
    None,
    PromoteToTop,
    /// Count or rank + 1, saturating.
    BumpScore,
    /// Push the expiry deadline out by the entry's TTL.
    RefreshDeadline,
}

/// What `put` on an existing key does besides replacing the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteEffect {
    None,
    PromoteToTop,
    BumpScore,
    /// Take the rank carried by the incoming entry.
    ReplaceScore,
    RefreshDeadline,
}

/// Who makes room when a new key arrives at capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overflow {
    EvictBottom,
    EvictTop,
    EvictRandom,
    /// Evict the bottom only if the newcomer ranks strictly higher;
    /// otherwise the newcomer is rejected.
    RejectUnlessOutranks,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Strategy {
    pub layout: Layout,
    pub read: ReadEffect,
    pub write: WriteEffect,
    pub overflow: Overflow,
    pub accepts: EntryKind,
}

impl Strategy {
    pub fn for_policy(policy: CachePolicy, mode: ExpireMode) -> Self {
        use Overflow::*;

        let row = |layout, read, write, overflow, accepts| Strategy {
            layout,
            read,
            write,
            overflow,
            accepts,
        };

        match policy {
            CachePolicy::Lru => row(
                Layout::Linked,
                ReadEffect::PromoteToTop,
                WriteEffect::PromoteToTop,
                EvictBottom,
                EntryKind::Basic,
            ),
            CachePolicy::Mru => row(
                Layout::Linked,
                ReadEffect::PromoteToTop,
                WriteEffect::PromoteToTop,
                EvictTop,
                EntryKind::Basic,
            ),
            CachePolicy::Lfu => row(
                Layout::Ranked,
                ReadEffect::BumpScore,
                WriteEffect::BumpScore,
                EvictBottom,
                EntryKind::Basic,
            ),
            CachePolicy::Mfu => row(
                Layout::Ranked,
                ReadEffect::BumpScore,
                WriteEffect::BumpScore,
                EvictTop,
                EntryKind::Basic,
            ),
            CachePolicy::Fifo => row(
                Layout::Linked,
                ReadEffect::None,
                WriteEffect::None,
                EvictBottom,
                EntryKind::Basic,
            ),
            CachePolicy::Lifo => row(
                Layout::Linked,
                ReadEffect::None,
                WriteEffect::None,
                EvictTop,
                EntryKind::Basic,
            ),
            CachePolicy::Priority => row(
                Layout::Ranked,
                ReadEffect::BumpScore,
                WriteEffect::ReplaceScore,
                RejectUnlessOutranks,
                EntryKind::Priority,
            ),
            CachePolicy::Random => row(
                Layout::Slotted,
                ReadEffect::None,
                WriteEffect::None,
                EvictRandom,
                EntryKind::Basic,
            ),
            CachePolicy::Time | CachePolicy::Expire => {
                let read = match mode {
                    ExpireMode::AfterAccess => ReadEffect::RefreshDeadline,
                    ExpireMode::AfterWrite | ExpireMode::AfterUpdate => ReadEffect::None,
                };
                let write = match mode {
                    ExpireMode::AfterWrite => WriteEffect::None,
                    ExpireMode::AfterUpdate | ExpireMode::AfterAccess => {
                        WriteEffect::RefreshDeadline
                    },
                };
                let accepts = if policy == CachePolicy::Time {
                    EntryKind::Basic
                } else {
                    EntryKind::Expire
                };
                row(Layout::Ranked, read, write, EvictBottom, accepts)
            },
        }
    }

    /// Whether entries carry metadata worth rendering next to the value.
    pub fn shows_meta(&self) -> bool {
        self.layout == Layout::Ranked
    }
}

/// Count or rank + 1, saturating at the type's maximum. Other metadata is
/// returned unchanged.
pub fn bump(meta: EntryMeta) -> EntryMeta {
    match meta {
        EntryMeta::Frequency(count) => EntryMeta::Frequency(count.saturating_add(1)),
        EntryMeta::Priority(rank) => EntryMeta::Priority(rank.saturating_add(1)),
        other => other,
    }
}
