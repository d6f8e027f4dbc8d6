//! Key-indexed ordered store.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        OrderedStore<K, V>                               │
//! │                                                                         │
//! │   index: FxHashMap<K, SlotId>          order: Order<K, V>               │
//! │   ┌──────────┬────────┐                ┌──────────────────────────────┐ │
//! │   │   key    │ SlotId │ ─────────────► │ Linked  (IntrusiveList)      │ │
//! │   ├──────────┼────────┤                │ Ranked  (RankedSet)          │ │
//! │   │  "a"     │ id_0   │                │ Slotted (DenseSlots)         │ │
//! │   │  "b"     │ id_1   │                └──────────────────────────────┘ │
//! │   └──────────┴────────┘                                                 │
//! │                                                                         │
//! │   top ──► ... ──► bottom        (iteration order of every layout)       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The store knows nothing about eviction policies. It keeps one
//! [`StoredEntry`] per key and an order from *top* to *bottom*; the policy
//! layer decides when to promote, rescore or remove.
//!
//! | Layout    | New entries | Promote                 | Extremes         |
//! |-----------|-------------|-------------------------|------------------|
//! | `Linked`  | front (top) | move to front           | O(1)             |
//! | `Ranked`  | by score    | re-sort with fresh seq  | O(log n)         |
//! | `Slotted` | front (top) | no-op                   | O(1)             |
//!
//! ## Invariants
//!
//! - Every key in `index` maps to a live slot holding the same key.
//! - `index.len()` equals the number of slots in the order structure.
//! - Ranked slots are scored by their entry's [`EntryMeta::score`].

use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::ds::{DenseSlots, IntrusiveList, RankedSet, SlotId};
use crate::entry::EntryMeta;
use crate::error::InvariantError;

/// A key, its value and the policy metadata attached to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredEntry<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) meta: EntryMeta,
    /// Per-entry time-to-live, kept for deadline refreshes.
    pub(crate) ttl_millis: Option<i64>,
}

impl<K, V> StoredEntry<K, V> {
    pub fn value(&self) -> &V {
        &self.value
    }

    pub fn meta(&self) -> EntryMeta {
        self.meta
    }

    pub fn ttl_millis(&self) -> Option<i64> {
        self.ttl_millis
    }

    pub(crate) fn into_pair(self) -> (K, V) {
        (self.key, self.value)
    }
}

/// Which order structure backs a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Recency and arrival order.
    Linked,
    /// Score order (frequency, priority, deadline).
    Ranked,
    /// Dense positions for random selection.
    Slotted,
}

#[derive(Debug)]
enum Order<K, V> {
    Linked(IntrusiveList<StoredEntry<K, V>>),
    Ranked(RankedSet<StoredEntry<K, V>>),
    Slotted(DenseSlots<StoredEntry<K, V>>),
}

/// Entries indexed by key and kept in a top-to-bottom order.
#[derive(Debug)]
pub struct OrderedStore<K, V> {
    index: FxHashMap<K, SlotId>,
    order: Order<K, V>,
}

impl<K, V> OrderedStore<K, V>
where
    K: Eq + Hash + Clone,
{
    pub fn new(layout: Layout, capacity: usize) -> Self {
        let order = match layout {
            Layout::Linked => Order::Linked(IntrusiveList::with_capacity(capacity)),
            Layout::Ranked => Order::Ranked(RankedSet::with_capacity(capacity)),
            Layout::Slotted => Order::Slotted(DenseSlots::with_capacity(capacity)),
        };
        Self {
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            order,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    #[inline]
    pub fn slot_of(&self, key: &K) -> Option<SlotId> {
        self.index.get(key).copied()
    }

    pub fn entry(&self, id: SlotId) -> Option<&StoredEntry<K, V>> {
        match &self.order {
            Order::Linked(list) => list.get(id),
            Order::Ranked(set) => set.get(id),
            Order::Slotted(slots) => slots.get(id),
        }
    }

    pub fn entry_by_key(&self, key: &K) -> Option<&StoredEntry<K, V>> {
        self.slot_of(key).and_then(|id| self.entry(id))
    }

    fn entry_mut(&mut self, id: SlotId) -> Option<&mut StoredEntry<K, V>> {
        match &mut self.order {
            Order::Linked(list) => list.get_mut(id),
            Order::Ranked(set) => set.get_mut(id),
            Order::Slotted(slots) => slots.get_mut(id),
        }
    }

    /// Inserts a key that is not yet present at the top of the order
    /// (ranked layouts place it by `meta`'s score instead).
    pub fn push(&mut self, key: K, value: V, meta: EntryMeta) -> SlotId {
        debug_assert!(!self.index.contains_key(&key));
        let entry = StoredEntry {
            key: key.clone(),
            value,
            meta,
            ttl_millis: None,
        };
        let id = match &mut self.order {
            Order::Linked(list) => list.push_front(entry),
            Order::Ranked(set) => set.insert(entry, meta.score()),
            Order::Slotted(slots) => slots.push(entry),
        };
        self.index.insert(key, id);
        id
    }

    /// Swaps in a new value and returns the old one.
    pub fn replace_value(&mut self, id: SlotId, value: V) -> Option<V> {
        self.entry_mut(id)
            .map(|entry| std::mem::replace(&mut entry.value, value))
    }

    /// Stores `meta` on the entry and re-sorts it if the layout is ranked.
    pub fn set_meta(&mut self, id: SlotId, meta: EntryMeta) -> bool {
        let Some(entry) = self.entry_mut(id) else {
            return false;
        };
        entry.meta = meta;
        if let Order::Ranked(set) = &mut self.order {
            set.rescore(id, meta.score());
        }
        true
    }

    pub fn set_ttl(&mut self, id: SlotId, ttl_millis: i64) -> bool {
        match self.entry_mut(id) {
            Some(entry) => {
                entry.ttl_millis = Some(ttl_millis);
                true
            },
            None => false,
        }
    }

    /// Moves the entry to the top of a linked order. Ranked entries keep
    /// their score but win ties against equal scores. No-op for slotted.
    pub fn promote(&mut self, id: SlotId) -> bool {
        match &mut self.order {
            Order::Linked(list) => list.move_to_front(id),
            Order::Ranked(set) => match set.score_of(id) {
                Some(score) => set.rescore(id, score),
                None => false,
            },
            Order::Slotted(slots) => slots.get(id).is_some(),
        }
    }

    pub fn top_id(&self) -> Option<SlotId> {
        match &self.order {
            Order::Linked(list) => list.front_id(),
            Order::Ranked(set) => set.top_id(),
            Order::Slotted(slots) => slots.top_id(),
        }
    }

    pub fn bottom_id(&self) -> Option<SlotId> {
        match &self.order {
            Order::Linked(list) => list.back_id(),
            Order::Ranked(set) => set.bottom_id(),
            Order::Slotted(slots) => slots.bottom_id(),
        }
    }

    /// Handle at a dense position. Only slotted layouts support positions.
    pub fn id_at(&self, pos: usize) -> Option<SlotId> {
        match &self.order {
            Order::Slotted(slots) => slots.id_at(pos),
            _ => None,
        }
    }

    /// Handles of ranked entries scored at or below `bound`, lowest first.
    pub fn ids_scored_at_or_below(&self, bound: i128) -> Vec<SlotId> {
        match &self.order {
            Order::Ranked(set) => set.ids_at_or_below(bound),
            _ => Vec::new(),
        }
    }

    pub fn remove_slot(&mut self, id: SlotId) -> Option<StoredEntry<K, V>> {
        let entry = match &mut self.order {
            Order::Linked(list) => list.remove(id),
            Order::Ranked(set) => set.remove(id),
            Order::Slotted(slots) => slots.remove(id),
        }?;
        self.index.remove(&entry.key);
        Some(entry)
    }

    pub fn clear(&mut self) {
        self.index.clear();
        match &mut self.order {
            Order::Linked(list) => list.clear(),
            Order::Ranked(set) => set.clear(),
            Order::Slotted(slots) => slots.clear(),
        }
    }

    /// Iterates entries from top to bottom.
    pub fn iter(&self) -> Iter<'_, K, V> {
        match &self.order {
            Order::Linked(list) => Iter::Linked(list.iter()),
            Order::Ranked(set) => Iter::Ranked(set.iter()),
            Order::Slotted(slots) => Iter::Slotted(slots.iter()),
        }
    }

    /// Checks the key index against the order structure.
    pub fn validate(&self) -> Result<(), InvariantError> {
        let order_len = match &self.order {
            Order::Linked(list) => {
                list.validate()?;
                list.len()
            },
            Order::Ranked(set) => {
                set.validate()?;
                set.len()
            },
            Order::Slotted(slots) => {
                slots.validate()?;
                slots.len()
            },
        };
        if order_len != self.index.len() {
            return Err(InvariantError::new(format!(
                "index holds {} keys but order holds {order_len} entries",
                self.index.len()
            )));
        }
        for (key, &id) in &self.index {
            match self.entry(id) {
                Some(entry) if entry.key == *key => {},
                Some(_) => return Err(InvariantError::new("index maps a key to another key's slot")),
                None => return Err(InvariantError::new("index points at a freed slot")),
            }
        }
        if let Order::Ranked(set) = &self.order {
            for (id, entry) in set.iter() {
                if set.score_of(id) != Some(entry.meta.score()) {
                    return Err(InvariantError::new("ranked score disagrees with entry metadata"));
                }
            }
        }
        Ok(())
    }
}

/// Top-to-bottom iterator over a store's entries.
pub enum Iter<'a, K, V> {
    Linked(crate::ds::intrusive_list::IntrusiveListIter<'a, StoredEntry<K, V>>),
    Ranked(crate::ds::ranked_set::RankedSetIter<'a, StoredEntry<K, V>>),
    Slotted(crate::ds::dense_slots::DenseSlotsIter<'a, StoredEntry<K, V>>),
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = &'a StoredEntry<K, V>;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Iter::Linked(it) => it.next().map(|(_, e)| e),
            Iter::Ranked(it) => it.next().map(|(_, e)| e),
            Iter::Slotted(it) => it.next().map(|(_, e)| e),
        }
    }
}
