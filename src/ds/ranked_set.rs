//! Score-ordered set with stable handles and sequence tie-breaking.
//!
//! Order structure for the frequency (LFU/MFU), priority and expiry
//! (Time/Expire) policies. Values live in a [`SlotArena`]; a `BTreeMap`
//! keyed by `(score, seq)` keeps them sorted. The highest key is the *top*,
//! the lowest is the *bottom*.
//!
//! ## Architecture
//!
//! ```text
//!   arena: SlotArena<Ranked<T>>             order: BTreeMap<(score, seq), SlotId>
//!   ┌────────┬──────────────────────┐       ┌──────────────┬────────┐
//!   │ SlotId │ { value, score, seq }│       │ (score, seq) │ SlotId │
//!   ├────────┼──────────────────────┤       ├──────────────┼────────┤
//!   │ id_0   │ { A, 3, 0 }          │       │ (1, 4)       │ id_2   │ ◄── bottom
//!   │ id_1   │ { B, 3, 5 }          │       │ (3, 0)       │ id_0   │
//!   │ id_2   │ { C, 1, 4 }          │       │ (3, 5)       │ id_1   │ ◄── top
//!   └────────┴──────────────────────┘       └──────────────┴────────┘
//! ```
//!
//! Every insert and every [`rescore`](RankedSet::rescore) draws a fresh
//! sequence number, so among equal scores the most recently scored value
//! ranks higher.
//!
//! ## Operations
//!
//! | Operation   | Complexity |
//! |-------------|------------|
//! | `insert`    | O(log n)   |
//! | `rescore`   | O(log n)   |
//! | `remove`    | O(log n)   |
//! | `top_id`    | O(log n)   |
//! | `bottom_id` | O(log n)   |
//! | `get`       | O(1)       |

use std::collections::BTreeMap;
use std::collections::btree_map;

use crate::ds::slot_arena::{SlotArena, SlotId};
use crate::error::InvariantError;

#[derive(Debug)]
struct Ranked<T> {
    value: T,
    score: i128,
    seq: u64,
}

/// Values ordered by `(score, seq)`.
#[derive(Debug)]
pub struct RankedSet<T> {
    arena: SlotArena<Ranked<T>>,
    order: BTreeMap<(i128, u64), SlotId>,
    next_seq: u64,
}

impl<T> RankedSet<T> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            arena: SlotArena::with_capacity(capacity),
            order: BTreeMap::new(),
            next_seq: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    fn bump_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq = self.next_seq.wrapping_add(1);
        seq
    }

    /// Inserts `value` with `score` and returns its handle.
    pub fn insert(&mut self, value: T, score: i128) -> SlotId {
        let seq = self.bump_seq();
        let id = self.arena.insert(Ranked { value, score, seq });
        self.order.insert((score, seq), id);
        id
    }

    /// Moves `id` to its position for `score`. Returns `false` if `id` is absent.
    ///
    /// A fresh sequence number is taken even when the score is unchanged.
    pub fn rescore(&mut self, id: SlotId, score: i128) -> bool {
        let seq = self.bump_seq();
        let Some(slot) = self.arena.get_mut(id) else {
            return false;
        };
        let old = (slot.score, slot.seq);
        slot.score = score;
        slot.seq = seq;
        self.order.remove(&old);
        self.order.insert((score, seq), id);
        true
    }

    pub fn remove(&mut self, id: SlotId) -> Option<T> {
        let slot = self.arena.remove(id)?;
        self.order.remove(&(slot.score, slot.seq));
        Some(slot.value)
    }

    /// Handle of the highest-ranked value.
    pub fn top_id(&self) -> Option<SlotId> {
        self.order.last_key_value().map(|(_, id)| *id)
    }

    /// Handle of the lowest-ranked value.
    pub fn bottom_id(&self) -> Option<SlotId> {
        self.order.first_key_value().map(|(_, id)| *id)
    }

    pub fn get(&self, id: SlotId) -> Option<&T> {
        self.arena.get(id).map(|slot| &slot.value)
    }

    pub fn get_mut(&mut self, id: SlotId) -> Option<&mut T> {
        self.arena.get_mut(id).map(|slot| &mut slot.value)
    }

    pub fn score_of(&self, id: SlotId) -> Option<i128> {
        self.arena.get(id).map(|slot| slot.score)
    }

    /// Iterates from top (highest) to bottom (lowest).
    pub fn iter(&self) -> RankedSetIter<'_, T> {
        RankedSetIter {
            arena: &self.arena,
            ids: self.order.values(),
        }
    }

    /// Handles whose score is at most `bound`, lowest first.
    pub fn ids_at_or_below(&self, bound: i128) -> Vec<SlotId> {
        self.order
            .range(..=(bound, u64::MAX))
            .map(|(_, id)| *id)
            .collect()
    }

    pub fn clear(&mut self) {
        self.arena.clear();
        self.order.clear();
    }

    /// Checks that the sorted index and the arena describe the same values.
    pub fn validate(&self) -> Result<(), InvariantError> {
        if self.order.len() != self.arena.len() {
            return Err(InvariantError::new(format!(
                "ranked index holds {} keys but arena holds {}",
                self.order.len(),
                self.arena.len()
            )));
        }
        for (&(score, seq), &id) in &self.order {
            match self.arena.get(id) {
                Some(slot) if slot.score == score && slot.seq == seq => {},
                Some(_) => {
                    return Err(InvariantError::new("ranked index key disagrees with slot"));
                },
                None => return Err(InvariantError::new("ranked index points at a freed slot")),
            }
        }
        Ok(())
    }
}

pub struct RankedSetIter<'a, T> {
    arena: &'a SlotArena<Ranked<T>>,
    ids: btree_map::Values<'a, (i128, u64), SlotId>,
}

impl<'a, T> Iterator for RankedSetIter<'a, T> {
    type Item = (SlotId, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        let id = *self.ids.next_back()?;
        self.arena.get(id).map(|slot| (id, &slot.value))
    }
}
