//! Placement-ordered slots with O(1) positional access.
//!
//! Order structure for the Random policy. Values sit in an [`IntrusiveList`]
//! in placement order (newest at the front), and every live slot also owns a
//! position in a dense `Vec<SlotId>`, so a uniformly random victim is one
//! index away. Removal swaps the last dense position into the hole; the
//! placement order is untouched.
//!
//! ```text
//!   placed: [d] ◄──► [c] ◄──► [b] ◄──► [a]      remove(b)
//!            ▲                          ▲         → placed: [d, c, a]
//!           top                       bottom
//!
//!   dense:  [a, b, c, d]                          → swap d into position 1
//!                                                 → dense: [a, d, c]
//! ```
//!
//! The top is the most recently placed slot, the bottom the earliest one.
//! Dense positions carry no order meaning.

use crate::ds::intrusive_list::{IntrusiveList, IntrusiveListIter};
use crate::ds::slot_arena::SlotId;
use crate::error::InvariantError;

#[derive(Debug)]
struct Placed<T> {
    value: T,
    pos: usize,
}

#[derive(Debug)]
pub struct DenseSlots<T> {
    placed: IntrusiveList<Placed<T>>,
    dense: Vec<SlotId>,
}

impl<T> DenseSlots<T> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            placed: IntrusiveList::with_capacity(capacity),
            dense: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.dense.len()
    }

    /// Places `value` on top.
    pub fn push(&mut self, value: T) -> SlotId {
        let pos = self.dense.len();
        let id = self.placed.push_front(Placed { value, pos });
        self.dense.push(id);
        id
    }

    pub fn remove(&mut self, id: SlotId) -> Option<T> {
        let placed = self.placed.remove(id)?;
        let pos = placed.pos;
        self.dense.swap_remove(pos);
        if let Some(&moved) = self.dense.get(pos) {
            if let Some(slot) = self.placed.get_mut(moved) {
                slot.pos = pos;
            }
        }
        Some(placed.value)
    }

    /// Handle at dense position `pos`, for `0 <= pos < len`.
    pub fn id_at(&self, pos: usize) -> Option<SlotId> {
        self.dense.get(pos).copied()
    }

    pub fn top_id(&self) -> Option<SlotId> {
        self.placed.front_id()
    }

    pub fn bottom_id(&self) -> Option<SlotId> {
        self.placed.back_id()
    }

    pub fn get(&self, id: SlotId) -> Option<&T> {
        self.placed.get(id).map(|slot| &slot.value)
    }

    pub fn get_mut(&mut self, id: SlotId) -> Option<&mut T> {
        self.placed.get_mut(id).map(|slot| &mut slot.value)
    }

    /// Iterates from the most recently placed slot to the earliest.
    pub fn iter(&self) -> DenseSlotsIter<'_, T> {
        DenseSlotsIter {
            inner: self.placed.iter(),
        }
    }

    pub fn clear(&mut self) {
        self.placed.clear();
        self.dense.clear();
    }

    pub fn validate(&self) -> Result<(), InvariantError> {
        self.placed.validate()?;
        if self.dense.len() != self.placed.len() {
            return Err(InvariantError::new(format!(
                "dense vector holds {} ids but placement list holds {}",
                self.dense.len(),
                self.placed.len()
            )));
        }
        for (pos, &id) in self.dense.iter().enumerate() {
            match self.placed.get(id) {
                Some(slot) if slot.pos == pos => {},
                Some(slot) => {
                    return Err(InvariantError::new(format!(
                        "slot at dense position {pos} records position {}",
                        slot.pos
                    )));
                },
                None => return Err(InvariantError::new("dense vector points at a freed slot")),
            }
        }
        Ok(())
    }
}

pub struct DenseSlotsIter<'a, T> {
    inner: IntrusiveListIter<'a, Placed<T>>,
}

impl<'a, T> Iterator for DenseSlotsIter<'a, T> {
    type Item = (SlotId, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(id, slot)| (id, &slot.value))
    }
}
