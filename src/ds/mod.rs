pub mod dense_slots;
pub mod intrusive_list;
pub mod ranked_set;
pub mod slot_arena;

pub use dense_slots::DenseSlots;
pub use intrusive_list::IntrusiveList;
pub use ranked_set::RankedSet;
pub use slot_arena::{SlotArena, SlotId};
