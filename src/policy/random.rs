//! Victim selection for the Random policy.
//!
//! The store keeps Random entries in dense positions
//! ([`DenseSlots`](crate::ds::DenseSlots)), so choosing a victim is drawing
//! one index in `0..len`:
//!
//! ```text
//!   dense: [ A | B | C | D ]        pick(4) → 1
//!                ▲
//!              victim B, then D is swapped into position 1
//! ```
//!
//! Positions only serve the draw; top and bottom follow placement order.
//! The generator is owned by the cache, not shared across the process. A
//! fixed seed makes the sequence of victims reproducible.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

#[derive(Debug, Clone)]
pub struct VictimPicker {
    rng: SmallRng,
}

impl VictimPicker {
    /// Deterministic picker: the same seed yields the same victims.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Picker seeded from the operating system.
    pub fn from_entropy() -> Self {
        Self {
            rng: SmallRng::from_os_rng(),
        }
    }

    pub fn new(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::from_entropy(),
        }
    }

    /// Uniform index in `0..len`, or `None` when `len` is zero.
    pub fn pick(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        Some(self.rng.random_range(0..len))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_range_yields_none() {
        let mut picker = VictimPicker::seeded(1);
        assert_eq!(picker.pick(0), None);
    }

    #[test]
    fn picks_stay_in_range() {
        let mut picker = VictimPicker::from_entropy();
        for len in 1..50 {
            let idx = picker.pick(len).unwrap();
            assert!(idx < len);
        }
    }

    #[test]
    fn same_seed_same_sequence() {
        let mut a = VictimPicker::seeded(42);
        let mut b = VictimPicker::new(Some(42));
        let seq_a: Vec<_> = (0..32).map(|_| a.pick(10)).collect();
        let seq_b: Vec<_> = (0..32).map(|_| b.pick(10)).collect();
        assert_eq!(seq_a, seq_b);
    }

    #[test]
    fn every_index_is_reachable() {
        let mut picker = VictimPicker::seeded(7);
        let mut seen = [false; 4];
        for _ in 0..1_000 {
            seen[picker.pick(4).unwrap()] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }
}
