//! History ring: bounded FIFO of past organism-set snapshots.
//!
//! Entries are owned deep copies. Nothing in an entry is shared with the
//! live organisms, so later mutation of the world cannot change what a
//! lagged lookup sees.

use crate::organism::Organism;
use crate::types::{CompartmentFilter, Millis, SubstanceKind, TotalMode};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Which entry a lagged kinetic term reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LagMode {
    /// Always the oldest retained entry. The effective lag grows while the
    /// ring fills and then stays at `capacity - 1` ticks.
    #[default]
    OldestSlot,
    /// The entry `n` ticks before the newest, or the oldest if the ring is
    /// not yet that deep.
    FixedTicks(usize),
}

/// One frozen copy of every organism, taken at the start of a tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub time: Millis,
    pub organisms: Vec<Organism>,
}

impl HistoryEntry {
    pub fn new(time: Millis, organisms: Vec<Organism>) -> Self {
        Self { time, organisms }
    }

    pub fn organism(&self, id: &str) -> Option<&Organism> {
        self.organisms.iter().find(|o| o.id == id)
    }

    /// Raw aggregate for one organism in this entry; zero if it is absent.
    pub fn total_for(&self, id: &str, filter: &CompartmentFilter, substance: SubstanceKind) -> f64 {
        self.organism(id)
            .map_or(0.0, |o| o.total_for(filter, substance, TotalMode::Raw))
    }
}

#[derive(Debug, Clone)]
pub struct HistoryRing {
    capacity: usize,
    entries: VecDeque<HistoryEntry>,
}

impl HistoryRing {
    /// A ring holding at most `capacity` entries (at least one).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append an entry, evicting the oldest first when full.
    pub fn push(&mut self, entry: HistoryEntry) -> Option<HistoryEntry> {
        let evicted = if self.entries.len() >= self.capacity {
            self.entries.pop_front()
        } else {
            None
        };
        self.entries.push_back(entry);
        evicted
    }

    pub fn oldest(&self) -> Option<&HistoryEntry> {
        self.entries.front()
    }

    pub fn newest(&self) -> Option<&HistoryEntry> {
        self.entries.back()
    }

    /// Entry by age order, 0 being the oldest.
    pub fn get(&self, index: usize) -> Option<&HistoryEntry> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    /// The entry a lagged term reads under `mode`.
    pub fn lagged_entry(&self, mode: LagMode) -> Option<&HistoryEntry> {
        match mode {
            LagMode::OldestSlot => self.oldest(),
            LagMode::FixedTicks(n) => {
                let newest = self.entries.len().checked_sub(1)?;
                self.entries.get(newest.saturating_sub(n))
            }
        }
    }

    pub fn lagged_organism(&self, id: &str, mode: LagMode) -> Option<&Organism> {
        self.lagged_entry(mode)?.organism(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CompartmentKind, Strain};

    fn entry(time: Millis, hormone: f64) -> HistoryEntry {
        let organism = Organism::new("a", Strain::FieldMouse)
            .with_level(CompartmentKind::Receptor, SubstanceKind::Hormone, hormone)
            .unwrap();
        HistoryEntry::new(time, vec![organism])
    }

    #[test]
    fn push_evicts_oldest_first() {
        let mut ring = HistoryRing::new(3);
        for t in 0..3 {
            assert!(ring.push(entry(t, t as f64)).is_none());
        }
        let evicted = ring.push(entry(3, 3.0)).unwrap();
        assert_eq!(evicted.time, 0);
        assert_eq!(ring.len(), 3);
        assert_eq!(ring.oldest().unwrap().time, 1);
        assert_eq!(ring.newest().unwrap().time, 3);
    }

    #[test]
    fn zero_capacity_is_raised_to_one() {
        let mut ring = HistoryRing::new(0);
        ring.push(entry(0, 1.0));
        ring.push(entry(1, 2.0));
        assert_eq!(ring.capacity(), 1);
        assert_eq!(ring.len(), 1);
        assert_eq!(ring.oldest().unwrap().time, 1);
    }

    #[test]
    fn oldest_slot_lag_reads_front() {
        let mut ring = HistoryRing::new(5);
        for t in 0..4 {
            ring.push(entry(t * 100, t as f64));
        }
        assert_eq!(ring.lagged_entry(LagMode::OldestSlot).unwrap().time, 0);
    }

    #[test]
    fn fixed_tick_lag_counts_back_from_newest() {
        let mut ring = HistoryRing::new(5);
        for t in 0..4 {
            ring.push(entry(t * 100, t as f64));
        }
        assert_eq!(ring.lagged_entry(LagMode::FixedTicks(0)).unwrap().time, 300);
        assert_eq!(ring.lagged_entry(LagMode::FixedTicks(2)).unwrap().time, 100);
        // Deeper than the ring: falls back to the oldest.
        assert_eq!(ring.lagged_entry(LagMode::FixedTicks(9)).unwrap().time, 0);
    }

    #[test]
    fn empty_ring_has_no_lagged_entry() {
        let ring = HistoryRing::new(5);
        assert!(ring.lagged_entry(LagMode::OldestSlot).is_none());
        assert!(ring.lagged_entry(LagMode::FixedTicks(1)).is_none());
    }

    #[test]
    fn entry_totals_read_zero_for_unknown_organisms() {
        let e = entry(0, 12.0);
        let receptor = CompartmentFilter::Only(CompartmentKind::Receptor);
        assert_eq!(e.total_for("a", &receptor, SubstanceKind::Hormone), 12.0);
        assert_eq!(e.total_for("b", &receptor, SubstanceKind::Hormone), 0.0);
    }
}
