//! Compartment (organelle): a named subdivision of an organism.

use crate::substance::Substance;
use crate::types::{CompartmentKind, SubstanceKind, TotalMode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Substances are created on first write and never removed; zero is a
/// valid resting state. Read accessors never insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Compartment {
    pub kind: CompartmentKind,
    substances: BTreeMap<SubstanceKind, Substance>,
}

impl Compartment {
    pub fn new(kind: CompartmentKind) -> Self {
        Self {
            kind,
            substances: BTreeMap::new(),
        }
    }

    pub fn substance(&self, kind: SubstanceKind) -> Option<&Substance> {
        self.substances.get(&kind)
    }

    /// Get-or-create for write paths.
    pub fn substance_or_insert(&mut self, kind: SubstanceKind) -> &mut Substance {
        self.substances
            .entry(kind)
            .or_insert_with(|| Substance::new(kind))
    }

    pub fn substances(&self) -> impl Iterator<Item = &Substance> {
        self.substances.values()
    }

    /// Confirmed level, or 0 if the substance was never written here.
    pub fn level_of(&self, kind: SubstanceKind) -> f64 {
        self.substance(kind).map_or(0.0, Substance::level)
    }

    /// Pending delta, or 0 if absent.
    pub fn delta_of(&self, kind: SubstanceKind) -> f64 {
        self.substance(kind).map_or(0.0, Substance::pending_delta)
    }

    pub fn total(&self, kind: SubstanceKind, mode: TotalMode) -> f64 {
        self.substance(kind).map_or(0.0, |s| match mode {
            TotalMode::Raw => s.raw_amount(),
            TotalMode::Visual => s.visual_amount(),
        })
    }

    /// Apply a clamped increment against the current level as baseline.
    /// Returns the change actually applied.
    pub fn increment_substance(&mut self, kind: SubstanceKind, amount: f64) -> f64 {
        self.substance_or_insert(kind).apply_increment(amount)
    }

    pub fn set_level(&mut self, kind: SubstanceKind, level: f64) {
        self.substance_or_insert(kind).set_level(level);
    }

    pub fn commit(&mut self) {
        for substance in self.substances.values_mut() {
            substance.commit();
        }
    }
}
