//! Organism: a named collection of compartments.
//!
//! Aggregate queries here are the feedback inputs of the kinetic rules.
//! Each tick evaluates every substance against the organism as it was
//! before the tick, then applies all changes at once, so no substance
//! reacts to a change computed for another substance in the same tick.

use crate::compartment::Compartment;
use crate::error::{MurineError, Result};
use crate::history::{HistoryRing, LagMode};
use crate::kinetics::{KineticTable, StepContext};
use crate::types::{CompartmentFilter, CompartmentKind, Millis, Strain, SubstanceKind, TotalMode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Rendering-only flags (e.g. coat colour genetics). Opaque to kinetics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelProperties {
    flags: BTreeMap<String, bool>,
}

impl ModelProperties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_flag(mut self, name: impl Into<String>, value: bool) -> Self {
        self.set_flag(name, value);
        self
    }

    /// Unset flags read as `false`.
    pub fn flag(&self, name: &str) -> bool {
        self.flags.get(name).copied().unwrap_or(false)
    }

    pub fn set_flag(&mut self, name: impl Into<String>, value: bool) {
        self.flags.insert(name.into(), value);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organism {
    pub id: String,
    pub strain: Strain,
    compartments: BTreeMap<CompartmentKind, Compartment>,
    pub model_properties: ModelProperties,
}

impl Organism {
    pub fn new(id: impl Into<String>, strain: Strain) -> Self {
        Self {
            id: id.into(),
            strain,
            compartments: BTreeMap::new(),
            model_properties: ModelProperties::default(),
        }
    }

    pub fn with_model_properties(mut self, properties: ModelProperties) -> Self {
        self.model_properties = properties;
        self
    }

    /// Builder-style seeding of a confirmed level.
    pub fn with_level(
        mut self,
        compartment: CompartmentKind,
        substance: SubstanceKind,
        level: f64,
    ) -> Result<Self> {
        self.set_level(compartment, substance, level)?;
        Ok(self)
    }

    pub fn compartment(&self, kind: CompartmentKind) -> Option<&Compartment> {
        self.compartments.get(&kind)
    }

    /// Get-or-create for write paths.
    pub fn compartment_or_insert(&mut self, kind: CompartmentKind) -> &mut Compartment {
        self.compartments
            .entry(kind)
            .or_insert_with(|| Compartment::new(kind))
    }

    pub fn compartments(&self) -> impl Iterator<Item = &Compartment> {
        self.compartments.values()
    }

    pub fn level_of(&self, compartment: CompartmentKind, substance: SubstanceKind) -> f64 {
        self.compartment(compartment)
            .map_or(0.0, |c| c.level_of(substance))
    }

    pub fn delta_of(&self, compartment: CompartmentKind, substance: SubstanceKind) -> f64 {
        self.compartment(compartment)
            .map_or(0.0, |c| c.delta_of(substance))
    }

    /// Sum of `substance` over every compartment the filter matches.
    pub fn total_for(
        &self,
        filter: &CompartmentFilter,
        substance: SubstanceKind,
        mode: TotalMode,
    ) -> f64 {
        self.compartments
            .values()
            .filter(|c| filter.matches(c.kind))
            .map(|c| c.total(substance, mode))
            .sum()
    }

    /// `level + delta` summed over matching compartments.
    pub fn raw_total(&self, filter: &CompartmentFilter, substance: SubstanceKind) -> f64 {
        self.total_for(filter, substance, TotalMode::Raw)
    }

    /// `level + min(delta, 0)` summed over matching compartments.
    pub fn visual_total(&self, filter: &CompartmentFilter, substance: SubstanceKind) -> f64 {
        self.total_for(filter, substance, TotalMode::Visual)
    }

    /// Route a clamped increment to the named compartment, creating it if
    /// needed. Returns the change actually applied.
    pub fn increment_organelle_substance(
        &mut self,
        compartment: CompartmentKind,
        substance: SubstanceKind,
        amount: f64,
    ) -> f64 {
        self.compartment_or_insert(compartment)
            .increment_substance(substance, amount)
    }

    pub fn set_level(
        &mut self,
        compartment: CompartmentKind,
        substance: SubstanceKind,
        level: f64,
    ) -> Result<()> {
        if !level.is_finite() || level < 0.0 {
            return Err(MurineError::InvalidAmount {
                field: "level",
                value: level,
            });
        }
        self.compartment_or_insert(compartment)
            .set_level(substance, level);
        Ok(())
    }

    /// Suppress automatic kinetics for one substance until `until`.
    pub fn lock(&mut self, compartment: CompartmentKind, substance: SubstanceKind, until: Millis) {
        self.compartment_or_insert(compartment)
            .substance_or_insert(substance)
            .lock(until);
    }

    /// Run the kinetics for every substance present in this organism.
    ///
    /// Lagged feedback reads this organism's entry in the history ring
    /// selected by `lag`; if the ring holds no entry for it, the live state
    /// stands in. Returns the number of substances that changed.
    pub fn step(
        &mut self,
        time: Millis,
        history: &HistoryRing,
        lag: LagMode,
        table: &KineticTable,
    ) -> usize {
        let planned: Vec<(CompartmentKind, SubstanceKind, f64)> = {
            let live: &Organism = self;
            let lagged = history.lagged_organism(&live.id, lag).unwrap_or(live);
            let mut planned = Vec::new();
            for compartment in live.compartments.values() {
                let ctx = StepContext {
                    time,
                    organism: live,
                    compartment: compartment.kind,
                    lagged,
                    table,
                };
                for substance in compartment.substances() {
                    if let Some(delta) = substance.step_delta(&ctx) {
                        if delta != 0.0 {
                            planned.push((compartment.kind, substance.kind, delta));
                        }
                    }
                }
            }
            planned
        };

        let mut changed = 0;
        for (compartment, substance, delta) in planned {
            if self.increment_organelle_substance(compartment, substance, delta) != 0.0 {
                changed += 1;
            }
        }
        changed
    }

    /// Fold all pending deltas into levels.
    pub fn commit(&mut self) {
        for compartment in self.compartments.values_mut() {
            compartment.commit();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Organism {
        Organism::new("a", Strain::FieldMouse)
            .with_level(CompartmentKind::Nucleus, SubstanceKind::Hormone, 286.0)
            .unwrap()
            .with_level(CompartmentKind::Cytoplasm, SubstanceKind::Hormone, 10.0)
            .unwrap()
    }

    #[test]
    fn totals_sum_over_matching_compartments() {
        let a = sample();
        let both = CompartmentFilter::AnyOf(vec![CompartmentKind::Nucleus, CompartmentKind::Cytoplasm]);
        assert_eq!(a.raw_total(&both, SubstanceKind::Hormone), 296.0);
        assert_eq!(a.raw_total(&CompartmentFilter::All, SubstanceKind::Hormone), 296.0);
        assert_eq!(
            a.raw_total(&CompartmentFilter::Only(CompartmentKind::Cytoplasm), SubstanceKind::Hormone),
            10.0
        );
    }

    #[test]
    fn unknown_compartments_read_as_zero() {
        let a = sample();
        assert_eq!(a.level_of(CompartmentKind::Golgi, SubstanceKind::Hormone), 0.0);
        assert_eq!(a.delta_of(CompartmentKind::Golgi, SubstanceKind::Hormone), 0.0);
        assert!(a.compartment(CompartmentKind::Golgi).is_none());
    }

    #[test]
    fn increment_creates_compartment_lazily() {
        let mut a = sample();
        a.increment_organelle_substance(CompartmentKind::Golgi, SubstanceKind::Eumelanin, 3.0);
        assert_eq!(a.delta_of(CompartmentKind::Golgi, SubstanceKind::Eumelanin), 3.0);
    }

    #[test]
    fn negative_or_nan_levels_are_rejected() {
        let mut a = sample();
        assert!(a.set_level(CompartmentKind::Nucleus, SubstanceKind::Hormone, -1.0).is_err());
        assert!(a.set_level(CompartmentKind::Nucleus, SubstanceKind::Hormone, f64::NAN).is_err());
        assert_eq!(a.level_of(CompartmentKind::Nucleus, SubstanceKind::Hormone), 286.0);
    }

    #[test]
    fn model_properties_default_to_false() {
        let props = ModelProperties::new().with_flag("agouti", true);
        assert!(props.flag("agouti"));
        assert!(!props.flag("extension"));
    }

    #[test]
    fn commit_folds_every_compartment() {
        let mut a = sample();
        a.increment_organelle_substance(CompartmentKind::Nucleus, SubstanceKind::Hormone, -86.0);
        a.commit();
        assert_eq!(a.level_of(CompartmentKind::Nucleus, SubstanceKind::Hormone), 200.0);
        assert_eq!(a.delta_of(CompartmentKind::Nucleus, SubstanceKind::Hormone), 0.0);
    }

    #[test]
    fn step_without_matching_rules_changes_nothing() {
        let mut a = sample();
        let before = a.clone();
        let history = HistoryRing::new(4);
        let changed = a.step(0, &history, LagMode::OldestSlot, &KineticTable::empty());
        assert_eq!(changed, 0);
        assert_eq!(a, before);
    }
}
