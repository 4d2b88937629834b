//! SimulationWorld: the tick driver.
//!
//! Each step:
//! 1. A deep copy of every organism is pushed onto the history ring
//!    (evicting the oldest entry when full)
//! 2. Every organism runs its kinetics at the current clock
//! 3. The clock advances by `dt`
//!
//! State changes are reported as [`WorldEvent`]s: returned from the call
//! that caused them, kept in the event history, and sent to every
//! receiver handed out by [`SimulationWorld::subscribe`].

use crate::config::WorldConfig;
use crate::seed::standard_population;
use murine_core::error::{MurineError, Result};
use murine_core::history::{HistoryEntry, HistoryRing};
use murine_core::kinetics::KineticTable;
use murine_core::organism::{ModelProperties, Organism};
use murine_core::types::*;
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::mpsc::{self, Receiver, Sender};
use tracing::{debug, info, warn};

/// Event emitted by the world.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum WorldEvent {
    /// An organism joined the world.
    OrganismAdded { id: String, strain: Strain },
    /// A tick completed.
    TickComplete {
        /// Clock value the tick was evaluated at.
        time: Millis,
        dt: Millis,
        substances_changed: usize,
        history_len: usize,
    },
    /// A user edit went through the manipulation gateway.
    ManualChange {
        target: CompartmentRef,
        substance: SubstanceKind,
        requested: f64,
        applied: f64,
        lock_until: Millis,
    },
    /// Pending deltas were folded into levels.
    Committed { time: Millis },
}

/// Statistics about the world.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorldStats {
    pub time: Millis,
    pub ticks: u64,
    pub organisms: usize,
    pub compartments: usize,
    pub substances: usize,
    pub locked_substances: usize,
    pub history_len: usize,
    pub history_capacity: usize,
}

/// A serializable copy of the world at a point in time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorldSnapshot {
    pub time: Millis,
    pub ticks: u64,
    pub organisms: Vec<Organism>,
    pub stats: WorldStats,
}

/// What a chart needs for one substance in one compartment.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct AssayReading {
    pub level: f64,
    pub delta: f64,
    pub visual: f64,
    pub raw: f64,
}

pub struct SimulationWorld {
    pub(crate) config: WorldConfig,
    pub(crate) kinetics: KineticTable,
    pub(crate) organisms: Vec<Organism>,
    pub(crate) history: HistoryRing,
    pub(crate) time: Millis,
    ticks: u64,
    event_history: VecDeque<(Millis, WorldEvent)>,
    subscribers: Vec<Sender<WorldEvent>>,
}

impl Default for SimulationWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulationWorld {
    /// Create an empty world with default configuration.
    pub fn new() -> Self {
        Self::build(WorldConfig::default())
    }

    /// Create an empty world with the specified configuration.
    pub fn from_config(config: WorldConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    /// A default world holding the standard two-strain population.
    pub fn seeded() -> Result<Self> {
        let mut world = Self::new();
        for organism in standard_population()? {
            world.add_organism(organism)?;
        }
        Ok(world)
    }

    fn build(config: WorldConfig) -> Self {
        Self {
            kinetics: KineticTable::standard().with_time_constant(config.kinetic_time_constant),
            history: HistoryRing::new(config.history_capacity),
            config,
            organisms: Vec::new(),
            time: 0,
            ticks: 0,
            event_history: VecDeque::new(),
            subscribers: Vec::new(),
        }
    }

    /// Replace the kinetic table. The configured time constant still applies.
    pub fn with_kinetics(mut self, table: KineticTable) -> Self {
        self.kinetics = table.with_time_constant(self.config.kinetic_time_constant);
        self
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn kinetics(&self) -> &KineticTable {
        &self.kinetics
    }

    /// Current simulation clock.
    pub fn time(&self) -> Millis {
        self.time
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn history(&self) -> &HistoryRing {
        &self.history
    }

    pub fn event_history(&self) -> &VecDeque<(Millis, WorldEvent)> {
        &self.event_history
    }

    /// Receive every event emitted from now on.
    pub fn subscribe(&mut self) -> Receiver<WorldEvent> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    /// Add an organism. Ids must be unique.
    pub fn add_organism(&mut self, organism: Organism) -> Result<()> {
        if self.organism(&organism.id).is_some() {
            warn!(id = %organism.id, "rejected duplicate organism");
            return Err(MurineError::DuplicateOrganism(organism.id));
        }
        let event = WorldEvent::OrganismAdded {
            id: organism.id.clone(),
            strain: organism.strain,
        };
        self.organisms.push(organism);
        self.emit(event);
        Ok(())
    }

    pub fn organisms(&self) -> &[Organism] {
        &self.organisms
    }

    pub fn organism(&self, id: &str) -> Option<&Organism> {
        self.organisms.iter().find(|o| o.id == id)
    }

    pub(crate) fn organism_mut(&mut self, id: &str) -> Result<&mut Organism> {
        self.organisms
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or_else(|| MurineError::unknown_organism(id))
    }

    /// Write access to the rendering flags of one organism.
    pub fn model_properties_mut(&mut self, id: &str) -> Result<&mut ModelProperties> {
        Ok(&mut self.organism_mut(id)?.model_properties)
    }

    /// Advance the simulation by one tick of `dt` milliseconds.
    pub fn step(&mut self, dt: Millis) -> Vec<WorldEvent> {
        self.history
            .push(HistoryEntry::new(self.time, self.organisms.clone()));

        let mut substances_changed = 0;
        for organism in &mut self.organisms {
            substances_changed +=
                organism.step(self.time, &self.history, self.config.lag_mode, &self.kinetics);
        }

        let event = WorldEvent::TickComplete {
            time: self.time,
            dt,
            substances_changed,
            history_len: self.history.len(),
        };
        debug!(
            time = self.time,
            dt,
            substances_changed,
            history_len = self.history.len(),
            "tick complete"
        );

        self.time = self.time.saturating_add(dt);
        self.ticks += 1;
        self.emit(event.clone());
        vec![event]
    }

    /// Run multiple ticks at the configured cadence.
    pub fn run(&mut self, ticks: u64) -> Vec<Vec<WorldEvent>> {
        let dt = self.config.tick_ms;
        (0..ticks).map(|_| self.step(dt)).collect()
    }

    /// Fold every pending delta into its level (start a new generation).
    pub fn commit(&mut self) -> WorldEvent {
        for organism in &mut self.organisms {
            organism.commit();
        }
        info!(time = self.time, "committed pending deltas");
        let event = WorldEvent::Committed { time: self.time };
        self.emit(event.clone());
        event
    }

    pub fn level_of(&self, id: &str, compartment: CompartmentKind, substance: SubstanceKind) -> f64 {
        self.organism(id)
            .map_or(0.0, |o| o.level_of(compartment, substance))
    }

    pub fn delta_of(&self, id: &str, compartment: CompartmentKind, substance: SubstanceKind) -> f64 {
        self.organism(id)
            .map_or(0.0, |o| o.delta_of(compartment, substance))
    }

    /// Aggregate for one organism; zero if the organism is unknown.
    pub fn total_for(
        &self,
        id: &str,
        filter: &CompartmentFilter,
        substance: SubstanceKind,
        mode: TotalMode,
    ) -> f64 {
        self.organism(id)
            .map_or(0.0, |o| o.total_for(filter, substance, mode))
    }

    /// Chart values for an assay target; all zero if nothing is there yet.
    pub fn assay(&self, target: &CompartmentRef, substance: SubstanceKind) -> AssayReading {
        let Some(compartment) = self
            .organism(&target.organism_id)
            .and_then(|o| o.compartment(target.compartment))
        else {
            return AssayReading::default();
        };
        AssayReading {
            level: compartment.level_of(substance),
            delta: compartment.delta_of(substance),
            visual: compartment.total(substance, TotalMode::Visual),
            raw: compartment.total(substance, TotalMode::Raw),
        }
    }

    pub fn stats(&self) -> WorldStats {
        let compartments = self.organisms.iter().flat_map(|o| o.compartments());
        let mut compartment_count = 0;
        let mut substances = 0;
        let mut locked_substances = 0;
        for compartment in compartments {
            compartment_count += 1;
            for substance in compartment.substances() {
                substances += 1;
                if substance.is_locked(self.time) {
                    locked_substances += 1;
                }
            }
        }
        WorldStats {
            time: self.time,
            ticks: self.ticks,
            organisms: self.organisms.len(),
            compartments: compartment_count,
            substances,
            locked_substances,
            history_len: self.history.len(),
            history_capacity: self.history.capacity(),
        }
    }

    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            time: self.time,
            ticks: self.ticks,
            organisms: self.organisms.clone(),
            stats: self.stats(),
        }
    }

    /// Serialize the current snapshot as pretty JSON.
    pub fn snapshot_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.snapshot())?)
    }

    pub(crate) fn emit(&mut self, event: WorldEvent) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
        if self.event_history.len() >= self.config.event_history_capacity {
            self.event_history.pop_front();
        }
        self.event_history.push_back((self.time, event));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::{BEACH_MOUSE_ID, FIELD_MOUSE_ID};

    #[test]
    fn step_snapshots_then_advances_clock() {
        let mut world = SimulationWorld::seeded().unwrap();
        let events = world.step(100);
        assert_eq!(world.time(), 100);
        assert_eq!(world.ticks(), 1);
        assert_eq!(world.history().len(), 1);
        assert_eq!(world.history().newest().unwrap().time, 0);
        assert!(matches!(events[0], WorldEvent::TickComplete { time: 0, dt: 100, .. }));
    }

    #[test]
    fn run_uses_configured_cadence() {
        let config = WorldConfig {
            tick_ms: 250,
            ..WorldConfig::default()
        };
        let mut world = SimulationWorld::from_config(config).unwrap();
        world.run(4);
        assert_eq!(world.time(), 1000);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = WorldConfig {
            tick_ms: 0,
            ..WorldConfig::default()
        };
        assert!(SimulationWorld::from_config(config).is_err());
    }

    #[test]
    fn duplicate_organisms_are_rejected() {
        let mut world = SimulationWorld::seeded().unwrap();
        let err = world
            .add_organism(Organism::new(FIELD_MOUSE_ID, Strain::FieldMouse))
            .unwrap_err();
        assert_eq!(err, MurineError::DuplicateOrganism(FIELD_MOUSE_ID.into()));
        assert_eq!(world.organisms().len(), 2);
    }

    #[test]
    fn reads_of_unknown_targets_are_zero() {
        let world = SimulationWorld::seeded().unwrap();
        assert_eq!(world.level_of("ghost", CompartmentKind::Nucleus, SubstanceKind::Hormone), 0.0);
        assert_eq!(
            world.total_for("ghost", &CompartmentFilter::All, SubstanceKind::Hormone, TotalMode::Raw),
            0.0
        );
        let reading = world.assay(
            &CompartmentRef::new(BEACH_MOUSE_ID, CompartmentKind::Gate),
            SubstanceKind::Pheomelanin,
        );
        assert_eq!(reading, AssayReading::default());
        let reading = world.assay(
            &CompartmentRef::new("ghost", CompartmentKind::Golgi),
            SubstanceKind::Pheomelanin,
        );
        assert_eq!(reading, AssayReading::default());

        let seeded = world.assay(
            &CompartmentRef::new(BEACH_MOUSE_ID, CompartmentKind::Golgi),
            SubstanceKind::Pheomelanin,
        );
        assert_eq!(seeded.level, 15.0);
        assert_eq!(seeded.raw, 15.0);
    }

    #[test]
    fn event_history_is_bounded() {
        let config = WorldConfig {
            event_history_capacity: 8,
            ..WorldConfig::default()
        };
        let mut world = SimulationWorld::from_config(config).unwrap();
        world.run(50);
        assert_eq!(world.event_history().len(), 8);
        let times: Vec<Millis> = world.event_history().iter().map(|(t, _)| *t).collect();
        let expected: Vec<Millis> = (43..=50).map(|t| t * 100).collect();
        assert_eq!(times, expected);
    }

    #[test]
    fn subscribers_receive_events() {
        let mut world = SimulationWorld::new();
        let rx = world.subscribe();
        world.add_organism(Organism::new("solo", Strain::BeachMouse)).unwrap();
        world.step(100);
        let received: Vec<WorldEvent> = rx.try_iter().collect();
        assert_eq!(received.len(), 2);
        assert!(matches!(received[0], WorldEvent::OrganismAdded { .. }));
        assert!(matches!(received[1], WorldEvent::TickComplete { .. }));
    }

    #[test]
    fn dropped_subscribers_are_pruned() {
        let mut world = SimulationWorld::new();
        drop(world.subscribe());
        world.step(100);
        assert!(world.subscribers.is_empty());
        assert_eq!(world.event_history().len(), 1);
    }

    #[test]
    fn commit_clears_pending_deltas() {
        let mut world = SimulationWorld::seeded().unwrap();
        world.run(10);
        let raw_before = world.total_for(
            FIELD_MOUSE_ID,
            &CompartmentFilter::All,
            SubstanceKind::Eumelanin,
            TotalMode::Raw,
        );
        world.commit();
        let mouse = world.organism(FIELD_MOUSE_ID).unwrap();
        for compartment in mouse.compartments() {
            for substance in compartment.substances() {
                assert_eq!(substance.pending_delta(), 0.0);
            }
        }
        let raw_after = world.total_for(
            FIELD_MOUSE_ID,
            &CompartmentFilter::All,
            SubstanceKind::Eumelanin,
            TotalMode::Raw,
        );
        assert!((raw_before - raw_after).abs() < 1e-9);
    }

    #[test]
    fn stats_count_structure() {
        let world = SimulationWorld::seeded().unwrap();
        let stats = world.stats();
        assert_eq!(stats.organisms, 2);
        assert_eq!(stats.history_capacity, 20);
        assert_eq!(stats.locked_substances, 0);
        assert!(stats.substances >= stats.compartments);
    }

    #[test]
    fn snapshot_serializes_to_json() {
        let world = SimulationWorld::seeded().unwrap();
        let json = world.snapshot_json().unwrap();
        assert!(json.contains("\"field-mouse\""));
        assert!(json.contains("\"signal-protein\""));
    }

    #[test]
    fn model_properties_are_writable_by_id() {
        let mut world = SimulationWorld::seeded().unwrap();
        world
            .model_properties_mut(BEACH_MOUSE_ID)
            .unwrap()
            .set_flag("highlight", true);
        assert!(world.organism(BEACH_MOUSE_ID).unwrap().model_properties.flag("highlight"));
        assert!(world.model_properties_mut("ghost").is_err());
    }
}
