//! # Murine
//!
//! Substance kinetics for an organelle-level mouse cell simulation.
//!
//! Organisms are made of compartments (nucleus, cytoplasm, melanosomes,
//! ...) that hold substances (hormone, signal protein, eumelanin,
//! pheomelanin). A tick-driven world advances every substance by a
//! birth/death rule that reads live and lagged aggregates, and a
//! manipulation gateway lets a user add or remove substance with a
//! temporary lock on the automatic kinetics.
//!
//! ## Quick Start
//!
//! ```rust
//! use murine::prelude::*;
//!
//! // Two mice, one per strain
//! let mut world = SimulationWorld::seeded()?;
//!
//! // Inject hormone into the field mouse's extracellular space
//! world.apply_manual_change_now(&ManualChange::new(
//!     FIELD_MOUSE_ID,
//!     CompartmentKind::Extracellular,
//!     SubstanceKind::Hormone,
//!     200.0,
//! ))?;
//!
//! // Run at the default 100 ms cadence
//! world.run(50);
//!
//! let reading = world.assay(
//!     &CompartmentRef::new(FIELD_MOUSE_ID, CompartmentKind::Melanosomes),
//!     SubstanceKind::Eumelanin,
//! );
//! println!("eumelanin: {:.1} (+{:.1})", reading.level, reading.delta);
//! # Ok::<(), MurineError>(())
//! ```
//!
//! ## Architecture
//!
//! - [`core`] - Kinds, substances, compartments, organisms, history ring, kinetic table
//! - [`runtime`] - Simulation world, configuration, manipulation gateway, seed data
//!
//! ## Tick Order
//!
//! | Phase | What happens |
//! |-------|--------------|
//! | Snapshot | Deep copy of all organisms pushed onto the history ring |
//! | Kinetics | Every substance evaluated against the pre-tick state, then applied |
//! | Advance | Clock moves forward by `dt` |

// Re-export all subcrates
pub use murine_core as core;
pub use murine_runtime as runtime;

/// Prelude module for convenient imports.
///
/// ```rust
/// use murine::prelude::*;
/// ```
pub mod prelude {
    pub use murine_runtime::prelude::*;
}
