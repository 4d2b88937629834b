//! # Murine Core
//!
//! Data model and kinetics for organelle-level mouse cell simulations.
//!
//! An [`Organism`](organism::Organism) holds [`Compartment`](compartment::Compartment)s,
//! each holding [`Substance`](substance::Substance)s. Once per tick every
//! substance computes a birth and a death rate from the kinetic table,
//! reading live aggregates of its organism and lagged aggregates from the
//! [`HistoryRing`](history::HistoryRing).
//!
//! ## Quick Start
//!
//! ```rust
//! use murine_core::prelude::*;
//!
//! let mouse = Organism::new("field-mouse", Strain::FieldMouse)
//!     .with_level(CompartmentKind::Nucleus, SubstanceKind::Hormone, 286.0)?
//!     .with_level(CompartmentKind::Cytoplasm, SubstanceKind::Hormone, 10.0)?;
//!
//! assert_eq!(mouse.raw_total(&CompartmentFilter::All, SubstanceKind::Hormone), 296.0);
//! # Ok::<(), MurineError>(())
//! ```

pub mod types;
pub mod substance;
pub mod compartment;
pub mod organism;
pub mod history;
pub mod kinetics;
pub mod error;
pub mod prelude;
