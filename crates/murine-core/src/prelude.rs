//! Murine Core Prelude: convenient imports for common usage.
//!
//! ```rust
//! use murine_core::prelude::*;
//! ```

// Re-export commonly used types
pub use crate::types::{
    CompartmentFilter, CompartmentKind, CompartmentRef,
    Millis, Naming, Strain, SubstanceKind, TotalMode,
};

pub use crate::substance::Substance;
pub use crate::compartment::Compartment;
pub use crate::organism::{ModelProperties, Organism};
pub use crate::history::{HistoryEntry, HistoryRing, LagMode};
pub use crate::kinetics::{
    FeedbackSource, KineticRule, KineticTable, RateTerm, Rates, StepContext,
};

// Re-export error types
pub use crate::error::{ConfigError, MurineError, Result};
