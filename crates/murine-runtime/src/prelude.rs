//! Murine Runtime Prelude: convenient imports for common usage.
//!
//! ```rust
//! use murine_runtime::prelude::*;
//! ```

// Re-export world
pub use crate::world::{AssayReading, SimulationWorld, WorldEvent, WorldSnapshot, WorldStats};

// Re-export configuration
pub use crate::config::{WorldConfig, LOCK_WINDOW_MS};

// Re-export gateway
pub use crate::gateway::{ChangeReceipt, ManualChange};

// Re-export seed data
pub use crate::seed::{standard_population, BEACH_MOUSE_ID, FIELD_MOUSE_ID};

// Re-export from core
pub use murine_core::prelude::*;
