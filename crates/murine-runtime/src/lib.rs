//! # Murine Runtime
//!
//! World management and the tick-based simulation loop.
//!
//! The [`SimulationWorld`](world::SimulationWorld) owns the organisms, the
//! simulation clock and the history ring. Callers serialize access: a
//! `step` or a manual change runs to completion before the next call.

pub mod config;
pub mod world;
pub mod gateway;
pub mod seed;
pub mod prelude;
