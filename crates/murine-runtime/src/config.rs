//! World configuration.

use murine_core::error::{ConfigError, MurineError, Result};
use murine_core::history::LagMode;
use murine_core::kinetics::DEFAULT_TIME_CONSTANT;
use murine_core::types::Millis;
use serde::{Deserialize, Serialize};

/// How long a manual change suppresses automatic kinetics.
pub const LOCK_WINDOW_MS: Millis = 3500;

/// Snapshots retained for lagged lookups.
pub const DEFAULT_HISTORY_CAPACITY: usize = 20;

/// Cadence of the external scheduler.
pub const DEFAULT_TICK_MS: Millis = 100;

/// Events retained by `SimulationWorld::event_history`.
pub const DEFAULT_EVENT_HISTORY_CAPACITY: usize = 1_000;

const MAX_HISTORY_CAPACITY: usize = 10_000;
const MAX_EVENT_HISTORY_CAPACITY: usize = 1_000_000;

/// Tunable simulation parameters. Use with `SimulationWorld::from_config()`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Clock advance used by `run` (default: 100).
    pub tick_ms: Millis,
    /// Maximum snapshots in the history ring (default: 20).
    pub history_capacity: usize,
    /// Maximum events kept in the event log, oldest dropped first (default: 1000).
    pub event_history_capacity: usize,
    /// Manual-change lock window (default: 3500).
    pub lock_window_ms: Millis,
    /// Divisor applied to every kinetic rate (default: 10.0).
    pub kinetic_time_constant: f64,
    /// Which history entry lagged terms read (default: oldest slot).
    pub lag_mode: LagMode,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            tick_ms: DEFAULT_TICK_MS,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            event_history_capacity: DEFAULT_EVENT_HISTORY_CAPACITY,
            lock_window_ms: LOCK_WINDOW_MS,
            kinetic_time_constant: DEFAULT_TIME_CONSTANT,
            lag_mode: LagMode::OldestSlot,
        }
    }
}

impl WorldConfig {
    pub fn validate(&self) -> Result<()> {
        if self.tick_ms == 0 {
            return Err(MurineError::invalid_config("tick_ms", "0", "ticks must advance the clock"));
        }
        if self.history_capacity == 0 || self.history_capacity > MAX_HISTORY_CAPACITY {
            return Err(ConfigError::OutOfRange {
                field: "history_capacity".into(),
                min: 1.0,
                max: MAX_HISTORY_CAPACITY as f64,
                value: self.history_capacity as f64,
            }
            .into());
        }
        if self.event_history_capacity == 0 || self.event_history_capacity > MAX_EVENT_HISTORY_CAPACITY {
            return Err(ConfigError::OutOfRange {
                field: "event_history_capacity".into(),
                min: 1.0,
                max: MAX_EVENT_HISTORY_CAPACITY as f64,
                value: self.event_history_capacity as f64,
            }
            .into());
        }
        if !(self.kinetic_time_constant.is_finite() && self.kinetic_time_constant > 0.0) {
            return Err(MurineError::invalid_config(
                "kinetic_time_constant",
                self.kinetic_time_constant.to_string(),
                "must be a positive number",
            ));
        }
        if self.lag_mode == LagMode::FixedTicks(0) {
            return Err(MurineError::invalid_config(
                "lag_mode",
                "fixed-ticks = 0",
                "a lag of zero ticks reads the current state",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = WorldConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.lock_window_ms, 3500);
        assert_eq!(config.history_capacity, 20);
    }

    #[test]
    fn zero_capacity_is_out_of_range() {
        let config = WorldConfig {
            history_capacity: 0,
            ..WorldConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(MurineError::Config(ConfigError::OutOfRange { .. }))
        ));
    }

    #[test]
    fn event_history_capacity_must_be_positive() {
        let config = WorldConfig {
            event_history_capacity: 0,
            ..WorldConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(MurineError::Config(ConfigError::OutOfRange { ref field, .. })) if field == "event_history_capacity"
        ));
    }

    #[test]
    fn non_positive_time_constant_is_rejected() {
        for bad in [0.0, -1.0, f64::NAN] {
            let config = WorldConfig {
                kinetic_time_constant: bad,
                ..WorldConfig::default()
            };
            assert!(config.validate().is_err(), "{} should be rejected", bad);
        }
    }

    #[test]
    fn zero_tick_lag_is_rejected() {
        let config = WorldConfig {
            lag_mode: LagMode::FixedTicks(0),
            ..WorldConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: WorldConfig = serde_json::from_str(r#"{ "tick_ms": 50 }"#).unwrap();
        assert_eq!(config.tick_ms, 50);
        assert_eq!(config.history_capacity, DEFAULT_HISTORY_CAPACITY);
        assert_eq!(config.lag_mode, LagMode::OldestSlot);
    }

    #[test]
    fn lag_mode_deserializes_from_kebab_case() {
        let config: WorldConfig =
            serde_json::from_str(r#"{ "lag_mode": { "fixed-ticks": 3 } }"#).unwrap();
        assert_eq!(config.lag_mode, LagMode::FixedTicks(3));
    }
}
