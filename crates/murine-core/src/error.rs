//! Error types for simulation operations.
//!
//! Read paths never produce errors: a missing organism, compartment or
//! substance simply reads as zero. Errors are reserved for writes against
//! targets that do not exist and for values that cannot be interpreted.

use thiserror::Error;

/// Result type for simulation operations.
pub type Result<T> = std::result::Result<T, MurineError>;

/// Errors that can occur while building or driving a simulation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MurineError {
    /// A string did not name a member of a closed enumeration.
    #[error("Invalid {kind} value: {value:?}")]
    InvalidEnumValue { kind: &'static str, value: String },

    /// A write addressed an organism id that is not part of the world.
    #[error("Unknown organism: {0}")]
    UnknownOrganism(String),

    /// An organism with this id is already part of the world.
    #[error("Duplicate organism: {0}")]
    DuplicateOrganism(String),

    /// An amount was NaN, infinite, or negative where only levels are allowed.
    #[error("Invalid amount for {field}: {value}")]
    InvalidAmount { field: &'static str, value: f64 },

    /// Configuration errors.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Serialization errors.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Configuration errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Invalid value.
    #[error("Invalid value for {field}: {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
    /// Out of range.
    #[error("{field} out of range: {value} (must be {min}-{max})")]
    OutOfRange {
        field: String,
        min: f64,
        max: f64,
        value: f64,
    },
}

impl From<serde_json::Error> for MurineError {
    fn from(e: serde_json::Error) -> Self {
        MurineError::Serialization(e.to_string())
    }
}

// Convenience constructors
impl MurineError {
    pub fn invalid_enum(kind: &'static str, value: impl Into<String>) -> Self {
        MurineError::InvalidEnumValue {
            kind,
            value: value.into(),
        }
    }

    pub fn unknown_organism(id: impl Into<String>) -> Self {
        MurineError::UnknownOrganism(id.into())
    }

    pub fn invalid_config(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        MurineError::Config(ConfigError::InvalidValue {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        })
    }

    /// Whether this error marks a reference to a target that does not exist.
    pub fn is_reference_error(&self) -> bool {
        matches!(self, MurineError::UnknownOrganism(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_offending_value() {
        let err = MurineError::invalid_enum("substance kind", "melanin");
        assert_eq!(err.to_string(), "Invalid substance kind value: \"melanin\"");
    }

    #[test]
    fn unknown_organism_is_a_reference_error() {
        assert!(MurineError::unknown_organism("ghost").is_reference_error());
        assert!(!MurineError::DuplicateOrganism("a".into()).is_reference_error());
    }

    #[test]
    fn config_errors_convert_into_murine_error() {
        let err: MurineError = ConfigError::OutOfRange {
            field: "history_capacity".into(),
            min: 1.0,
            max: 10_000.0,
            value: 0.0,
        }
        .into();
        assert!(err.to_string().contains("history_capacity out of range"));
    }
}
