//! Shared types used across the simulation crates.

use crate::error::{MurineError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Simulation clock value in milliseconds.
pub type Millis = u64;

/// Normalize a user-facing name so `signal-protein`, `signalProtein` and
/// `Signal Protein` all compare equal.
fn normalize(value: &str) -> String {
    value
        .chars()
        .filter(|c| !matches!(c, '-' | '_' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Which set of display names the presentation layer shows.
///
/// `Hidden` replaces the pigment names with neutral labels so students
/// can discover the pathway before learning the terminology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Naming {
    #[default]
    Scientific,
    Hidden,
}

/// The chemical kinds tracked by the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SubstanceKind {
    /// Melanocyte-stimulating hormone.
    Hormone,
    /// Intracellular messenger activated by the bound receptor.
    SignalProtein,
    /// Dark pigment.
    Eumelanin,
    /// Light pigment.
    Pheomelanin,
}

impl SubstanceKind {
    /// The closed set, in display order.
    pub const ALL: [SubstanceKind; 4] = [
        SubstanceKind::Hormone,
        SubstanceKind::SignalProtein,
        SubstanceKind::Eumelanin,
        SubstanceKind::Pheomelanin,
    ];

    /// Stable machine name, as used in config files and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            SubstanceKind::Hormone => "hormone",
            SubstanceKind::SignalProtein => "signal-protein",
            SubstanceKind::Eumelanin => "eumelanin",
            SubstanceKind::Pheomelanin => "pheomelanin",
        }
    }

    /// Human-readable label under the given naming scheme.
    pub fn label(&self, naming: Naming) -> &'static str {
        match (self, naming) {
            (SubstanceKind::Hormone, _) => "Hormone",
            (SubstanceKind::SignalProtein, _) => "Signal Protein",
            (SubstanceKind::Eumelanin, Naming::Scientific) => "Eumelanin",
            (SubstanceKind::Eumelanin, Naming::Hidden) => "Dark Pigment",
            (SubstanceKind::Pheomelanin, Naming::Scientific) => "Pheomelanin",
            (SubstanceKind::Pheomelanin, Naming::Hidden) => "Light Pigment",
        }
    }
}

impl fmt::Display for SubstanceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubstanceKind {
    type Err = MurineError;

    fn from_str(s: &str) -> Result<Self> {
        let key = normalize(s);
        SubstanceKind::ALL
            .into_iter()
            .find(|kind| normalize(kind.as_str()) == key)
            .ok_or_else(|| MurineError::invalid_enum("substance kind", s))
    }
}

/// The compartments an organism can hold substances in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CompartmentKind {
    Nucleus,
    Cytoplasm,
    Golgi,
    /// The space between cells ("intercell").
    Extracellular,
    Melanosomes,
    Gate,
    Receptor,
    NearbyCells,
}

impl CompartmentKind {
    /// The closed set, in display order.
    pub const ALL: [CompartmentKind; 8] = [
        CompartmentKind::Nucleus,
        CompartmentKind::Cytoplasm,
        CompartmentKind::Golgi,
        CompartmentKind::Extracellular,
        CompartmentKind::Melanosomes,
        CompartmentKind::Gate,
        CompartmentKind::Receptor,
        CompartmentKind::NearbyCells,
    ];

    /// Stable machine name.
    pub fn as_str(&self) -> &'static str {
        match self {
            CompartmentKind::Nucleus => "nucleus",
            CompartmentKind::Cytoplasm => "cytoplasm",
            CompartmentKind::Golgi => "golgi",
            CompartmentKind::Extracellular => "extracellular",
            CompartmentKind::Melanosomes => "melanosomes",
            CompartmentKind::Gate => "gate",
            CompartmentKind::Receptor => "receptor",
            CompartmentKind::NearbyCells => "nearby-cells",
        }
    }

    /// Human-readable label under the given naming scheme.
    pub fn label(&self, naming: Naming) -> &'static str {
        match (self, naming) {
            (CompartmentKind::Nucleus, _) => "Nucleus",
            (CompartmentKind::Cytoplasm, _) => "Cytoplasm",
            (CompartmentKind::Golgi, _) => "Golgi",
            (CompartmentKind::Extracellular, _) => "Intercellular Space",
            (CompartmentKind::Melanosomes, Naming::Scientific) => "Melanosomes",
            (CompartmentKind::Melanosomes, Naming::Hidden) => "Pigment Granules",
            (CompartmentKind::Gate, _) => "Gate",
            (CompartmentKind::Receptor, _) => "Receptor",
            (CompartmentKind::NearbyCells, _) => "Nearby Cells",
        }
    }
}

impl fmt::Display for CompartmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CompartmentKind {
    type Err = MurineError;

    fn from_str(s: &str) -> Result<Self> {
        let key = normalize(s);
        if key == "intercell" {
            return Ok(CompartmentKind::Extracellular);
        }
        CompartmentKind::ALL
            .into_iter()
            .find(|kind| normalize(kind.as_str()) == key)
            .ok_or_else(|| MurineError::invalid_enum("compartment kind", s))
    }
}

/// Kinetic profile of an organism. Selects strain-specific rows of the
/// kinetic table instead of matching on organism ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strain {
    /// Wild-type receptor: strong hormone response.
    #[default]
    FieldMouse,
    /// Weakened receptor: little signal protein per bound hormone.
    BeachMouse,
}

impl Strain {
    pub const ALL: [Strain; 2] = [Strain::FieldMouse, Strain::BeachMouse];

    pub fn as_str(&self) -> &'static str {
        match self {
            Strain::FieldMouse => "field-mouse",
            Strain::BeachMouse => "beach-mouse",
        }
    }
}

impl fmt::Display for Strain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strain {
    type Err = MurineError;

    fn from_str(s: &str) -> Result<Self> {
        let key = normalize(s);
        Strain::ALL
            .into_iter()
            .find(|strain| normalize(strain.as_str()) == key)
            .ok_or_else(|| MurineError::invalid_enum("strain", s))
    }
}

/// How an aggregate treats pending deltas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TotalMode {
    /// `level + delta`: what the kinetics see.
    #[default]
    Raw,
    /// `level + min(delta, 0)`: bar height with removals subtracted and
    /// additions charted separately.
    Visual,
}

impl FromStr for TotalMode {
    type Err = MurineError;

    fn from_str(s: &str) -> Result<Self> {
        match normalize(s).as_str() {
            "raw" => Ok(TotalMode::Raw),
            "visual" => Ok(TotalMode::Visual),
            _ => Err(MurineError::invalid_enum("total mode", s)),
        }
    }
}

/// Which compartments an aggregate query sums over.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CompartmentFilter {
    All,
    Only(CompartmentKind),
    AnyOf(Vec<CompartmentKind>),
}

impl CompartmentFilter {
    pub fn matches(&self, kind: CompartmentKind) -> bool {
        match self {
            CompartmentFilter::All => true,
            CompartmentFilter::Only(only) => *only == kind,
            CompartmentFilter::AnyOf(kinds) => kinds.contains(&kind),
        }
    }
}

impl From<CompartmentKind> for CompartmentFilter {
    fn from(kind: CompartmentKind) -> Self {
        CompartmentFilter::Only(kind)
    }
}

/// Addresses one compartment of one organism (an assay target).
///
/// Compared by value: two refs built independently are equal when they
/// name the same organism and compartment kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CompartmentRef {
    pub organism_id: String,
    pub compartment: CompartmentKind,
}

impl CompartmentRef {
    pub fn new(organism_id: impl Into<String>, compartment: CompartmentKind) -> Self {
        Self {
            organism_id: organism_id.into(),
            compartment,
        }
    }
}

impl fmt::Display for CompartmentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.organism_id, self.compartment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substance_kinds_parse_in_several_spellings() {
        assert_eq!("signal-protein".parse::<SubstanceKind>().unwrap(), SubstanceKind::SignalProtein);
        assert_eq!("signalProtein".parse::<SubstanceKind>().unwrap(), SubstanceKind::SignalProtein);
        assert_eq!("Signal Protein".parse::<SubstanceKind>().unwrap(), SubstanceKind::SignalProtein);
        assert_eq!("HORMONE".parse::<SubstanceKind>().unwrap(), SubstanceKind::Hormone);
    }

    #[test]
    fn unknown_names_fail_fast() {
        let err = "melanin".parse::<SubstanceKind>().unwrap_err();
        assert!(matches!(err, MurineError::InvalidEnumValue { kind: "substance kind", .. }));
        assert!("mitochondria".parse::<CompartmentKind>().is_err());
        assert!("desert-mouse".parse::<Strain>().is_err());
        assert!("stacked".parse::<TotalMode>().is_err());
    }

    #[test]
    fn intercell_is_an_alias_for_extracellular() {
        assert_eq!("intercell".parse::<CompartmentKind>().unwrap(), CompartmentKind::Extracellular);
        assert_eq!("nearbyCells".parse::<CompartmentKind>().unwrap(), CompartmentKind::NearbyCells);
    }

    #[test]
    fn every_kind_round_trips_through_its_machine_name() {
        for kind in SubstanceKind::ALL {
            assert_eq!(kind.as_str().parse::<SubstanceKind>().unwrap(), kind);
        }
        for kind in CompartmentKind::ALL {
            assert_eq!(kind.as_str().parse::<CompartmentKind>().unwrap(), kind);
        }
    }

    #[test]
    fn hidden_naming_masks_pigments_only() {
        assert_eq!(SubstanceKind::Eumelanin.label(Naming::Hidden), "Dark Pigment");
        assert_eq!(SubstanceKind::Hormone.label(Naming::Hidden), "Hormone");
        assert_eq!(CompartmentKind::Melanosomes.label(Naming::Hidden), "Pigment Granules");
        assert_eq!(CompartmentKind::Melanosomes.label(Naming::Scientific), "Melanosomes");
    }

    #[test]
    fn compartment_refs_compare_by_value() {
        let a = CompartmentRef::new("field-mouse", CompartmentKind::Cytoplasm);
        let b = CompartmentRef::new(String::from("field-mouse"), CompartmentKind::Cytoplasm);
        let c = CompartmentRef::new("field-mouse", CompartmentKind::Nucleus);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.to_string(), "field-mouse/cytoplasm");
    }

    #[test]
    fn filters_match_the_right_compartments() {
        let filter = CompartmentFilter::AnyOf(vec![CompartmentKind::Nucleus, CompartmentKind::Cytoplasm]);
        assert!(filter.matches(CompartmentKind::Nucleus));
        assert!(!filter.matches(CompartmentKind::Golgi));
        assert!(CompartmentFilter::All.matches(CompartmentKind::Gate));
        assert!(CompartmentFilter::from(CompartmentKind::Gate).matches(CompartmentKind::Gate));
    }
}
