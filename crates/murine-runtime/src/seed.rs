//! Seed population loaded at start-up.
//!
//! Levels sit close to the steady state of the standard kinetic table so
//! an unperturbed world drifts only slightly. The field mouse ends up
//! eumelanin-rich (dark coat), the beach mouse pheomelanin-rich (light).

use murine_core::error::Result;
use murine_core::organism::{ModelProperties, Organism};
use murine_core::types::{CompartmentKind, Strain, SubstanceKind};

pub const FIELD_MOUSE_ID: &str = "field-mouse";
pub const BEACH_MOUSE_ID: &str = "beach-mouse";

type SeedLevel = (CompartmentKind, SubstanceKind, f64);

const FIELD_MOUSE_LEVELS: &[SeedLevel] = &[
    (CompartmentKind::Extracellular, SubstanceKind::Hormone, 100.0),
    (CompartmentKind::Receptor, SubstanceKind::Hormone, 33.0),
    (CompartmentKind::Cytoplasm, SubstanceKind::SignalProtein, 67.0),
    (CompartmentKind::Melanosomes, SubstanceKind::Eumelanin, 133.0),
    (CompartmentKind::Melanosomes, SubstanceKind::Pheomelanin, 67.0),
    (CompartmentKind::Nucleus, SubstanceKind::Hormone, 0.0),
    (CompartmentKind::Golgi, SubstanceKind::Eumelanin, 12.0),
    (CompartmentKind::NearbyCells, SubstanceKind::Hormone, 100.0),
];

const BEACH_MOUSE_LEVELS: &[SeedLevel] = &[
    (CompartmentKind::Extracellular, SubstanceKind::Hormone, 100.0),
    (CompartmentKind::Receptor, SubstanceKind::Hormone, 48.0),
    (CompartmentKind::Cytoplasm, SubstanceKind::SignalProtein, 10.0),
    (CompartmentKind::Melanosomes, SubstanceKind::Eumelanin, 19.0),
    (CompartmentKind::Melanosomes, SubstanceKind::Pheomelanin, 181.0),
    (CompartmentKind::Nucleus, SubstanceKind::Hormone, 0.0),
    (CompartmentKind::Golgi, SubstanceKind::Pheomelanin, 15.0),
    (CompartmentKind::NearbyCells, SubstanceKind::Hormone, 100.0),
];

fn seeded(
    id: &str,
    strain: Strain,
    properties: ModelProperties,
    levels: &[SeedLevel],
) -> Result<Organism> {
    let mut organism = Organism::new(id, strain).with_model_properties(properties);
    for &(compartment, substance, level) in levels {
        organism.set_level(compartment, substance, level)?;
    }
    Ok(organism)
}

/// The two-organism population shown when the simulation opens.
pub fn standard_population() -> Result<Vec<Organism>> {
    Ok(vec![
        seeded(
            FIELD_MOUSE_ID,
            Strain::FieldMouse,
            ModelProperties::new()
                .with_flag("working-receptor", true)
                .with_flag("dark-coat", true),
            FIELD_MOUSE_LEVELS,
        )?,
        seeded(
            BEACH_MOUSE_ID,
            Strain::BeachMouse,
            ModelProperties::new()
                .with_flag("working-receptor", false)
                .with_flag("dark-coat", false),
            BEACH_MOUSE_LEVELS,
        )?,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use murine_core::types::CompartmentFilter;

    #[test]
    fn population_has_two_distinct_strains() {
        let population = standard_population().unwrap();
        assert_eq!(population.len(), 2);
        assert_eq!(population[0].id, FIELD_MOUSE_ID);
        assert_eq!(population[1].strain, Strain::BeachMouse);
    }

    #[test]
    fn field_mouse_is_darker_than_beach_mouse() {
        let population = standard_population().unwrap();
        let melanosomes = CompartmentFilter::Only(CompartmentKind::Melanosomes);
        let ratio = |o: &Organism| {
            o.raw_total(&melanosomes, SubstanceKind::Eumelanin)
                / o.raw_total(&melanosomes, SubstanceKind::Pheomelanin)
        };
        assert!(ratio(&population[0]) > 1.0);
        assert!(ratio(&population[1]) < 1.0);
    }

    #[test]
    fn model_properties_follow_strain() {
        let population = standard_population().unwrap();
        assert!(population[0].model_properties.flag("dark-coat"));
        assert!(!population[1].model_properties.flag("working-receptor"));
    }
}
