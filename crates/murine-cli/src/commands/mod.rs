//! CLI command implementations.

pub mod init;
pub mod run;
pub mod perturb;
pub mod rules;
pub mod kinds;

use anyhow::{Context, Result};
use murine::prelude::*;

use crate::config::Config;

/// A world built from `config` and populated with the seed organisms.
pub fn seeded_world(config: &Config) -> Result<SimulationWorld> {
    let mut world = SimulationWorld::from_config(config.world.clone())
        .context("Invalid world configuration")?;
    for organism in standard_population()? {
        world.add_organism(organism)?;
    }
    Ok(world)
}
