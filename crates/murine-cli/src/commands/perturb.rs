//! Apply a manual change and chart the edited compartment.

use anyhow::{bail, Result};
use colored::Colorize;
use murine::prelude::*;

use crate::commands::seeded_world;
use crate::config::Config;

pub fn run(
    organism: &str,
    compartment: CompartmentKind,
    substance: SubstanceKind,
    amount: f64,
    ticks: u64,
    every: u64,
) -> Result<()> {
    if every == 0 {
        bail!("--every must be at least 1");
    }
    let config = Config::load()?;
    let naming = config.display.naming;
    let precision = config.display.precision;
    let mut world = seeded_world(&config)?;

    let receipt = world.apply_manual_change_now(&ManualChange::new(
        organism,
        compartment,
        substance,
        amount,
    ))?;

    println!(
        "{} {} {} in {} ({} requested, {} applied); kinetics locked until t={}ms",
        "→".blue(),
        if receipt.applied < 0.0 { "Removed" } else { "Added" },
        substance.label(naming).cyan(),
        receipt.target.to_string().cyan(),
        receipt.requested,
        format!("{:.*}", precision, receipt.applied).yellow(),
        receipt.lock_until
    );
    println!();
    println!(
        "  {:>8} {:>10} {:>10} {:>10} {:>10}  {}",
        "t (ms)", "Level", "Delta", "Visual", "Raw", ""
    );

    let print_row = |world: &SimulationWorld| {
        let reading = world.assay(&receipt.target, substance);
        let locked = world
            .organism(organism)
            .and_then(|o| o.compartment(compartment))
            .and_then(|c| c.substance(substance))
            .is_some_and(|s| s.is_locked(world.time()));
        println!(
            "  {:>8} {:>10.*} {:>+10.*} {:>10.*} {:>10.*}  {}",
            world.time(),
            precision,
            reading.level,
            precision,
            reading.delta,
            precision,
            reading.visual,
            precision,
            reading.raw,
            if locked { "locked".yellow().to_string() } else { String::new() }
        );
    };

    print_row(&world);
    for tick in 1..=ticks {
        world.step(config.world.tick_ms);
        if tick % every == 0 || tick == ticks {
            print_row(&world);
        }
    }

    Ok(())
}
