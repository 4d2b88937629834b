//! Run the seeded simulation.

use anyhow::{Context, Result};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use murine::prelude::*;

use crate::commands::seeded_world;
use crate::config::Config;

pub fn run(ticks: u64, dt: Option<u64>, json: bool, verbose: bool) -> Result<()> {
    let config = Config::load()?;
    let mut world = seeded_world(&config)?;
    let dt = dt.unwrap_or(config.world.tick_ms);

    let pb = ProgressBar::new(ticks);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} ticks")
            .context("Invalid progress bar template")?
            .progress_chars("#>-"),
    );
    if json {
        pb.set_draw_target(indicatif::ProgressDrawTarget::hidden());
    }

    for _ in 0..ticks {
        for event in world.step(dt) {
            if let WorldEvent::TickComplete { time, substances_changed, .. } = event {
                if verbose {
                    pb.println(format!("  t={}ms: {} substances changed", time, substances_changed));
                }
            }
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    if json {
        println!("{}", world.snapshot_json()?);
        return Ok(());
    }

    print_levels(&world, &config);
    Ok(())
}

fn print_levels(world: &SimulationWorld, config: &Config) {
    let naming = config.display.naming;
    let precision = config.display.precision;
    let stats = world.stats();

    println!(
        "{} Simulation complete at t={}ms ({} ticks, {} history entries)",
        "✓".green().bold(),
        stats.time.to_string().cyan(),
        stats.ticks,
        stats.history_len
    );

    for organism in world.organisms() {
        println!();
        println!(
            "{} {}",
            organism.id.white().bold(),
            format!("({})", organism.strain).dimmed()
        );
        println!("{}", "═".repeat(64).dimmed());
        println!(
            "  {:<20} {:<16} {:>8} {:>8} {:>8}",
            "Compartment", "Substance", "Level", "Delta", "Raw"
        );
        for compartment in organism.compartments() {
            for substance in compartment.substances() {
                let delta = substance.pending_delta();
                let delta = format!("{:+.*}", precision, delta);
                let delta = if delta.starts_with('-') { delta.red() } else { delta.green() };
                println!(
                    "  {:<20} {:<16} {:>8.*} {:>8} {:>8.*}",
                    compartment.kind.label(naming),
                    substance.kind.label(naming),
                    precision,
                    substance.level(),
                    delta,
                    precision,
                    substance.raw_amount(),
                );
            }
        }
    }
}
