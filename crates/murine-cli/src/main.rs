//! Murine CLI - drive the substance-kinetics simulation from a terminal.

mod commands;
mod config;

use anyhow::Result;
use clap::{Parser, Subcommand};
use murine::prelude::{CompartmentKind, SubstanceKind};
use tracing::Level;

#[derive(Parser)]
#[command(name = "murine")]
#[command(author, version, about = "Murine - organelle-level substance kinetics", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default murine.toml
    Init {
        /// Project directory (default: current directory)
        #[arg(short, long)]
        path: Option<String>,
    },

    /// Run the seeded simulation and print final levels
    Run {
        /// Number of ticks to run
        #[arg(short, long, default_value = "50")]
        ticks: u64,

        /// Milliseconds per tick (default: world.tick_ms)
        #[arg(long)]
        dt: Option<u64>,

        /// Print the final snapshot as JSON
        #[arg(long)]
        json: bool,
    },

    /// Apply a manual change and follow one compartment over time
    Perturb {
        /// Organism id
        #[arg(short, long, default_value = "field-mouse")]
        organism: String,

        /// Compartment to edit (e.g. extracellular, receptor)
        #[arg(short, long)]
        compartment: CompartmentKind,

        /// Substance to edit (e.g. hormone, signal-protein)
        #[arg(short, long)]
        substance: SubstanceKind,

        /// Signed amount to add
        #[arg(short, long, allow_hyphen_values = true)]
        amount: f64,

        /// Number of ticks to follow
        #[arg(short, long, default_value = "60")]
        ticks: u64,

        /// Print a row every N ticks
        #[arg(short, long, default_value = "5")]
        every: u64,
    },

    /// List the kinetic rules and their feedback loops
    Rules,

    /// List substance and compartment kinds with display names
    Kinds {
        /// Use the pedagogical hidden names
        #[arg(long)]
        hidden: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Init { path } => commands::init::run(path),
        Commands::Run { ticks, dt, json } => commands::run::run(ticks, dt, json, cli.verbose),
        Commands::Perturb {
            organism,
            compartment,
            substance,
            amount,
            ticks,
            every,
        } => commands::perturb::run(&organism, compartment, substance, amount, ticks, every),
        Commands::Rules => commands::rules::run(),
        Commands::Kinds { hidden } => commands::kinds::run(hidden),
    }
}
