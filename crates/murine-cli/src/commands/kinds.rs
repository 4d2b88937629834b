//! List the closed sets of substance and compartment kinds.

use anyhow::Result;
use colored::Colorize;
use murine::prelude::*;

pub fn run(hidden: bool) -> Result<()> {
    let naming = if hidden { Naming::Hidden } else { Naming::Scientific };

    println!("{}", "Substances".blue().bold());
    for kind in SubstanceKind::ALL {
        println!("  {:<16} {}", kind.as_str().cyan(), kind.label(naming));
    }
    println!();

    println!("{}", "Compartments".blue().bold());
    for kind in CompartmentKind::ALL {
        println!("  {:<16} {}", kind.as_str().cyan(), kind.label(naming));
    }

    Ok(())
}
