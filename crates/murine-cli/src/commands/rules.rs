//! Show the kinetic table and the feedback loops it forms.

use anyhow::Result;
use colored::Colorize;
use murine::prelude::*;

use crate::config::Config;

pub fn run() -> Result<()> {
    let config = Config::load()?;
    let naming = config.display.naming;
    let table = KineticTable::standard().with_time_constant(config.world.kinetic_time_constant);

    println!("{}", "Kinetic Rules".white().bold());
    println!(
        "{}",
        format!("rate = max(0, terms) / {}", table.time_constant()).dimmed()
    );
    println!("{}", "═".repeat(64).dimmed());

    for rule in table.rules() {
        let strain = rule
            .strain
            .map_or_else(|| "all strains".to_string(), |s| s.to_string());
        println!(
            "{} in {} {}",
            rule.substance.label(naming).cyan().bold(),
            rule.compartment.label(naming).cyan(),
            format!("[{}]", strain).dimmed()
        );
        println!("  {} {}", "birth:".green(), describe(&rule.birth, naming));
        println!("  {} {}", "death:".red(), describe(&rule.death, naming));
    }

    println!();
    println!("{}", "Feedback Loops".blue().bold());
    let loops = table.feedback_loops();
    if loops.is_empty() {
        println!("  none");
    }
    for members in loops {
        let names: Vec<String> = members
            .iter()
            .map(|(compartment, substance)| {
                format!("{} ({})", substance.label(naming), compartment.label(naming))
            })
            .collect();
        println!("  {}", names.join(" ⇄ "));
    }

    Ok(())
}

fn describe(term: &RateTerm, naming: Naming) -> String {
    let mut parts = Vec::new();
    if term.intercept != 0.0 || term.inputs.is_empty() {
        parts.push(format!("{}", term.intercept));
    }
    for (slope, source) in &term.inputs {
        let input = match source {
            FeedbackSource::SelfLevel => "self".to_string(),
            FeedbackSource::Live { filter, substance } => {
                format!("{}{}", substance.label(naming), describe_filter(filter, naming))
            }
            FeedbackSource::Lagged { filter, substance } => {
                format!("{}{} (lagged)", substance.label(naming), describe_filter(filter, naming))
            }
        };
        parts.push(format!("{}·{}", slope, input));
    }
    parts.join(" + ")
}

fn describe_filter(filter: &CompartmentFilter, naming: Naming) -> String {
    match filter {
        CompartmentFilter::All => String::new(),
        CompartmentFilter::Only(kind) => format!(" @ {}", kind.label(naming)),
        CompartmentFilter::AnyOf(kinds) => {
            let names: Vec<&str> = kinds.iter().map(|k| k.label(naming)).collect();
            format!(" @ {}", names.join("|"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_lists_intercept_and_inputs() {
        let term = RateTerm::constant(10.0).plus(
            -0.1,
            FeedbackSource::lagged(CompartmentKind::Cytoplasm, SubstanceKind::SignalProtein),
        );
        assert_eq!(
            describe(&term, Naming::Scientific),
            "10 + -0.1·Signal Protein @ Cytoplasm (lagged)"
        );
    }

    #[test]
    fn describe_zero_term() {
        assert_eq!(describe(&RateTerm::zero(), Naming::Scientific), "0");
    }
}
