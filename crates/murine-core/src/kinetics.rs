//! Kinetic rules: birth and death rates per substance per compartment.
//!
//! Every rate is a clamped linear function of feedback aggregates divided
//! by a fixed time constant:
//!
//! ```text
//! rate = max(0, intercept + Σ slope_i · x_i) / time_constant
//! ```
//!
//! where each `x_i` is the substance's own amount, a live aggregate of the
//! owning organism, or the same aggregate read from the history ring.
//! Coefficients are expressed as amount per ten ticks and scaled down by
//! the time constant. A `(substance, compartment)` pair without a rule
//! has both rates at zero.
//!
//! Strain-specific rows take precedence over strain-agnostic ones, so two
//! strains can share a pathway and differ only in one coefficient.
//!
//! ## Standard pathway
//!
//! Hormone is secreted into the extracellular space and binds the
//! receptor. Bound hormone activates signal protein in the cytoplasm
//! (strongly in field mice, weakly in beach mice), which drives eumelanin
//! and suppresses pheomelanin in the melanosomes. Signal protein also
//! desensitizes the receptor, closing a negative feedback loop.

use crate::organism::Organism;
use crate::substance::Substance;
use crate::types::{CompartmentFilter, CompartmentKind, Millis, Strain, SubstanceKind};
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Default divisor applied to every rate.
pub const DEFAULT_TIME_CONSTANT: f64 = 10.0;

/// Everything a substance needs to compute its automatic change.
#[derive(Debug, Clone, Copy)]
pub struct StepContext<'a> {
    pub time: Millis,
    /// The owning organism before this tick's changes.
    pub organism: &'a Organism,
    pub compartment: CompartmentKind,
    /// The owning organism as recorded in the history ring.
    pub lagged: &'a Organism,
    pub table: &'a KineticTable,
}

/// Where a rate input is read from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FeedbackSource {
    /// The substance's own raw amount.
    SelfLevel,
    /// A raw aggregate of the owning organism now.
    Live {
        filter: CompartmentFilter,
        substance: SubstanceKind,
    },
    /// The same aggregate read from the history ring.
    Lagged {
        filter: CompartmentFilter,
        substance: SubstanceKind,
    },
}

impl FeedbackSource {
    pub fn live(compartment: CompartmentKind, substance: SubstanceKind) -> Self {
        FeedbackSource::Live {
            filter: CompartmentFilter::Only(compartment),
            substance,
        }
    }

    pub fn lagged(compartment: CompartmentKind, substance: SubstanceKind) -> Self {
        FeedbackSource::Lagged {
            filter: CompartmentFilter::Only(compartment),
            substance,
        }
    }

    fn value(&self, ctx: &StepContext<'_>, own: &Substance) -> f64 {
        match self {
            FeedbackSource::SelfLevel => own.raw_amount(),
            FeedbackSource::Live { filter, substance } => ctx.organism.raw_total(filter, *substance),
            FeedbackSource::Lagged { filter, substance } => ctx.lagged.raw_total(filter, *substance),
        }
    }
}

/// A clamped linear rate over zero or more feedback inputs.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RateTerm {
    pub intercept: f64,
    pub inputs: Vec<(f64, FeedbackSource)>,
}

impl RateTerm {
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn constant(intercept: f64) -> Self {
        Self {
            intercept,
            inputs: Vec::new(),
        }
    }

    pub fn proportional(slope: f64, source: FeedbackSource) -> Self {
        Self::zero().plus(slope, source)
    }

    pub fn plus(mut self, slope: f64, source: FeedbackSource) -> Self {
        self.inputs.push((slope, source));
        self
    }

    pub fn evaluate(&self, ctx: &StepContext<'_>, own: &Substance, time_constant: f64) -> f64 {
        let linear = self.inputs.iter().fold(self.intercept, |acc, (slope, source)| {
            acc + slope * source.value(ctx, own)
        });
        linear.max(0.0) / time_constant
    }
}

/// One row of the kinetic table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KineticRule {
    pub substance: SubstanceKind,
    pub compartment: CompartmentKind,
    /// `None` applies to every strain without a more specific row.
    pub strain: Option<Strain>,
    pub birth: RateTerm,
    pub death: RateTerm,
}

impl KineticRule {
    pub fn new(substance: SubstanceKind, compartment: CompartmentKind) -> Self {
        Self {
            substance,
            compartment,
            strain: None,
            birth: RateTerm::zero(),
            death: RateTerm::zero(),
        }
    }

    pub fn for_strain(mut self, strain: Strain) -> Self {
        self.strain = Some(strain);
        self
    }

    pub fn birth(mut self, term: RateTerm) -> Self {
        self.birth = term;
        self
    }

    pub fn death(mut self, term: RateTerm) -> Self {
        self.death = term;
        self
    }
}

/// Birth and death rates for one substance for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rates {
    pub birth: f64,
    pub death: f64,
}

impl Rates {
    pub fn net(&self) -> f64 {
        self.birth - self.death
    }
}

/// How one rule input influences the substance it feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Influence {
    Promotes,
    Inhibits,
}

/// A rule input as an edge of the dependency graph.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dependency {
    pub influence: Influence,
    pub lagged: bool,
}

/// A `(compartment, substance)` pair that some rule produces.
pub type RuleNode = (CompartmentKind, SubstanceKind);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KineticTable {
    time_constant: f64,
    rules: Vec<KineticRule>,
}

impl Default for KineticTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl KineticTable {
    /// A table with no rules: every tick is a no-op.
    pub fn empty() -> Self {
        Self {
            time_constant: DEFAULT_TIME_CONSTANT,
            rules: Vec::new(),
        }
    }

    /// The melanocortin pathway described in the module docs.
    pub fn standard() -> Self {
        use CompartmentKind::*;
        use SubstanceKind::*;

        Self::empty()
            .with_rule(
                KineticRule::new(Hormone, Extracellular)
                    .birth(RateTerm::constant(10.0))
                    .death(RateTerm::proportional(0.1, FeedbackSource::SelfLevel)),
            )
            .with_rule(
                KineticRule::new(Hormone, Receptor)
                    .birth(RateTerm::proportional(0.1, FeedbackSource::live(Extracellular, Hormone)))
                    .death(
                        RateTerm::proportional(0.2, FeedbackSource::SelfLevel)
                            .plus(0.05, FeedbackSource::live(Cytoplasm, SignalProtein)),
                    ),
            )
            .with_rule(
                KineticRule::new(SignalProtein, Cytoplasm)
                    .for_strain(Strain::FieldMouse)
                    .birth(RateTerm::proportional(0.4, FeedbackSource::lagged(Receptor, Hormone)))
                    .death(RateTerm::proportional(0.2, FeedbackSource::SelfLevel)),
            )
            .with_rule(
                KineticRule::new(SignalProtein, Cytoplasm)
                    .for_strain(Strain::BeachMouse)
                    .birth(RateTerm::proportional(0.04, FeedbackSource::lagged(Receptor, Hormone)))
                    .death(RateTerm::proportional(0.2, FeedbackSource::SelfLevel)),
            )
            .with_rule(
                KineticRule::new(Eumelanin, Melanosomes)
                    .birth(RateTerm::proportional(0.1, FeedbackSource::lagged(Cytoplasm, SignalProtein)))
                    .death(RateTerm::proportional(0.05, FeedbackSource::SelfLevel)),
            )
            .with_rule(
                KineticRule::new(Pheomelanin, Melanosomes)
                    .birth(
                        RateTerm::constant(10.0)
                            .plus(-0.1, FeedbackSource::lagged(Cytoplasm, SignalProtein)),
                    )
                    .death(RateTerm::proportional(0.05, FeedbackSource::SelfLevel)),
            )
    }

    pub fn with_time_constant(mut self, time_constant: f64) -> Self {
        self.time_constant = time_constant;
        self
    }

    pub fn with_rule(mut self, rule: KineticRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn time_constant(&self) -> f64 {
        self.time_constant
    }

    pub fn rules(&self) -> &[KineticRule] {
        &self.rules
    }

    /// The row governing `substance` in `compartment` for `strain`.
    pub fn rule_for(
        &self,
        substance: SubstanceKind,
        compartment: CompartmentKind,
        strain: Strain,
    ) -> Option<&KineticRule> {
        let mut fallback = None;
        for rule in &self.rules {
            if rule.substance != substance || rule.compartment != compartment {
                continue;
            }
            match rule.strain {
                Some(s) if s == strain => return Some(rule),
                None if fallback.is_none() => fallback = Some(rule),
                _ => {}
            }
        }
        fallback
    }

    /// Rates for `substance` in the context's compartment; zero without a rule.
    pub fn rates(&self, ctx: &StepContext<'_>, substance: &Substance) -> Rates {
        match self.rule_for(substance.kind, ctx.compartment, ctx.organism.strain) {
            Some(rule) => Rates {
                birth: rule.birth.evaluate(ctx, substance, self.time_constant),
                death: rule.death.evaluate(ctx, substance, self.time_constant),
            },
            None => Rates::default(),
        }
    }

    /// Directed graph from each rule input to the pair it feeds.
    ///
    /// Inputs reading a filter produce one edge per rule-produced pair the
    /// filter matches. Own-level terms become self-loops.
    pub fn dependency_graph(&self) -> DiGraph<RuleNode, Dependency> {
        let mut graph = DiGraph::new();
        let mut index: HashMap<RuleNode, NodeIndex> = HashMap::new();
        for rule in &self.rules {
            let node = (rule.compartment, rule.substance);
            index.entry(node).or_insert_with(|| graph.add_node(node));
        }

        for rule in &self.rules {
            let target = index[&(rule.compartment, rule.substance)];
            for (is_birth, term) in [(true, &rule.birth), (false, &rule.death)] {
                for (slope, source) in &term.inputs {
                    let promotes = (*slope >= 0.0) == is_birth;
                    let influence = if promotes { Influence::Promotes } else { Influence::Inhibits };
                    let (filter, substance, lagged) = match source {
                        FeedbackSource::SelfLevel => {
                            graph.update_edge(target, target, Dependency { influence, lagged: false });
                            continue;
                        }
                        FeedbackSource::Live { filter, substance } => (filter, *substance, false),
                        FeedbackSource::Lagged { filter, substance } => (filter, *substance, true),
                    };
                    for (&(compartment, produced), &source_idx) in &index {
                        if produced == substance && filter.matches(compartment) {
                            graph.update_edge(source_idx, target, Dependency { influence, lagged });
                        }
                    }
                }
            }
        }
        graph
    }

    /// Groups of two or more pairs that feed each other.
    pub fn feedback_loops(&self) -> Vec<Vec<RuleNode>> {
        let graph = self.dependency_graph();
        let mut loops: Vec<Vec<RuleNode>> = tarjan_scc(&graph)
            .into_iter()
            .filter(|component| component.len() > 1)
            .map(|component| {
                let mut nodes: Vec<RuleNode> = component.into_iter().map(|idx| graph[idx]).collect();
                nodes.sort();
                nodes
            })
            .collect();
        loops.sort();
        loops
    }
}
