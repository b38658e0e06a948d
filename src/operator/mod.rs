//! The `operator` module defines the genetic operator protocol: the four
//! pluggable stages spec §4.1 requires (population init, selection,
//! crossover, mutation), plus the per-encoding defaults table that resolves
//! an operator when a run does not supply its own.
//!
//! This mirrors `genevo`'s own `operator` module (`operator.rs`): a
//! `GeneticOperator` marker trait carrying a display name, with one trait per
//! stage (`SelectionOp`, `CrossoverOp`, `MutationOp`; `genevo` additionally
//! has `ReinsertionOp`, folded into the generation engine here since spec
//! §4.3 step 8 treats elite reinsertion as a fixed sub-step rather than a
//! pluggable one). The traits here are object-safe so one engine can hold
//! `Box<dyn SelectionOp>` etc. chosen at runtime for whichever `Encoding` a
//! run was built with, instead of `genevo`'s compile-time generic-per-`G`
//! design (see `SPEC_FULL.md` §2).

pub mod crossover;
pub mod mutation;
pub mod population_init;
pub mod selection;

use crate::{
    error::Result,
    genetic::{Children, Encoding, Genome, Parents},
    random::Prng,
};

/// Marker trait implemented by every genetic operator. The name is used only
/// for diagnostics (one-time warnings, `Debug` output on a run's resolved
/// operator set).
pub trait GeneticOperator: Send + Sync {
    fn name(&self) -> &'static str;
}

/// Builds the initial population for a run, from `Encoding`, the declared
/// `popSize`, and an optional `suggestions` matrix (spec §4.1).
///
/// Rows `0..k` (`k = min(suggestions.len(), popSize)`) come verbatim from
/// `suggestions`; the remainder is sampled uniformly within the encoding's
/// domain. Returns `GaError::ShapeMismatch` if a suggestion's shape does not
/// match the encoding.
pub trait PopulationInitOp: GeneticOperator {
    fn initialize(
        &self,
        encoding: &Encoding,
        pop_size: usize,
        suggestions: &[Genome],
        rng: &mut Prng,
    ) -> Result<Vec<Genome>>;
}

/// Selects `num_parents` individuals from the evaluated population,
/// returning them (with their fitness) in the order they were picked.
///
/// Implementations must never return a row whose fitness is missing
/// (`NaN`); the generation engine guarantees `fitness` contains at least one
/// finite value before calling `select`.
pub trait SelectionOp: GeneticOperator {
    fn select(
        &self,
        population: &[Genome],
        fitness: &[f64],
        num_parents: usize,
        rng: &mut Prng,
    ) -> Result<Vec<Genome>>;
}

/// Crosses over a pair of parents into a pair of children. Children must
/// satisfy `encoding`'s domain predicate.
pub trait CrossoverOp: GeneticOperator {
    fn crossover(&self, parents: &Parents, encoding: &Encoding, rng: &mut Prng) -> Result<Children>;
}

/// Mutates a single individual. The result must satisfy `encoding`'s domain
/// predicate.
pub trait MutationOp: GeneticOperator {
    fn mutate(&self, individual: &Genome, encoding: &Encoding, rng: &mut Prng) -> Result<Genome>;
}

/// The resolved 4-tuple of operators for one run: population init,
/// selection, crossover and mutation (spec §4.1's "encoding defaults
/// table").
pub struct OperatorSet {
    pub population_init: Box<dyn PopulationInitOp>,
    pub selection: Box<dyn SelectionOp>,
    pub crossover: Box<dyn CrossoverOp>,
    pub mutation: Box<dyn MutationOp>,
}

/// Returns the default operator 4-tuple for `encoding`, used whenever a run
/// does not override a stage explicitly.
pub fn defaults_for(encoding: &Encoding) -> OperatorSet {
    match encoding {
        Encoding::Binary { .. } => OperatorSet {
            population_init: Box::new(population_init::UniformRandomInit),
            selection: Box::new(selection::TournamentSelector::default()),
            crossover: Box::new(crossover::SinglePointCrossover),
            mutation: Box::new(mutation::BitFlipMutation::default()),
        },
        Encoding::RealValued { .. } => OperatorSet {
            population_init: Box::new(population_init::UniformRandomInit),
            selection: Box::new(selection::TournamentSelector::default()),
            crossover: Box::new(crossover::BlendCrossover::default()),
            mutation: Box::new(mutation::GaussianMutation::default()),
        },
        Encoding::Permutation { .. } => OperatorSet {
            population_init: Box::new(population_init::UniformRandomInit),
            selection: Box::new(selection::TournamentSelector::default()),
            crossover: Box::new(crossover::OrderCrossover),
            mutation: Box::new(mutation::SwapMutation),
        },
    }
}

pub mod prelude {
    pub use super::crossover::*;
    pub use super::mutation::*;
    pub use super::population_init::*;
    pub use super::selection::*;
    pub use super::{defaults_for, CrossoverOp, GeneticOperator, MutationOp, OperatorSet, PopulationInitOp, SelectionOp};
}
