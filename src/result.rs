//! Terminal result objects returned by a finished run (spec §6).

use crate::{
    genetic::Genome,
    state::BestSolution,
    statistic::SummaryRow,
    termination::StopReason,
};

/// The outcome of a finished `PanmicticGa` run.
#[derive(Clone, Debug)]
pub struct GaResult {
    pub best_solution: BestSolution,
    /// Every distinct genome observed over the run whose fitness ties
    /// `best_solution.fitness` (spec §3/§9: "solution" is the set of
    /// individuals attaining the best fitness, not just the first one
    /// found).
    pub solution: Vec<Genome>,
    pub generations: u64,
    /// One `SummaryRow` per generation actually evaluated, in order,
    /// including generation 0 and the terminal generation (spec §6's
    /// "summary length" invariant).
    pub summary: Vec<SummaryRow>,
    pub final_population: Vec<Genome>,
    pub final_fitness: Vec<f64>,
    pub stop_reason: StopReason,
}

/// The outcome of a finished `IslandGa` run: the overall best solution plus
/// each island's own terminal state.
#[derive(Clone, Debug)]
pub struct IslandGaResult {
    pub best_solution: BestSolution,
    /// The union, across all islands, of genomes tying `best_solution`'s
    /// fitness.
    pub solution: Vec<Genome>,
    pub generations: u64,
    pub islands: Vec<GaResult>,
}
