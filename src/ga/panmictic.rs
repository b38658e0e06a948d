//! The panmictic (single-population) GA driver.

use crate::{
    error::Result,
    fitness::{FitnessEvaluator, FitnessFunction, PopulationUpdate},
    genetic::Encoding,
    generation::GenerationEngine,
    localsearch::LocalSearchAdapter,
    operator::{CrossoverOp, MutationOp, PopulationInitOp, SelectionOp},
    random::Prng,
    result::GaResult,
    state::SearchState,
    statistic,
    termination::{Any, StopFlag, Termination},
};

/// A configured, ready-to-run single-population GA. Built via
/// `PanmicticGaBuilder::build`.
pub struct PanmicticGa<F: FitnessFunction> {
    pub(crate) encoding: Encoding,
    pub(crate) evaluator: FitnessEvaluator<F>,
    pub(crate) population_init: Box<dyn PopulationInitOp>,
    pub(crate) selection: Box<dyn SelectionOp>,
    pub(crate) crossover: Box<dyn CrossoverOp>,
    pub(crate) mutation: Box<dyn MutationOp>,
    pub(crate) population_update: Option<Box<dyn PopulationUpdate>>,
    pub(crate) local_search: Option<LocalSearchAdapter>,
    pub(crate) poptim: f64,
    pub(crate) elitism: usize,
    pub(crate) pcrossover: f64,
    pub(crate) pmutation: f64,
    pub(crate) parallel: bool,
    pub(crate) root_rng: Prng,
    pub(crate) state: SearchState,
    pub(crate) termination: Any,
}

impl<F: FitnessFunction> PanmicticGa<F> {
    /// Advances the run by exactly one generation.
    pub fn step(&mut self) -> Result<StopFlag> {
        let engine = GenerationEngine {
            encoding: self.encoding.clone(),
            selection: self.selection.as_ref(),
            crossover: self.crossover.as_ref(),
            mutation: self.mutation.as_ref(),
            evaluator: &self.evaluator,
            population_update: self.population_update.as_deref(),
            local_search: self.local_search.as_ref(),
            poptim: self.poptim,
            elitism: self.elitism,
            pcrossover: self.pcrossover,
            pmutation: self.pmutation,
            use_pool: self.parallel,
        };
        engine.step(&mut self.state, &self.root_rng)?;
        Ok(self.termination.evaluate(&self.state))
    }

    /// Runs generations until a termination rule fires, returning the
    /// terminal result. Checks termination against the initial population
    /// before ever stepping, so `maxiter=0` returns the initial population
    /// unchanged at `generations=0` (spec §8) instead of breeding one
    /// generation first.
    pub fn run(&mut self) -> Result<GaResult> {
        if let StopFlag::StopNow(reason) = self.check_termination() {
            self.finalize();
            return Ok(self.terminal_result(reason));
        }
        loop {
            if let StopFlag::StopNow(reason) = self.step()? {
                self.finalize();
                return Ok(self.terminal_result(reason));
            }
        }
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    /// Evaluates the termination rules against the current state without
    /// stepping.
    pub(crate) fn check_termination(&mut self) -> StopFlag {
        self.termination.evaluate(&self.state)
    }

    /// Builds the terminal `GaResult` from the current state. Shared by the
    /// pre-loop short-circuit and the normal loop-exit path so both describe
    /// the terminal state identically.
    pub(crate) fn terminal_result(&self, reason: crate::termination::StopReason) -> GaResult {
        let best_solution = self
            .state
            .best_solution
            .clone()
            .expect("at least one generation was evaluated before termination");
        GaResult {
            best_solution,
            solution: self.state.solution.clone(),
            generations: self.state.generation,
            summary: self.state.summary.clone(),
            final_population: self.state.population.clone(),
            final_fitness: self.state.fitness.clone(),
            stop_reason: reason,
        }
    }

    /// Evaluates whatever of the current population `step()` left
    /// unevaluated (the generation it just bred is only scored on the next
    /// call's step 1, which termination may have preempted), then records
    /// best-so-far and appends a closing summary row. Called once, at the
    /// end of `run()`, so a terminal `GaResult` never exposes `NaN`
    /// placeholders in `final_fitness`.
    pub(crate) fn finalize(&mut self) {
        self.state.fitness = self.evaluator.evaluate_missing(
            &self.state.population,
            &self.state.fitness,
            &self.root_rng,
            self.state.generation,
            self.parallel,
        );
        self.state.record_best();
        if let Some(row) = statistic::summarize(&self.state.fitness) {
            self.state.summary.push(row);
        }
    }

    /// Overwrites the individual at `slot` with an externally supplied
    /// genome/fitness pair, used by the island driver to land migrants.
    /// Does not affect `best_solution`; the next `step()` call re-derives it
    /// from the updated population.
    pub fn replace_individual(&mut self, slot: usize, genome: crate::genetic::Genome, fitness: f64) {
        self.state.population[slot] = genome;
        self.state.fitness[slot] = fitness;
    }
}
