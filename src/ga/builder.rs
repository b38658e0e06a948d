//! Fluent builders for `PanmicticGa` and `IslandGa`, validating parameters
//! and resolving operator defaults at `build()` time.
//!
//! Grounded on `genevo`'s `ga/builder.rs`, whose `GeneticAlgorithmBuilder`
//! is a chain of `with_*` methods consumed by a final `build()`. That
//! builder encodes each stage as a distinct type parameter so a caller
//! cannot call `build()` before supplying every required stage; this crate
//! instead validates at `build()` and returns `GaError::InvalidParameter`,
//! since the per-run operator set is chosen dynamically from `Encoding`
//! rather than fixed at compile time (see `SPEC_FULL.md` §2).

#[cfg(not(target_arch = "wasm32"))]
use std::sync::Arc;

use crate::{
    error::{GaError, Result},
    fitness::{FitnessEvaluator, FitnessFunction, PopulationUpdate},
    ga::island::IslandGa,
    ga::panmictic::PanmicticGa,
    genetic::{Encoding, Genome},
    localsearch::LocalSearchAdapter,
    operator::{defaults_for, CrossoverOp, MutationOp, PopulationInitOp, SelectionOp},
    random::{get_rng, random_seed, Seed},
    state::SearchState,
    termination::{Any, FitnessLimit, GenerationLimit, NoImprovementLimit, Termination},
};

/// Island mode's default iteration budget is an order of magnitude larger
/// than panmictic mode's (spec §6), since migration needs more generations
/// to pay off.
const ISLAND_DEFAULT_MAX_ITERATIONS: u64 = 1000;

/// Resolves the default elitism count from the final population size (spec
/// §6: `elitism = max(1, round(0.05 * popSize))`).
fn default_elitism(pop_size: usize) -> usize {
    ((0.05 * pop_size as f64).round() as usize).max(1)
}

/// Builds a single-population (panmictic) GA run.
pub struct PanmicticGaBuilder<F: FitnessFunction> {
    encoding: Encoding,
    fitness_function: F,
    pop_size: usize,
    max_iterations: u64,
    max_iterations_explicit: bool,
    max_fitness: Option<f64>,
    max_stall_generations: Option<u64>,
    elitism: Option<usize>,
    pcrossover: f64,
    pmutation: f64,
    suggestions: Vec<Genome>,
    seed: Option<Seed>,
    parallel: bool,
    #[cfg(not(target_arch = "wasm32"))]
    pool: Option<Arc<rayon::ThreadPool>>,
    population_init: Option<Box<dyn PopulationInitOp>>,
    selection: Option<Box<dyn SelectionOp>>,
    crossover: Option<Box<dyn CrossoverOp>>,
    mutation: Option<Box<dyn MutationOp>>,
    population_update: Option<Box<dyn PopulationUpdate>>,
    local_search: Option<(u64, f64, f64)>,
}

impl<F: FitnessFunction> PanmicticGaBuilder<F> {
    pub fn new(encoding: Encoding, fitness_function: F) -> Self {
        PanmicticGaBuilder {
            encoding,
            fitness_function,
            pop_size: 50,
            max_iterations: 100,
            max_iterations_explicit: false,
            max_fitness: None,
            max_stall_generations: None,
            elitism: None,
            pcrossover: 0.8,
            pmutation: 0.1,
            suggestions: Vec::new(),
            seed: None,
            parallel: false,
            #[cfg(not(target_arch = "wasm32"))]
            pool: None,
            population_init: None,
            selection: None,
            crossover: None,
            mutation: None,
            population_update: None,
            local_search: None,
        }
    }

    pub fn pop_size(mut self, pop_size: usize) -> Self {
        self.pop_size = pop_size;
        self
    }

    pub fn max_iterations(mut self, max_iterations: u64) -> Self {
        self.max_iterations = max_iterations;
        self.max_iterations_explicit = true;
        self
    }

    pub fn max_fitness(mut self, max_fitness: f64) -> Self {
        self.max_fitness = Some(max_fitness);
        self
    }

    pub fn max_stall_generations(mut self, max_stall_generations: u64) -> Self {
        self.max_stall_generations = Some(max_stall_generations);
        self
    }

    pub fn elitism(mut self, elitism: usize) -> Self {
        self.elitism = Some(elitism);
        self
    }

    pub fn pcrossover(mut self, pcrossover: f64) -> Self {
        self.pcrossover = pcrossover;
        self
    }

    pub fn pmutation(mut self, pmutation: f64) -> Self {
        self.pmutation = pmutation;
        self
    }

    pub fn suggestions(mut self, suggestions: Vec<Genome>) -> Self {
        self.suggestions = suggestions;
        self
    }

    pub fn seed(mut self, seed: Seed) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Supplies a worker pool for parallel fitness evaluation to run on
    /// (spec §5). Implies `parallel(true)`. The pool is never torn down by
    /// this crate; a run built without one gets a freshly built pool of its
    /// own, torn down automatically when the run is dropped. Has no effect
    /// on `wasm32`, where parallel evaluation always falls back to serial.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn pool(mut self, pool: Arc<rayon::ThreadPool>) -> Self {
        self.pool = Some(pool);
        self.parallel = true;
        self
    }

    pub fn population_init(mut self, op: Box<dyn PopulationInitOp>) -> Self {
        self.population_init = Some(op);
        self
    }

    pub fn selection(mut self, op: Box<dyn SelectionOp>) -> Self {
        self.selection = Some(op);
        self
    }

    pub fn crossover(mut self, op: Box<dyn CrossoverOp>) -> Self {
        self.crossover = Some(op);
        self
    }

    pub fn mutation(mut self, op: Box<dyn MutationOp>) -> Self {
        self.mutation = Some(op);
        self
    }

    pub fn population_update(mut self, hook: Box<dyn PopulationUpdate>) -> Self {
        self.population_update = Some(hook);
        self
    }

    /// Enables local-search hybridization, running Nelder-Mead for up to
    /// `max_iters` iterations, attempted with probability `poptim` each
    /// generation on one individual picked with selection pressure
    /// `pressel` (spec §4.4; spec defaults are `poptim=0.05`,
    /// `pressel=0.5`).
    pub fn with_local_search(mut self, max_iters: u64, poptim: f64, pressel: f64) -> Self {
        self.local_search = Some((max_iters, poptim, pressel));
        self
    }

    fn validate(&self, elitism: usize) -> Result<()> {
        if self.pop_size == 0 {
            return Err(GaError::invalid_parameter("popSize must be at least 1"));
        }
        if !(0.0..=1.0).contains(&self.pcrossover) {
            return Err(GaError::invalid_parameter("pcrossover must be in [0, 1]"));
        }
        if !(0.0..=1.0).contains(&self.pmutation) {
            return Err(GaError::invalid_parameter("pmutation must be in [0, 1]"));
        }
        if elitism > self.pop_size {
            return Err(GaError::invalid_parameter("elitism must not exceed popSize"));
        }
        Ok(())
    }

    pub fn build(self) -> Result<PanmicticGa<F>> {
        let elitism = self.elitism.unwrap_or_else(|| default_elitism(self.pop_size));
        self.validate(elitism)?;

        let defaults = defaults_for(&self.encoding);
        let population_init = self.population_init.unwrap_or(defaults.population_init);
        let selection = self.selection.unwrap_or(defaults.selection);
        let crossover = self.crossover.unwrap_or(defaults.crossover);
        let mutation = self.mutation.unwrap_or(defaults.mutation);

        let seed = self.seed.unwrap_or_else(random_seed);
        let mut rng = get_rng(seed);

        let population = population_init.initialize(&self.encoding, self.pop_size, &self.suggestions, &mut rng)?;

        let evaluator = FitnessEvaluator::new(self.fitness_function);

        // Resolve the worker pool before any evaluation happens: a caller
        // pool is adopted as-is (never torn down by this crate); otherwise,
        // if parallel evaluation was requested, build and own one — it is
        // torn down automatically once the evaluator (and with it the run)
        // drops. No-op on wasm32, which always evaluates serially.
        #[cfg(not(target_arch = "wasm32"))]
        let evaluator = {
            let pool = if self.parallel {
                match self.pool {
                    Some(pool) => Some(pool),
                    None => {
                        let built = rayon::ThreadPoolBuilder::new().build().map_err(|e| GaError::Worker(e.to_string()))?;
                        Some(Arc::new(built))
                    }
                }
            } else {
                None
            };
            evaluator.with_pool(pool)
        };

        let fitness = evaluator.evaluate_population(&population, &rng, 0, self.parallel);

        // `best_solution` and the generation-0 summary row are populated by
        // the first `step()` call, which evaluates exactly this population
        // before breeding generation 1 — pre-populating them here would
        // leave a duplicate row once that call appends its own.
        let state = SearchState::new(population, fitness);

        let mut rules: Vec<Box<dyn Termination>> = vec![Box::new(GenerationLimit::new(self.max_iterations))];
        if let Some(target) = self.max_fitness {
            rules.push(Box::new(FitnessLimit::new(target)));
        }
        if let Some(stall) = self.max_stall_generations {
            rules.push(Box::new(NoImprovementLimit::new(stall)));
        }

        let (local_search, poptim) = match self.local_search {
            Some((max_iters, poptim, pressel)) => (Some(LocalSearchAdapter::new(max_iters, pressel)), poptim),
            None => (None, 0.0),
        };

        Ok(PanmicticGa {
            encoding: self.encoding,
            evaluator,
            population_init,
            selection,
            crossover,
            mutation,
            population_update: self.population_update,
            local_search,
            poptim,
            elitism,
            pcrossover: self.pcrossover,
            pmutation: self.pmutation,
            parallel: self.parallel,
            root_rng: rng,
            state,
            termination: Any::new(rules),
        })
    }
}

/// Builds a ring-migration island-model GA run: `n_islands` independent
/// `PanmicticGa` populations, each sharing the same operator configuration
/// but evolving on its own substream, periodically exchanging individuals.
pub struct IslandGaBuilder<F: FitnessFunction + Clone> {
    panmictic: PanmicticGaBuilder<F>,
    n_islands: usize,
    migration_rate: f64,
    migration_interval: u64,
}

impl<F: FitnessFunction + Clone> IslandGaBuilder<F> {
    pub fn new(mut panmictic: PanmicticGaBuilder<F>, n_islands: usize) -> Self {
        if !panmictic.max_iterations_explicit {
            panmictic.max_iterations = ISLAND_DEFAULT_MAX_ITERATIONS;
        }
        IslandGaBuilder {
            panmictic,
            n_islands,
            migration_rate: 0.1,
            migration_interval: 10,
        }
    }

    pub fn migration_rate(mut self, migration_rate: f64) -> Self {
        self.migration_rate = migration_rate;
        self
    }

    pub fn migration_interval(mut self, migration_interval: u64) -> Self {
        self.migration_interval = migration_interval;
        self
    }

    pub fn build(self) -> Result<IslandGa<F>>
    where
        F: 'static,
    {
        if self.n_islands < 2 {
            return Err(GaError::invalid_parameter("numIslands must be at least 2"));
        }
        if !(0.0..=1.0).contains(&self.migration_rate) {
            return Err(GaError::invalid_parameter("migrationRate must be in [0, 1]"));
        }
        if self.migration_interval == 0 {
            return Err(GaError::invalid_parameter("migrationInterval must be at least 1"));
        }

        let base_seed = self.panmictic.seed.unwrap_or_else(random_seed);
        let mut islands = Vec::with_capacity(self.n_islands);
        for index in 0..self.n_islands {
            let mut island_seed = base_seed;
            island_seed[0] ^= index as u8;
            island_seed[1] ^= (index >> 8) as u8;

            let builder = PanmicticGaBuilder {
                encoding: self.panmictic.encoding.clone(),
                fitness_function: self.panmictic.fitness_function.clone(),
                pop_size: self.panmictic.pop_size,
                max_iterations: self.panmictic.max_iterations,
                max_iterations_explicit: self.panmictic.max_iterations_explicit,
                max_fitness: self.panmictic.max_fitness,
                max_stall_generations: self.panmictic.max_stall_generations,
                elitism: self.panmictic.elitism,
                pcrossover: self.panmictic.pcrossover,
                pmutation: self.panmictic.pmutation,
                suggestions: if index == 0 { self.panmictic.suggestions.clone() } else { Vec::new() },
                seed: Some(island_seed),
                parallel: self.panmictic.parallel,
                #[cfg(not(target_arch = "wasm32"))]
                pool: self.panmictic.pool.clone(),
                population_init: None,
                selection: None,
                crossover: None,
                mutation: None,
                population_update: None,
                local_search: self.panmictic.local_search,
            };
            islands.push(builder.build()?);
        }

        let stop_reasons = vec![None; islands.len()];
        Ok(IslandGa {
            islands,
            migration_rate: self.migration_rate,
            migration_interval: self.migration_interval,
            generation: 0,
            stop_reasons,
        })
    }
}
