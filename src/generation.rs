//! The generation engine: advances a `SearchState` by exactly one
//! generation, in the fixed order spec §4.3 specifies.
//!
//! Grounded on `genevo`'s `ga/mod.rs` `Algorithm::next`, which drives one
//! generation through select → crossover → mutate → evaluate → reinsert;
//! this module keeps that backbone but reorders it to spec §4.3's actual
//! sequence — evaluate the current (possibly freshly-bred) population
//! first, then breed the *next* generation's unevaluated offspring — and
//! inserts the two stages the teacher has no equivalent for (the
//! population-update hook and the local-search hybridization adapter).
//! Reinsertion is always elitist, since spec §4.3 does not make it
//! pluggable the way the teacher's `ReinsertionOp` is.

use crate::{
    error::{GaError, Result},
    fitness::{FitnessEvaluator, FitnessFunction, PopulationUpdate},
    genetic::{Encoding, Genome},
    localsearch::LocalSearchAdapter,
    operator::{CrossoverOp, MutationOp, SelectionOp},
    random::{random_probability, substream_for, Prng},
    state::SearchState,
    statistic,
};

/// The ten-step generation loop of spec §4.3, bundling the operators and
/// optional hooks a single run was configured with.
pub struct GenerationEngine<'a, F: FitnessFunction> {
    pub encoding: Encoding,
    pub selection: &'a dyn SelectionOp,
    pub crossover: &'a dyn CrossoverOp,
    pub mutation: &'a dyn MutationOp,
    pub evaluator: &'a FitnessEvaluator<F>,
    pub population_update: Option<&'a dyn PopulationUpdate>,
    pub local_search: Option<&'a LocalSearchAdapter>,
    /// Probability that local-search hybridization is attempted at all in a
    /// given generation (spec §4.4, default `0.05`). Ignored when
    /// `local_search` is `None`.
    pub poptim: f64,
    pub elitism: usize,
    pub pcrossover: f64,
    pub pmutation: f64,
    pub use_pool: bool,
}

impl<'a, F: FitnessFunction> GenerationEngine<'a, F> {
    /// Advances `state` by one generation in place, following spec §4.3:
    ///
    /// 1. Evaluate missing fitnesses of the current population.
    /// 2. Population-update hook (optional), over the now-fully-evaluated
    ///    population.
    /// 3. Update best-so-far and `run_since_improvement`.
    /// 4. Local-search hybridization (optional), refining one individual of
    ///    the current evaluated population in place — the only point in the
    ///    loop where ranks can be computed from known fitness.
    /// 5. Append this generation's summary row.
    /// 6. Elitism snapshot: remember the top-`elitism` individuals before
    ///    they are replaced by offspring.
    /// 7. Selection produces a parent pool from the current population.
    /// 8. Crossover, pairwise, with probability `pcrossover`.
    /// 9. Mutation, per offspring, with probability `pmutation`.
    /// 10. Re-insert the snapshotted elites into the new (as yet
    ///     unevaluated) generation, replacing it as `state`'s population;
    ///     the caller runs termination rules against the result.
    pub fn step(&self, state: &mut SearchState, root_rng: &Prng) -> Result<()> {
        let generation = state.generation;
        let pop_size = state.population.len();

        // Step 1: evaluate missing fitnesses.
        state.fitness = self.evaluator.evaluate_missing(&state.population, &state.fitness, root_rng, generation, self.use_pool);

        if state.fitness.iter().all(|f| !f.is_finite()) {
            return Err(GaError::MissingFitness { generation });
        }

        // Step 2: population-update hook.
        if let Some(update) = self.population_update {
            self.evaluator.apply_population_update(
                &mut state.population,
                &mut state.fitness,
                &self.encoding,
                update,
                root_rng,
                generation,
            )?;
        }

        // Step 3: update best-so-far.
        state.record_best();

        // Step 4: local-search hybridization, attempted with probability
        // `poptim` (spec §4.4); the gate and the refinement draw from
        // distinct substreams so the gate's outcome cannot bias the pick.
        if let Some(adapter) = self.local_search {
            let mut gate_rng = substream_for(root_rng, generation, pop_size + 2);
            if random_probability(&mut gate_rng) < self.poptim {
                let mut rng = substream_for(root_rng, generation, pop_size);
                if let Some((index, genome, fitness)) =
                    adapter.refine(&state.population, &state.fitness, &self.encoding, self.evaluator.function_ref(), &mut rng)
                {
                    state.population[index] = genome;
                    state.fitness[index] = fitness;
                    state.record_best();
                }
            }
        }

        // Step 5: summary row.
        if let Some(row) = statistic::summarize(&state.fitness) {
            state.summary.push(row);
        }

        // Step 6 happens just before the new generation is committed (see
        // below): `SearchState::preserve_elite` ranks `state.population`
        // before it is overwritten, so the snapshot and the overwrite must
        // stay adjacent.

        // Step 7: selection.
        let next_generation = generation + 1;
        let mut selection_rng = substream_for(root_rng, generation, pop_size + 1);
        let parents = self
            .selection
            .select(&state.population, &state.fitness, pop_size, &mut selection_rng)?;

        // Steps 8-9: crossover, mutation.
        let mut offspring: Vec<Genome> = Vec::with_capacity(pop_size);
        let mut pair_index = 0;
        while offspring.len() < pop_size {
            let mut rng = substream_for(root_rng, next_generation, pair_index);
            let a = parents[pair_index % parents.len()].clone();
            let b = parents[(pair_index + 1) % parents.len()].clone();

            let (mut c0, mut c1) = if random_probability(&mut rng) < self.pcrossover {
                self.crossover
                    .crossover(&(a, b), &self.encoding, &mut rng)
                    .map_err(|e| e.with_generation(next_generation))?
            } else {
                (a, b)
            };

            if random_probability(&mut rng) < self.pmutation {
                c0 = self.mutation.mutate(&c0, &self.encoding, &mut rng).map_err(|e| e.with_generation(next_generation))?;
            }
            if random_probability(&mut rng) < self.pmutation {
                c1 = self.mutation.mutate(&c1, &self.encoding, &mut rng).map_err(|e| e.with_generation(next_generation))?;
            }

            offspring.push(c0);
            if offspring.len() < pop_size {
                offspring.push(c1);
            }
            pair_index += 1;
        }
        let mut offspring_fitness = vec![f64::NAN; offspring.len()];

        // Step 6 (snapshot) + step 10 (re-insert): rank `state.population`
        // (still the pre-breeding generation) and copy its top `elitism`
        // individuals into the new generation before it replaces `state`.
        state.preserve_elite(&mut offspring, &mut offspring_fitness, self.elitism);

        state.population = offspring;
        state.fitness = offspring_fitness;
        state.generation = next_generation;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{operator::defaults_for, random::get_rng};

    fn sphere(genome: &Genome) -> f64 {
        -genome.as_real_valued().unwrap().iter().map(|v| v * v).sum::<f64>()
    }

    fn engine<'a, F: FitnessFunction>(defaults: &'a crate::operator::OperatorSet, evaluator: &'a FitnessEvaluator<F>) -> GenerationEngine<'a, F> {
        GenerationEngine {
            encoding: Encoding::RealValued { bounds: vec![(-5.0, 5.0); 2] },
            selection: defaults.selection.as_ref(),
            crossover: defaults.crossover.as_ref(),
            mutation: defaults.mutation.as_ref(),
            evaluator,
            population_update: None,
            local_search: None,
            poptim: 0.0,
            elitism: 1,
            pcrossover: 0.8,
            pmutation: 0.1,
            use_pool: false,
        }
    }

    fn always_nan(_genome: &Genome) -> f64 {
        f64::NAN
    }

    #[test]
    fn aborts_with_missing_fitness_when_all_non_finite() {
        let encoding = Encoding::RealValued { bounds: vec![(-5.0, 5.0); 2] };
        let defaults = defaults_for(&encoding);
        let nan_evaluator = FitnessEvaluator::new(always_nan);
        let eng = engine(&defaults, &nan_evaluator);
        let mut state = SearchState::new(
            vec![Genome::RealValued(vec![1.0, 1.0]), Genome::RealValued(vec![2.0, 2.0])],
            vec![f64::NAN, f64::NAN],
        );
        let rng = get_rng([5u8; 32]);
        let result = eng.step(&mut state, &rng);
        assert!(matches!(result, Err(GaError::MissingFitness { generation: 0 })));
    }

    #[test]
    fn selection_draws_a_different_sequence_each_generation() {
        let encoding = Encoding::RealValued { bounds: vec![(-5.0, 5.0); 2] };
        let defaults = defaults_for(&encoding);
        let evaluator = FitnessEvaluator::new(sphere);
        let eng = engine(&defaults, &evaluator);
        let rng = get_rng([6u8; 32]);
        let population: Vec<Genome> = (0..10).map(|i| Genome::RealValued(vec![i as f64, -(i as f64)])).collect();

        let mut state_a = SearchState::new(population.clone(), vec![f64::NAN; 10]);
        eng.step(&mut state_a, &rng).unwrap();

        let mut state_b = SearchState::new(population, vec![f64::NAN; 10]);
        state_b.generation = 5;
        eng.step(&mut state_b, &rng).unwrap();

        assert_ne!(state_a.population, state_b.population);
    }

    #[test]
    fn poptim_zero_never_triggers_local_search() {
        let encoding = Encoding::RealValued { bounds: vec![(-5.0, 5.0); 2] };
        let defaults = defaults_for(&encoding);
        let evaluator = FitnessEvaluator::new(sphere);
        let adapter = LocalSearchAdapter::new(20, 0.5);
        let mut eng = engine(&defaults, &evaluator);
        eng.local_search = Some(&adapter);
        eng.poptim = 0.0;

        let population = vec![Genome::RealValued(vec![3.0, 3.0]); 5];
        let mut state = SearchState::new(population, vec![f64::NAN; 5]);
        let rng = get_rng([7u8; 32]);
        eng.step(&mut state, &rng).unwrap();
        // With poptim=0 the refined candidate never lands, so the
        // elite-preserved slot still carries the untouched starting genome.
        assert_eq!(state.population[0], Genome::RealValued(vec![3.0, 3.0]));
    }
}
