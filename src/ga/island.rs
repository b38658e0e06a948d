//! The island-model GA driver: `n` panmictic populations evolving
//! independently, periodically exchanging their best individuals around a
//! ring (spec §4.6).

use crate::{
    error::Result,
    fitness::FitnessFunction,
    ga::panmictic::PanmicticGa,
    result::{GaResult, IslandGaResult},
    state::BestSolution,
    termination::{StopFlag, StopReason},
};

/// A configured, ready-to-run island-model GA. Built via
/// `IslandGaBuilder::build`.
pub struct IslandGa<F: FitnessFunction> {
    pub(crate) islands: Vec<PanmicticGa<F>>,
    pub(crate) migration_rate: f64,
    pub(crate) migration_interval: u64,
    pub(crate) generation: u64,
    /// Set the first time each island reports `StopFlag::StopNow`; once set,
    /// `step()` no longer advances that island and `migrate()` excludes it
    /// from both ends of the ring, so its captured `GaResult` always
    /// reflects exactly the state it stopped at.
    pub(crate) stop_reasons: Vec<Option<StopReason>>,
}

impl<F: FitnessFunction> IslandGa<F> {
    /// Advances every island by one generation, then migrates individuals
    /// around the ring every `migration_interval` generations.
    ///
    /// Migration copies the best `ceil(popSize * migration_rate)`
    /// individuals of island `i` into the worst-ranked slots of island
    /// `(i + 1) % n`, all migrations computed from the pre-migration state
    /// so the ring is order-independent (spec §5's "island determinism"
    /// invariant: the same result whether islands are stepped serially or
    /// in parallel).
    pub fn step(&mut self) -> Result<Vec<StopFlag>> {
        let mut flags = Vec::with_capacity(self.islands.len());
        for (index, island) in self.islands.iter_mut().enumerate() {
            if let Some(reason) = &self.stop_reasons[index] {
                flags.push(StopFlag::StopNow(reason.clone()));
                continue;
            }
            let flag = island.step()?;
            if let StopFlag::StopNow(reason) = &flag {
                self.stop_reasons[index] = Some(reason.clone());
            }
            flags.push(flag);
        }
        self.generation += 1;

        if self.generation % self.migration_interval == 0 {
            self.migrate();
        }

        Ok(flags)
    }

    /// `step()` leaves each island's population mid-breeding: slot fitness is
    /// `NaN` except where elitism copied a known-good individual forward.
    /// Those finite slots are exactly the island's proven best individuals,
    /// so emigrants are drawn only from them; `NaN` slots are the unproven
    /// freshly-bred offspring and are what migrants preferentially overwrite
    /// (sorted as though their fitness were `-infinity`, so they sort before
    /// any finite value and are picked first).
    fn migrate(&mut self) {
        let n = self.islands.len();
        if n < 2 {
            return;
        }

        let emigrants: Vec<Vec<(crate::genetic::Genome, f64)>> = self
            .islands
            .iter()
            .enumerate()
            .map(|(index, island)| {
                if self.stop_reasons[index].is_some() {
                    return Vec::new();
                }
                let state = island.state();
                let count = ((state.population.len() as f64) * self.migration_rate).ceil() as usize;
                let count = count.min(state.population.len());
                let mut ranked: Vec<usize> = (0..state.population.len())
                    .filter(|&i| state.fitness[i].is_finite())
                    .collect();
                ranked.sort_by(|&a, &b| state.fitness[b].total_cmp(&state.fitness[a]));
                ranked
                    .into_iter()
                    .take(count)
                    .map(|i| (state.population[i].clone(), state.fitness[i]))
                    .collect()
            })
            .collect();

        let stop_reasons = &self.stop_reasons;
        for (index, island) in self.islands.iter_mut().enumerate() {
            if stop_reasons[index].is_some() {
                continue;
            }
            let source = (index + n - 1) % n;
            let incoming = &emigrants[source];
            if incoming.is_empty() {
                continue;
            }

            let pop_len = island.state().population.len();
            let mut worst: Vec<usize> = (0..pop_len).collect();
            worst.sort_by(|&a, &b| {
                let key = |i: usize| {
                    let value = island.state().fitness[i];
                    if value.is_nan() {
                        f64::NEG_INFINITY
                    } else {
                        value
                    }
                };
                key(a).total_cmp(&key(b))
            });

            for (slot, (genome, fitness)) in worst.into_iter().zip(incoming.iter()) {
                island.replace_individual(slot, genome.clone(), *fitness);
            }
        }
    }

    /// Runs every island until each has independently terminated,
    /// migrating between islands along the way, and returns the overall
    /// best solution alongside each island's terminal result.
    pub fn run(&mut self) -> Result<IslandGaResult> {
        let island_count = self.islands.len();
        let mut finished: Vec<Option<GaResult>> = vec![None; island_count];

        // Pre-loop check, mirroring `PanmicticGa::run`: an island already
        // terminal at generation 0 (e.g. `maxiter=0`) is captured without
        // ever being stepped.
        for index in 0..island_count {
            if let StopFlag::StopNow(reason) = self.islands[index].check_termination() {
                self.islands[index].finalize();
                self.stop_reasons[index] = Some(reason.clone());
                finished[index] = Some(self.islands[index].terminal_result(reason));
            }
        }

        while !finished.iter().all(Option::is_some) {
            let flags = self.step()?;
            for (index, flag) in flags.into_iter().enumerate() {
                if finished[index].is_none() {
                    if let StopFlag::StopNow(reason) = flag {
                        let island = &mut self.islands[index];
                        island.finalize();
                        finished[index] = Some(island.terminal_result(reason));
                    }
                }
            }
        }

        let islands: Vec<GaResult> = finished.into_iter().map(Option::unwrap).collect();
        let best_solution: BestSolution = islands
            .iter()
            .map(|result| result.best_solution.clone())
            .max_by(|a, b| a.fitness.total_cmp(&b.fitness))
            .expect("at least one island ran");
        let best_fitness = best_solution.fitness;
        let mut solution: Vec<crate::genetic::Genome> = Vec::new();
        for result in islands.iter().filter(|result| result.best_solution.fitness == best_fitness) {
            for genome in &result.solution {
                if !solution.contains(genome) {
                    solution.push(genome.clone());
                }
            }
        }

        Ok(IslandGaResult {
            best_solution,
            solution,
            generations: self.generation,
            islands,
        })
    }
}
