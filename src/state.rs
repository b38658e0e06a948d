//! Run state carried across generations: the evaluated population, the
//! best solution seen so far, and the bookkeeping the termination rules and
//! the per-generation summary depend on.
//!
//! Grounded on `genevo`'s `simulation/mod.rs`, whose `State<G, F>` and
//! `BestSolution<G, F>` track exactly this shape (`started_at`, `generation`,
//! `population`, `fitness_values`, `best_solution`); this crate flattens
//! `genevo`'s generic `G`/`F` to the concrete `Genome`/`f64` this spec uses
//! throughout, and adds `run_since_improvement`, which `genevo`'s
//! termination rules do not track but spec §4.3/§4.5 needs for no-improvement
//! stopping.

use chrono::{DateTime, Local};

use crate::{genetic::Genome, statistic::SummaryRow};

/// The best individual observed in a run so far, snapshotted the generation
/// it was found.
#[derive(Clone, Debug)]
pub struct BestSolution {
    pub genome: Genome,
    pub fitness: f64,
    pub generation: u64,
    pub found_at: DateTime<Local>,
}

/// The full state of one panmictic run (or, inside the island driver, of one
/// island) carried from generation to generation.
#[derive(Clone, Debug)]
pub struct SearchState {
    pub generation: u64,
    pub population: Vec<Genome>,
    pub fitness: Vec<f64>,
    pub best_solution: Option<BestSolution>,
    /// Every distinct genome observed so far whose fitness equals
    /// `best_solution`'s (spec §3/§9: "solution" is the *set* of individuals
    /// attaining the best fitness, not just the first one found).
    pub solution: Vec<Genome>,
    /// Number of consecutive generations without an improvement to
    /// `best_solution.fitness`, used by no-improvement termination rules.
    pub run_since_improvement: u64,
    pub summary: Vec<SummaryRow>,
}

impl SearchState {
    pub fn new(population: Vec<Genome>, fitness: Vec<f64>) -> Self {
        SearchState {
            generation: 0,
            population,
            fitness,
            best_solution: None,
            solution: Vec::new(),
            run_since_improvement: 0,
            summary: Vec::new(),
        }
    }

    /// Updates `best_solution`, `solution` and `run_since_improvement` from
    /// the current `population`/`fitness`. Spec §3/§5 requires
    /// `best_solution.fitness` to be monotone non-decreasing across
    /// generations: this is enforced here by only ever replacing
    /// `best_solution` with a strictly better candidate, never a merely
    /// different one. Every genome tying the best fitness is kept in
    /// `solution`, which is reset whenever a strictly better fitness is
    /// found and added to whenever a tie is found.
    pub fn record_best(&mut self) {
        let mut improved = false;
        for (genome, &fitness) in self.population.iter().zip(self.fitness.iter()) {
            if !fitness.is_finite() {
                continue;
            }
            let is_better = match &self.best_solution {
                None => true,
                Some(current) => fitness > current.fitness,
            };
            if is_better {
                self.best_solution = Some(BestSolution {
                    genome: genome.clone(),
                    fitness,
                    generation: self.generation,
                    found_at: Local::now(),
                });
                self.solution = vec![genome.clone()];
                improved = true;
                continue;
            }
            let is_tie = match &self.best_solution {
                Some(current) => fitness == current.fitness,
                None => false,
            };
            if is_tie && !self.solution.contains(genome) {
                self.solution.push(genome.clone());
            }
        }
        if improved {
            self.run_since_improvement = 0;
        } else {
            self.run_since_improvement += 1;
        }
    }

    /// Copies the top `count` individuals (by fitness, ties broken by
    /// population order) into the front of `population`/`fitness`, so the
    /// next generation's offspring never overwrite them (spec §4.3 step 8,
    /// "elitism preservation").
    pub fn preserve_elite(&mut self, offspring: &mut Vec<Genome>, offspring_fitness: &mut Vec<f64>, elitism: usize) {
        if elitism == 0 {
            return;
        }
        let mut ranked: Vec<usize> = (0..self.population.len()).collect();
        ranked.sort_by(|&a, &b| self.fitness[b].total_cmp(&self.fitness[a]));

        let elite_count = elitism.min(self.population.len()).min(offspring.len());
        for (slot, &source) in ranked.iter().take(elite_count).enumerate() {
            offspring[slot] = self.population[source].clone();
            offspring_fitness[slot] = self.fitness[source];
        }
    }
}

/// Per-island wrapper adding the island's index and migration bookkeeping
/// the ring-migration driver needs on top of a plain `SearchState`.
#[derive(Clone, Debug)]
pub struct IslandState {
    pub index: usize,
    pub search: SearchState,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_best_is_monotone() {
        let mut state = SearchState::new(vec![Genome::RealValued(vec![1.0])], vec![1.0]);
        state.record_best();
        assert_eq!(state.best_solution.as_ref().unwrap().fitness, 1.0);

        state.fitness = vec![0.5];
        state.generation += 1;
        state.record_best();
        assert_eq!(state.best_solution.as_ref().unwrap().fitness, 1.0);
        assert_eq!(state.run_since_improvement, 1);

        state.fitness = vec![2.0];
        state.generation += 1;
        state.record_best();
        assert_eq!(state.best_solution.as_ref().unwrap().fitness, 2.0);
        assert_eq!(state.run_since_improvement, 0);
    }

    #[test]
    fn preserve_elite_copies_top_individuals() {
        let mut state = SearchState::new(
            vec![
                Genome::RealValued(vec![1.0]),
                Genome::RealValued(vec![2.0]),
                Genome::RealValued(vec![3.0]),
            ],
            vec![1.0, 3.0, 2.0],
        );
        state.generation = 0;

        let mut offspring = vec![
            Genome::RealValued(vec![9.0]),
            Genome::RealValued(vec![9.0]),
            Genome::RealValued(vec![9.0]),
        ];
        let mut offspring_fitness = vec![0.0, 0.0, 0.0];
        state.preserve_elite(&mut offspring, &mut offspring_fitness, 1);

        assert_eq!(offspring[0], Genome::RealValued(vec![2.0]));
        assert_eq!(offspring_fitness[0], 3.0);
    }
}
