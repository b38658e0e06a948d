//! The local-search adapter: spec §4.4's hybridization hook, which refines
//! a single individual per generation with a general-purpose numerical
//! optimizer rather than relying solely on the genetic operators.
//!
//! No repo in the example pack bundles a general-purpose box-constrained
//! optimizer, so this module reaches for `argmin` (with `argmin-math`'s
//! `Vec<f64>` support), the standard choice in the Rust ecosystem for this
//! role. The rank-weighted pick of which individual to refine reuses
//! `random::WeightedDistribution`, the same helper the teacher crate built
//! for roulette-wheel selection (`random.rs`/`math.rs`).

use std::sync::atomic::{AtomicBool, Ordering};

use argmin::core::{CostFunction, Error as ArgminError, Executor, State as ArgminState};
use argmin::solver::neldermead::NelderMead;

use crate::{
    fitness::FitnessFunction,
    genetic::{Encoding, Genome},
    random::{Rng, WeightedDistribution},
};

/// Wraps a `FitnessFunction` as an `argmin` cost function to minimize: cost
/// is negative fitness, with a large penalty added per unit of
/// out-of-bounds distance so the simplex is pushed back toward the
/// feasible region instead of the search silently leaving it.
struct BoxedCost<'a, F: FitnessFunction> {
    function: &'a F,
    bounds: &'a [(f64, f64)],
}

impl<'a, F: FitnessFunction> CostFunction for BoxedCost<'a, F> {
    type Param = Vec<f64>;
    type Output = f64;

    fn cost(&self, param: &Self::Param) -> Result<Self::Output, ArgminError> {
        let mut penalty = 0.0;
        for (&value, &(lo, hi)) in param.iter().zip(self.bounds.iter()) {
            if value < lo {
                penalty += (lo - value) * 1e6;
            } else if value > hi {
                penalty += (value - hi) * 1e6;
            }
        }
        let genome = Genome::RealValued(param.clone());
        Ok(-self.function.evaluate(&genome) + penalty)
    }
}

/// Refines one individual per generation via a derivative-free local search,
/// chosen from the current population with probability proportional to
/// fitness rank (`pressel` in spec terminology). Whether this is attempted
/// at all in a given generation (the `poptim` probability) is the caller's
/// responsibility — this adapter always picks and refines when asked.
pub struct LocalSearchAdapter {
    pub max_iters: u64,
    /// Selection pressure in `[0, 1]` biasing the rank-weighted
    /// starting-point pick toward the best-ranked individuals; `0.5` is
    /// near-uniform, values approaching `1.0` concentrate on the best (spec
    /// §4.4).
    pub pressel: f64,
    warned_unsupported: AtomicBool,
}

impl LocalSearchAdapter {
    pub fn new(max_iters: u64, pressel: f64) -> Self {
        LocalSearchAdapter {
            max_iters,
            pressel,
            warned_unsupported: AtomicBool::new(false),
        }
    }

    /// Picks an individual from `population` (rank-weighted, best individual
    /// most likely), refines it in place if the encoding is `RealValued`,
    /// and returns its new genome and fitness if the refinement actually
    /// happened and improved on the starting fitness.
    pub fn refine<F: FitnessFunction>(
        &self,
        population: &[Genome],
        fitness: &[f64],
        encoding: &Encoding,
        function: &F,
        rng: &mut crate::random::Prng,
    ) -> Option<(usize, Genome, f64)> {
        let bounds = match encoding {
            Encoding::RealValued { bounds } => bounds,
            _ => {
                if !self.warned_unsupported.swap(true, Ordering::Relaxed) {
                    log::warn!(
                        "local-search hybridization requested for encoding {encoding}, \
                         which has no registered projector; skipping"
                    );
                }
                return None;
            }
        };

        let candidates: Vec<usize> = (0..fitness.len()).filter(|&i| fitness[i].is_finite()).collect();
        if candidates.is_empty() {
            return None;
        }
        let mut ranked = candidates.clone();
        ranked.sort_by(|&a, &b| fitness[b].total_cmp(&fitness[a]));
        // Spec §4.4: w_i ∝ 2·pressel + 2·(1 − 2·pressel)·(r_i − 1)/(N − 1),
        // r_i the rank with 1 = best. `ranked`'s position is already
        // `r_i - 1`, so `position as f64` substitutes directly.
        let n = ranked.len() as f64;
        let weights: Vec<f64> = (0..ranked.len())
            .map(|position| 2.0 * self.pressel + 2.0 * (1.0 - 2.0 * self.pressel) * (position as f64) / (n - 1.0).max(1.0))
            .collect();
        let pick = ranked[WeightedDistribution::new(weights).sample(rng)];

        let start = population[pick].as_real_valued()?.to_vec();
        let refined = self.run_nelder_mead(function, bounds, start, rng)?;
        let refined_genome = Genome::RealValued(refined.clone());
        if !encoding.is_valid(&refined_genome) {
            return None;
        }
        let refined_fitness = function.evaluate(&refined_genome);
        if refined_fitness > fitness[pick] {
            Some((pick, refined_genome, refined_fitness))
        } else {
            None
        }
    }

    fn run_nelder_mead<F: FitnessFunction>(
        &self,
        function: &F,
        bounds: &[(f64, f64)],
        start: Vec<f64>,
        rng: &mut crate::random::Prng,
    ) -> Option<Vec<f64>> {
        let dimension = start.len();
        if dimension == 0 {
            return None;
        }

        let mut simplex = vec![start.clone()];
        for i in 0..dimension {
            let mut vertex = start.clone();
            let (lo, hi) = bounds[i];
            let span = (hi - lo).abs().max(1e-9);
            let nudge = span * 0.05 * (rng.gen_range(0..2) as f64 * 2.0 - 1.0);
            vertex[i] = (vertex[i] + nudge).clamp(lo, hi);
            simplex.push(vertex);
        }

        let cost = BoxedCost { function, bounds };
        let solver = NelderMead::new(simplex);
        let result = Executor::new(cost, solver)
            .configure(|state| state.max_iters(self.max_iters))
            .run()
            .ok()?;

        result.state().get_best_param().cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::get_rng;

    fn neg_sphere(genome: &Genome) -> f64 {
        -genome.as_real_valued().unwrap().iter().map(|v| v * v).sum::<f64>()
    }

    #[test]
    fn refine_improves_or_declines_to_replace() {
        let encoding = Encoding::RealValued { bounds: vec![(-5.0, 5.0), (-5.0, 5.0)] };
        let population = vec![Genome::RealValued(vec![3.0, 3.0])];
        let fitness = vec![neg_sphere(&population[0])];
        let adapter = LocalSearchAdapter::new(50, 0.5);
        let mut rng = get_rng([1u8; 32]);
        if let Some((index, genome, value)) = adapter.refine(&population, &fitness, &encoding, &neg_sphere, &mut rng) {
            assert_eq!(index, 0);
            assert!(value >= fitness[0]);
            assert!(encoding.is_valid(&genome));
        }
    }

    #[test]
    fn refine_is_a_noop_for_permutation_encoding() {
        let encoding = Encoding::Permutation { lower: 0, upper: 3 };
        let population = vec![Genome::Permutation(vec![0, 1, 2, 3])];
        let fitness = vec![1.0];
        let adapter = LocalSearchAdapter::new(10, 0.5);
        let mut rng = get_rng([2u8; 32]);
        assert!(adapter.refine(&population, &fitness, &encoding, &neg_sphere, &mut rng).is_none());
    }
}
