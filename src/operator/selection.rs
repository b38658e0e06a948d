//! Selection operators: turn an evaluated population into a pool of parents
//! for crossover.
//!
//! Spec §4.1 names linear-rank, nonlinear-rank, roulette-wheel and
//! tournament selection as the four strategies this crate supports; the
//! rank-based ones and roulette share the `WeightedDistribution` helper
//! `genevo`'s teacher module built for exactly this purpose
//! (`random.rs`/`math.rs`'s `WeightedDistribution`). Every selector here
//! ignores rows whose fitness is missing (`NaN`) by excluding them from the
//! candidate pool entirely, as spec §3 requires.

use super::{GeneticOperator, SelectionOp};
use crate::{
    error::{GaError, Result},
    genetic::Genome,
    random::{Rng, WeightedDistribution},
};

fn finite_candidates(fitness: &[f64]) -> Vec<usize> {
    fitness
        .iter()
        .enumerate()
        .filter(|(_, f)| f.is_finite())
        .map(|(index, _)| index)
        .collect()
}

fn require_candidates(fitness: &[f64]) -> Result<Vec<usize>> {
    let candidates = finite_candidates(fitness);
    if candidates.is_empty() {
        return Err(GaError::invalid_parameter(
            "selection requires at least one individual with finite fitness",
        ));
    }
    Ok(candidates)
}

/// Linear-rank selection: weight `i` is proportional to the individual's
/// rank (best-to-worst), not its raw fitness value, so selection pressure is
/// insensitive to the scale or sign of the fitness function.
#[derive(Debug, Clone, Copy)]
pub struct LinearRankSelector {
    /// Selection pressure in `[1, 2]`; `1.0` is uniform, `2.0` is maximally
    /// rank-biased.
    pub selection_pressure: f64,
}

impl Default for LinearRankSelector {
    fn default() -> Self {
        LinearRankSelector { selection_pressure: 1.5 }
    }
}

impl GeneticOperator for LinearRankSelector {
    fn name(&self) -> &'static str {
        "LinearRankSelector"
    }
}

impl SelectionOp for LinearRankSelector {
    fn select(
        &self,
        population: &[Genome],
        fitness: &[f64],
        num_parents: usize,
        rng: &mut crate::random::Prng,
    ) -> Result<Vec<Genome>> {
        let candidates = require_candidates(fitness)?;
        let mut order = candidates.clone();
        order.sort_by(|&a, &b| fitness[a].total_cmp(&fitness[b]));

        let n = order.len() as f64;
        let sp = self.selection_pressure;
        let weights: Vec<f64> = (0..order.len())
            .map(|rank| 2.0 - sp + 2.0 * (sp - 1.0) * (rank as f64) / (n - 1.0).max(1.0))
            .collect();
        let distribution = WeightedDistribution::new(weights);

        Ok((0..num_parents)
            .map(|_| population[order[distribution.sample(rng)]].clone())
            .collect())
    }
}

/// Nonlinear-rank selection: like `LinearRankSelector` but weights decay
/// geometrically from best to worst rank, giving the top individuals
/// disproportionately more influence than a linear ramp.
#[derive(Debug, Clone, Copy)]
pub struct NonlinearRankSelector {
    /// Decay factor in `(0, 1)`; smaller values concentrate more weight on
    /// the best-ranked individuals.
    pub decay: f64,
}

impl Default for NonlinearRankSelector {
    fn default() -> Self {
        NonlinearRankSelector { decay: 0.25 }
    }
}

impl GeneticOperator for NonlinearRankSelector {
    fn name(&self) -> &'static str {
        "NonlinearRankSelector"
    }
}

impl SelectionOp for NonlinearRankSelector {
    fn select(
        &self,
        population: &[Genome],
        fitness: &[f64],
        num_parents: usize,
        rng: &mut crate::random::Prng,
    ) -> Result<Vec<Genome>> {
        let candidates = require_candidates(fitness)?;
        let mut order = candidates.clone();
        order.sort_by(|&a, &b| fitness[b].total_cmp(&fitness[a]));

        let weights: Vec<f64> = (0..order.len()).map(|rank| self.decay.powi(rank as i32)).collect();
        let distribution = WeightedDistribution::new(weights);

        Ok((0..num_parents)
            .map(|_| population[order[distribution.sample(rng)]].clone())
            .collect())
    }
}

/// Roulette-wheel selection: weight is the individual's raw fitness, shifted
/// so the worst candidate has weight zero. Requires fitness to be bounded
/// below over the candidate pool, which is always true since missing
/// entries are excluded before the shift is computed.
#[derive(Debug, Default, Clone, Copy)]
pub struct RouletteWheelSelector;

impl GeneticOperator for RouletteWheelSelector {
    fn name(&self) -> &'static str {
        "RouletteWheelSelector"
    }
}

impl SelectionOp for RouletteWheelSelector {
    fn select(
        &self,
        population: &[Genome],
        fitness: &[f64],
        num_parents: usize,
        rng: &mut crate::random::Prng,
    ) -> Result<Vec<Genome>> {
        let candidates = require_candidates(fitness)?;
        let worst = candidates
            .iter()
            .map(|&i| fitness[i])
            .fold(f64::INFINITY, f64::min);
        let weights: Vec<f64> = candidates.iter().map(|&i| fitness[i] - worst).collect();
        let distribution = WeightedDistribution::new(weights);

        Ok((0..num_parents)
            .map(|_| population[candidates[distribution.sample(rng)]].clone())
            .collect())
    }
}

/// Tournament selection: repeatedly samples `tournament_size` candidates
/// uniformly at random (with replacement) and keeps the fittest.
#[derive(Debug, Clone, Copy)]
pub struct TournamentSelector {
    pub tournament_size: usize,
}

impl Default for TournamentSelector {
    fn default() -> Self {
        TournamentSelector { tournament_size: 3 }
    }
}

impl GeneticOperator for TournamentSelector {
    fn name(&self) -> &'static str {
        "TournamentSelector"
    }
}

impl SelectionOp for TournamentSelector {
    fn select(
        &self,
        population: &[Genome],
        fitness: &[f64],
        num_parents: usize,
        rng: &mut crate::random::Prng,
    ) -> Result<Vec<Genome>> {
        let candidates = require_candidates(fitness)?;
        let size = self.tournament_size.max(1).min(candidates.len());

        let mut parents = Vec::with_capacity(num_parents);
        for _ in 0..num_parents {
            let mut best = candidates[rng.gen_range(0..candidates.len())];
            for _ in 1..size {
                let challenger = candidates[rng.gen_range(0..candidates.len())];
                if fitness[challenger] > fitness[best] {
                    best = challenger;
                }
            }
            parents.push(population[best].clone());
        }
        Ok(parents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genetic::Genome;
    use crate::random::get_rng;

    fn dummy_population(n: usize) -> Vec<Genome> {
        (0..n).map(|i| Genome::RealValued(vec![i as f64])).collect()
    }

    #[test]
    fn selectors_skip_missing_fitness_rows() {
        let population = dummy_population(4);
        let fitness = vec![1.0, f64::NAN, 3.0, 2.0];
        let mut rng = get_rng([9u8; 32]);
        for _ in 0..50 {
            let parents = TournamentSelector::default()
                .select(&population, &fitness, 1, &mut rng)
                .unwrap();
            assert_ne!(parents[0], Genome::RealValued(vec![1.0]));
        }
    }

    #[test]
    fn roulette_rejects_all_missing_fitness() {
        let population = dummy_population(3);
        let fitness = vec![f64::NAN; 3];
        let mut rng = get_rng([9u8; 32]);
        assert!(RouletteWheelSelector.select(&population, &fitness, 1, &mut rng).is_err());
    }

    #[test]
    fn linear_rank_favors_better_ranked_individuals() {
        let population = dummy_population(5);
        let fitness = vec![0.0, 1.0, 2.0, 3.0, 4.0];
        let mut rng = get_rng([4u8; 32]);
        let selector = LinearRankSelector { selection_pressure: 2.0 };
        let picks: Vec<Genome> = (0..200)
            .map(|_| selector.select(&population, &fitness, 1, &mut rng).unwrap().remove(0))
            .collect();
        let top_picks = picks.iter().filter(|g| **g == Genome::RealValued(vec![4.0])).count();
        let bottom_picks = picks.iter().filter(|g| **g == Genome::RealValued(vec![0.0])).count();
        assert!(top_picks > bottom_picks);
    }
}
