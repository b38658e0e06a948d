//! Population initialization: the first sub-step of spec §4.3, responsible
//! for turning an `Encoding` and an optional suggestions matrix into a
//! `popSize`-sized starting population.
//!
//! Grounded on `genevo`'s `population/mod.rs`, whose `PopulationBuilder`
//! uniformly samples genomes within a `GenomeBuilder`'s domain; this module
//! keeps that uniform-sampling behaviour but adds suggestion-seeding, which
//! `genevo`'s builder has no equivalent for.

use fixedbitset::FixedBitSet;

use super::{GeneticOperator, PopulationInitOp};
use crate::{
    error::{GaError, Result},
    genetic::{Encoding, Genome},
    random::Prng,
};

/// Fills the population by copying as many rows of `suggestions` as fit,
/// then sampling the remainder uniformly at random within the encoding's
/// domain (spec §4.1, §9 "Suggestion-seeded init").
#[derive(Debug, Default, Clone, Copy)]
pub struct UniformRandomInit;

impl GeneticOperator for UniformRandomInit {
    fn name(&self) -> &'static str {
        "UniformRandomInit"
    }
}

impl PopulationInitOp for UniformRandomInit {
    fn initialize(
        &self,
        encoding: &Encoding,
        pop_size: usize,
        suggestions: &[Genome],
        rng: &mut Prng,
    ) -> Result<Vec<Genome>> {
        if pop_size == 0 {
            return Err(GaError::invalid_parameter("popSize must be at least 1"));
        }

        for (row, suggestion) in suggestions.iter().enumerate() {
            if !encoding.is_valid(suggestion) {
                return Err(GaError::shape_mismatch(format!(
                    "suggestion row {row} does not match encoding {encoding}"
                )));
            }
        }

        let seeded = suggestions.len().min(pop_size);
        let mut population: Vec<Genome> = suggestions[..seeded].to_vec();
        population.reserve(pop_size - seeded);
        for _ in seeded..pop_size {
            population.push(random_genome(encoding, rng));
        }
        Ok(population)
    }
}

/// Draws a single uniformly random genome within `encoding`'s domain.
pub fn random_genome(encoding: &Encoding, rng: &mut Prng) -> Genome {
    use rand::Rng as _;

    match encoding {
        Encoding::Binary { n_bits } => {
            let mut bits = FixedBitSet::with_capacity(*n_bits);
            for i in 0..*n_bits {
                bits.set(i, rng.gen_bool(0.5));
            }
            Genome::Binary(bits)
        }
        Encoding::RealValued { bounds } => {
            let values = bounds.iter().map(|(lo, hi)| rng.gen_range(*lo..=*hi)).collect();
            Genome::RealValued(values)
        }
        Encoding::Permutation { lower, upper } => {
            let mut order: Vec<usize> = (*lower..=*upper).collect();
            // Fisher-Yates shuffle.
            for i in (1..order.len()).rev() {
                let j = rng.gen_range(0..=i);
                order.swap(i, j);
            }
            Genome::Permutation(order)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::get_rng;

    #[test]
    fn seeds_from_suggestions_then_fills_uniformly() {
        let encoding = Encoding::Binary { n_bits: 4 };
        let mut rng = get_rng([1u8; 32]);
        let mut seed_bits = FixedBitSet::with_capacity(4);
        seed_bits.insert(0);
        let suggestions = vec![Genome::Binary(seed_bits.clone())];
        let population = UniformRandomInit.initialize(&encoding, 5, &suggestions, &mut rng).unwrap();
        assert_eq!(population.len(), 5);
        assert_eq!(population[0], Genome::Binary(seed_bits));
        for genome in &population {
            assert!(encoding.is_valid(genome));
        }
    }

    #[test]
    fn rejects_mismatched_suggestion_shape() {
        let encoding = Encoding::Binary { n_bits: 4 };
        let mut rng = get_rng([1u8; 32]);
        let suggestions = vec![Genome::Binary(FixedBitSet::with_capacity(3))];
        assert!(UniformRandomInit.initialize(&encoding, 5, &suggestions, &mut rng).is_err());
    }

    #[test]
    fn permutation_genomes_are_valid_permutations() {
        let encoding = Encoding::Permutation { lower: 0, upper: 4 };
        let mut rng = get_rng([2u8; 32]);
        let population = UniformRandomInit.initialize(&encoding, 10, &[], &mut rng).unwrap();
        for genome in &population {
            assert!(encoding.is_valid(genome));
        }
    }
}
