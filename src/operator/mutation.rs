//! Mutation operators, one family per encoding (spec §4.1):
//!
//! - Binary: bit-flip.
//! - RealValued: uniform-in-range and Gaussian-with-clipping.
//! - Permutation: swap, insertion, scramble.
//!
//! Each mutation is applied locus-by-locus with independent probability
//! `rate` (except the permutation operators, which apply once per call at
//! probability `rate` since they necessarily touch more than one locus).

use super::{GeneticOperator, MutationOp};
use crate::{
    error::{GaError, Result},
    genetic::{Encoding, Genome},
    random::{random_index, random_probability, Prng},
};

fn domain_violation(operator: &'static str) -> GaError {
    GaError::operator_domain_violation(operator, 0)
}

fn validate(genome: &Genome, encoding: &Encoding, operator: &'static str) -> Result<()> {
    if encoding.is_valid(genome) {
        Ok(())
    } else {
        Err(domain_violation(operator))
    }
}

/// Flips each bit of a `Binary` genome independently with probability
/// `rate`.
#[derive(Debug, Clone, Copy)]
pub struct BitFlipMutation {
    pub rate: f64,
}

impl Default for BitFlipMutation {
    fn default() -> Self {
        BitFlipMutation { rate: 0.01 }
    }
}

impl GeneticOperator for BitFlipMutation {
    fn name(&self) -> &'static str {
        "BitFlipMutation"
    }
}

impl MutationOp for BitFlipMutation {
    fn mutate(&self, individual: &Genome, encoding: &Encoding, rng: &mut Prng) -> Result<Genome> {
        let bits = individual
            .as_binary()
            .ok_or_else(|| GaError::shape_mismatch("BitFlipMutation requires a Binary genome"))?;

        let mut mutated = bits.clone();
        for i in 0..mutated.len() {
            if random_probability(rng) < self.rate {
                mutated.toggle(i);
            }
        }
        let genome = Genome::Binary(mutated);
        validate(&genome, encoding, self.name())?;
        Ok(genome)
    }
}

/// Replaces each real-valued locus with a fresh uniform draw within its
/// bounds, independently with probability `rate`.
#[derive(Debug, Clone, Copy)]
pub struct UniformRealMutation {
    pub rate: f64,
}

impl Default for UniformRealMutation {
    fn default() -> Self {
        UniformRealMutation { rate: 0.1 }
    }
}

impl GeneticOperator for UniformRealMutation {
    fn name(&self) -> &'static str {
        "UniformRealMutation"
    }
}

impl MutationOp for UniformRealMutation {
    fn mutate(&self, individual: &Genome, encoding: &Encoding, rng: &mut Prng) -> Result<Genome> {
        use rand::Rng as _;

        let values = individual
            .as_real_valued()
            .ok_or_else(|| GaError::shape_mismatch("UniformRealMutation requires a RealValued genome"))?;
        let bounds = match encoding {
            Encoding::RealValued { bounds } => bounds,
            _ => return Err(domain_violation(self.name())),
        };

        let mutated: Vec<f64> = values
            .iter()
            .enumerate()
            .map(|(i, &v)| {
                if random_probability(rng) < self.rate {
                    let (lo, hi) = bounds[i];
                    rng.gen_range(lo..=hi)
                } else {
                    v
                }
            })
            .collect();

        let genome = Genome::RealValued(mutated);
        validate(&genome, encoding, self.name())?;
        Ok(genome)
    }
}

/// Perturbs each real-valued locus by Gaussian noise with standard
/// deviation `sigma`, independently with probability `rate`, clipping the
/// result back into bounds.
#[derive(Debug, Clone, Copy)]
pub struct GaussianMutation {
    pub rate: f64,
    pub sigma: f64,
}

impl Default for GaussianMutation {
    fn default() -> Self {
        GaussianMutation { rate: 0.1, sigma: 0.1 }
    }
}

impl GeneticOperator for GaussianMutation {
    fn name(&self) -> &'static str {
        "GaussianMutation"
    }
}

impl MutationOp for GaussianMutation {
    fn mutate(&self, individual: &Genome, encoding: &Encoding, rng: &mut Prng) -> Result<Genome> {
        let values = individual
            .as_real_valued()
            .ok_or_else(|| GaError::shape_mismatch("GaussianMutation requires a RealValued genome"))?;
        let bounds = match encoding {
            Encoding::RealValued { bounds } => bounds,
            _ => return Err(domain_violation(self.name())),
        };

        let mutated: Vec<f64> = values
            .iter()
            .enumerate()
            .map(|(i, &v)| {
                if random_probability(rng) < self.rate {
                    let (lo, hi) = bounds[i];
                    let noise = sample_standard_normal(rng) * self.sigma * (hi - lo);
                    (v + noise).clamp(lo, hi)
                } else {
                    v
                }
            })
            .collect();

        let genome = Genome::RealValued(mutated);
        validate(&genome, encoding, self.name())?;
        Ok(genome)
    }
}

/// Draws one standard-normal sample via the Box-Muller transform, so this
/// crate does not need to add `rand_distr` for a single call site.
fn sample_standard_normal(rng: &mut Prng) -> f64 {
    use std::f64::consts::PI;
    let u1 = random_probability(rng).max(f64::EPSILON);
    let u2 = random_probability(rng);
    (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
}

/// Swaps two randomly chosen loci of a `Permutation` genome.
#[derive(Debug, Clone, Copy)]
pub struct SwapMutation;

impl GeneticOperator for SwapMutation {
    fn name(&self) -> &'static str {
        "SwapMutation"
    }
}

impl MutationOp for SwapMutation {
    fn mutate(&self, individual: &Genome, encoding: &Encoding, rng: &mut Prng) -> Result<Genome> {
        let order = individual
            .as_permutation()
            .ok_or_else(|| GaError::shape_mismatch("SwapMutation requires a Permutation genome"))?;
        if order.len() < 2 {
            return Err(GaError::shape_mismatch("SwapMutation requires at least 2 loci"));
        }

        let mut mutated = order.to_vec();
        let i = random_index(rng, mutated.len());
        let mut j = random_index(rng, mutated.len());
        while j == i {
            j = random_index(rng, mutated.len());
        }
        mutated.swap(i, j);

        let genome = Genome::Permutation(mutated);
        validate(&genome, encoding, self.name())?;
        Ok(genome)
    }
}

/// Removes one randomly chosen locus and reinserts it at another randomly
/// chosen position of a `Permutation` genome.
#[derive(Debug, Clone, Copy)]
pub struct InsertionMutation;

impl GeneticOperator for InsertionMutation {
    fn name(&self) -> &'static str {
        "InsertionMutation"
    }
}

impl MutationOp for InsertionMutation {
    fn mutate(&self, individual: &Genome, encoding: &Encoding, rng: &mut Prng) -> Result<Genome> {
        let order = individual
            .as_permutation()
            .ok_or_else(|| GaError::shape_mismatch("InsertionMutation requires a Permutation genome"))?;
        if order.len() < 2 {
            return Err(GaError::shape_mismatch("InsertionMutation requires at least 2 loci"));
        }

        let mut mutated = order.to_vec();
        let from = random_index(rng, mutated.len());
        let value = mutated.remove(from);
        let to = random_index(rng, mutated.len() + 1);
        mutated.insert(to, value);

        let genome = Genome::Permutation(mutated);
        validate(&genome, encoding, self.name())?;
        Ok(genome)
    }
}

/// Scrambles a randomly chosen contiguous segment of a `Permutation`
/// genome in place.
#[derive(Debug, Clone, Copy)]
pub struct ScrambleMutation;

impl GeneticOperator for ScrambleMutation {
    fn name(&self) -> &'static str {
        "ScrambleMutation"
    }
}

impl MutationOp for ScrambleMutation {
    fn mutate(&self, individual: &Genome, encoding: &Encoding, rng: &mut Prng) -> Result<Genome> {
        use rand::Rng as _;

        let order = individual
            .as_permutation()
            .ok_or_else(|| GaError::shape_mismatch("ScrambleMutation requires a Permutation genome"))?;
        if order.len() < 2 {
            return Err(GaError::shape_mismatch("ScrambleMutation requires at least 2 loci"));
        }

        let mut mutated = order.to_vec();
        let a = random_index(rng, mutated.len());
        let b = random_index(rng, mutated.len());
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let segment = &mut mutated[lo..=hi];
        for i in (1..segment.len()).rev() {
            let j = rng.gen_range(0..=i);
            segment.swap(i, j);
        }

        let genome = Genome::Permutation(mutated);
        validate(&genome, encoding, self.name())?;
        Ok(genome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::get_rng;
    use fixedbitset::FixedBitSet;

    #[test]
    fn bit_flip_mutation_stays_within_domain() {
        let encoding = Encoding::Binary { n_bits: 8 };
        let genome = Genome::Binary(FixedBitSet::with_capacity(8));
        let mut rng = get_rng([1u8; 32]);
        let mutated = BitFlipMutation { rate: 1.0 }.mutate(&genome, &encoding, &mut rng).unwrap();
        assert!(encoding.is_valid(&mutated));
    }

    #[test]
    fn gaussian_mutation_clips_to_bounds() {
        let encoding = Encoding::RealValued { bounds: vec![(-1.0, 1.0)] };
        let genome = Genome::RealValued(vec![0.99]);
        let mut rng = get_rng([2u8; 32]);
        for _ in 0..50 {
            let mutated = GaussianMutation { rate: 1.0, sigma: 5.0 }
                .mutate(&genome, &encoding, &mut rng)
                .unwrap();
            assert!(encoding.is_valid(&mutated));
        }
    }

    #[test]
    fn swap_mutation_preserves_permutation_validity() {
        let encoding = Encoding::Permutation { lower: 0, upper: 4 };
        let genome = Genome::Permutation(vec![0, 1, 2, 3, 4]);
        let mut rng = get_rng([3u8; 32]);
        let mutated = SwapMutation.mutate(&genome, &encoding, &mut rng).unwrap();
        assert!(encoding.is_valid(&mutated));
        assert_ne!(mutated, genome);
    }

    #[test]
    fn insertion_and_scramble_preserve_permutation_validity() {
        let encoding = Encoding::Permutation { lower: 0, upper: 5 };
        let genome = Genome::Permutation(vec![0, 1, 2, 3, 4, 5]);
        let mut rng = get_rng([4u8; 32]);
        let inserted = InsertionMutation.mutate(&genome, &encoding, &mut rng).unwrap();
        assert!(encoding.is_valid(&inserted));
        let scrambled = ScrambleMutation.mutate(&genome, &encoding, &mut rng).unwrap();
        assert!(encoding.is_valid(&scrambled));
    }
}
