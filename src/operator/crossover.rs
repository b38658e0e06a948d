//! Crossover operators, one family per encoding (spec §4.1):
//!
//! - Binary / RealValued: single-point, multi-point, and (RealValued only)
//!   blend and arithmetic crossover.
//! - Permutation: partially-mapped (PMX), cycle, and order crossover, the
//!   three classic permutation-preserving recombination operators.
//!
//! `genevo`'s teacher module names this family `recombination` rather than
//! `crossover`; this crate keeps the name spec §4.1 uses throughout.

use std::collections::HashSet;

use super::{CrossoverOp, GeneticOperator};
use crate::{
    error::{GaError, Result},
    genetic::{Children, Encoding, Genome, Parents},
    random::{random_cut_points, random_n_cut_points, random_probability, Prng},
};

fn domain_violation(operator: &str) -> GaError {
    GaError::operator_domain_violation(operator, 0)
}

/// Single-point crossover: swaps the tail of both parents after one random
/// cut point. Works uniformly over `Binary` and `RealValued` genomes of
/// equal length.
#[derive(Debug, Default, Clone, Copy)]
pub struct SinglePointCrossover;

impl GeneticOperator for SinglePointCrossover {
    fn name(&self) -> &'static str {
        "SinglePointCrossover"
    }
}

impl CrossoverOp for SinglePointCrossover {
    fn crossover(&self, parents: &Parents, encoding: &Encoding, rng: &mut Prng) -> Result<Children> {
        let (a, b) = parents;
        if a.len() != b.len() || a.len() < 2 {
            return Err(GaError::shape_mismatch("crossover requires parents of equal length >= 2"));
        }
        let cut = rng.gen_range_usize(1, a.len());
        let children = splice_at(a, b, &[cut]);
        validate(&children, encoding, self.name())?;
        Ok(children)
    }
}

/// Multi-point crossover: alternates segments between `n` cut points.
#[derive(Debug, Clone, Copy)]
pub struct MultiPointCrossover {
    pub n_points: usize,
}

impl Default for MultiPointCrossover {
    fn default() -> Self {
        MultiPointCrossover { n_points: 2 }
    }
}

impl GeneticOperator for MultiPointCrossover {
    fn name(&self) -> &'static str {
        "MultiPointCrossover"
    }
}

impl CrossoverOp for MultiPointCrossover {
    fn crossover(&self, parents: &Parents, encoding: &Encoding, rng: &mut Prng) -> Result<Children> {
        let (a, b) = parents;
        if a.len() != b.len() {
            return Err(GaError::shape_mismatch("crossover requires parents of equal length"));
        }
        let cuts = random_n_cut_points(rng, self.n_points, a.len());
        let children = splice_at(a, b, &cuts);
        validate(&children, encoding, self.name())?;
        Ok(children)
    }
}

/// Blend crossover (BLX-alpha) for `RealValued` genomes: each child locus is
/// drawn uniformly from an interval around its parents' values, extended by
/// `alpha` times their spread.
#[derive(Debug, Clone, Copy)]
pub struct BlendCrossover {
    pub alpha: f64,
}

impl Default for BlendCrossover {
    fn default() -> Self {
        BlendCrossover { alpha: 0.5 }
    }
}

impl GeneticOperator for BlendCrossover {
    fn name(&self) -> &'static str {
        "BlendCrossover"
    }
}

impl CrossoverOp for BlendCrossover {
    fn crossover(&self, parents: &Parents, encoding: &Encoding, rng: &mut Prng) -> Result<Children> {
        let (a, b) = parents;
        let (av, bv) = match (a.as_real_valued(), b.as_real_valued()) {
            (Some(av), Some(bv)) if av.len() == bv.len() => (av, bv),
            _ => return Err(GaError::shape_mismatch("BlendCrossover requires equal-length RealValued parents")),
        };

        let bounds = match encoding {
            Encoding::RealValued { bounds } => bounds,
            _ => return Err(domain_violation(self.name())),
        };

        let mut child0 = Vec::with_capacity(av.len());
        let mut child1 = Vec::with_capacity(av.len());
        for (i, (&x, &y)) in av.iter().zip(bv.iter()).enumerate() {
            let (lo, hi) = bounds[i];
            let spread = (x - y).abs() * self.alpha;
            let lower = (x.min(y) - spread).max(lo);
            let upper = (x.max(y) + spread).min(hi);
            child0.push(rng.gen_range_f64(lower, upper));
            child1.push(rng.gen_range_f64(lower, upper));
        }

        let children = (Genome::RealValued(child0), Genome::RealValued(child1));
        validate(&children, encoding, self.name())?;
        Ok(children)
    }
}

/// Arithmetic crossover for `RealValued` genomes: children are a random
/// convex combination of the parents, locus-by-locus.
#[derive(Debug, Default, Clone, Copy)]
pub struct ArithmeticCrossover;

impl GeneticOperator for ArithmeticCrossover {
    fn name(&self) -> &'static str {
        "ArithmeticCrossover"
    }
}

impl CrossoverOp for ArithmeticCrossover {
    fn crossover(&self, parents: &Parents, encoding: &Encoding, rng: &mut Prng) -> Result<Children> {
        let (a, b) = parents;
        let (av, bv) = match (a.as_real_valued(), b.as_real_valued()) {
            (Some(av), Some(bv)) if av.len() == bv.len() => (av, bv),
            _ => return Err(GaError::shape_mismatch("ArithmeticCrossover requires equal-length RealValued parents")),
        };

        let weight = random_probability(rng);
        let child0: Vec<f64> = av.iter().zip(bv.iter()).map(|(&x, &y)| weight * x + (1.0 - weight) * y).collect();
        let child1: Vec<f64> = av.iter().zip(bv.iter()).map(|(&x, &y)| (1.0 - weight) * x + weight * y).collect();

        let children = (Genome::RealValued(child0), Genome::RealValued(child1));
        validate(&children, encoding, self.name())?;
        Ok(children)
    }
}

/// Partially-mapped crossover (PMX) for `Permutation` genomes: copies a
/// random segment from each parent into the corresponding child, then
/// resolves duplicates outside the segment via the segment's mapping.
#[derive(Debug, Default, Clone, Copy)]
pub struct PmxCrossover;

impl GeneticOperator for PmxCrossover {
    fn name(&self) -> &'static str {
        "PmxCrossover"
    }
}

impl CrossoverOp for PmxCrossover {
    fn crossover(&self, parents: &Parents, encoding: &Encoding, rng: &mut Prng) -> Result<Children> {
        let (a, b) = parents;
        let (ao, bo) = match (a.as_permutation(), b.as_permutation()) {
            (Some(ao), Some(bo)) if ao.len() == bo.len() => (ao, bo),
            _ => return Err(GaError::shape_mismatch("PmxCrossover requires equal-length Permutation parents")),
        };

        let (cut_a, cut_b) = random_cut_points(rng, ao.len());
        let child0 = pmx_child(ao, bo, cut_a, cut_b);
        let child1 = pmx_child(bo, ao, cut_a, cut_b);

        let children = (Genome::Permutation(child0), Genome::Permutation(child1));
        validate(&children, encoding, self.name())?;
        Ok(children)
    }
}

fn pmx_child(donor: &[usize], other: &[usize], cut_a: usize, cut_b: usize) -> Vec<usize> {
    let len = donor.len();
    let mut child = vec![usize::MAX; len];
    child[cut_a..cut_b].copy_from_slice(&donor[cut_a..cut_b]);

    for i in cut_a..cut_b {
        let value = other[i];
        if child[cut_a..cut_b].contains(&value) {
            continue;
        }
        let mut position = i;
        loop {
            let mapped = donor[position];
            position = other.iter().position(|&v| v == mapped).unwrap();
            if position < cut_a || position >= cut_b {
                break;
            }
        }
        child[position] = value;
    }

    for i in 0..len {
        if child[i] == usize::MAX {
            child[i] = other[i];
        }
    }
    child
}

/// Cycle crossover for `Permutation` genomes: partitions loci into cycles
/// that map identically between both parents, then alternates which parent
/// donates each cycle's values to each child.
#[derive(Debug, Default, Clone, Copy)]
pub struct CycleCrossover;

impl GeneticOperator for CycleCrossover {
    fn name(&self) -> &'static str {
        "CycleCrossover"
    }
}

impl CrossoverOp for CycleCrossover {
    fn crossover(&self, parents: &Parents, encoding: &Encoding, rng: &mut Prng) -> Result<Children> {
        let _ = rng;
        let (a, b) = parents;
        let (ao, bo) = match (a.as_permutation(), b.as_permutation()) {
            (Some(ao), Some(bo)) if ao.len() == bo.len() => (ao, bo),
            _ => return Err(GaError::shape_mismatch("CycleCrossover requires equal-length Permutation parents")),
        };

        let len = ao.len();
        let mut cycle_of = vec![usize::MAX; len];
        let mut cycle_id = 0;
        for start in 0..len {
            if cycle_of[start] != usize::MAX {
                continue;
            }
            let mut position = start;
            loop {
                cycle_of[position] = cycle_id;
                let value = ao[position];
                position = bo.iter().position(|&v| v == value).unwrap();
                if position == start {
                    break;
                }
            }
            cycle_id += 1;
        }

        let mut child0 = vec![0usize; len];
        let mut child1 = vec![0usize; len];
        for i in 0..len {
            if cycle_of[i] % 2 == 0 {
                child0[i] = ao[i];
                child1[i] = bo[i];
            } else {
                child0[i] = bo[i];
                child1[i] = ao[i];
            }
        }

        let children = (Genome::Permutation(child0), Genome::Permutation(child1));
        validate(&children, encoding, self.name())?;
        Ok(children)
    }
}

/// Order crossover (OX) for `Permutation` genomes: copies a random segment
/// verbatim, then fills the remaining positions with the other parent's
/// values in their relative order, skipping values already placed.
#[derive(Debug, Default, Clone, Copy)]
pub struct OrderCrossover;

impl GeneticOperator for OrderCrossover {
    fn name(&self) -> &'static str {
        "OrderCrossover"
    }
}

impl CrossoverOp for OrderCrossover {
    fn crossover(&self, parents: &Parents, encoding: &Encoding, rng: &mut Prng) -> Result<Children> {
        let (a, b) = parents;
        let (ao, bo) = match (a.as_permutation(), b.as_permutation()) {
            (Some(ao), Some(bo)) if ao.len() == bo.len() => (ao, bo),
            _ => return Err(GaError::shape_mismatch("OrderCrossover requires equal-length Permutation parents")),
        };

        let (cut_a, cut_b) = random_cut_points(rng, ao.len());
        let child0 = order_child(ao, bo, cut_a, cut_b);
        let child1 = order_child(bo, ao, cut_a, cut_b);

        let children = (Genome::Permutation(child0), Genome::Permutation(child1));
        validate(&children, encoding, self.name())?;
        Ok(children)
    }
}

fn order_child(donor: &[usize], other: &[usize], cut_a: usize, cut_b: usize) -> Vec<usize> {
    let len = donor.len();
    let mut child = vec![usize::MAX; len];
    let segment: HashSet<usize> = donor[cut_a..cut_b].iter().copied().collect();
    child[cut_a..cut_b].copy_from_slice(&donor[cut_a..cut_b]);

    let mut fill_positions = (cut_b..len).chain(0..cut_a);
    for &value in other.iter().cycle().skip(cut_b).take(len) {
        if segment.contains(&value) {
            continue;
        }
        if let Some(position) = fill_positions.next() {
            child[position] = value;
        }
    }
    child
}

fn splice_at(a: &Genome, b: &Genome, cuts: &[usize]) -> Children {
    match (a, b) {
        (Genome::Binary(ab), Genome::Binary(bb)) => {
            let len = ab.len();
            let mut child0 = ab.clone();
            let mut child1 = bb.clone();
            apply_cuts(len, cuts, |range| {
                for i in range {
                    let (x, y) = (ab[i], bb[i]);
                    child0.set(i, y);
                    child1.set(i, x);
                }
            });
            (Genome::Binary(child0), Genome::Binary(child1))
        }
        (Genome::RealValued(av), Genome::RealValued(bv)) => {
            let mut child0 = av.clone();
            let mut child1 = bv.clone();
            apply_cuts(av.len(), cuts, |range| {
                for i in range {
                    child0[i] = bv[i];
                    child1[i] = av[i];
                }
            });
            (Genome::RealValued(child0), Genome::RealValued(child1))
        }
        _ => unreachable!("splice_at is only called with matching Binary or RealValued pairs"),
    }
}

fn apply_cuts(len: usize, cuts: &[usize], mut swap_range: impl FnMut(std::ops::Range<usize>)) {
    let mut bounds = vec![0usize];
    bounds.extend_from_slice(cuts);
    bounds.push(len);
    for (segment_index, window) in bounds.windows(2).enumerate() {
        if segment_index % 2 == 1 {
            swap_range(window[0]..window[1]);
        }
    }
}

fn validate(children: &Children, encoding: &Encoding, operator: &'static str) -> Result<()> {
    if encoding.is_valid(&children.0) && encoding.is_valid(&children.1) {
        Ok(())
    } else {
        Err(GaError::operator_domain_violation(operator, 0))
    }
}

trait PrngRangeExt {
    fn gen_range_usize(&mut self, low: usize, high: usize) -> usize;
    fn gen_range_f64(&mut self, low: f64, high: f64) -> f64;
}

impl PrngRangeExt for Prng {
    fn gen_range_usize(&mut self, low: usize, high: usize) -> usize {
        use rand::Rng as _;
        self.gen_range(low..high)
    }

    fn gen_range_f64(&mut self, low: f64, high: f64) -> f64 {
        use rand::Rng as _;
        if low >= high {
            low
        } else {
            self.gen_range(low..high)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::get_rng;

    #[test]
    fn single_point_crossover_preserves_length_and_domain() {
        let encoding = Encoding::RealValued { bounds: vec![(0.0, 1.0); 6] };
        let a = Genome::RealValued(vec![0.1; 6]);
        let b = Genome::RealValued(vec![0.9; 6]);
        let mut rng = get_rng([1u8; 32]);
        let (c0, c1) = SinglePointCrossover.crossover(&(a, b), &encoding, &mut rng).unwrap();
        assert_eq!(c0.len(), 6);
        assert_eq!(c1.len(), 6);
    }

    #[test]
    fn order_crossover_yields_valid_permutations() {
        let encoding = Encoding::Permutation { lower: 0, upper: 7 };
        let a = Genome::Permutation(vec![0, 1, 2, 3, 4, 5, 6, 7]);
        let b = Genome::Permutation(vec![7, 6, 5, 4, 3, 2, 1, 0]);
        let mut rng = get_rng([2u8; 32]);
        for _ in 0..20 {
            let (c0, c1) = OrderCrossover.crossover(&(a.clone(), b.clone()), &encoding, &mut rng).unwrap();
            assert!(encoding.is_valid(&c0));
            assert!(encoding.is_valid(&c1));
        }
    }

    #[test]
    fn pmx_crossover_yields_valid_permutations() {
        let encoding = Encoding::Permutation { lower: 0, upper: 7 };
        let a = Genome::Permutation(vec![0, 1, 2, 3, 4, 5, 6, 7]);
        let b = Genome::Permutation(vec![3, 7, 5, 1, 6, 0, 2, 4]);
        let mut rng = get_rng([3u8; 32]);
        for _ in 0..20 {
            let (c0, c1) = PmxCrossover.crossover(&(a.clone(), b.clone()), &encoding, &mut rng).unwrap();
            assert!(encoding.is_valid(&c0));
            assert!(encoding.is_valid(&c1));
        }
    }

    #[test]
    fn cycle_crossover_yields_valid_permutations() {
        let encoding = Encoding::Permutation { lower: 0, upper: 5 };
        let a = Genome::Permutation(vec![0, 1, 2, 3, 4, 5]);
        let b = Genome::Permutation(vec![5, 4, 3, 2, 1, 0]);
        let mut rng = get_rng([4u8; 32]);
        let (c0, c1) = CycleCrossover.crossover(&(a, b), &encoding, &mut rng).unwrap();
        assert!(encoding.is_valid(&c0));
        assert!(encoding.is_valid(&c1));
    }

    #[test]
    fn blend_crossover_stays_within_bounds() {
        let encoding = Encoding::RealValued { bounds: vec![(0.0, 1.0); 3] };
        let a = Genome::RealValued(vec![0.1, 0.2, 0.9]);
        let b = Genome::RealValued(vec![0.8, 0.3, 0.95]);
        let mut rng = get_rng([5u8; 32]);
        for _ in 0..50 {
            let (c0, c1) = BlendCrossover::default().crossover(&(a.clone(), b.clone()), &encoding, &mut rng).unwrap();
            assert!(encoding.is_valid(&c0));
            assert!(encoding.is_valid(&c1));
        }
    }
}
