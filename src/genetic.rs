//! The `genetic` module defines the representation of an individual solution
//! candidate (a `Genome`) and the `Encoding` that describes the shape and
//! domain of genomes for a particular run.
//!
//! `genevo-core` fixes the set of encodings to exactly the three kinds named
//! in the specification of this optimizer: fixed-length bit strings, bounded
//! real-valued vectors and permutations of a contiguous integer range. Unlike
//! a fully generic GA library, a single `Genome` enum carries all three so
//! that selection, crossover, mutation and reinsertion can be dispatched at
//! runtime for whichever encoding a `PanmicticGa`/`IslandGa` was built with.

use fixedbitset::FixedBitSet;
use std::fmt;

/// A candidate solution. Exactly one variant is used throughout a single run;
/// which one is determined by the `Encoding` the run was built with.
#[derive(Clone, Debug, PartialEq)]
pub enum Genome {
    /// A fixed-length sequence of bits.
    Binary(FixedBitSet),
    /// An ordered sequence of reals, each within its own declared bounds.
    RealValued(Vec<f64>),
    /// A permutation of the integers in `lower..=upper`.
    Permutation(Vec<usize>),
}

impl Genome {
    /// Returns the number of loci (bits / reals / permutation slots) in this
    /// genome.
    pub fn len(&self) -> usize {
        match self {
            Genome::Binary(bits) => bits.len(),
            Genome::RealValued(values) => values.len(),
            Genome::Permutation(order) => order.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_binary(&self) -> Option<&FixedBitSet> {
        match self {
            Genome::Binary(bits) => Some(bits),
            _ => None,
        }
    }

    pub fn as_real_valued(&self) -> Option<&[f64]> {
        match self {
            Genome::RealValued(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_permutation(&self) -> Option<&[usize]> {
        match self {
            Genome::Permutation(order) => Some(order),
            _ => None,
        }
    }
}

/// The encoding in use for a run, carrying the sizing/bounds needed to
/// validate and generate genomes of that shape.
#[derive(Clone, Debug, PartialEq)]
pub enum Encoding {
    /// Fixed-length bit strings of `n_bits` bits.
    Binary { n_bits: usize },
    /// Real-valued vectors; `bounds[i]` is the inclusive `(lower, upper)`
    /// range of locus `i`. The vector's length is `nvars`.
    RealValued { bounds: Vec<(f64, f64)> },
    /// Permutations of the contiguous integer range `lower..=upper`.
    Permutation { lower: usize, upper: usize },
}

impl Encoding {
    /// A human-readable name for this encoding, used in diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            Encoding::Binary { .. } => "Binary",
            Encoding::RealValued { .. } => "RealValued",
            Encoding::Permutation { .. } => "Permutation",
        }
    }

    /// Number of loci a genome of this encoding has.
    pub fn nvars(&self) -> usize {
        match self {
            Encoding::Binary { n_bits } => *n_bits,
            Encoding::RealValued { bounds } => bounds.len(),
            Encoding::Permutation { lower, upper } => upper - lower + 1,
        }
    }

    /// Checks that `genome` satisfies this encoding's domain predicate:
    /// bits are always valid by construction, reals must lie within their
    /// declared bounds, permutations must contain each integer in
    /// `lower..=upper` exactly once.
    pub fn is_valid(&self, genome: &Genome) -> bool {
        match (self, genome) {
            (Encoding::Binary { n_bits }, Genome::Binary(bits)) => bits.len() == *n_bits,
            (Encoding::RealValued { bounds }, Genome::RealValued(values)) => {
                values.len() == bounds.len()
                    && values
                        .iter()
                        .zip(bounds.iter())
                        .all(|(v, (lo, hi))| v.is_finite() && *v >= *lo && *v <= *hi)
            }
            (Encoding::Permutation { lower, upper }, Genome::Permutation(order)) => {
                let expected = upper - lower + 1;
                if order.len() != expected {
                    return false;
                }
                let mut seen = vec![false; expected];
                for &value in order {
                    if value < *lower || value > *upper {
                        return false;
                    }
                    let slot = value - lower;
                    if seen[slot] {
                        return false;
                    }
                    seen[slot] = true;
                }
                true
            }
            _ => false,
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Encoding::Binary { n_bits } => write!(f, "Binary({} bits)", n_bits),
            Encoding::RealValued { bounds } => write!(f, "RealValued({} vars)", bounds.len()),
            Encoding::Permutation { lower, upper } => {
                write!(f, "Permutation({}..={})", lower, upper)
            }
        }
    }
}

/// A pair of parents taken from the selection pool for one crossover call.
pub type Parents = (Genome, Genome);

/// The two children produced by one crossover call.
pub type Children = (Genome, Genome);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binary_domain_rejects_wrong_length() {
        let encoding = Encoding::Binary { n_bits: 4 };
        let genome = Genome::Binary(FixedBitSet::with_capacity(3));
        assert!(!encoding.is_valid(&genome));
    }

    #[test]
    fn real_valued_domain_rejects_out_of_bounds() {
        let encoding = Encoding::RealValued {
            bounds: vec![(-1.0, 1.0), (0.0, 10.0)],
        };
        assert!(encoding.is_valid(&Genome::RealValued(vec![0.5, 5.0])));
        assert!(!encoding.is_valid(&Genome::RealValued(vec![2.0, 5.0])));
    }

    #[test]
    fn permutation_domain_requires_each_value_exactly_once() {
        let encoding = Encoding::Permutation { lower: 1, upper: 5 };
        assert!(encoding.is_valid(&Genome::Permutation(vec![3, 1, 4, 5, 2])));
        assert!(!encoding.is_valid(&Genome::Permutation(vec![1, 1, 3, 4, 5])));
        assert!(!encoding.is_valid(&Genome::Permutation(vec![1, 2, 3, 4])));
    }
}
