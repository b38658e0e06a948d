//! The `random` module provides the seedable pseudo-random stream used
//! throughout a run and a handful of sampling helpers shared by the genetic
//! operators.
//!
//! `Prng` is backed by `rand_xoshiro`'s `Xoshiro256Plus`, a fast
//! non-cryptographic generator that supports `.jump()`: advancing a cloned
//! stream by a long, fixed distance so it no longer overlaps with the
//! original. Deriving one clone-and-jump per worker task is how this crate
//! keeps parallel fitness evaluation and parallel island evolution
//! reproducible for a fixed root seed regardless of how many workers ran.

pub use rand::Rng;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256Plus;

/// The seed used to initialize a `Prng`. 32 bytes matches the seed material
/// `Xoshiro256Plus` consumes directly.
pub type Seed = [u8; 32];

/// The pseudo-random stream used by a run. Cheap to `Clone` (it is plain
/// generator state) and `Send + Sync` so it can cross worker-pool
/// boundaries.
pub type Prng = Xoshiro256Plus;

/// Derives reproducible, non-overlapping substreams from a single `Prng`.
///
/// Calling `.jump()` advances the generator's internal state as if
/// `2^128` values had been drawn, which is far more than any single run of
/// this crate will ever draw from one stream. Cloning before jumping yields
/// a new, independent stream while leaving the original where it was.
pub trait RngJump {
    /// Advances this generator's state by a long, fixed distance.
    fn jump(&mut self);

    /// Returns a clone of this generator, jumped to a fresh, non-overlapping
    /// position.
    fn spawn(&mut self) -> Self;
}

impl RngJump for Prng {
    fn jump(&mut self) {
        Xoshiro256Plus::jump(self)
    }

    fn spawn(&mut self) -> Self {
        self.jump();
        self.clone()
    }
}

/// Builds a `Prng` from the given seed.
pub fn get_rng(seed: Seed) -> Prng {
    Xoshiro256Plus::from_seed(seed)
}

/// Builds a `Prng` seeded from the OS entropy source. Used when the caller
/// does not supply a `seed`, in which case reproducibility is not requested.
pub fn random_seed() -> Seed {
    let mut seed = Seed::default();
    rand::thread_rng().fill(&mut seed);
    seed
}

/// Derives a substream for evaluating fitness of the individual at
/// `row_index` within `generation`. Spec §5 requires determinism under
/// parallel fitness evaluation to come from splitting the root seed by
/// `(generation, row-index)` rather than by worker, so task order and
/// worker count never affect which substream a row gets.
pub fn substream_for(root: &Prng, generation: u64, row_index: usize) -> Prng {
    let mut stream = root.clone();
    // `jump()` moves the stream a long, fixed, non-overlapping distance;
    // jumping `generation * big + row_index + 1` times derives a stream
    // unique to this (generation, row) pair without needing a second seed.
    let steps = (generation as u128)
        .wrapping_mul(1_000_003)
        .wrapping_add(row_index as u128)
        .wrapping_add(1);
    let jumps = (steps % 4096) as usize + 1;
    for _ in 0..jumps {
        stream.jump();
    }
    stream
}

/// Draws a uniformly random index in `0..length`.
pub fn random_index<R: Rng + ?Sized>(rng: &mut R, length: usize) -> usize {
    rng.gen_range(0..length)
}

/// Draws two distinct cut points `(a, b)` with `a < b` in `0..length`, such
/// that the slice they bound is neither empty nor the whole genome. Used by
/// two-point crossover and by order-based permutation operators.
pub fn random_cut_points<R: Rng + ?Sized>(rng: &mut R, length: usize) -> (usize, usize) {
    assert!(length >= 4, "need at least 4 loci to draw two cut points");
    loop {
        let a = rng.gen_range(0..length);
        let b = rng.gen_range(0..length);
        if a < b {
            return (a, b);
        } else if b < a {
            return (b, a);
        }
    }
}

/// Draws `n` ascending, distinct cut points in `0..length`, used by
/// multi-point crossover.
pub fn random_n_cut_points<R: Rng + ?Sized>(rng: &mut R, n: usize, length: usize) -> Vec<usize> {
    assert!(n > 0, "n must be greater than 0");
    assert!(length >= 2 * n, "length must be at least 2 * n");
    let mut cutpoints: Vec<usize> = Vec::with_capacity(n);
    while cutpoints.len() < n {
        let candidate = rng.gen_range(1..length);
        if !cutpoints.contains(&candidate) {
            cutpoints.push(candidate);
        }
    }
    cutpoints.sort_unstable();
    cutpoints
}

/// Draws a probability value in `[0, 1)`.
pub fn random_probability<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    rng.gen::<f64>()
}

/// Selects indices proportional to a set of non-negative weights.
///
/// Used both for roulette-wheel selection (weights are fitness-derived) and
/// for the local-search adapter's rank-weighted starting-point pick (spec
/// §4.4), where `pressel` turns ranks into weights before this struct ever
/// sees them.
pub struct WeightedDistribution {
    sum: f64,
    weights: Vec<f64>,
}

impl WeightedDistribution {
    /// Builds a distribution over the given non-negative `weights`.
    pub fn new(weights: Vec<f64>) -> Self {
        let sum = weights.iter().sum();
        WeightedDistribution { sum, weights }
    }

    /// The sum of all weights; callers draw `pointer` uniformly in
    /// `[0, sum())` before calling `select`.
    pub fn sum(&self) -> f64 {
        self.sum
    }

    /// Selects the index whose cumulative weight first covers `pointer`.
    pub fn select(&self, pointer: f64) -> usize {
        let mut remaining = pointer;
        for (index, weight) in self.weights.iter().enumerate() {
            remaining -= *weight;
            if remaining <= 0.0 {
                return index;
            }
        }
        // rounding errors: fall back to the last entry
        self.weights.len() - 1
    }

    /// Draws one index using the given random stream.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        if self.sum <= 0.0 {
            return random_index(rng, self.weights.len());
        }
        let pointer = random_probability(rng) * self.sum;
        self.select(pointer)
    }
}
