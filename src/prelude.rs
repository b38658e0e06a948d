//! Convenience re-exports for downstream crates, mirroring `genevo`'s own
//! `prelude.rs` + `operator/prelude.rs` split.

pub use crate::error::{GaError, Result};
pub use crate::fitness::{FitnessEvaluator, FitnessFunction, PopulationUpdate};
pub use crate::ga::{IslandGa, IslandGaBuilder, PanmicticGa, PanmicticGaBuilder};
pub use crate::genetic::{Encoding, Genome};
pub use crate::localsearch::LocalSearchAdapter;
pub use crate::operator::prelude::*;
pub use crate::random::{get_rng, random_seed, Prng, Seed};
pub use crate::result::{GaResult, IslandGaResult};
pub use crate::state::{BestSolution, IslandState, SearchState};
pub use crate::statistic::SummaryRow;
pub use crate::termination::{
    Any, FitnessLimit, GenerationLimit, NoImprovementLimit, StopFlag, StopReason, Termination, TimeLimit,
};
