//! Error types returned at the boundary of `genevo-core`, following spec §6
//! and §7.
//!
//! `genevo` (the teacher crate) hand-rolls `Display`/`std::error::Error` on
//! plain enums such as `ga::GeneticAlgorithmError`; this crate keeps the same
//! one-enum-per-crate shape but derives the boilerplate with `thiserror`,
//! matching how `xsa-dev-hyperliquid-backtest/src/errors.rs` expresses the
//! same pattern.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GaError>;

/// An error that can occur while configuring, running or resolving a run of
/// either the panmictic or island-model driver.
#[derive(Debug, Error)]
pub enum GaError {
    /// Suggestions, bounds or an operator's output were inconsistent with the
    /// declared encoding's shape.
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    /// A constructor parameter was out of its valid range (probabilities
    /// outside `[0, 1]`, `elitism > popSize`, `maxiter < 1`, ...).
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Every individual in a generation evaluated to a non-finite fitness.
    #[error("fitness function returned non-finite for every individual of generation {generation}")]
    MissingFitness { generation: u64 },

    /// A user-supplied operator, the local-search adapter, or the
    /// population-update hook produced a genome violating its encoding's
    /// domain predicate.
    #[error("operator `{operator}` produced a genome outside its domain at generation {generation}")]
    OperatorDomainViolation { operator: String, generation: u64 },

    /// A worker-pool task panicked or otherwise failed; the pool has already
    /// been torn down by the time this is returned.
    #[error("worker pool task failed: {0}")]
    Worker(String),
}

impl GaError {
    pub fn shape_mismatch(message: impl Into<String>) -> Self {
        GaError::ShapeMismatch(message.into())
    }

    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        GaError::InvalidParameter(message.into())
    }

    pub fn operator_domain_violation(operator: impl Into<String>, generation: u64) -> Self {
        GaError::OperatorDomainViolation {
            operator: operator.into(),
            generation,
        }
    }

    /// Rewrites the `generation` field of an `OperatorDomainViolation`,
    /// leaving every other variant untouched. The genetic operators
    /// themselves are not generation-aware (they report a placeholder `0`),
    /// so the generation engine calls this on their result to record the
    /// generation the violation actually occurred in.
    pub fn with_generation(self, generation: u64) -> Self {
        match self {
            GaError::OperatorDomainViolation { operator, .. } => GaError::OperatorDomainViolation { operator, generation },
            other => other,
        }
    }
}
