//! `genevo-core`: a general-purpose genetic-algorithm optimizer.
//!
//! The crate provides two drivers over three genome encodings:
//!
//! - [`ga::PanmicticGa`]: a single evolving population.
//! - [`ga::IslandGa`]: several populations evolving independently, with
//!   periodic ring migration between them.
//!
//! Both drivers share the same building blocks: a [`genetic::Genome`] /
//! [`genetic::Encoding`] pair describing the search space (`Binary`,
//! `RealValued` or `Permutation`), a pluggable [`operator`] protocol
//! (population init, selection, crossover, mutation), a [`fitness`]
//! evaluator that can run serially or across a worker pool, an optional
//! [`localsearch`] hybridization adapter, and a [`termination`] rule set.
//!
//! Construct a run through [`ga::PanmicticGaBuilder`] or
//! [`ga::IslandGaBuilder`]; the [`prelude`] module re-exports everything
//! most callers need.

pub mod error;
pub mod fitness;
pub mod ga;
pub mod generation;
pub mod genetic;
pub mod localsearch;
pub mod operator;
pub mod prelude;
pub mod random;
pub mod result;
pub mod state;
pub mod statistic;
pub mod termination;
