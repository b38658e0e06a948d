//! The `ga` module ties the builders and the two drivers together:
//! `PanmicticGa` (single population) and `IslandGa` (ring-migration
//! island model), both configured through their respective builders.
//!
//! Grounded on `genevo`'s own `ga` module, which exposes the same
//! `GeneticAlgorithm` + `genetic_algorithm()`/builder pairing from a single
//! `mod.rs`.

pub mod builder;
pub mod island;
pub mod panmictic;

pub use builder::{IslandGaBuilder, PanmicticGaBuilder};
pub use island::IslandGa;
pub use panmictic::PanmicticGa;
