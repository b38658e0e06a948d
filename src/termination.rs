//! Termination rules: spec §4.3 step 10 stops a run when any configured
//! rule fires. Grounded on `genevo`'s `termination/limit.rs` (concrete
//! limiters: `GenerationLimit`, `FitnessLimit`, `TimeLimit`) and
//! `termination/combinator.rs` (`and`/`or` composition of rules), adapted
//! from `genevo`'s generic `Termination<A: Algorithm>` to this crate's
//! concrete `SearchState`.

use std::time::{Duration, Instant};

use crate::state::SearchState;

/// Why a run stopped.
#[derive(Clone, Debug, PartialEq)]
pub enum StopReason {
    GenerationLimit(u64),
    FitnessLimit(f64),
    NoImprovementLimit(u64),
    TimeLimit(Duration),
}

/// Whether a termination rule wants the run to stop.
#[derive(Clone, Debug, PartialEq)]
pub enum StopFlag {
    Continue,
    StopNow(StopReason),
}

/// One stopping criterion, evaluated once per generation against the
/// current `SearchState`.
pub trait Termination: Send + Sync {
    fn evaluate(&mut self, state: &SearchState) -> StopFlag;
}

/// Stops once `state.generation` reaches `max_generations`.
#[derive(Clone, Debug)]
pub struct GenerationLimit {
    pub max_generations: u64,
}

impl GenerationLimit {
    pub fn new(max_generations: u64) -> Self {
        GenerationLimit { max_generations }
    }
}

impl Termination for GenerationLimit {
    fn evaluate(&mut self, state: &SearchState) -> StopFlag {
        if state.generation >= self.max_generations {
            StopFlag::StopNow(StopReason::GenerationLimit(self.max_generations))
        } else {
            StopFlag::Continue
        }
    }
}

/// Stops once the best fitness observed reaches or exceeds `target`.
#[derive(Clone, Debug)]
pub struct FitnessLimit {
    pub target: f64,
}

impl FitnessLimit {
    pub fn new(target: f64) -> Self {
        FitnessLimit { target }
    }
}

impl Termination for FitnessLimit {
    fn evaluate(&mut self, state: &SearchState) -> StopFlag {
        match &state.best_solution {
            Some(best) if best.fitness >= self.target => StopFlag::StopNow(StopReason::FitnessLimit(self.target)),
            _ => StopFlag::Continue,
        }
    }
}

/// Stops once `run_since_improvement` reaches `max_stall_generations`
/// (spec §4.3/§4.5's no-improvement stopping, used per-island by the
/// island driver as well as by the panmictic driver).
#[derive(Clone, Debug)]
pub struct NoImprovementLimit {
    pub max_stall_generations: u64,
}

impl NoImprovementLimit {
    pub fn new(max_stall_generations: u64) -> Self {
        NoImprovementLimit { max_stall_generations }
    }
}

impl Termination for NoImprovementLimit {
    fn evaluate(&mut self, state: &SearchState) -> StopFlag {
        if state.run_since_improvement >= self.max_stall_generations {
            StopFlag::StopNow(StopReason::NoImprovementLimit(self.max_stall_generations))
        } else {
            StopFlag::Continue
        }
    }
}

/// Stops once wall-clock time since construction exceeds `limit`.
pub struct TimeLimit {
    limit: Duration,
    started_at: Instant,
}

impl TimeLimit {
    pub fn new(limit: Duration) -> Self {
        TimeLimit {
            limit,
            started_at: Instant::now(),
        }
    }
}

impl Termination for TimeLimit {
    fn evaluate(&mut self, _state: &SearchState) -> StopFlag {
        let elapsed = self.started_at.elapsed();
        if elapsed >= self.limit {
            StopFlag::StopNow(StopReason::TimeLimit(self.limit))
        } else {
            StopFlag::Continue
        }
    }
}

/// Combines a set of termination rules with OR semantics: stops as soon as
/// any one of them fires. This is the composition the panmictic and island
/// drivers actually use, since spec §4.3 stops on "generation limit OR
/// fitness limit OR no-improvement limit", not their conjunction.
pub struct Any {
    rules: Vec<Box<dyn Termination>>,
}

impl Any {
    pub fn new(rules: Vec<Box<dyn Termination>>) -> Self {
        Any { rules }
    }
}

impl Termination for Any {
    fn evaluate(&mut self, state: &SearchState) -> StopFlag {
        for rule in &mut self.rules {
            if let StopFlag::StopNow(reason) = rule.evaluate(state) {
                return StopFlag::StopNow(reason);
            }
        }
        StopFlag::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genetic::Genome;

    fn state_at(generation: u64, run_since_improvement: u64, best_fitness: f64) -> SearchState {
        let mut state = SearchState::new(vec![Genome::RealValued(vec![0.0])], vec![best_fitness]);
        state.generation = generation;
        state.run_since_improvement = run_since_improvement;
        state.record_best();
        state.run_since_improvement = run_since_improvement;
        state
    }

    #[test]
    fn generation_limit_fires_at_threshold() {
        let mut rule = GenerationLimit::new(10);
        assert_eq!(rule.evaluate(&state_at(9, 0, 0.0)), StopFlag::Continue);
        assert_eq!(
            rule.evaluate(&state_at(10, 0, 0.0)),
            StopFlag::StopNow(StopReason::GenerationLimit(10))
        );
    }

    #[test]
    fn any_stops_on_first_firing_rule() {
        let mut combined = Any::new(vec![
            Box::new(GenerationLimit::new(100)),
            Box::new(NoImprovementLimit::new(5)),
        ]);
        assert_eq!(
            combined.evaluate(&state_at(1, 5, 0.0)),
            StopFlag::StopNow(StopReason::NoImprovementLimit(5))
        );
    }
}
