//! The six literal test scenarios of spec §8: concrete problems with known
//! expected behavior, not just abstract invariants.

use std::f64::consts::PI;

use genevo_core::prelude::*;

fn count_ones(genome: &Genome) -> f64 {
    genome.as_binary().unwrap().count_ones(..) as f64
}

/// §8.1: binary max-ones over 30 bits should reach the maximum.
#[test]
fn binary_max_ones_reaches_optimum() {
    let encoding = Encoding::Binary { n_bits: 30 };
    let mut ga = PanmicticGaBuilder::new(encoding, count_ones)
        .pop_size(80)
        .max_iterations(300)
        .max_fitness(30.0)
        .elitism(2)
        .seed([21u8; 32])
        .build()
        .unwrap();

    let result = ga.run().unwrap();
    assert_eq!(result.best_solution.fitness, 30.0);
}

/// §8.2: a 1-D concave function has a single interior maximum; the GA
/// should land close to it.
#[test]
fn one_dimensional_concave_function_finds_its_peak() {
    fn concave(genome: &Genome) -> f64 {
        let x = genome.as_real_valued().unwrap()[0];
        -(x - 3.0).powi(2) + 10.0
    }

    let encoding = Encoding::RealValued { bounds: vec![(-10.0, 10.0)] };
    let mut ga = PanmicticGaBuilder::new(encoding, concave)
        .pop_size(60)
        .max_iterations(150)
        .max_stall_generations(30)
        .elitism(2)
        .seed([22u8; 32])
        .build()
        .unwrap();

    let result = ga.run().unwrap();
    let x = result.best_solution.genome.as_real_valued().unwrap()[0];
    assert!((x - 3.0).abs() < 0.5, "expected x close to 3.0, got {x}");
    assert!(result.best_solution.fitness > 9.5);
}

fn neg_rastrigin(genome: &Genome) -> f64 {
    let values = genome.as_real_valued().unwrap();
    let a = 10.0;
    let sum: f64 = values.iter().map(|&x| x * x - a * (2.0 * PI * x).cos()).sum();
    -(a * values.len() as f64 + sum)
}

/// §8.3: 2-D Rastrigin with local-search hybridization should reach at
/// least as good a result as without it, on the same seed and budget.
#[test]
fn rastrigin_with_local_search_matches_or_beats_without() {
    let encoding = Encoding::RealValued {
        bounds: vec![(-5.12, 5.12), (-5.12, 5.12)],
    };

    let mut without = PanmicticGaBuilder::new(encoding.clone(), neg_rastrigin)
        .pop_size(80)
        .max_iterations(120)
        .elitism(2)
        .seed([23u8; 32])
        .build()
        .unwrap();
    let without_result = without.run().unwrap();

    let mut with = PanmicticGaBuilder::new(encoding, neg_rastrigin)
        .pop_size(80)
        .max_iterations(120)
        .elitism(2)
        .seed([23u8; 32])
        .with_local_search(100, 1.0, 0.5)
        .build()
        .unwrap();
    let with_result = with.run().unwrap();

    assert!(with_result.best_solution.fitness >= without_result.best_solution.fitness - 1e-9);
}

const CITIES: [(f64, f64); 5] = [(0.0, 0.0), (1.0, 5.0), (5.0, 5.0), (6.0, 1.0), (3.0, 2.0)];

fn tour_length(order: &[usize]) -> f64 {
    let mut total = 0.0;
    for window in order.windows(2) {
        total += distance(window[0], window[1]);
    }
    total += distance(*order.last().unwrap(), order[0]);
    total
}

fn distance(a: usize, b: usize) -> f64 {
    let (ax, ay) = CITIES[a];
    let (bx, by) = CITIES[b];
    ((ax - bx).powi(2) + (ay - by).powi(2)).sqrt()
}

fn neg_tour_length(genome: &Genome) -> f64 {
    -tour_length(genome.as_permutation().unwrap())
}

fn brute_force_optimum() -> f64 {
    let mut order: Vec<usize> = (0..CITIES.len()).collect();
    let mut best = f64::INFINITY;
    permute(&mut order, 1, &mut best);
    best
}

fn permute(order: &mut Vec<usize>, k: usize, best: &mut f64) {
    if k == order.len() {
        *best = best.min(tour_length(order));
        return;
    }
    for i in k..order.len() {
        order.swap(k, i);
        permute(order, k + 1, best);
        order.swap(k, i);
    }
}

/// §8.4: 5-city TSP is small enough to brute-force; the GA should find the
/// same optimum.
#[test]
fn five_city_tsp_matches_brute_force_optimum() {
    let encoding = Encoding::Permutation { lower: 0, upper: CITIES.len() - 1 };
    let mut ga = PanmicticGaBuilder::new(encoding, neg_tour_length)
        .pop_size(60)
        .max_iterations(250)
        .max_stall_generations(60)
        .elitism(2)
        .seed([24u8; 32])
        .build()
        .unwrap();

    let result = ga.run().unwrap();
    let optimum = brute_force_optimum();
    assert!((-result.best_solution.fitness - optimum).abs() < 1e-9);
}

fn sphere(genome: &Genome) -> f64 {
    -genome.as_real_valued().unwrap().iter().map(|v| v * v).sum::<f64>()
}

/// §8.5: an island run should produce byte-identical per-island results
/// whether fitness evaluation runs serially or across a worker pool, for a
/// fixed seed.
#[test]
fn island_run_is_deterministic_serial_vs_parallel() {
    let encoding = Encoding::RealValued { bounds: vec![(-5.0, 5.0); 2] };

    let serial_base = PanmicticGaBuilder::new(encoding.clone(), sphere)
        .pop_size(40)
        .max_iterations(20)
        .elitism(1)
        .seed([25u8; 32])
        .parallel(false);
    let mut serial = IslandGaBuilder::new(serial_base, 3)
        .migration_interval(5)
        .migration_rate(0.2)
        .build()
        .unwrap();
    let serial_result = serial.run().unwrap();

    let parallel_base = PanmicticGaBuilder::new(encoding, sphere)
        .pop_size(40)
        .max_iterations(20)
        .elitism(1)
        .seed([25u8; 32])
        .parallel(true);
    let mut parallel = IslandGaBuilder::new(parallel_base, 3)
        .migration_interval(5)
        .migration_rate(0.2)
        .build()
        .unwrap();
    let parallel_result = parallel.run().unwrap();

    assert_eq!(serial_result.islands.len(), parallel_result.islands.len());
    for (s, p) in serial_result.islands.iter().zip(parallel_result.islands.iter()) {
        assert_eq!(s.final_fitness, p.final_fitness);
    }
}

/// §8.6: with elitism enabled, the best individual of a generation never
/// regresses relative to the previous generation's best.
#[test]
fn elitism_preserves_best_individual_across_generations() {
    let encoding = Encoding::RealValued { bounds: vec![(-10.0, 10.0); 2] };
    let mut ga = PanmicticGaBuilder::new(encoding, sphere)
        .pop_size(30)
        .max_iterations(40)
        .elitism(2)
        .seed([26u8; 32])
        .build()
        .unwrap();

    let mut last_best = f64::NEG_INFINITY;
    for _ in 0..40 {
        if ga.step().is_err() {
            break;
        }
        let best = ga.state().best_solution.as_ref().unwrap().fitness;
        assert!(best >= last_best);
        last_best = best;
    }
}

/// §8's round-trip/idempotence property: running with `maxiter=0` returns
/// the initial population unchanged, at `generations=0`.
#[test]
fn zero_max_iterations_returns_initial_population_unchanged() {
    let encoding = Encoding::RealValued { bounds: vec![(-10.0, 10.0); 2] };
    let population_before = PanmicticGaBuilder::new(encoding.clone(), sphere)
        .pop_size(20)
        .max_iterations(0)
        .seed([40u8; 32])
        .build()
        .unwrap()
        .state()
        .population
        .clone();

    let mut ga = PanmicticGaBuilder::new(encoding, sphere)
        .pop_size(20)
        .max_iterations(0)
        .seed([40u8; 32])
        .build()
        .unwrap();
    let result = ga.run().unwrap();

    assert_eq!(result.generations, 0);
    assert_eq!(result.final_population, population_before);
}
