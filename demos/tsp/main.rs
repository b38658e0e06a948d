//! 5-city traveling salesman: small enough to brute-force, so the GA's
//! answer can be checked directly against the true optimum.

use genevo_core::prelude::*;

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
    -tour_length(genome.as_permutation().expect("Permutation genome"))
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

fn main() {
    env_logger::init();

    let encoding = Encoding::Permutation { lower: 0, upper: CITIES.len() - 1 };
    let mut ga = PanmicticGaBuilder::new(encoding, neg_tour_length)
        .pop_size(60)
        .max_iterations(200)
        .max_stall_generations(50)
        .elitism(2)
        .seed([13u8; 32])
        .build()
        .expect("valid configuration");

    let result = ga.run().expect("run does not error");
    let optimum = brute_force_optimum();
    println!(
        "GA best tour length = {:.4}; brute-force optimum = {:.4}",
        -result.best_solution.fitness,
        optimum
    );
}
