//! 2-D Rastrigin, maximized as `-rastrigin(x, y)`: a deceptively rugged
//! benchmark with one global optimum buried among many local optima. Run
//! both with and without local-search hybridization to show what the
//! adapter buys on a landscape the genetic operators alone struggle with.

use std::f64::consts::PI;

use genevo_core::prelude::*;

fn neg_rastrigin(genome: &Genome) -> f64 {
    let values = genome.as_real_valued().expect("RealValued genome");
    let a = 10.0;
    let sum: f64 = values.iter().map(|&x| x * x - a * (2.0 * PI * x).cos()).sum();
    -(a * values.len() as f64 + sum)
}

fn run(label: &str, with_local_search: bool) {
    let encoding = Encoding::RealValued {
        bounds: vec![(-5.12, 5.12), (-5.12, 5.12)],
    };
    let mut builder = PanmicticGaBuilder::new(encoding, neg_rastrigin)
        .pop_size(80)
        .max_iterations(150)
        .max_stall_generations(40)
        .elitism(2)
        .seed([11u8; 32]);

    if with_local_search {
        builder = builder.with_local_search(100, 0.05, 0.5);
    }

    let mut ga = builder.build().expect("valid configuration");
    let result = ga.run().expect("run does not error");
    println!(
        "[{label}] stopped after {} generations ({:?}); best fitness = {:.6}",
        result.generations, result.stop_reason, result.best_solution.fitness
    );
}

fn main() {
    env_logger::init();
    run("without local search", false);
    run("with local search", true);
}
