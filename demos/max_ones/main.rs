//! Binary max-ones: maximize the number of set bits in a 40-bit string.
//! The simplest possible sanity check for the panmictic driver and the
//! `Binary` encoding's default operator set.

use genevo_core::prelude::*;

fn count_ones(genome: &Genome) -> f64 {
    genome.as_binary().expect("Binary genome").count_ones(..) as f64
}

fn main() {
    env_logger::init();

    let encoding = Encoding::Binary { n_bits: 40 };
    let mut ga = PanmicticGaBuilder::new(encoding, count_ones)
        .pop_size(100)
        .max_iterations(200)
        .max_fitness(40.0)
        .elitism(2)
        .seed([7u8; 32])
        .build()
        .expect("valid configuration");

    let result = ga.run().expect("run does not error");
    println!(
        "stopped after {} generations ({:?}); best fitness = {}",
        result.generations, result.stop_reason, result.best_solution.fitness
    );
}
