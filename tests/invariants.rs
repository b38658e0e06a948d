//! Property-based tests for the cross-cutting invariants spec §3/§5 states:
//! population size stays constant, genomes stay within their encoding's
//! domain, the best fitness is monotone non-decreasing across generations,
//! and elitism is actually preserved.

use proptest::prelude::*;

use genevo_core::prelude::*;

fn sphere(genome: &Genome) -> f64 {
    -genome.as_real_valued().unwrap().iter().map(|v| v * v).sum::<f64>()
}

proptest! {
    #[test]
    fn population_size_is_constant_across_generations(pop_size in 4usize..40, generations in 1u64..15) {
        let encoding = Encoding::RealValued { bounds: vec![(-10.0, 10.0); 3] };
        let mut ga = PanmicticGaBuilder::new(encoding, sphere)
            .pop_size(pop_size)
            .max_iterations(generations)
            .elitism(1)
            .seed([1u8; 32])
            .build()
            .unwrap();

        for _ in 0..generations {
            let _ = ga.step();
            prop_assert_eq!(ga.state().population.len(), pop_size);
            prop_assert_eq!(ga.state().fitness.len(), pop_size);
        }
    }

    #[test]
    fn every_genome_stays_within_domain(pop_size in 4usize..30, generations in 1u64..10) {
        let encoding = Encoding::RealValued { bounds: vec![(-2.0, 2.0), (0.0, 5.0)] };
        let mut ga = PanmicticGaBuilder::new(encoding.clone(), sphere)
            .pop_size(pop_size)
            .max_iterations(generations)
            .elitism(1)
            .seed([2u8; 32])
            .build()
            .unwrap();

        for _ in 0..generations {
            let _ = ga.step();
            for genome in &ga.state().population {
                prop_assert!(encoding.is_valid(genome));
            }
        }
    }

    #[test]
    fn best_fitness_is_monotone_non_decreasing(pop_size in 6usize..30, generations in 2u64..12) {
        let encoding = Encoding::RealValued { bounds: vec![(-10.0, 10.0); 2] };
        let mut ga = PanmicticGaBuilder::new(encoding, sphere)
            .pop_size(pop_size)
            .max_iterations(generations)
            .elitism(1)
            .seed([3u8; 32])
            .build()
            .unwrap();

        let mut last_best = f64::NEG_INFINITY;
        for _ in 0..generations {
            let _ = ga.step();
            let best = ga.state().best_solution.as_ref().unwrap().fitness;
            prop_assert!(best >= last_best);
            last_best = best;
        }
    }

    #[test]
    fn elitism_preserves_the_previous_best(pop_size in 8usize..30, generations in 3u64..12) {
        let encoding = Encoding::RealValued { bounds: vec![(-10.0, 10.0); 2] };
        let mut ga = PanmicticGaBuilder::new(encoding, sphere)
            .pop_size(pop_size)
            .max_iterations(generations)
            .elitism(2)
            .seed([4u8; 32])
            .build()
            .unwrap();

        for _ in 0..generations {
            let previous_best = ga.state().fitness.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            let _ = ga.step();
            let new_best = ga.state().fitness.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            prop_assert!(new_best >= previous_best);
        }
    }
}
