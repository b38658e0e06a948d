#[macro_use]
extern crate criterion;

use criterion::Criterion;
use genevo_core::genetic::Encoding;
use genevo_core::operator::population_init::UniformRandomInit;
use genevo_core::operator::PopulationInitOp;
use genevo_core::random::get_rng;

fn bench_build_population(c: &mut Criterion) {
    let seed = [42u8; 32];
    let encoding = Encoding::Binary { n_bits: 24 };

    c.bench_function_over_inputs(
        "build population",
        move |b, size| {
            b.iter(|| {
                let mut rng = get_rng(seed);
                UniformRandomInit.initialize(&encoding, *size, &[], &mut rng).unwrap()
            })
        },
        vec![20, 200, 2000, 20_000],
    );
}

criterion_group!(benches, bench_build_population);
criterion_main!(benches);
