//! Performance benchmarks for the shotgun duel engine
//!
//! Measures a complete RandomController vs RandomController duel, a single
//! magazine recharge, and a batch of duels through the parallel simulator.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;
use shotgun_duel::{
    core::{DuelConfig, Shotgun},
    simulation::{play_random_duel, run_simulation},
};

fn bench_single_duel(c: &mut Criterion) {
    let config = DuelConfig::default();
    let mut seed = 0u64;
    c.bench_function("random_duel", |b| {
        b.iter(|| {
            seed = seed.wrapping_add(1);
            black_box(play_random_duel(&config, seed).map(|o| o.actions_taken))
        })
    });
}

fn bench_recharge(c: &mut Criterion) {
    let mut rng = ChaCha12Rng::seed_from_u64(42);
    let mut shotgun = Shotgun::default();
    c.bench_function("shotgun_recharge", |b| {
        b.iter(|| black_box(shotgun.recharge(&mut rng)))
    });
}

fn bench_simulation(c: &mut Criterion) {
    let config = DuelConfig::default();
    let mut group = c.benchmark_group("simulation");
    group.sample_size(10);
    for games in [100usize, 1000] {
        group.bench_with_input(BenchmarkId::from_parameter(games), &games, |b, &games| {
            b.iter(|| black_box(run_simulation(games, 42, &config).map(|r| r.first_wins)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_single_duel, bench_recharge, bench_simulation);
criterion_main!(benches);
