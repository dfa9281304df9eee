use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use pondlife::audio::{synthesize, CueKind};
use pondlife::core::config::PondConfig;
use pondlife::ecs::PondWorld;
use pondlife::simulation::run_simulation_tick;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn bench_pond_ticks(c: &mut Criterion) {
    let mut group = c.benchmark_group("pond_tick");
    for fish in [8_usize, 64, 512] {
        group.bench_function(format!("fish{}_ticks600", fish), |b| {
            b.iter_batched(
                || {
                    let config = PondConfig {
                        initial_fish: fish,
                        ..PondConfig::default()
                    };
                    let mut world = PondWorld::new(config, 0xBEEF);
                    world.populate_initial();
                    world.set_visible(true, true);
                    world
                },
                |mut world| {
                    for _ in 0..600 {
                        run_simulation_tick(&mut world, &mut ());
                    }
                    world
                },
                BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

fn bench_cue_synthesis(c: &mut Criterion) {
    let mut group = c.benchmark_group("cue_synthesis");
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    for kind in [CueKind::Eat, CueKind::BigEat, CueKind::Splash, CueKind::Whoosh] {
        group.bench_function(format!("{:?}", kind), |b| {
            b.iter(|| synthesize(kind, 44_100, &mut rng));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_pond_ticks, bench_cue_synthesis);
criterion_main!(benches);
