use criterion::{criterion_group, criterion_main, Criterion};
use sugarscape_core::config::AppConfig;
use sugarscape_core::rules::TerminationRule;
use sugarscape_core::simulation::Simulation;

fn bench_full_cycle(c: &mut Criterion) {
    let mut config = AppConfig::default();
    config.environment.size = 50;
    config.population.initial_size = 200;
    config.population.max_size = 400;
    config.simulation.seed = Some(42);
    config.simulation.max_cycle = u64::MAX;
    config.simulation.termination = TerminationRule::MaxCycle;

    let mut sim = Simulation::from_config(&config).expect("valid benchmark config");
    sim.start();

    c.bench_function("cycle_50x50_200_agents", |b| {
        b.iter(|| sim.advance().expect("cycle"));
    });
}

criterion_group!(benches, bench_full_cycle);
criterion_main!(benches);
