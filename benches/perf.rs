use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use fpl_sim::aggregate::summarize;
use fpl_sim::config::EngineConfig;
use fpl_sim::selection::{Chip, TeamSelection};
use fpl_sim::signals::{Difficulty, Fixture, FixtureContext, PlayerSignal, PlayerStatus, Venue};
use fpl_sim::source::ResolvedSquad;
use fpl_sim::team::simulate_team;

fn sample_squad() -> (TeamSelection, ResolvedSquad) {
    let mut squad = ResolvedSquad::new(14);
    for id in 1..=15u32 {
        let signal = PlayerSignal::new(id, id % 10, PlayerStatus::Available)
            .with_stats(2.0 + (id % 6) as f64, 3.0 + (id % 4) as f64, 0.1 * id as f64)
            .with_history(vec![2.0, 6.0, 1.0, 9.0, 3.0]);
        let mut fixtures = vec![Fixture {
            difficulty: Difficulty::clamped((id % 5 + 1) as i64),
            venue: Venue::Home,
        }];
        if id % 7 == 0 {
            fixtures.push(Fixture {
                difficulty: Difficulty::NEUTRAL,
                venue: Venue::Away,
            });
        }
        squad = squad.with_player(signal, FixtureContext::from_fixtures(fixtures));
    }
    let selection = TeamSelection::new((1..=11).collect())
        .with_bench(vec![12, 13, 14, 15])
        .with_captain(7)
        .with_vice_captain(1)
        .with_chip(Chip::BenchBoost);
    (selection, squad)
}

fn bench_team_sequential(c: &mut Criterion) {
    let (selection, squad) = sample_squad();
    let cfg = EngineConfig::default().with_seed(1).with_parallel(false);
    c.bench_function("team_simulation_sequential", |b| {
        b.iter(|| {
            let total = simulate_team(black_box(&selection), &squad, &cfg).unwrap();
            black_box(total.len());
        })
    });
}

fn bench_team_parallel(c: &mut Criterion) {
    let (selection, squad) = sample_squad();
    let cfg = EngineConfig::default().with_seed(1).with_parallel(true);
    c.bench_function("team_simulation_parallel", |b| {
        b.iter(|| {
            let total = simulate_team(black_box(&selection), &squad, &cfg).unwrap();
            black_box(total.len());
        })
    });
}

fn bench_summarize(c: &mut Criterion) {
    let (selection, squad) = sample_squad();
    let cfg = EngineConfig::default().with_seed(2);
    let total = simulate_team(&selection, &squad, &cfg).unwrap();
    c.bench_function("summarize_10k", |b| {
        b.iter(|| {
            let dist = summarize(black_box(total.clone())).unwrap();
            black_box(dist.p90());
        })
    });
}

criterion_group!(
    benches,
    bench_team_sequential,
    bench_team_parallel,
    bench_summarize
);
criterion_main!(benches);
