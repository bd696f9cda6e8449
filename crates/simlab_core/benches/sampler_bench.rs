//! Criterion benchmarks for the sampler.
//!
//! - Full 1K-trial run on a two-game slate, sequential and 4 workers
//! - Correlation matrix build + factor for a 40-player slate
//! - Game model draw for one game

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use simlab_core::config::{GameModelConfig, ModelConfig, SamplingConfig};
use simlab_core::models::{GameEnvironment, PlayerProjection, Position, Schedule};
use simlab_core::sim::{CorrelationModel, GameModel, MonteCarloSampler};

fn bench_slate(per_team: usize) -> (Vec<PlayerProjection>, Vec<GameEnvironment>) {
    let model = ModelConfig::default();
    let teams = ["KC", "BUF", "SF", "DAL"];
    let positions = [Position::QB, Position::RB, Position::WR, Position::WR, Position::TE, Position::DST];
    let mut players = Vec::new();
    for team in teams {
        for i in 0..per_team {
            let pos = positions[i % positions.len()];
            let id = format!("{team}-{i}");
            players.push(PlayerProjection::from_site_projection(
                id.clone(),
                id,
                team,
                pos,
                5000.0,
                Some(8.0 + i as f64),
                &model.player,
            ));
        }
    }
    let games = vec![
        GameEnvironment::new("kc-buf", "KC", "BUF").with_total(50.5).with_spread(-2.5),
        GameEnvironment::new("sf-dal", "SF", "DAL").with_total(46.0).with_weather("rain"),
    ];
    (players, games)
}

fn bench_full_run(c: &mut Criterion) {
    let (players, games) = bench_slate(6);
    let mut group = c.benchmark_group("sampler_run_1k");
    group.sample_size(20);
    for jobs in [1usize, 4] {
        let sampler = MonteCarloSampler::new(
            SamplingConfig::new(1_000, 42).with_n_jobs(jobs),
            ModelConfig::default(),
        )
        .unwrap_or_else(|e| panic!("bench config: {e}"));
        group.bench_with_input(BenchmarkId::from_parameter(jobs), &jobs, |b, _| {
            b.iter(|| sampler.run(black_box(&players), black_box(&games)))
        });
    }
    group.finish();
}

fn bench_correlation_build(c: &mut Criterion) {
    let (players, games) = bench_slate(10);
    let schedule = Schedule::build(&games).unwrap_or_else(|e| panic!("bench slate: {e}"));
    let model = CorrelationModel::default();
    c.bench_function("correlation_build_factor_40", |b| {
        b.iter(|| model.build(black_box(&players), black_box(&schedule)).factor())
    });
}

fn bench_game_model(c: &mut Criterion) {
    let game_model = GameModel::new(GameModelConfig::default());
    let game = GameEnvironment::new("kc-buf", "KC", "BUF").with_total(50.5).with_spread(-2.5);
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    c.bench_function("game_model_simulate", |b| {
        b.iter(|| game_model.simulate(black_box(&game), &mut rng))
    });
}

criterion_group!(benches, bench_full_run, bench_correlation_build, bench_game_model);
criterion_main!(benches);
