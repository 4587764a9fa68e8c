//! Chess Engine Benchmarks
//!
//! Evaluation, move ordering and fixed-depth search timings using Criterion.

use std::hint::black_box;

use chess_engine::rules::position_from_fen;
use chess_engine::search::ordered_children;
use chess_engine::shakmaty::{Chess, Position};
use chess_engine::{
    evaluate, Evaluator, OrderingStrategy, PositionCache, PositionHistory, Searcher,
};
use criterion::{criterion_group, criterion_main, Criterion};

const MIDDLEGAME: &str = "r1bq1rk1/pp2bppp/2n1pn2/3p4/2PP4/2N1PN2/PP3PPP/R2QKB1R w KQ - 0 8";

fn middlegame() -> Chess {
    position_from_fen(MIDDLEGAME).unwrap_or_default()
}

fn bench_evaluate_starting(c: &mut Criterion) {
    let position = Chess::default();
    c.bench_function("evaluate_starting_position", |b| {
        b.iter(|| black_box(evaluate(black_box(&position))))
    });
}

fn bench_evaluate_middlegame(c: &mut Criterion) {
    let position = middlegame();
    c.bench_function("evaluate_middlegame", |b| {
        b.iter(|| black_box(evaluate(black_box(&position))))
    });
}

fn bench_ordering(c: &mut Criterion) {
    let position = middlegame();
    let evaluator = Evaluator::default();
    let mut group = c.benchmark_group("ordered_children");
    for (name, strategy) in [
        ("static_eval", OrderingStrategy::StaticEval),
        ("mvv_lva", OrderingStrategy::MvvLva),
    ] {
        group.bench_function(name, |b| {
            b.iter(|| {
                let children = ordered_children(
                    position.legal_moves(),
                    &position,
                    3,
                    true,
                    strategy,
                    &evaluator,
                );
                black_box(children.len())
            })
        });
    }
    group.finish();
}

fn bench_search_depth_two(c: &mut Criterion) {
    let position = middlegame();
    let evaluator = Evaluator::default();
    let history = PositionHistory::starting_at(&position);
    c.bench_function("search_depth_2_cold_cache", |b| {
        b.iter(|| {
            let mut cache = PositionCache::default();
            let result = Searcher::new(&mut cache, &evaluator).search(&position, 2, true, &history);
            black_box(result.best_evaluation)
        })
    });
}

criterion_group!(
    benches,
    bench_evaluate_starting,
    bench_evaluate_middlegame,
    bench_ordering,
    bench_search_depth_two,
);
criterion_main!(benches);
