//! Benchmarks for the engine core.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use mailbox_chess::board::{evaluate, generate_moves, Board};
use mailbox_chess::search::Search;
use mailbox_chess::tt::TranspositionTable;

const MIDDLEGAME_FEN: &str =
    "r3k2r/pppq1ppp/2n1bn2/3pp3/3PP3/2N1BN2/PPPQ1PPP/R3K2R w KQkq - 4 8";

fn bench_movegen(c: &mut Criterion) {
    let mut group = c.benchmark_group("movegen");

    let startpos = Board::new();
    group.bench_function("startpos", |b| {
        b.iter(|| black_box(generate_moves(&startpos)))
    });

    let middlegame = Board::try_from_fen(MIDDLEGAME_FEN).unwrap();
    group.bench_function("middlegame", |b| {
        b.iter(|| black_box(generate_moves(&middlegame)))
    });

    group.finish();
}

fn bench_perft(c: &mut Criterion) {
    let mut group = c.benchmark_group("perft");

    let mut board = Board::new();
    for depth in 1..=4 {
        group.bench_with_input(BenchmarkId::new("startpos", depth), &depth, |b, &depth| {
            b.iter(|| board.perft(black_box(depth)))
        });
    }

    group.finish();
}

fn bench_evaluate(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate");

    let startpos = Board::new();
    group.bench_function("startpos", |b| b.iter(|| black_box(evaluate(&startpos))));

    let middlegame = Board::try_from_fen(MIDDLEGAME_FEN).unwrap();
    group.bench_function("middlegame", |b| {
        b.iter(|| black_box(evaluate(&middlegame)))
    });

    group.finish();
}

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");
    group.sample_size(10); // Fewer samples for slower benchmarks

    for depth in [2, 3, 4] {
        group.bench_with_input(BenchmarkId::new("startpos", depth), &depth, |b, &depth| {
            b.iter(|| {
                let mut board = Board::new();
                let mut search = Search::with_table(TranspositionTable::new(1 << 18));
                search.search_position(&mut board, depth)
            })
        });
    }

    for depth in [2, 3] {
        group.bench_with_input(
            BenchmarkId::new("middlegame", depth),
            &depth,
            |b, &depth| {
                b.iter(|| {
                    let mut board = Board::try_from_fen(MIDDLEGAME_FEN).unwrap();
                    let mut search = Search::with_table(TranspositionTable::new(1 << 18));
                    search.search_position(&mut board, depth)
                })
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_movegen,
    bench_perft,
    bench_evaluate,
    bench_search
);
criterion_main!(benches);
