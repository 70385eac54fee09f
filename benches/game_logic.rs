use criterion::{black_box, criterion_group, criterion_main, Criterion};
use blockfall::core::{canonical_shape, Board, Engine, GameSnapshot, PieceBag};
use blockfall::types::{Direction, PieceKind, LINE_CLEAR_FLASH_MS};

fn bench_tick(c: &mut Criterion) {
    let mut engine = Engine::new(12345);

    c.bench_function("gravity_tick", |b| {
        b.iter(|| {
            if engine.is_game_over() {
                engine.restart();
            }
            engine.tick();
            engine.advance(LINE_CLEAR_FLASH_MS);
        })
    });
}

fn bench_line_clear(c: &mut Criterion) {
    c.bench_function("clear_4_lines", |b| {
        b.iter(|| {
            let mut board = Board::new();
            for y in 16..20 {
                for x in 0..10 {
                    board.set(x, y, Some(PieceKind::I));
                }
            }
            black_box(board.clear_lines());
        })
    });
}

fn bench_collides(c: &mut Criterion) {
    let board = Board::new();
    let shape = canonical_shape(PieceKind::T);

    c.bench_function("collides", |b| {
        b.iter(|| board.collides(black_box(&shape), black_box(4), black_box(10)))
    });
}

fn bench_bag(c: &mut Criterion) {
    let mut bag = PieceBag::new(12345);

    c.bench_function("bag_draw", |b| b.iter(|| black_box(bag.draw_next())));
}

fn bench_try_rotate(c: &mut Criterion) {
    let mut engine = Engine::new(12345);

    c.bench_function("try_rotate", |b| {
        b.iter(|| {
            engine.try_rotate(Direction::Clockwise);
        })
    });
}

fn bench_hard_drop(c: &mut Criterion) {
    let mut engine = Engine::new(12345);

    c.bench_function("hard_drop", |b| {
        b.iter(|| {
            if engine.is_game_over() {
                engine.restart();
            }
            engine.hard_drop();
            engine.advance(LINE_CLEAR_FLASH_MS);
        })
    });
}

fn bench_snapshot_into(c: &mut Criterion) {
    let engine = Engine::new(12345);
    let mut snap = GameSnapshot::default();

    c.bench_function("snapshot_into", |b| {
        b.iter(|| engine.snapshot_into(black_box(&mut snap)))
    });
}

criterion_group!(
    benches,
    bench_tick,
    bench_line_clear,
    bench_collides,
    bench_bag,
    bench_try_rotate,
    bench_hard_drop,
    bench_snapshot_into
);
criterion_main!(benches);
