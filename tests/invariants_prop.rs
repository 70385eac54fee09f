//! Property tests for the engine's core invariants.
//!
//! - every bag-aligned run of seven draws is a permutation of the seven kinds
//! - rotation has order four, and clockwise then counter-clockwise is identity
//! - collision against an empty board is exactly "outside the walls or floor"
//! - clearing a board with no full rows changes nothing
//! - under arbitrary play the live piece never overlaps the board

use proptest::prelude::*;

use blockfall::core::{clear_lines, collides, shape_for, Board, Engine, PieceBag};
use blockfall::types::{
    Direction, GameAction, PieceKind, Rotation, BOARD_HEIGHT, BOARD_WIDTH, LINE_CLEAR_FLASH_MS,
};

fn kind_strategy() -> impl Strategy<Value = PieceKind> {
    prop::sample::select(PieceKind::ALL.to_vec())
}

fn rotation_strategy() -> impl Strategy<Value = Rotation> {
    prop::sample::select(vec![
        Rotation::North,
        Rotation::East,
        Rotation::South,
        Rotation::West,
    ])
}

fn action_strategy() -> impl Strategy<Value = GameAction> {
    prop::sample::select(vec![
        GameAction::MoveLeft,
        GameAction::MoveRight,
        GameAction::SoftDrop,
        GameAction::HardDrop,
        GameAction::RotateCw,
        GameAction::RotateCcw,
        GameAction::Hold,
    ])
}

proptest! {
    #[test]
    fn bag_runs_are_permutations(seed in any::<u32>(), bags in 1usize..8) {
        let mut bag = PieceBag::new(seed);
        let draws: Vec<PieceKind> = (0..bags * 7).map(|_| bag.draw_next()).collect();

        for run in draws.chunks(7) {
            let mut sorted = run.to_vec();
            sorted.sort();
            prop_assert_eq!(sorted, PieceKind::ALL.to_vec());
        }
        prop_assert_eq!(bag.bags_dealt(), bags as u64);
    }

    #[test]
    fn peek_agrees_with_draw(seed in any::<u32>(), skip in 0usize..20) {
        let mut bag = PieceBag::new(seed);
        for _ in 0..skip {
            bag.draw_next();
        }
        let peeked = bag.peek();
        prop_assert_eq!(peeked, bag.draw_next());
    }

    #[test]
    fn rotation_has_order_four(kind in kind_strategy(), rotation in rotation_strategy()) {
        let shape = shape_for(kind, rotation);

        let mut spun = shape;
        for _ in 0..4 {
            spun = spun.rotated(Direction::Clockwise);
        }
        prop_assert_eq!(spun, shape);

        let back = shape
            .rotated(Direction::Clockwise)
            .rotated(Direction::CounterClockwise);
        prop_assert_eq!(back, shape);
        prop_assert_eq!(shape.cell_count(), 4);
    }

    #[test]
    fn empty_board_collision_is_bounds_check(
        kind in kind_strategy(),
        rotation in rotation_strategy(),
        x in -6i32..16,
        y in -6i32..26,
    ) {
        let board = Board::new();
        let shape = shape_for(kind, rotation);
        let outside = shape.cells().any(|(dx, dy)| {
            let (nx, ny) = (x + dx, y + dy);
            nx < 0 || nx >= BOARD_WIDTH as i32 || ny >= BOARD_HEIGHT as i32
        });
        prop_assert_eq!(collides(&board, &shape, x, y), outside);
    }

    #[test]
    fn clearing_without_full_rows_is_identity(
        cells in prop::collection::vec(any::<bool>(), BOARD_WIDTH * BOARD_HEIGHT),
        holes in prop::collection::vec(0usize..BOARD_WIDTH, BOARD_HEIGHT),
    ) {
        let mut board = Board::new();
        for y in 0..BOARD_HEIGHT {
            for x in 0..BOARD_WIDTH {
                if cells[y * BOARD_WIDTH + x] && x != holes[y] {
                    board.set(x as i32, y as i32, Some(PieceKind::T));
                }
            }
        }

        let (out, rows) = clear_lines(&board);
        prop_assert!(rows.is_empty());
        prop_assert_eq!(out, board);
    }

    #[test]
    fn live_piece_never_overlaps(
        seed in any::<u32>(),
        actions in prop::collection::vec(action_strategy(), 0..200),
    ) {
        let mut engine = Engine::new(seed);
        let mut last_score = 0;

        for action in actions {
            engine.apply_action(action);
            engine.advance(LINE_CLEAR_FLASH_MS);

            if let Some(piece) = engine.active() {
                prop_assert!(!engine.board().collides(&piece.shape, piece.x, piece.y));
            }
            prop_assert!(engine.score() >= last_score);
            last_score = engine.score();
        }
    }
}
