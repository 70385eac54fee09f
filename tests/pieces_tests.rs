//! Piece tests - shapes, rotation and kick tables

use blockfall::core::{canonical_shape, kick_candidates, rotate_matrix, shape_for, Shape};
use blockfall::types::{Direction, PieceKind, Rotation};

#[test]
fn test_canonical_dimensions() {
    let dims: Vec<(usize, usize)> = PieceKind::ALL
        .iter()
        .map(|&k| {
            let s = canonical_shape(k);
            (s.height(), s.width())
        })
        .collect();
    // I O T L J S Z
    assert_eq!(
        dims,
        vec![(1, 4), (2, 2), (2, 3), (2, 3), (2, 3), (2, 3), (2, 3)]
    );
}

#[test]
fn test_rotate_t_clockwise() {
    let t = canonical_shape(PieceKind::T);
    let east = rotate_matrix(&t, Direction::Clockwise);
    assert_eq!(east, Shape::from_rows(&[&[1, 0], &[1, 1], &[1, 0]]));
}

#[test]
fn test_rotate_t_counter_clockwise() {
    let t = canonical_shape(PieceKind::T);
    let west = rotate_matrix(&t, Direction::CounterClockwise);
    assert_eq!(west, Shape::from_rows(&[&[0, 1], &[1, 1], &[0, 1]]));
}

#[test]
fn test_rotate_non_square_swaps_dimensions() {
    let l = canonical_shape(PieceKind::L);
    let turned = rotate_matrix(&l, Direction::Clockwise);
    assert_eq!((turned.height(), turned.width()), (3, 2));
    assert_eq!(turned.cell_count(), 4);
}

#[test]
fn test_o_is_rotation_invariant() {
    let o = canonical_shape(PieceKind::O);
    for rotation in [Rotation::East, Rotation::South, Rotation::West] {
        assert_eq!(shape_for(PieceKind::O, rotation), o);
    }
}

#[test]
fn test_south_is_two_turns_either_way() {
    for kind in PieceKind::ALL {
        let s = canonical_shape(kind);
        let cw2 = s.rotated(Direction::Clockwise).rotated(Direction::Clockwise);
        let ccw2 = s
            .rotated(Direction::CounterClockwise)
            .rotated(Direction::CounterClockwise);
        assert_eq!(cw2, ccw2, "{:?}", kind);
        assert_eq!(shape_for(kind, Rotation::South), cw2, "{:?}", kind);
    }
}

#[test]
fn test_kick_lists_start_with_identity() {
    for kind in PieceKind::ALL {
        for from in [Rotation::North, Rotation::East, Rotation::South, Rotation::West] {
            for dir in [Direction::Clockwise, Direction::CounterClockwise] {
                let kicks = kick_candidates(kind, from, from.rotate(dir));
                assert_eq!(kicks[0], (0, 0));
                let expected = if kind == PieceKind::O { 1 } else { 5 };
                assert_eq!(kicks.len(), expected);
            }
        }
    }
}

#[test]
fn test_kick_tables_differ_for_i() {
    assert_eq!(
        kick_candidates(PieceKind::T, Rotation::North, Rotation::East),
        &[(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)]
    );
    assert_eq!(
        kick_candidates(PieceKind::I, Rotation::North, Rotation::East),
        &[(0, 0), (-2, 0), (1, 0), (-2, -1), (1, 2)]
    );
}

#[test]
fn test_non_adjacent_transition_has_only_identity() {
    assert_eq!(
        kick_candidates(PieceKind::J, Rotation::North, Rotation::South),
        &[(0, 0)]
    );
}

#[test]
fn test_piece_colors_are_distinct() {
    let mut hexes: Vec<String> = PieceKind::ALL.iter().map(|k| k.color().hex()).collect();
    hexes.sort();
    hexes.dedup();
    assert_eq!(hexes.len(), 7);
    assert_eq!(PieceKind::T.color().hex(), "#A000F0");
}
