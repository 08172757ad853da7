use rand::prelude::*;

use crate::position::{Board, Move, Square};
use crate::symmetry::{
    canonicalize, mirror_move, rotate_move, transform_move, transform_position, transpose_move,
    Symmetry,
};
use crate::tests::{do_moves, position_after};
use crate::tps;

fn rotate_move_string(move_string: &str, size: usize) -> String {
    let mv = Move::from_string(move_string, size).unwrap();
    rotate_move(&mv, size).to_string()
}

#[test]
fn rotate_move_vectors_test() {
    assert_eq!(rotate_move_string("a1>", 6), "f1+");
    assert_eq!(rotate_move_string("a2+", 6), "e1<");
    assert_eq!(rotate_move_string("3b5>21", 6), "3b2+21");
}

#[test]
fn rotate_placement_tables_test() {
    let tables: [(usize, &[(&str, &str)]); 3] = [
        (
            6,
            &[
                ("a1", "f1"),
                ("a2", "e1"),
                ("a3", "d1"),
                ("b1", "f2"),
                ("b2", "e2"),
                ("b3", "d2"),
            ],
        ),
        (
            7,
            &[
                ("a1", "g1"),
                ("a2", "f1"),
                ("a3", "e1"),
                ("b1", "g2"),
                ("b2", "f2"),
                ("b3", "e2"),
                ("e7", "a5"),
            ],
        ),
        (
            8,
            &[
                ("a1", "h1"),
                ("a2", "g1"),
                ("a3", "f1"),
                ("b1", "h2"),
                ("b2", "g2"),
                ("b3", "f2"),
            ],
        ),
    ];
    for (size, pairs) in tables {
        for &(from, to) in pairs {
            assert_eq!(
                rotate_move_string(from, size),
                to,
                "rotating {} at size {}",
                from,
                size
            );
        }
    }
}

#[test]
fn all_elements_on_a1_test() {
    let expected = ["a1", "f1", "f6", "a6", "a6", "a1", "f1", "f6"];
    let mv = Move::from_string("a1", 6).unwrap();
    for (symmetry, expected) in Symmetry::all().zip(expected) {
        assert_eq!(
            transform_move(&mv, symmetry, 6).to_string(),
            expected,
            "element {}",
            symmetry
        );
    }
}

#[test]
fn four_rotations_are_identity_test() {
    for size in [6, 7, 8] {
        for file in 0..size {
            for rank in 0..size {
                let square = Square::from_file_rank(file, rank);
                let mut rotated = square;
                for _ in 0..4 {
                    rotated = rotated.rotated(size as usize);
                }
                assert_eq!(rotated, square, "size {}", size);
            }
        }
    }
}

#[test]
fn transform_transpose_roundtrip_test() {
    let move_strings = ["a1", "Sc4", "Cf6", "d3+", "3b5>21", "2c3<11", "4d4-112"];
    for size in [6, 7, 8] {
        for move_string in move_strings {
            let mv = Move::from_string(move_string, size).unwrap();
            for symmetry in Symmetry::all() {
                assert_eq!(
                    transpose_move(&transform_move(&mv, symmetry, size), symmetry, size),
                    mv,
                    "element {} on {} at size {}",
                    symmetry,
                    move_string,
                    size
                );
                assert_eq!(
                    transform_move(&transpose_move(&mv, symmetry, size), symmetry, size),
                    mv,
                    "element {} on {} at size {}",
                    symmetry,
                    move_string,
                    size
                );
            }
        }
    }
}

#[test]
fn mirror_is_involution_test() {
    for move_string in ["a1", "b2+", "3b5>21"] {
        let mv = Move::from_string(move_string, 6).unwrap();
        assert_eq!(mirror_move(&mirror_move(&mv, 6), 6), mv);
    }
}

#[test]
fn canonicalize_is_idempotent_test() {
    let tps = position_after(6, &["a1", "f6", "c3", "d3"]);
    let (canonical, _) = canonicalize(&tps);
    assert_eq!(canonicalize(&canonical), (canonical.clone(), Symmetry::IDENTITY));
}

#[test]
fn canonical_key_is_symmetry_invariant_test() {
    let positions = [
        position_after(6, &["a1"]),
        position_after(6, &["a1", "f6", "c3", "d3"]),
        position_after(6, &["a1", "f6", "Sb1", "a1>", "2b1>11"]),
        position_after(7, &["a1", "g7", "d4", "Cc3"]),
    ];
    for tps in positions {
        let (canonical, _) = canonicalize(&tps);
        for symmetry in Symmetry::all() {
            let image = transform_position(&tps, symmetry);
            assert_eq!(
                canonicalize(&image).0,
                canonical,
                "element {} on {}",
                symmetry,
                tps
            );
        }
    }
}

#[test]
fn canonicalize_preserves_suffix_test() {
    let mut board = Board::new(6);
    do_moves(&mut board, &["a1", "f6", "c3"]);
    let tps = board.position_string();
    assert!(tps.ends_with(" 2 2"));
    let (canonical, _) = canonicalize(&tps);
    assert!(canonical.ends_with(" 2 2"));
}

// Replaying a transformed move sequence must land on the transformed position.
#[test]
fn transformed_replay_matches_transformed_position_test() {
    let move_strings = ["a1", "f6", "c3", "d3", "Sc4", "d4", "c4>"];
    let moves: Vec<Move> = move_strings
        .iter()
        .map(|s| Move::from_string(s, 6).unwrap())
        .collect();

    let mut board = Board::new(6);
    for mv in &moves {
        board.do_move(mv).unwrap();
    }
    let tps = board.position_string();

    for symmetry in Symmetry::all() {
        let mut image_board = Board::new(6);
        for mv in &moves {
            image_board
                .do_move(&transform_move(mv, symmetry, 6))
                .unwrap();
        }
        assert_eq!(
            image_board.position_string(),
            transform_position(&tps, symmetry),
            "element {}",
            symmetry
        );
    }
}

#[test]
fn random_placement_games_canonicalize_consistently_test() {
    let mut rng = SmallRng::seed_from_u64(42);
    let squares: Vec<String> = (0..6)
        .flat_map(|file| (0..6).map(move |rank| Square::from_file_rank(file, rank).to_string()))
        .collect();

    for _ in 0..20 {
        let mut shuffled = squares.clone();
        shuffled.shuffle(&mut rng);
        let mut board = Board::new(6);
        for square in shuffled.iter().take(12) {
            let move_string = if rng.gen_bool(0.2) {
                format!("S{}", square)
            } else {
                square.clone()
            };
            let mv = Move::from_string(&move_string, 6).unwrap();
            board.do_move(&mv).unwrap();
        }
        let tps = tps::with_move_number(&board.position_string(), 1);

        let (canonical, _) = canonicalize(&tps);
        assert_eq!(canonicalize(&canonical), (canonical.clone(), Symmetry::IDENTITY));
        for symmetry in Symmetry::all() {
            assert_eq!(canonicalize(&transform_position(&tps, symmetry)).0, canonical);
        }
    }
}
