use board_game_traits::Color;

use crate::error::Error;
use crate::position::{Board, Move};
use crate::tests::do_moves;

#[test]
fn empty_board_test() {
    let board = Board::new(6);
    assert_eq!(board.position_string(), "x6/x6/x6/x6/x6/x6 1 1");
    assert_eq!(board.side_to_move(), Color::White);
    assert!(board.stacks().all(|stack| stack.is_empty()));
}

#[test]
fn opening_swap_test() {
    let mut board = Board::new(6);
    do_moves(&mut board, &["a1"]);
    // White's first placement puts down a black flat
    assert_eq!(board.position_string(), "x6/x6/x6/x6/x6/2,x5 2 1");

    do_moves(&mut board, &["f6"]);
    // ... and black's puts down a white one
    assert_eq!(board.position_string(), "x5,1/x6/x6/x6/x6/2,x5 1 2");

    do_moves(&mut board, &["c3"]);
    // From the second move on, everyone places their own color
    assert_eq!(board.position_string(), "x5,1/x6/x6/x2,1,x3/x6/2,x5 2 2");
}

#[test]
fn wall_and_cap_placement_test() {
    let mut board = Board::new(6);
    do_moves(&mut board, &["a1", "f6", "Sd4", "Cc3"]);
    assert_eq!(
        board.position_string(),
        "x5,1/x6/x3,1S,x2/x2,2C,x3/x6/2,x5 1 3"
    );
}

#[test]
fn spread_flattens_wall_test() {
    let mut board = Board::new(6);
    do_moves(&mut board, &["a1", "f6", "Sb1", "a1>"]);
    // The black flat lands on the white wall, which flattens under it
    assert_eq!(board.position_string(), "x5,1/x6/x6/x6/x6/x,12,x4 1 3");
}

#[test]
fn multi_drop_spread_test() {
    let mut board = Board::new(6);
    do_moves(&mut board, &["a1", "f6", "b1", "a1>", "2b1>11"]);
    // The bottom of the carried stack drops first
    assert_eq!(board.position_string(), "x5,1/x6/x6/x6/x6/x2,1,2,x2 2 3");
}

#[test]
fn spread_off_board_fails_fast_test() {
    let mut board = Board::new(6);
    let mv = Move::from_string("a1<", 6).unwrap();
    match board.do_move(&mv) {
        Err(Error::OutOfBounds { size: 6, .. }) => (),
        other => panic!("expected OutOfBounds, got {:?}", other),
    }
    // The failed spread must leave the board untouched
    assert_eq!(board.position_string(), "x6/x6/x6/x6/x6/x6 1 1");

    do_moves(&mut board, &["a1", "f6", "b1", "a1>"]);
    let before = board.position_string();
    let mv = Move::from_string("2b1<11", 6).unwrap();
    assert!(matches!(board.do_move(&mv), Err(Error::OutOfBounds { .. })));
    assert_eq!(board.position_string(), before);
}

#[test]
fn spread_from_short_stack_fails_test() {
    let mut board = Board::new(6);
    let mv = Move::from_string("3c3>21", 6).unwrap();
    assert!(matches!(board.do_move(&mv), Err(Error::MalformedMove(_))));
    assert_eq!(board.position_string(), "x6/x6/x6/x6/x6/x6 1 1");
}

#[test]
fn clone_is_independent_test() {
    let mut board = Board::new(6);
    do_moves(&mut board, &["a1", "f6", "c3"]);
    let before = board.position_string();

    let mut lookahead = board.clone();
    do_moves(&mut lookahead, &["d3", "c4"]);

    assert_eq!(board.position_string(), before);
    assert_ne!(lookahead.position_string(), before);
}

#[test]
fn move_parse_roundtrip_test() {
    for move_string in ["a1", "Sc4", "Cf6", "b2+", "3b5>21", "2c3<11", "5d3-1121"] {
        let mv = Move::from_string(move_string, 6).unwrap();
        assert_eq!(mv.to_string(), *move_string);
    }
}

#[test]
fn move_parse_rejects_garbage_test() {
    for bad in [
        "",
        "a",
        "a9",
        "i1",
        "Xc3",
        "3c3",
        "3c3*21",
        "3c3>12345678",
        "2c3>111",
    ] {
        assert!(
            Move::from_string(bad, 6).is_err(),
            "\"{}\" should not parse",
            bad
        );
    }
}

#[test]
fn playtak_notation_test() {
    assert_eq!(
        Move::from_playtak("P A1", 6).unwrap(),
        Move::from_string("a1", 6).unwrap()
    );
    assert_eq!(
        Move::from_playtak("P C4 W", 6).unwrap(),
        Move::from_string("Sc4", 6).unwrap()
    );
    assert_eq!(
        Move::from_playtak("P F6 C", 6).unwrap(),
        Move::from_string("Cf6", 6).unwrap()
    );
    assert_eq!(
        Move::from_playtak("M A1 A3 1 2", 6).unwrap(),
        Move::from_string("3a1+12", 6).unwrap()
    );
    assert_eq!(
        Move::from_playtak("M D3 B3 2 1", 6).unwrap(),
        Move::from_string("3d3<21", 6).unwrap()
    );
    assert!(Move::from_playtak("M A1 B2 1", 6).is_err());
    assert!(Move::from_playtak("Z A1", 6).is_err());
}
