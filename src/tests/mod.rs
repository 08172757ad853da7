#[cfg(test)]
mod board_tests;
#[cfg(test)]
mod symmetry_tests;

#[cfg(test)]
use crate::position::{Board, Move};

#[cfg(test)]
fn do_moves(board: &mut Board, move_strings: &[&str]) {
    for move_string in move_strings {
        let mv = Move::from_string(move_string, board.size()).unwrap();
        board.do_move(&mv).unwrap();
    }
}

#[cfg(test)]
fn position_after(size: usize, move_strings: &[&str]) -> String {
    let mut board = Board::new(size);
    do_moves(&mut board, move_strings);
    crate::tps::with_move_number(&board.position_string(), 1)
}
