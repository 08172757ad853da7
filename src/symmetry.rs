//! Reduces the 8 symmetries of a square board to one canonical
//! representative, and moves positions and move notation between the natural
//! and canonical orientations.

use std::fmt;

use crate::position::Move;
use crate::tps;

/// One of the 8 elements of the square board's symmetry group: 0 is the
/// identity, 1..=3 are successive 90° rotations, 4 is the top-bottom
/// reflection and 5..=7 are that reflection followed by rotations.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Symmetry(u8);

impl Symmetry {
    pub const IDENTITY: Symmetry = Symmetry(0);
    pub const COUNT: u8 = 8;

    pub fn from_index(index: u8) -> Symmetry {
        assert!(index < Self::COUNT);
        Symmetry(index)
    }

    pub fn index(self) -> u8 {
        self.0
    }

    /// All elements in generation order, the tie-break order of [`canonicalize`].
    pub fn all() -> impl Iterator<Item = Symmetry> {
        (0..Self::COUNT).map(Symmetry)
    }

    pub fn is_mirrored(self) -> bool {
        self.0 >= 4
    }

    pub fn rotations(self) -> u8 {
        self.0 % 4
    }
}

impl fmt::Display for Symmetry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Finds the symmetry image with the lexicographically smallest board part.
///
/// All 8 images are generated in a fixed order (identity, three rotations,
/// reflection, reflection plus three rotations), so ties always resolve to
/// the first winning element. The side-to-move/move-number suffix takes no
/// part in the comparison and is re-appended unchanged.
pub fn canonicalize(tps: &str) -> (String, Symmetry) {
    let (board, suffix) = tps::split_suffix(tps);
    let expanded = tps::expand(board);

    let mut best = expanded.clone();
    let mut best_symmetry = Symmetry::IDENTITY;

    let mut image = expanded.clone();
    for index in 1..4 {
        image = rotate_board(&image);
        if image < best {
            best = image.clone();
            best_symmetry = Symmetry(index);
        }
    }

    image = mirror_board(&expanded);
    if image < best {
        best = image.clone();
        best_symmetry = Symmetry(4);
    }
    for index in 5..8 {
        image = rotate_board(&image);
        if image < best {
            best = image.clone();
            best_symmetry = Symmetry(index);
        }
    }

    (format!("{}{}", tps::collapse(&best), suffix), best_symmetry)
}

/// Applies exactly the named element to a position string, no search.
pub fn transform_position(tps: &str, symmetry: Symmetry) -> String {
    let (board, suffix) = tps::split_suffix(tps);
    let mut expanded = tps::expand(board);
    if symmetry.is_mirrored() {
        expanded = mirror_board(&expanded);
    }
    for _ in 0..symmetry.rotations() {
        expanded = rotate_board(&expanded);
    }
    format!("{}{}", tps::collapse(&expanded), suffix)
}

/// A single 90° rotation of a move. Drop counts and piece roles are
/// unaffected; only the square and the direction glyph map.
pub fn rotate_move(mv: &Move, size: usize) -> Move {
    match mv {
        Move::Place(role, square) => Move::Place(*role, square.rotated(size)),
        Move::Spread(pieces_taken, square, direction, drops) => Move::Spread(
            *pieces_taken,
            square.rotated(size),
            direction.rotated(),
            drops.clone(),
        ),
    }
}

/// The top-bottom reflection of a move.
pub fn mirror_move(mv: &Move, size: usize) -> Move {
    match mv {
        Move::Place(role, square) => Move::Place(*role, square.mirrored(size)),
        Move::Spread(pieces_taken, square, direction, drops) => Move::Spread(
            *pieces_taken,
            square.mirrored(size),
            direction.mirrored(),
            drops.clone(),
        ),
    }
}

/// Maps a move from the natural orientation into the frame produced by
/// `symmetry`. Consistent with [`transform_position`]: a placement's square
/// maps exactly like a lone board cell.
pub fn transform_move(mv: &Move, symmetry: Symmetry, size: usize) -> Move {
    let mut transformed = mv.clone();
    if symmetry.is_mirrored() {
        transformed = mirror_move(&transformed, size);
    }
    for _ in 0..symmetry.rotations() {
        transformed = rotate_move(&transformed, size);
    }
    debug_assert_eq!(
        transpose_move(&transformed, symmetry, size),
        *mv,
        "symmetry transform of {} under element {} does not invert",
        mv,
        symmetry
    );
    transformed
}

/// The exact group inverse of [`transform_move`]: un-rotate, then un-mirror.
pub fn transpose_move(mv: &Move, symmetry: Symmetry, size: usize) -> Move {
    let mut transposed = mv.clone();
    for _ in 0..(4 - symmetry.rotations()) % 4 {
        transposed = rotate_move(&transposed, size);
    }
    if symmetry.is_mirrored() {
        transposed = mirror_move(&transposed, size);
    }
    transposed
}

/// One 90° rotation of an expanded board part: ranks become files.
fn rotate_board(expanded: &str) -> String {
    let rows: Vec<Vec<&str>> = expanded
        .split('/')
        .map(|row| row.split(',').collect())
        .collect();
    let mut result: Vec<String> = rows[0]
        .iter()
        .enumerate()
        .map(|(i, _)| {
            rows.iter()
                .map(|row| row[i])
                .collect::<Vec<&str>>()
                .join(",")
        })
        .collect();
    result.reverse();
    result.join("/")
}

/// The top-bottom reflection of an expanded board part: rank order reverses.
fn mirror_board(expanded: &str) -> String {
    let mut rows: Vec<&str> = expanded.split('/').collect();
    rows.reverse();
    rows.join("/")
}
