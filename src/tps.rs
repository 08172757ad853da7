//! String-level helpers for the position encoding.
//!
//! A position string has a board part (ranks joined by `/`, cells joined by
//! `,`) and a ` <side to move> <move number>` suffix. The board part exists
//! in two shapes: collapsed, where runs of empty cells are written `x2`..`x8`,
//! and expanded, where every empty cell is a lone `x`. Symmetry transforms
//! work on the expanded shape.

/// Collapsed spellings of empty-cell runs, indexed by run length.
const EMPTY_RUNS: [&str; 9] = ["", "x", "x2", "x3", "x4", "x5", "x6", "x7", "x8"];

pub(crate) fn empty_run_token(run: usize) -> &'static str {
    EMPTY_RUNS[run]
}

/// Splits a position string into its board part and its trailing suffix
/// (including the leading space), so the suffix can be re-appended unchanged.
pub fn split_suffix(tps: &str) -> (&str, &str) {
    match tps.find(' ') {
        Some(i) => tps.split_at(i),
        None => (tps, ""),
    }
}

/// Number of ranks in the board part, which equals the board size.
pub fn board_size(tps: &str) -> usize {
    let (board, _) = split_suffix(tps);
    board.split('/').count()
}

/// Rewrites the move-number field. The store keys every position with move
/// number 1, so positions reached at different game depths deduplicate.
pub fn with_move_number(tps: &str, move_number: usize) -> String {
    let words: Vec<&str> = tps.split(' ').collect();
    let move_number = move_number.to_string();
    match words.as_slice() {
        [board, side, _] => [board, side, &move_number[..]].join(" "),
        _ => tps.to_string(),
    }
}

/// Spells out every empty-cell run in a collapsed board part.
pub fn expand(board: &str) -> String {
    let rows: Vec<String> = board
        .split('/')
        .map(|row| {
            let mut cells: Vec<&str> = Vec::new();
            for cell in row.split(',') {
                match run_length(cell) {
                    Some(run) => cells.extend(std::iter::repeat("x").take(run)),
                    None => cells.push(cell),
                }
            }
            cells.join(",")
        })
        .collect();
    rows.join("/")
}

/// Re-collapses empty-cell runs. Inverse of [`expand`]:
/// `collapse(expand(s)) == s` for every valid collapsed board part.
pub fn collapse(board: &str) -> String {
    let rows: Vec<String> = board
        .split('/')
        .map(|row| {
            let mut cells: Vec<&str> = Vec::new();
            let mut run = 0;
            for cell in row.split(',') {
                if cell == "x" {
                    run += 1;
                } else {
                    if run > 0 {
                        cells.push(empty_run_token(run));
                        run = 0;
                    }
                    cells.push(cell);
                }
            }
            if run > 0 {
                cells.push(empty_run_token(run));
            }
            cells.join(",")
        })
        .collect();
    rows.join("/")
}

fn run_length(cell: &str) -> Option<usize> {
    let rest = cell.strip_prefix('x')?;
    if rest.is_empty() {
        Some(1)
    } else {
        rest.parse().ok()
    }
}
