//! Replays game records and folds every resulting position into a
//! [`PositionProcessor`].

use log::{info, warn};

use crate::error::Error;
use crate::position::Board;
use crate::store::{classify_result, GameRecord, PositionProcessor};
use crate::tps;

#[derive(Clone, Copy, Debug)]
pub struct ImportOptions {
    /// Replays stop after this many plies; the index only covers openings.
    pub max_plies: usize,
    /// Games with an external id at or below this are already in the store
    /// and are skipped. Wire the store's cursor in here.
    pub min_playtak_id: u64,
}

impl Default for ImportOptions {
    fn default() -> ImportOptions {
        ImportOptions {
            max_plies: 24,
            min_playtak_id: 0,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub imported: usize,
    pub skipped: usize,
    pub failed: usize,
    pub plies_recorded: usize,
}

/// Folds each game into the processor, one committed unit per game.
///
/// A game that fails to replay is rolled back, logged and skipped; the run
/// carries on with the rest. Failures of the processor itself propagate.
pub fn import_games<P: PositionProcessor>(
    processor: &mut P,
    games: &[GameRecord],
    options: &ImportOptions,
) -> Result<ImportSummary, Error> {
    let mut summary = ImportSummary::default();
    for game in games {
        if game.playtak_id <= options.min_playtak_id {
            summary.skipped += 1;
            continue;
        }
        match import_game(processor, game, options.max_plies) {
            Ok(plies) => {
                processor.commit()?;
                summary.imported += 1;
                summary.plies_recorded += plies;
            }
            Err(err) => {
                warn!(
                    "skipping game #{} ({} vs {}): {}",
                    game.playtak_id, game.white, game.black, err
                );
                processor.rollback()?;
                summary.failed += 1;
            }
        }
    }
    info!(
        "imported {} games ({} skipped, {} failed), {} plies recorded",
        summary.imported, summary.skipped, summary.failed, summary.plies_recorded
    );
    Ok(summary)
}

fn import_game<P: PositionProcessor>(
    processor: &mut P,
    game: &GameRecord,
    max_plies: usize,
) -> Result<usize, Error> {
    let result = classify_result(&game.result);
    let game_id = processor.add_game(game)?;

    let mut board = Board::new(game.size);
    let plies = &game.moves[..game.moves.len().min(max_plies)];
    for mv in plies {
        let tps = tps::with_move_number(&board.position_string(), 1);
        // Look ahead on a copy so the processor sees the pre-move board
        let mut next_board = board.clone();
        next_board.do_move(mv)?;
        let next_tps = tps::with_move_number(&next_board.position_string(), 1);
        processor.record_ply(game_id, Some(mv), result, &tps, Some(&next_tps), &board)?;
        board = next_board;
    }

    // The terminal ply carries no move and settles the outcome tallies
    let tps = tps::with_move_number(&board.position_string(), 1);
    processor.record_ply(game_id, None, result, &tps, None, &board)?;

    Ok(plies.len() + 1)
}
