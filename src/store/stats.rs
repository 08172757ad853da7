//! An in-memory [`PositionProcessor`] that only aggregates statistics,
//! for one-off analysis runs that don't need the persistent index.

use std::io;

use board_game_traits::{Color, GameResult};
use serde::Serialize;

use crate::error::Error;
use crate::position::{Board, Move, Role};
use crate::store::{GameRecord, PositionProcessor};

#[derive(Clone, Copy, Debug, Default, Serialize)]
pub struct ResultTally {
    pub white: u64,
    pub black: u64,
    pub draw: u64,
}

impl ResultTally {
    fn bump(&mut self, result: GameResult) {
        match result {
            GameResult::WhiteWin => self.white += 1,
            GameResult::BlackWin => self.black += 1,
            GameResult::Draw => self.draw += 1,
        }
    }
}

/// Outcome tallies bucketed by when each player commits their capstone.
/// Index 0 is White, 1 is Black.
#[derive(Clone, Debug, Default, Serialize)]
pub struct StatisticsReport {
    pub all_games: ResultTally,
    pub cap_placed_by_12: [ResultTally; 2],
    pub cap_placed_by_18: [ResultTally; 2],
    pub cap_placed_later: [ResultTally; 2],
    pub hard_cap_by_18: [ResultTally; 2],
    pub hard_cap_later: [ResultTally; 2],
}

/// Statistics-only processor. Replays flow through [`record_ply`] exactly as
/// they do for the sqlite store, but nothing is persisted.
///
/// [`record_ply`]: PositionProcessor::record_ply
#[derive(Debug, Default)]
pub struct StatisticsCollector {
    report: StatisticsReport,
    ply: usize,
    has_hard_cap: [bool; 2],
    next_game_id: i64,
}

impl StatisticsCollector {
    pub fn new() -> StatisticsCollector {
        StatisticsCollector::default()
    }

    pub fn report(&self) -> &StatisticsReport {
        &self.report
    }

    pub fn into_report(self) -> StatisticsReport {
        self.report
    }

    pub fn write_json<W: io::Write>(&self, writer: W) -> Result<(), Error> {
        serde_json::to_writer_pretty(writer, &self.report)?;
        Ok(())
    }

    /// A capstone resting directly on the owner's own piece.
    fn has_hard_cap(board: &Board, color: Color) -> bool {
        board.stacks().any(|stack| {
            stack.height() >= 2
                && stack
                    .top_stone()
                    .is_some_and(|top| top.role() == Role::Cap && top.color() == color)
                && stack
                    .get(stack.height() - 2)
                    .is_some_and(|below| below.color() == color)
        })
    }
}

impl PositionProcessor for StatisticsCollector {
    fn add_game(&mut self, game: &GameRecord) -> Result<i64, Error> {
        self.ply = 0;
        self.has_hard_cap = [false; 2];
        self.report
            .all_games
            .bump(crate::store::classify_result(&game.result));
        self.next_game_id += 1;
        Ok(self.next_game_id)
    }

    fn record_ply(
        &mut self,
        _game_id: i64,
        mv: Option<&Move>,
        result: GameResult,
        _tps: &str,
        _next_tps: Option<&str>,
        board: &Board,
    ) -> Result<(), Error> {
        let Some(mv) = mv else {
            return Ok(());
        };
        let player = match board.side_to_move() {
            Color::White => 0,
            Color::Black => 1,
        };

        if let Move::Place(Role::Cap, _) = mv {
            let bucket = if self.ply < 12 {
                &mut self.report.cap_placed_by_12
            } else if self.ply < 18 {
                &mut self.report.cap_placed_by_18
            } else {
                &mut self.report.cap_placed_later
            };
            bucket[player].bump(result);
        }

        for (index, color) in [Color::White, Color::Black].into_iter().enumerate() {
            if !self.has_hard_cap[index] && Self::has_hard_cap(board, color) {
                self.has_hard_cap[index] = true;
                let bucket = if self.ply < 18 {
                    &mut self.report.hard_cap_by_18
                } else {
                    &mut self.report.hard_cap_later
                };
                bucket[index].bump(result);
            }
        }

        self.ply += 1;
        Ok(())
    }
}
