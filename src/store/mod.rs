//! Persistent, deduplicated aggregation of canonical positions.

use std::fmt::Write;

use board_game_traits::GameResult;
use chrono::{DateTime, Utc};

use crate::error::Error;
use crate::position::{Board, Move};

pub mod sqlite;
pub mod stats;

/// A recorded game, as yielded by the game-record source.
#[derive(Clone, Debug)]
pub struct GameRecord {
    pub playtak_id: u64,
    pub size: usize,
    pub white: String,
    pub black: String,
    /// The raw result string, e.g. `R-0`. See [`classify_result`].
    pub result: String,
    /// Komi in half-flats, as playtak stores it.
    pub komi: i64,
    pub rating_white: i64,
    pub rating_black: i64,
    pub date: DateTime<Utc>,
    pub tournament: bool,
    pub moves: Vec<Move>,
}

impl GameRecord {
    /// The game's moves as space-separated PTN, the form stored on the game row.
    pub fn notation(&self) -> String {
        let mut notation = String::new();
        for (i, mv) in self.moves.iter().enumerate() {
            if i > 0 {
                notation.push(' ');
            }
            write!(notation, "{}", mv).unwrap();
        }
        notation
    }
}

/// Consumer of replayed positions.
///
/// The importer feeds every game it replays through one of these: the
/// sqlite-backed [`sqlite::OpeningsDb`] builds the persistent index, the
/// in-memory [`stats::StatisticsCollector`] only aggregates. Which one runs
/// is the caller's choice, not the importer's.
pub trait PositionProcessor {
    /// Registers a game, returning the processor's id for position linking.
    fn add_game(&mut self, game: &GameRecord) -> Result<i64, Error>;

    /// Records one replayed ply: the position `tps` arose in `game_id`, and
    /// `mv` (if any) was played from it, leading to `next_tps`. The terminal
    /// ply of a replay passes no move and settles the outcome tallies.
    fn record_ply(
        &mut self,
        game_id: i64,
        mv: Option<&Move>,
        result: GameResult,
        tps: &str,
        next_tps: Option<&str>,
        board: &Board,
    ) -> Result<(), Error>;

    /// Makes everything recorded since the last commit durable as one unit.
    fn commit(&mut self) -> Result<(), Error> {
        Ok(())
    }

    /// Discards everything recorded since the last commit.
    fn rollback(&mut self) -> Result<(), Error> {
        Ok(())
    }
}

const KNOWN_RESULTS: [(&str, GameResult); 7] = [
    ("R-0", GameResult::WhiteWin),
    ("F-0", GameResult::WhiteWin),
    ("1-0", GameResult::WhiteWin),
    ("0-R", GameResult::BlackWin),
    ("0-F", GameResult::BlackWin),
    ("0-1", GameResult::BlackWin),
    ("1/2-1/2", GameResult::Draw),
];

/// Maps a result string to a three-way outcome. Anything unrecognized
/// (aborted games, unusual server spellings) counts as a draw; lossy, but it
/// keeps odd result strings from poisoning an entire import run.
pub fn classify_result(result: &str) -> GameResult {
    KNOWN_RESULTS
        .iter()
        .find(|(known, _)| *known == result)
        .map(|(_, game_result)| *game_result)
        .unwrap_or(GameResult::Draw)
}

/// One entry of a position's outgoing-move adjacency list: a move in the
/// position's own canonical orientation, the position it leads to, and how
/// many games played it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveEdge {
    pub ptn: String,
    pub position_id: i64,
    pub times_played: u64,
}

/// Parses a stored moves column, `move,target_id,times_played` triples
/// joined by `;`. Exact inverse of [`format_move_edges`].
pub fn parse_move_edges(text: &str) -> Result<Vec<MoveEdge>, Error> {
    if text.is_empty() {
        return Ok(Vec::new());
    }
    text.split(';')
        .map(|entry| {
            let fields: Vec<&str> = entry.split(',').collect();
            match fields.as_slice() {
                [ptn, position_id, times_played] => Ok(MoveEdge {
                    ptn: ptn.to_string(),
                    position_id: position_id
                        .parse()
                        .map_err(|_| Error::InvalidRecord(entry.to_string()))?,
                    times_played: times_played
                        .parse()
                        .map_err(|_| Error::InvalidRecord(entry.to_string()))?,
                }),
                _ => Err(Error::InvalidRecord(entry.to_string())),
            }
        })
        .collect()
}

pub fn format_move_edges(edges: &[MoveEdge]) -> String {
    let entries: Vec<String> = edges
        .iter()
        .map(|edge| format!("{},{},{}", edge.ptn, edge.position_id, edge.times_played))
        .collect();
    entries.join(";")
}
