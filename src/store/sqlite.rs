//! The sqlite-backed position store.
//!
//! One writer at a time owns the store during an import; readers use
//! [`OpeningsDb::lookup`] between import runs. The store keeps a transaction
//! open at all times, so nothing becomes durable until [`commit`] — the
//! importer commits once per game, which keeps a crashed run from leaving a
//! truncated game behind.
//!
//! [`commit`]: crate::store::PositionProcessor::commit

use std::path::Path;

use board_game_traits::GameResult;
use log::info;
use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;

use crate::error::Error;
use crate::position::{Board, Move};
use crate::store::{
    format_move_edges, parse_move_edges, GameRecord, MoveEdge, PositionProcessor,
};
use crate::symmetry;
use crate::tps;

const CREATE_TABLES_SQL: &str = "
    CREATE TABLE IF NOT EXISTS games (
        id INTEGER PRIMARY KEY,
        playtak_id INTEGER,
        size INTEGER,
        white TEXT NOT NULL,
        black TEXT NOT NULL,
        result TEXT NOT NULL,
        komi INTEGER,
        rating_white INTEGER DEFAULT 1000,
        rating_black INTEGER DEFAULT 1000,
        date INTEGER,
        tournament INTEGER,
        notation TEXT NOT NULL DEFAULT ''
    );
    CREATE TABLE IF NOT EXISTS positions (
        id INTEGER PRIMARY KEY,
        tps TEXT UNIQUE,
        wwins INTEGER NOT NULL DEFAULT 0,
        bwins INTEGER NOT NULL DEFAULT 0,
        draws INTEGER NOT NULL DEFAULT 0,
        moves TEXT NOT NULL DEFAULT ''
    );
    CREATE TABLE IF NOT EXISTS game_position_xref (
        id INTEGER PRIMARY KEY,
        game_id INTEGER,
        position_id INTEGER,
        FOREIGN KEY (game_id) REFERENCES games(id),
        FOREIGN KEY (position_id) REFERENCES positions(id)
    );
";

const CREATE_INDEXES_SQL: &str = "
    CREATE INDEX IF NOT EXISTS idx_xref_game_id ON game_position_xref (game_id);
    CREATE INDEX IF NOT EXISTS idx_xref_position_id ON game_position_xref (position_id);
    CREATE INDEX IF NOT EXISTS idx_position_tps ON positions (tps);
    CREATE INDEX IF NOT EXISTS idx_games_white ON games (white);
    CREATE INDEX IF NOT EXISTS idx_games_black ON games (black);
    CREATE INDEX IF NOT EXISTS idx_games_rating_white ON games (rating_white);
    CREATE INDEX IF NOT EXISTS idx_games_rating_black ON games (rating_black);
    CREATE INDEX IF NOT EXISTS idx_games_komi ON games (komi);
    CREATE INDEX IF NOT EXISTS idx_games_date ON games (date);
    CREATE INDEX IF NOT EXISTS idx_games_tournament ON games (tournament);
";

/// Caps on what [`OpeningsDb::lookup`] returns.
#[derive(Clone, Copy, Debug)]
pub struct LookupOptions {
    pub max_moves: usize,
    pub max_games: usize,
}

impl Default for LookupOptions {
    fn default() -> LookupOptions {
        LookupOptions {
            max_moves: 20,
            max_games: 4,
        }
    }
}

/// What a position lookup returns: the canonical key, the outcome tallies,
/// the follow-up moves re-expressed in the caller's orientation, and a few
/// example games. An unknown position yields a well-formed zero report.
#[derive(Clone, Debug, Serialize)]
pub struct PositionReport {
    pub tps: String,
    pub white_wins: u64,
    pub black_wins: u64,
    pub draws: u64,
    pub moves: Vec<MoveReport>,
    pub games: Vec<GameSummary>,
}

#[derive(Clone, Debug, Serialize)]
pub struct MoveReport {
    /// Valid from the caller's literal board, not the canonical one.
    pub ptn: String,
    pub times_played: u64,
    pub white_wins: u64,
    pub black_wins: u64,
    pub draws: u64,
}

#[derive(Clone, Debug, Serialize)]
pub struct GameSummary {
    pub playtak_id: u64,
    pub white: String,
    pub black: String,
    pub rating_white: i64,
    pub rating_black: i64,
}

struct PositionRow {
    id: i64,
    wwins: u64,
    bwins: u64,
    draws: u64,
    moves: String,
}

/// The persistent index of canonical positions, game records and the
/// game/position cross-reference.
pub struct OpeningsDb {
    conn: Connection,
    max_playtak_id: u64,
    committed_max_playtak_id: u64,
}

impl OpeningsDb {
    /// Opens or creates a store. Idempotent: an existing file keeps its
    /// contents and only reports its import cursor.
    pub fn open(path: &Path) -> Result<OpeningsDb, Error> {
        let conn = Connection::open(path).map_err(|source| Error::StoreUnavailable {
            path: path.to_owned(),
            source,
        })?;
        Self::from_connection(conn)
    }

    pub fn open_in_memory() -> Result<OpeningsDb, Error> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<OpeningsDb, Error> {
        conn.execute_batch(CREATE_TABLES_SQL)?;
        conn.execute_batch(CREATE_INDEXES_SQL)?;
        let (max_playtak_id, games_count): (Option<i64>, i64) = conn.query_row(
            "SELECT MAX(playtak_id), COUNT(playtak_id) FROM games",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;
        let max_playtak_id = max_playtak_id.unwrap_or(0) as u64;
        info!(
            "opened position store with {} games, last playtak id {}",
            games_count, max_playtak_id
        );
        conn.execute_batch("BEGIN")?;
        Ok(OpeningsDb {
            conn,
            max_playtak_id,
            committed_max_playtak_id: max_playtak_id,
        })
    }

    /// The import cursor: the highest external game id already folded in.
    /// Games at or below this id must not be imported again.
    pub fn max_playtak_id(&self) -> u64 {
        self.max_playtak_id
    }

    /// Commits outstanding work and releases the store.
    pub fn close(self) -> Result<(), Error> {
        self.conn.execute_batch("COMMIT")?;
        Ok(())
    }

    /// Returns the id of the canonical position, inserting a zero-tallied
    /// record if it isn't known yet. `tps` must already be canonical.
    pub fn upsert_position(&mut self, tps: &str) -> Result<i64, Error> {
        let existing: Option<i64> = self
            .conn
            .query_row("SELECT id FROM positions WHERE tps = ?1", [tps], |row| {
                row.get(0)
            })
            .optional()?;
        if let Some(id) = existing {
            return Ok(id);
        }
        let id = self.conn.query_row(
            "INSERT INTO positions (tps) VALUES (?1) RETURNING id",
            [tps],
            |row| row.get(0),
        )?;
        Ok(id)
    }

    fn position_row(&self, tps: &str) -> Result<Option<PositionRow>, Error> {
        let row = self
            .conn
            .query_row(
                "SELECT id, wwins, bwins, draws, moves FROM positions WHERE tps = ?1",
                [tps],
                |row| {
                    Ok(PositionRow {
                        id: row.get(0)?,
                        wwins: row.get(1)?,
                        bwins: row.get(2)?,
                        draws: row.get(3)?,
                        moves: row.get(4)?,
                    })
                },
            )
            .optional()?;
        Ok(row)
    }

    fn position_row_by_id(&self, id: i64) -> Result<Option<PositionRow>, Error> {
        let row = self
            .conn
            .query_row(
                "SELECT id, wwins, bwins, draws, moves FROM positions WHERE id = ?1",
                [id],
                |row| {
                    Ok(PositionRow {
                        id: row.get(0)?,
                        wwins: row.get(1)?,
                        bwins: row.get(2)?,
                        draws: row.get(3)?,
                        moves: row.get(4)?,
                    })
                },
            )
            .optional()?;
        Ok(row)
    }

    /// Looks up a position in any orientation and at any move number.
    ///
    /// Follow-up moves are ranked by play count (ties keep their stored
    /// order), deduplicated by destination, and re-expressed in the caller's
    /// orientation, so each returned move is valid from the queried board.
    pub fn lookup(&self, tps: &str, options: &LookupOptions) -> Result<PositionReport, Error> {
        let size = tps::board_size(tps);
        let query_tps = tps::with_move_number(tps, 1);
        let (canonical, own_symmetry) = symmetry::canonicalize(&query_tps);

        let Some(row) = self.position_row(&canonical)? else {
            return Ok(PositionReport {
                tps: canonical,
                white_wins: 0,
                black_wins: 0,
                draws: 0,
                moves: Vec::new(),
                games: Vec::new(),
            });
        };

        let mut edges = parse_move_edges(&row.moves)?;
        edges.sort_by(|a, b| b.times_played.cmp(&a.times_played));

        let mut moves = Vec::new();
        let mut seen_targets: Vec<i64> = Vec::new();
        for edge in edges {
            if moves.len() >= options.max_moves {
                break;
            }
            if seen_targets.contains(&edge.position_id) {
                continue;
            }
            let target = self
                .position_row_by_id(edge.position_id)?
                .ok_or(Error::PositionNotFound(edge.position_id))?;
            seen_targets.push(target.id);

            let mv = Move::from_string(&edge.ptn, size)?;
            moves.push(MoveReport {
                ptn: symmetry::transpose_move(&mv, own_symmetry, size).to_string(),
                times_played: edge.times_played,
                white_wins: target.wwins,
                black_wins: target.bwins,
                draws: target.draws,
            });
        }

        let games = self.example_games(&canonical, options.max_games)?;

        Ok(PositionReport {
            tps: canonical,
            white_wins: row.wwins,
            black_wins: row.bwins,
            draws: row.draws,
            moves,
            games,
        })
    }

    /// Games through a canonical position, strongest pairings first.
    fn example_games(&self, canonical: &str, limit: usize) -> Result<Vec<GameSummary>, Error> {
        let mut stmt = self.conn.prepare(
            "SELECT DISTINCT games.playtak_id, games.white, games.black,
                    games.rating_white, games.rating_black,
                    (games.rating_white + games.rating_black) / 2 AS avg_rating
             FROM game_position_xref, games, positions
             WHERE game_position_xref.position_id = positions.id
               AND games.id = game_position_xref.game_id
               AND positions.tps = ?1
             ORDER BY avg_rating DESC
             LIMIT ?2",
        )?;
        let rows = stmt.query_map(params![canonical, limit as i64], |row| {
            Ok(GameSummary {
                playtak_id: row.get::<_, i64>(0)? as u64,
                white: row.get(1)?,
                black: row.get(2)?,
                rating_white: row.get(3)?,
                rating_black: row.get(4)?,
            })
        })?;
        let mut games = Vec::new();
        for row in rows {
            games.push(row?);
        }
        Ok(games)
    }
}

impl PositionProcessor for OpeningsDb {
    fn add_game(&mut self, game: &GameRecord) -> Result<i64, Error> {
        let id = self.conn.query_row(
            "INSERT INTO games (playtak_id, size, white, black, result, komi,
                                rating_white, rating_black, date, tournament, notation)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
             RETURNING id",
            params![
                game.playtak_id as i64,
                game.size as i64,
                game.white,
                game.black,
                game.result,
                game.komi,
                game.rating_white,
                game.rating_black,
                game.date.timestamp_millis(),
                game.tournament,
                game.notation(),
            ],
            |row| row.get(0),
        )?;
        self.max_playtak_id = self.max_playtak_id.max(game.playtak_id);
        Ok(id)
    }

    fn record_ply(
        &mut self,
        game_id: i64,
        mv: Option<&Move>,
        result: GameResult,
        tps: &str,
        next_tps: Option<&str>,
        board: &Board,
    ) -> Result<(), Error> {
        let (canonical, own_symmetry) = symmetry::canonicalize(tps);
        let position_id = self.upsert_position(&canonical)?;

        self.conn.execute(
            "INSERT INTO game_position_xref (game_id, position_id) VALUES (?1, ?2)",
            params![game_id, position_id],
        )?;

        match mv {
            Some(mv) => {
                let next_tps = next_tps.ok_or_else(|| {
                    Error::InvalidRecord(format!("move {} recorded without a destination", mv))
                })?;
                let (next_canonical, _) = symmetry::canonicalize(next_tps);
                let next_id = self.upsert_position(&next_canonical)?;

                // The edge lives on the position the move leads out of, but is
                // written in that position's own canonical orientation, so a
                // lookup can hand it back through transpose_move.
                let canonical_move =
                    symmetry::transform_move(mv, own_symmetry, board.size()).to_string();

                let moves_text: String = self.conn.query_row(
                    "SELECT moves FROM positions WHERE id = ?1",
                    [position_id],
                    |row| row.get(0),
                )?;
                let mut edges = parse_move_edges(&moves_text)?;
                match edges.iter_mut().find(|edge| edge.ptn == canonical_move) {
                    Some(edge) => edge.times_played += 1,
                    None => edges.push(MoveEdge {
                        ptn: canonical_move,
                        position_id: next_id,
                        times_played: 1,
                    }),
                }
                self.conn.execute(
                    "UPDATE positions SET moves = ?1 WHERE id = ?2",
                    params![format_move_edges(&edges), position_id],
                )?;
            }
            None => {
                let column = match result {
                    GameResult::WhiteWin => "wwins",
                    GameResult::BlackWin => "bwins",
                    GameResult::Draw => "draws",
                };
                self.conn.execute(
                    &format!("UPDATE positions SET {0} = {0} + 1 WHERE id = ?1", column),
                    [position_id],
                )?;
            }
        }
        Ok(())
    }

    fn commit(&mut self) -> Result<(), Error> {
        self.conn.execute_batch("COMMIT; BEGIN")?;
        self.committed_max_playtak_id = self.max_playtak_id;
        Ok(())
    }

    fn rollback(&mut self) -> Result<(), Error> {
        self.conn.execute_batch("ROLLBACK; BEGIN")?;
        self.max_playtak_id = self.committed_max_playtak_id;
        Ok(())
    }
}
