//! Reads game records out of a playtak `games` database.
//!
//! The SQL only narrows by board size and import cursor; everything else
//! (ratings, ply count, player names, bots) is filtered on the Rust side.

use std::path::Path;

use chrono::DateTime;
use log::warn;
use rusqlite::{params, Connection};

use crate::error::Error;
use crate::position::Move;
use crate::store::GameRecord;

/// Games played before this time were stored without usable player names.
const ANON_CUTOFF_MS: i64 = 1_461_430_800_000;

/// Accounts known to be bots on playtak.
pub const DEFAULT_BOT_NAMES: &[&str] = &[
    "WilemBot",
    "TopazBot",
    "Tiltak_Bot",
    "TakticianBot",
    "TakticianBotDev",
    "TakkenBot",
    "kriTakBot",
    "robot",
    "AaaarghBot",
    "TakkerusBot",
    "CrumBot",
    "SlateBot",
    "alphatak_bot",
    "alphabot",
    "IntuitionBot",
    "Geust93",
    "ShlktBot",
    "Taik",
    "VerekaiBot1",
    "CobbleBot",
    "AlphaTakBot_5x5",
    "takkybot",
    "BloodlessBot",
    "TakkerBot",
    "BeginnerBot",
    "cutak_bot",
    "FriendlyBot",
    "antakonistbot",
    "sTAKbot1",
    "sTAKbot2",
    "FPABot",
    "DoubleStackBot",
    "FlashBot",
    "CairnBot",
];

/// Which games to pull out of a playtak database.
///
/// The bot list rides along here instead of living as a process-wide
/// constant, so callers can extend or disable it per run.
#[derive(Clone, Debug)]
pub struct GameQuery {
    pub size: usize,
    pub min_rating: i64,
    pub min_plies: usize,
    pub max_games: usize,
    /// Only games with a strictly greater external id are returned, which
    /// makes repeated imports incremental.
    pub min_playtak_id: u64,
    pub white: Option<String>,
    pub black: Option<String>,
    pub exclude_bots: bool,
    pub bot_names: Vec<String>,
}

impl Default for GameQuery {
    fn default() -> GameQuery {
        GameQuery {
            size: 6,
            min_rating: 0,
            min_plies: 0,
            max_games: usize::MAX,
            min_playtak_id: 0,
            white: None,
            black: None,
            exclude_bots: true,
            bot_names: DEFAULT_BOT_NAMES.iter().map(|name| name.to_string()).collect(),
        }
    }
}

impl GameQuery {
    fn matches(&self, game: &GameRecord) -> bool {
        let white_ok = match &self.white {
            Some(name) => game.white == *name,
            None => !self.exclude_bots || !self.bot_names.iter().any(|bot| *bot == game.white),
        };
        let black_ok = match &self.black {
            Some(name) => game.black == *name,
            None => !self.exclude_bots || !self.bot_names.iter().any(|bot| *bot == game.black),
        };
        white_ok
            && black_ok
            && game.rating_white >= self.min_rating
            && game.rating_black >= self.min_rating
            && game.moves.len() >= self.min_plies
    }
}

struct GameRow {
    id: i64,
    date_ms: i64,
    player_white: String,
    player_black: String,
    notation: String,
    result: String,
    rating_white: i64,
    rating_black: i64,
    tournament: bool,
    komi: i64,
}

/// Pulls matching games, ordered by external id. Games whose notation
/// doesn't parse are logged and dropped rather than failing the run.
pub fn read_games(db_file: &Path, query: &GameQuery) -> Result<Vec<GameRecord>, Error> {
    let conn = Connection::open(db_file).map_err(|source| Error::StoreUnavailable {
        path: db_file.to_owned(),
        source,
    })?;

    let mut stmt = conn.prepare(
        "SELECT id, date, player_white, player_black, notation, result,
                rating_white, rating_black, tournament, komi
         FROM games
         WHERE size = ?1 AND id > ?2
         ORDER BY id",
    )?;
    let rows = stmt.query_map(
        params![query.size as i64, query.min_playtak_id as i64],
        |row| {
            Ok(GameRow {
                id: row.get(0)?,
                date_ms: row.get(1)?,
                player_white: row.get(2)?,
                player_black: row.get(3)?,
                notation: row.get(4)?,
                result: row.get(5)?,
                rating_white: row.get(6)?,
                rating_black: row.get(7)?,
                tournament: row.get(8)?,
                komi: row.get(9)?,
            })
        },
    )?;

    let mut games = Vec::new();
    for row in rows {
        if games.len() >= query.max_games {
            break;
        }
        let row = row?;
        let id = row.id;
        match record_from_row(row, query.size) {
            Ok(game) => {
                if query.matches(&game) {
                    games.push(game);
                }
            }
            Err(err) => warn!("skipping playtak game #{}: {}", id, err),
        }
    }
    Ok(games)
}

fn record_from_row(row: GameRow, size: usize) -> Result<GameRecord, Error> {
    let moves = parse_playtak_notation(&row.notation, size)?;
    let date = DateTime::from_timestamp_millis(row.date_ms)
        .ok_or_else(|| Error::InvalidRecord(format!("bad timestamp {}", row.date_ms)))?;
    let (white, black) = if row.date_ms < ANON_CUTOFF_MS {
        ("Anon".to_string(), "Anon".to_string())
    } else {
        (row.player_white, row.player_black)
    };
    Ok(GameRecord {
        playtak_id: row.id as u64,
        size,
        white,
        black,
        result: row.result,
        komi: row.komi,
        rating_white: row.rating_white,
        rating_black: row.rating_black,
        date,
        tournament: row.tournament,
        moves,
    })
}

/// Playtak notation is comma-separated server moves (`P A1 C`, `M A1 A3 2 1`).
pub fn parse_playtak_notation(notation: &str, size: usize) -> Result<Vec<Move>, Error> {
    if notation.is_empty() {
        return Ok(Vec::new());
    }
    notation
        .split(',')
        .map(|word| Move::from_playtak(word, size).map_err(Error::MalformedMove))
        .collect()
}
