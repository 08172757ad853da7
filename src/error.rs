use std::path::PathBuf;
use std::{error, fmt, io};

/// Any failure while reading, replaying, canonicalizing or storing game records.
#[derive(Debug)]
pub enum Error {
    /// Move text that doesn't match any recognized grammar.
    MalformedMove(pgn_traits::Error),
    /// A spread stepped off the board. The board is left untouched.
    OutOfBounds { mv: String, size: usize },
    Store(rusqlite::Error),
    /// The store file could not be opened or created.
    StoreUnavailable {
        path: PathBuf,
        source: rusqlite::Error,
    },
    /// A position that was expected to exist was missing from the store.
    PositionNotFound(i64),
    /// Persisted data that doesn't parse back, e.g. a corrupt moves column.
    InvalidRecord(String),
    Json(serde_json::Error),
    Io(io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::MalformedMove(err) => write!(f, "malformed move: {}", err),
            Error::OutOfBounds { mv, size } => {
                write!(f, "move \"{}\" steps outside the size {} board", mv, size)
            }
            Error::Store(err) => write!(f, "database error: {}", err),
            Error::StoreUnavailable { path, source } => {
                write!(
                    f,
                    "couldn't open position store \"{}\": {}",
                    path.display(),
                    source
                )
            }
            Error::PositionNotFound(id) => write!(f, "position {} missing from store", id),
            Error::InvalidRecord(text) => write!(f, "unreadable stored record \"{}\"", text),
            Error::Json(err) => write!(f, "json error: {}", err),
            Error::Io(err) => write!(f, "io error: {}", err),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Error::MalformedMove(err) => Some(err),
            Error::Store(err) => Some(err),
            Error::StoreUnavailable { source, .. } => Some(source),
            Error::Json(err) => Some(err),
            Error::Io(err) => Some(err),
            Error::OutOfBounds { .. } | Error::PositionNotFound(_) | Error::InvalidRecord(_) => {
                None
            }
        }
    }
}

impl From<pgn_traits::Error> for Error {
    fn from(err: pgn_traits::Error) -> Error {
        Error::MalformedMove(err)
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Error {
        Error::Store(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Error {
        Error::Json(err)
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        Error::Io(err)
    }
}
