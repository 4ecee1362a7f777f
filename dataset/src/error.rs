use crate::position::Side;
use thiserror::Error;

/// A record from the data source that cannot be used at all
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SourceAnomaly {
    #[error("pgn is missing or is not a string")]
    MissingPgn,
    #[error("no identity recorded for the {0:?} player")]
    MissingIdentity(Side),
    #[error("user {username:?} played neither {white:?} nor {black:?}")]
    UnknownUser {
        username: String,
        white: String,
        black: String,
    },
    #[error("unsupported rules {0:?}")]
    UnsupportedRules(String),
}

/// Failure reported by a move oracle
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum OracleError {
    #[error("not a SAN move")]
    Unparseable,
    #[error("illegal move: {0}")]
    Illegal(String),
    #[error("invalid FEN: {0}")]
    InvalidFen(String),
}

/// A game whose moves cannot be replayed
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ReplayError {
    #[error("pgn could not be read: {0}")]
    Unreadable(String),
    #[error("no game found in pgn")]
    NoGame,
    #[error("bad starting position")]
    Start(#[source] OracleError),
    #[error("ply {ply}: cannot play {token:?}")]
    Move {
        ply: usize,
        token: String,
        #[source]
        source: OracleError,
    },
}

/// Why a single game produced no examples
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GameError {
    #[error(transparent)]
    Source(#[from] SourceAnomaly),
    #[error(transparent)]
    Replay(#[from] ReplayError),
    #[error("game has {plies} plies, fewer than {min_ply}")]
    TooShort { plies: usize, min_ply: usize },
}
