use thiserror::Error;

use crate::db::models::MatchId;
use crate::db::StoreError;

/// Failures of a single roster operation. None are retried by the caller
/// side of the core.
#[derive(Debug, Error)]
pub enum RosterError {
    #[error("match {0} not found")]
    MatchNotFound(MatchId),

    #[error("match {match_id} is full ({max_players} players)")]
    CapacityExceeded { match_id: MatchId, max_players: i32 },

    #[error("player {0:?} not found")]
    PlayerNotFound(String),

    #[error("player name must not be empty")]
    EmptyName,

    #[error("player {0:?} already exists")]
    DuplicatePlayer(String),

    #[error("persistence failure: {0}")]
    Persistence(#[from] StoreError),
}

pub type Result<T> = std::result::Result<T, RosterError>;
