//! Storage contract consumed by the roster core.
//!
//! Every mutating operation runs inside a [`StoreTx`]. A transaction that is
//! dropped without [`StoreTx::commit`] leaves no trace, which is what keeps
//! "create the player, then append it to the roster" all-or-nothing.

use async_trait::async_trait;
use thiserror::Error;

use crate::db::models::{Match, MatchId, MatchStatus, NewMatch, Player, PlayerId};

/// Errors surfaced by store implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write (player name).
    #[error("unique constraint violated: {0}")]
    Conflict(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Entry point to the persistent store.
#[async_trait]
pub trait Store: Send + Sync {
    /// Open a read-modify-write unit of work.
    async fn begin(&self) -> StoreResult<Box<dyn StoreTx>>;

    /// All matches, cancelled included, with rosters loaded.
    async fn list_matches(&self) -> StoreResult<Vec<Match>>;

    /// All players, no roster information.
    async fn list_players(&self) -> StoreResult<Vec<Player>>;

    /// Liveness probe used by the health endpoint.
    async fn ping(&self) -> StoreResult<()>;
}

/// One open transaction.
#[async_trait]
pub trait StoreTx: Send {
    /// Load a match with its roster and hold it exclusively until the
    /// transaction ends, so concurrent joins cannot both pass the capacity
    /// check.
    async fn lock_match(&mut self, id: MatchId) -> StoreResult<Option<Match>>;

    /// Venue of the most recently created match, if any.
    async fn latest_venue(&mut self) -> StoreResult<Option<String>>;

    async fn insert_match(&mut self, new: NewMatch) -> StoreResult<Match>;

    async fn set_match_status(&mut self, id: MatchId, status: MatchStatus) -> StoreResult<()>;

    /// Exact, case-sensitive name lookup.
    async fn find_player(&mut self, name: &str) -> StoreResult<Option<Player>>;

    /// Fails with [`StoreError::Conflict`] if the name is already taken.
    async fn insert_player(&mut self, name: &str, telegram_id: Option<i64>)
        -> StoreResult<Player>;

    /// Idempotent: adding an existing member is a no-op.
    async fn add_member(&mut self, match_id: MatchId, player_id: PlayerId) -> StoreResult<()>;

    /// Idempotent: removing a non-member is a no-op.
    async fn remove_member(&mut self, match_id: MatchId, player_id: PlayerId) -> StoreResult<()>;

    async fn commit(self: Box<Self>) -> StoreResult<()>;
}
