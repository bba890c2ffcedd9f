//! Match Roster: the join / leave / cancel / restore state machine.
//!
//! | State     | join (room) | join (full)      | leave  | cancel      | restore  |
//! |-----------|-------------|------------------|--------|-------------|----------|
//! | Active    | add member  | CapacityExceeded | remove | → Cancelled | no-op    |
//! | Cancelled | add member  | CapacityExceeded | remove | no-op       | → Active |
//!
//! Joining a cancelled match is allowed. Each operation is one store
//! transaction with the match row locked, so the capacity check and the
//! roster append cannot interleave with another join.

use std::sync::Arc;

use crate::db::models::{MatchId, MatchStatus};
use crate::db::{Store, StoreError};
use crate::roster::directory::PlayerDirectory;
use crate::roster::error::{Result, RosterError};

#[derive(Clone)]
pub struct MatchRoster {
    store: Arc<dyn Store>,
    directory: PlayerDirectory,
}

impl MatchRoster {
    pub fn new(store: Arc<dyn Store>, directory: PlayerDirectory) -> Self {
        Self { store, directory }
    }

    /// Add `name` to the match roster, creating the player on first sight.
    ///
    /// Re-joining is a no-op. A name conflict (the same new name created by a
    /// concurrent request) rolls back and is retried once.
    pub async fn join(&self, match_id: MatchId, name: &str) -> Result<()> {
        match self.try_join(match_id, name).await {
            Err(RosterError::Persistence(StoreError::Conflict(_))) => {
                log::debug!("join {match_id}/{name:?}: player created concurrently, retrying");
                self.try_join(match_id, name).await
            }
            other => other,
        }
    }

    async fn try_join(&self, match_id: MatchId, name: &str) -> Result<()> {
        let mut tx = self.store.begin().await?;

        let found = tx
            .lock_match(match_id)
            .await?
            .ok_or(RosterError::MatchNotFound(match_id))?;

        // Capacity first: a rejected joiner never gets a Player row.
        if found.is_full() {
            log::info!(
                "join {match_id}/{name:?} rejected: {}/{} players",
                found.roster_size(),
                found.max_players
            );
            return Err(RosterError::CapacityExceeded {
                match_id,
                max_players: found.max_players,
            });
        }

        let player = self.directory.resolve_or_create_in(tx.as_mut(), name).await?;
        tx.add_member(match_id, player.id).await?;
        tx.commit().await?;

        log::info!("player {} ({name:?}) joined match {match_id}", player.id);
        Ok(())
    }

    /// Remove `name` from the roster. The name must belong to some player;
    /// it need not be a member of this match.
    pub async fn leave(&self, match_id: MatchId, name: &str) -> Result<()> {
        let mut tx = self.store.begin().await?;

        tx.lock_match(match_id)
            .await?
            .ok_or(RosterError::MatchNotFound(match_id))?;

        let player = self
            .directory
            .find_in(tx.as_mut(), name)
            .await?
            .ok_or_else(|| RosterError::PlayerNotFound(name.to_owned()))?;

        tx.remove_member(match_id, player.id).await?;
        tx.commit().await?;

        log::info!("player {} ({name:?}) left match {match_id}", player.id);
        Ok(())
    }

    pub async fn cancel(&self, match_id: MatchId) -> Result<()> {
        self.set_status(match_id, MatchStatus::Cancelled).await
    }

    pub async fn restore(&self, match_id: MatchId) -> Result<()> {
        self.set_status(match_id, MatchStatus::Active).await
    }

    /// Soft delete / undelete. The roster is never touched.
    async fn set_status(&self, match_id: MatchId, status: MatchStatus) -> Result<()> {
        let mut tx = self.store.begin().await?;

        let current = tx
            .lock_match(match_id)
            .await?
            .ok_or(RosterError::MatchNotFound(match_id))?;

        tx.set_match_status(match_id, status).await?;
        tx.commit().await?;

        log::info!("match {match_id}: {:?} -> {status:?}", current.status);
        Ok(())
    }
}
