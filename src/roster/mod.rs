//! Roster core: player identity, match creation and the membership state
//! machine. Transport layers (HTTP, chat-bot) only ever call [`RosterService`].

pub mod catalog;
pub mod directory;
pub mod error;
pub mod membership;

use std::sync::Arc;

use crate::db::models::{Match, MatchDraft, MatchId, Player};
use crate::db::Store;

pub use catalog::{MatchCatalog, MatchDefaults};
pub use directory::PlayerDirectory;
pub use error::{Result, RosterError};
pub use membership::MatchRoster;

/// The operations exposed to the façades, wired to one injected store.
#[derive(Clone)]
pub struct RosterService {
    store: Arc<dyn Store>,
    directory: PlayerDirectory,
    catalog: MatchCatalog,
    roster: MatchRoster,
}

impl RosterService {
    pub fn new(store: Arc<dyn Store>, defaults: MatchDefaults) -> Self {
        let directory = PlayerDirectory::new(store.clone());
        Self {
            catalog: MatchCatalog::new(store.clone(), defaults),
            roster: MatchRoster::new(store.clone(), directory.clone()),
            directory,
            store,
        }
    }

    pub async fn create_match(&self, draft: MatchDraft) -> Result<Match> {
        self.catalog.create_match(draft).await
    }

    pub async fn list_matches(&self) -> Result<Vec<Match>> {
        self.catalog.list_matches().await
    }

    pub async fn list_players(&self) -> Result<Vec<Player>> {
        self.directory.list().await
    }

    pub async fn create_player(&self, name: &str, telegram_id: Option<i64>) -> Result<Player> {
        self.directory.register(name, telegram_id).await
    }

    pub async fn join(&self, match_id: MatchId, name: &str) -> Result<()> {
        self.roster.join(match_id, name).await
    }

    pub async fn leave(&self, match_id: MatchId, name: &str) -> Result<()> {
        self.roster.leave(match_id, name).await
    }

    pub async fn cancel(&self, match_id: MatchId) -> Result<()> {
        self.roster.cancel(match_id).await
    }

    pub async fn restore(&self, match_id: MatchId) -> Result<()> {
        self.roster.restore(match_id).await
    }

    /// Store liveness, for the health probe.
    pub async fn ping(&self) -> Result<()> {
        Ok(self.store.ping().await?)
    }
}
