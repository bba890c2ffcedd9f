//! In-memory [`Store`] for tests and local runs without Postgres.
//!
//! A transaction holds the state mutex for its whole lifetime and mutates a
//! private copy; `commit` swaps the copy in. Dropping the transaction simply
//! discards the copy.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::db::models::{Match, MatchId, MatchRow, MatchStatus, NewMatch, Player, PlayerId};
use crate::db::store::{Store, StoreError, StoreResult, StoreTx};

#[derive(Debug, Clone, Default)]
struct State {
    matches: BTreeMap<MatchId, MatchRow>,
    players: BTreeMap<PlayerId, Player>,
    /// match id → member ids in insertion order
    members: BTreeMap<MatchId, Vec<PlayerId>>,
    next_match_id: MatchId,
    next_player_id: PlayerId,
}

impl State {
    fn hydrate(&self, row: &MatchRow) -> Match {
        let players: Vec<Player> = self
            .members
            .get(&row.id)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| self.players.get(id).cloned())
                    .collect()
            })
            .unwrap_or_default();
        Match::from_row(row.clone(), players)
    }
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<State>>,
    fail_next_commit: Arc<AtomicBool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `commit` fail as if the database had gone away.
    pub fn fail_next_commit(&self) {
        self.fail_next_commit.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn begin(&self) -> StoreResult<Box<dyn StoreTx>> {
        let guard = self.state.clone().lock_owned().await;
        let work = guard.clone();
        Ok(Box::new(MemoryTx {
            guard,
            work,
            fail_commit: self.fail_next_commit.clone(),
        }))
    }

    async fn list_matches(&self) -> StoreResult<Vec<Match>> {
        let state = self.state.lock().await;
        Ok(state.matches.values().map(|row| state.hydrate(row)).collect())
    }

    async fn list_players(&self) -> StoreResult<Vec<Player>> {
        let state = self.state.lock().await;
        Ok(state.players.values().cloned().collect())
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}

pub struct MemoryTx {
    guard: OwnedMutexGuard<State>,
    work: State,
    fail_commit: Arc<AtomicBool>,
}

#[async_trait]
impl StoreTx for MemoryTx {
    async fn lock_match(&mut self, id: MatchId) -> StoreResult<Option<Match>> {
        Ok(self.work.matches.get(&id).map(|row| self.work.hydrate(row)))
    }

    async fn latest_venue(&mut self) -> StoreResult<Option<String>> {
        // ids are handed out in creation order
        Ok(self
            .work
            .matches
            .values()
            .next_back()
            .map(|row| row.venue_name.clone()))
    }

    async fn insert_match(&mut self, new: NewMatch) -> StoreResult<Match> {
        self.work.next_match_id += 1;
        let row = MatchRow {
            id: self.work.next_match_id,
            date: new.date,
            location: new.location,
            venue_name: new.venue_name,
            map_link: new.map_link,
            min_players: new.min_players,
            max_players: new.max_players,
            active: new.status.is_active(),
            created_at: Utc::now(),
        };
        self.work.matches.insert(row.id, row.clone());
        Ok(Match::from_row(row, Vec::new()))
    }

    async fn set_match_status(&mut self, id: MatchId, status: MatchStatus) -> StoreResult<()> {
        if let Some(row) = self.work.matches.get_mut(&id) {
            row.active = status.is_active();
        }
        Ok(())
    }

    async fn find_player(&mut self, name: &str) -> StoreResult<Option<Player>> {
        Ok(self
            .work
            .players
            .values()
            .find(|p| p.name == name)
            .cloned())
    }

    async fn insert_player(
        &mut self,
        name: &str,
        telegram_id: Option<i64>,
    ) -> StoreResult<Player> {
        if self.work.players.values().any(|p| p.name == name) {
            return Err(StoreError::Conflict(format!("player name {name:?}")));
        }
        self.work.next_player_id += 1;
        let player = Player {
            id: self.work.next_player_id,
            telegram_id,
            name: name.to_owned(),
        };
        self.work.players.insert(player.id, player.clone());
        Ok(player)
    }

    async fn add_member(&mut self, match_id: MatchId, player_id: PlayerId) -> StoreResult<()> {
        let members = self.work.members.entry(match_id).or_default();
        if !members.contains(&player_id) {
            members.push(player_id);
        }
        Ok(())
    }

    async fn remove_member(&mut self, match_id: MatchId, player_id: PlayerId) -> StoreResult<()> {
        if let Some(members) = self.work.members.get_mut(&match_id) {
            members.retain(|id| *id != player_id);
        }
        Ok(())
    }

    async fn commit(self: Box<Self>) -> StoreResult<()> {
        let MemoryTx {
            mut guard,
            work,
            fail_commit,
        } = *self;
        if fail_commit.swap(false, Ordering::SeqCst) {
            return Err(StoreError::Unavailable("commit failed".into()));
        }
        *guard = work;
        Ok(())
    }
}
