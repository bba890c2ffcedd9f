//! Postgres-backed [`Store`].
//
//  Tables (see migrations/)
//  ------------------------
//  players        – id, telegram_id, name UNIQUE
//  matches        – id, date, location, venue_name, map_link,
//                   min_players, max_players, active, created_at
//  match_players  – (match_id, player_id) PRIMARY KEY

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};

use crate::db::models::{Match, MatchId, MatchRow, MatchStatus, NewMatch, Player, PlayerId};
use crate::db::store::{Store, StoreError, StoreResult, StoreTx};

const MATCH_COLUMNS: &str =
    "id, date, location, venue_name, map_link, min_players, max_players, active, created_at";

/// Postgres unique_violation.
const UNIQUE_VIOLATION: &str = "23505";

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn begin(&self) -> StoreResult<Box<dyn StoreTx>> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgTx { tx }))
    }

    async fn list_matches(&self) -> StoreResult<Vec<Match>> {
        let rows = sqlx::query_as::<_, MatchRow>(&format!(
            "SELECT {MATCH_COLUMNS} FROM matches ORDER BY date, id"
        ))
        .fetch_all(&self.pool)
        .await?;

        // One query for every roster, grouped in memory.
        let members = sqlx::query_as::<_, (MatchId, PlayerId, Option<i64>, String)>(
            r#"SELECT mp.match_id, p.id, p.telegram_id, p.name
                 FROM match_players mp
                 JOIN players p ON p.id = mp.player_id
                ORDER BY mp.joined_at, p.id"#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut rosters: HashMap<MatchId, Vec<Player>> = HashMap::new();
        for (match_id, id, telegram_id, name) in members {
            rosters.entry(match_id).or_default().push(Player {
                id,
                telegram_id,
                name,
            });
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let players = rosters.remove(&row.id).unwrap_or_default();
                Match::from_row(row, players)
            })
            .collect())
    }

    async fn list_players(&self) -> StoreResult<Vec<Player>> {
        let players =
            sqlx::query_as::<_, Player>("SELECT id, telegram_id, name FROM players ORDER BY id")
                .fetch_all(&self.pool)
                .await?;
        Ok(players)
    }

    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

pub struct PgTx {
    tx: Transaction<'static, Postgres>,
}

impl PgTx {
    async fn roster(&mut self, match_id: MatchId) -> StoreResult<Vec<Player>> {
        let players = sqlx::query_as::<_, Player>(
            r#"SELECT p.id, p.telegram_id, p.name
                 FROM match_players mp
                 JOIN players p ON p.id = mp.player_id
                WHERE mp.match_id = $1
                ORDER BY mp.joined_at, p.id"#,
        )
        .bind(match_id)
        .fetch_all(&mut *self.tx)
        .await?;
        Ok(players)
    }
}

#[async_trait]
impl StoreTx for PgTx {
    async fn lock_match(&mut self, id: MatchId) -> StoreResult<Option<Match>> {
        // Row lock held until commit/rollback: concurrent joins queue here.
        let row = sqlx::query_as::<_, MatchRow>(&format!(
            "SELECT {MATCH_COLUMNS} FROM matches WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await?;

        match row {
            Some(row) => {
                let players = self.roster(row.id).await?;
                Ok(Some(Match::from_row(row, players)))
            }
            None => Ok(None),
        }
    }

    async fn latest_venue(&mut self) -> StoreResult<Option<String>> {
        let venue = sqlx::query_scalar::<_, String>(
            "SELECT venue_name FROM matches ORDER BY created_at DESC, id DESC LIMIT 1",
        )
        .fetch_optional(&mut *self.tx)
        .await?;
        Ok(venue)
    }

    async fn insert_match(&mut self, new: NewMatch) -> StoreResult<Match> {
        let row = sqlx::query_as::<_, MatchRow>(&format!(
            r#"INSERT INTO matches
                   (date, location, venue_name, map_link, min_players, max_players, active)
               VALUES ($1, $2, $3, $4, $5, $6, $7)
               RETURNING {MATCH_COLUMNS}"#
        ))
        .bind(new.date)
        .bind(&new.location)
        .bind(&new.venue_name)
        .bind(&new.map_link)
        .bind(new.min_players)
        .bind(new.max_players)
        .bind(new.status.is_active())
        .fetch_one(&mut *self.tx)
        .await?;
        Ok(Match::from_row(row, Vec::new()))
    }

    async fn set_match_status(&mut self, id: MatchId, status: MatchStatus) -> StoreResult<()> {
        sqlx::query("UPDATE matches SET active = $2 WHERE id = $1")
            .bind(id)
            .bind(status.is_active())
            .execute(&mut *self.tx)
            .await?;
        Ok(())
    }

    async fn find_player(&mut self, name: &str) -> StoreResult<Option<Player>> {
        let player =
            sqlx::query_as::<_, Player>("SELECT id, telegram_id, name FROM players WHERE name = $1")
                .bind(name)
                .fetch_optional(&mut *self.tx)
                .await?;
        Ok(player)
    }

    async fn insert_player(
        &mut self,
        name: &str,
        telegram_id: Option<i64>,
    ) -> StoreResult<Player> {
        let inserted = sqlx::query_as::<_, Player>(
            r#"INSERT INTO players (name, telegram_id)
               VALUES ($1, $2)
               RETURNING id, telegram_id, name"#,
        )
        .bind(name)
        .bind(telegram_id)
        .fetch_one(&mut *self.tx)
        .await;

        match inserted {
            Ok(player) => Ok(player),
            Err(sqlx::Error::Database(db_err))
                if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) =>
            {
                Err(StoreError::Conflict(format!("player name {name:?}")))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn add_member(&mut self, match_id: MatchId, player_id: PlayerId) -> StoreResult<()> {
        sqlx::query(
            r#"INSERT INTO match_players (match_id, player_id)
               VALUES ($1, $2)
               ON CONFLICT DO NOTHING"#,
        )
        .bind(match_id)
        .bind(player_id)
        .execute(&mut *self.tx)
        .await?;
        Ok(())
    }

    async fn remove_member(&mut self, match_id: MatchId, player_id: PlayerId) -> StoreResult<()> {
        sqlx::query("DELETE FROM match_players WHERE match_id = $1 AND player_id = $2")
            .bind(match_id)
            .bind(player_id)
            .execute(&mut *self.tx)
            .await?;
        Ok(())
    }

    async fn commit(self: Box<Self>) -> StoreResult<()> {
        self.tx.commit().await?;
        Ok(())
    }
}
