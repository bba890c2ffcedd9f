use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub type MatchId = i64;
pub type PlayerId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: PlayerId,
    pub telegram_id: Option<i64>,
    pub name: String,
}

/// Soft-delete lifecycle of a match. The roster survives either state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    #[default]
    Active,
    Cancelled,
}

impl MatchStatus {
    pub fn is_active(self) -> bool {
        self == MatchStatus::Active
    }

    /// Maps the `matches.active` column.
    pub fn from_active(active: bool) -> Self {
        if active {
            MatchStatus::Active
        } else {
            MatchStatus::Cancelled
        }
    }
}

/// One row of the `matches` table, without its roster.
#[derive(Debug, Clone, FromRow)]
pub struct MatchRow {
    pub id: MatchId,
    pub date: DateTime<Utc>,
    pub location: String,
    pub venue_name: String,
    pub map_link: Option<String>,
    pub min_players: i32,
    pub max_players: i32,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

/// A match together with its eager-loaded roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub id: MatchId,
    pub date: DateTime<Utc>,
    pub location: String,
    pub venue_name: String,
    pub map_link: Option<String>,
    pub min_players: i32,
    pub max_players: i32,
    pub status: MatchStatus,
    pub created_at: DateTime<Utc>,
    /// Membership set; a player appears at most once.
    pub players: Vec<Player>,
}

impl Match {
    pub fn from_row(row: MatchRow, players: Vec<Player>) -> Self {
        Match {
            id: row.id,
            date: row.date,
            location: row.location,
            venue_name: row.venue_name,
            map_link: row.map_link,
            min_players: row.min_players,
            max_players: row.max_players,
            status: MatchStatus::from_active(row.active),
            created_at: row.created_at,
            players,
        }
    }

    pub fn roster_size(&self) -> usize {
        self.players.len()
    }

    /// `true` once the roster has reached `max_players`.
    pub fn is_full(&self) -> bool {
        self.players.len() as i64 >= i64::from(self.max_players)
    }
}

/// Caller-supplied fields for a new match; unset values get catalog defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchDraft {
    pub date: DateTime<Utc>,
    pub location: String,
    #[serde(default)]
    pub venue_name: Option<String>,
    #[serde(default)]
    pub map_link: Option<String>,
    #[serde(default)]
    pub min_players: Option<i32>,
    #[serde(default)]
    pub max_players: Option<i32>,
}

/// Fully defaulted match, ready to insert.
#[derive(Debug, Clone)]
pub struct NewMatch {
    pub date: DateTime<Utc>,
    pub location: String,
    pub venue_name: String,
    pub map_link: Option<String>,
    pub min_players: i32,
    pub max_players: i32,
    pub status: MatchStatus,
}
