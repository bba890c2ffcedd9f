//! Match Catalog: creation with default inheritance.

use std::sync::Arc;

use crate::db::models::{Match, MatchDraft, MatchStatus, NewMatch};
use crate::db::Store;
use crate::roster::error::Result;

pub const FALLBACK_VENUE: &str = "Nova Sports Soccer Field";
pub const DEFAULT_MIN_PLAYERS: i32 = 10;
pub const DEFAULT_MAX_PLAYERS: i32 = 12;

/// Values used for fields a [`MatchDraft`] leaves unset.
#[derive(Debug, Clone)]
pub struct MatchDefaults {
    /// Venue for the very first match; later matches inherit the latest venue.
    pub fallback_venue: String,
    pub min_players: i32,
    pub max_players: i32,
}

impl Default for MatchDefaults {
    fn default() -> Self {
        Self {
            fallback_venue: FALLBACK_VENUE.into(),
            min_players: DEFAULT_MIN_PLAYERS,
            max_players: DEFAULT_MAX_PLAYERS,
        }
    }
}

#[derive(Clone)]
pub struct MatchCatalog {
    store: Arc<dyn Store>,
    defaults: MatchDefaults,
}

impl MatchCatalog {
    pub fn new(store: Arc<dyn Store>, defaults: MatchDefaults) -> Self {
        Self { store, defaults }
    }

    /// Fill defaults and persist. Nothing is written unless the whole insert
    /// commits. Date, sign and `min <= max` are deliberately not validated.
    pub async fn create_match(&self, draft: MatchDraft) -> Result<Match> {
        let mut tx = self.store.begin().await?;

        let venue_name = match draft.venue_name.filter(|v| !v.is_empty()) {
            Some(venue) => venue,
            None => tx
                .latest_venue()
                .await?
                .unwrap_or_else(|| self.defaults.fallback_venue.clone()),
        };

        let new = NewMatch {
            date: draft.date,
            location: draft.location,
            venue_name,
            map_link: draft.map_link.filter(|l| !l.is_empty()),
            min_players: non_zero_or(draft.min_players, self.defaults.min_players),
            max_players: non_zero_or(draft.max_players, self.defaults.max_players),
            status: MatchStatus::Active,
        };

        let created = tx.insert_match(new).await?;
        tx.commit().await?;

        log::info!(
            "created match {} at {} ({}..{} players)",
            created.id,
            created.venue_name,
            created.min_players,
            created.max_players
        );
        Ok(created)
    }

    pub async fn list_matches(&self) -> Result<Vec<Match>> {
        Ok(self.store.list_matches().await?)
    }
}

fn non_zero_or(value: Option<i32>, default: i32) -> i32 {
    match value {
        Some(v) if v != 0 => v,
        _ => default,
    }
}
