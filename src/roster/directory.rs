//! Player Directory: name is identity.

use std::sync::Arc;

use crate::db::models::Player;
use crate::db::{Store, StoreError, StoreTx};
use crate::roster::error::{Result, RosterError};

#[derive(Clone)]
pub struct PlayerDirectory {
    store: Arc<dyn Store>,
}

impl PlayerDirectory {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Look up `name` exactly, creating the player inside `tx` if absent.
    ///
    /// A [`StoreError::Conflict`] here means another request created the same
    /// name after our lookup; the caller owns the transaction and decides
    /// whether to retry.
    pub async fn resolve_or_create_in(&self, tx: &mut dyn StoreTx, name: &str) -> Result<Player> {
        let name = normalize(name)?;
        if let Some(player) = tx.find_player(name).await? {
            return Ok(player);
        }
        let player = tx.insert_player(name, None).await?;
        log::debug!("created player {} ({name:?})", player.id);
        Ok(player)
    }

    /// Stand-alone resolve-or-create in its own transaction, retried once on
    /// a name conflict.
    pub async fn resolve_or_create(&self, name: &str) -> Result<Player> {
        match self.try_resolve_or_create(name).await {
            Err(RosterError::Persistence(StoreError::Conflict(_))) => {
                log::debug!("player {name:?} created concurrently, retrying lookup");
                self.try_resolve_or_create(name).await
            }
            other => other,
        }
    }

    async fn try_resolve_or_create(&self, name: &str) -> Result<Player> {
        let mut tx = self.store.begin().await?;
        let player = self.resolve_or_create_in(tx.as_mut(), name).await?;
        tx.commit().await?;
        Ok(player)
    }

    /// Exact-name lookup without creation.
    pub async fn find_in(&self, tx: &mut dyn StoreTx, name: &str) -> Result<Option<Player>> {
        Ok(tx.find_player(name).await?)
    }

    /// Explicit registration. Unlike [`Self::resolve_or_create`], an existing
    /// name is an error.
    pub async fn register(&self, name: &str, telegram_id: Option<i64>) -> Result<Player> {
        let name = normalize(name)?;
        let mut tx = self.store.begin().await?;
        let player = match tx.insert_player(name, telegram_id).await {
            Ok(p) => p,
            Err(StoreError::Conflict(_)) => return Err(RosterError::DuplicatePlayer(name.into())),
            Err(e) => return Err(e.into()),
        };
        tx.commit().await?;
        log::info!("registered player {} ({name:?})", player.id);
        Ok(player)
    }

    pub async fn list(&self) -> Result<Vec<Player>> {
        Ok(self.store.list_players().await?)
    }
}

/// Names are matched byte-for-byte; only emptiness is rejected.
fn normalize(name: &str) -> Result<&str> {
    if name.trim().is_empty() {
        Err(RosterError::EmptyName)
    } else {
        Ok(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;

    fn directory() -> PlayerDirectory {
        PlayerDirectory::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn resolve_is_idempotent_per_name() {
        let dir = directory();
        let a = dir.resolve_or_create("Ana").await.unwrap();
        let b = dir.resolve_or_create("Ana").await.unwrap();
        assert_eq!(a, b);
        assert_eq!(a.telegram_id, None);
        assert_eq!(dir.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn names_are_case_sensitive() {
        let dir = directory();
        let lower = dir.resolve_or_create("ana").await.unwrap();
        let upper = dir.resolve_or_create("Ana").await.unwrap();
        assert_ne!(lower.id, upper.id);
    }

    #[tokio::test]
    async fn blank_names_are_rejected() {
        let dir = directory();
        assert!(matches!(
            dir.resolve_or_create("  ").await,
            Err(RosterError::EmptyName)
        ));
        assert!(matches!(dir.register("", None).await, Err(RosterError::EmptyName)));
    }

    #[tokio::test]
    async fn register_rejects_taken_name() {
        let dir = directory();
        let p = dir.register("Bo", Some(42)).await.unwrap();
        assert_eq!(p.telegram_id, Some(42));
        assert!(matches!(
            dir.register("Bo", None).await,
            Err(RosterError::DuplicatePlayer(n)) if n == "Bo"
        ));
    }
}
