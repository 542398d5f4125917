//! Persistence boundary for players.

use std::collections::BTreeMap;

use async_trait::async_trait;
use roster_core::types::{NewPlayer, Player};
use tokio::sync::RwLock;

use crate::error::StoreError;

/// Storage for player records.
///
/// Implementations assign ids on insert and return players in ascending id
/// order from [`PlayerStore::all`].
#[async_trait]
pub trait PlayerStore: Send + Sync {
    /// Stores a new player under a freshly assigned id.
    async fn insert(&self, new_player: NewPlayer) -> Result<Player, StoreError>;

    async fn find(&self, id: i64) -> Result<Option<Player>, StoreError>;

    async fn exists(&self, id: i64) -> Result<bool, StoreError>;

    /// Overwrites the stored record with the same id.
    async fn save(&self, player: &Player) -> Result<(), StoreError>;

    async fn delete(&self, id: i64) -> Result<(), StoreError>;

    async fn all(&self) -> Result<Vec<Player>, StoreError>;
}

#[derive(Default)]
struct MemoryState {
    last_id: i64,
    players: BTreeMap<i64, Player>,
}

/// Process-local store, used for `API_STORE=memory` and in tests.
#[derive(Default)]
pub struct MemoryPlayerStore {
    state: RwLock<MemoryState>,
}

impl MemoryPlayerStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PlayerStore for MemoryPlayerStore {
    async fn insert(&self, new_player: NewPlayer) -> Result<Player, StoreError> {
        let mut state = self.state.write().await;
        state.last_id += 1;
        let player = Player::from_new(state.last_id, new_player);
        state.players.insert(player.id, player.clone());
        Ok(player)
    }

    async fn find(&self, id: i64) -> Result<Option<Player>, StoreError> {
        Ok(self.state.read().await.players.get(&id).cloned())
    }

    async fn exists(&self, id: i64) -> Result<bool, StoreError> {
        Ok(self.state.read().await.players.contains_key(&id))
    }

    async fn save(&self, player: &Player) -> Result<(), StoreError> {
        self.state
            .write()
            .await
            .players
            .insert(player.id, player.clone());
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        self.state.write().await.players.remove(&id);
        Ok(())
    }

    async fn all(&self) -> Result<Vec<Player>, StoreError> {
        Ok(self.state.read().await.players.values().cloned().collect())
    }
}
