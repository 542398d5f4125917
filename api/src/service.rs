use std::sync::Arc;

use log::{debug, info};
use roster_core::filter::{PlayerFilter, PlayerQuery};
use roster_core::types::{CreatePlayerRequest, Player, PlayerResponse, UpdatePlayerRequest};
use roster_core::validation::{validate_create, validate_id, validate_update};

use crate::error::ApiError;
use crate::store::PlayerStore;

/// Player use cases on top of a [`PlayerStore`].
///
/// Nothing is written to the store unless validation has passed, so a rejected
/// request leaves the stored data untouched.
pub struct PlayerService {
    store: Arc<dyn PlayerStore>,
}

impl PlayerService {
    pub fn new(store: Arc<dyn PlayerStore>) -> Self {
        Self { store }
    }

    /// Number of players matching `filter`; pagination fields are ignored.
    pub async fn count(&self, filter: &PlayerFilter) -> Result<usize, ApiError> {
        let query = PlayerQuery::from_filter(filter);
        let players = self.store.all().await?;
        Ok(query.count(&players))
    }

    /// One page of players matching `filter`, sorted by `filter.order`.
    pub async fn list(&self, filter: &PlayerFilter) -> Result<Vec<PlayerResponse>, ApiError> {
        let query = PlayerQuery::from_filter(filter);
        let page = filter.page();
        debug!(
            "Listing players: {} constraints, order={}, page={}, size={}",
            query.len(),
            query.order().as_str(),
            page.number,
            page.size
        );

        let players = self.store.all().await?;
        Ok(query
            .page(players, page)
            .iter()
            .map(PlayerResponse::from)
            .collect())
    }

    pub async fn get_by_id(&self, id: i64) -> Result<PlayerResponse, ApiError> {
        self.load(id).await.map(|player| PlayerResponse::from(&player))
    }

    pub async fn create(
        &self,
        request: &CreatePlayerRequest,
    ) -> Result<PlayerResponse, ApiError> {
        let new_player = validate_create(request)?;
        let player = self.store.insert(new_player).await?;
        info!(
            "Player created: id={}, name={}, race={}, profession={}, level={}",
            player.id,
            player.name,
            player.race.as_str(),
            player.profession.as_str(),
            player.level()
        );
        Ok(PlayerResponse::from(&player))
    }

    /// Applies the supplied fields of `request` to player `id`.
    ///
    /// # Returns
    /// * `Ok(PlayerResponse)` with the stored state after the update.
    /// * `Err(ApiError::BadRequest)` for a non-positive id or an invalid field.
    /// * `Err(ApiError::NotFound)` when no player has that id.
    pub async fn update(
        &self,
        id: i64,
        request: &UpdatePlayerRequest,
    ) -> Result<PlayerResponse, ApiError> {
        let mut player = self.load(id).await?;
        validate_update(request)?;

        if request.apply_to(&mut player) {
            self.store.save(&player).await?;
            info!("Player {} updated", id);
        } else {
            debug!("Player {} update carried no changes", id);
        }

        Ok(PlayerResponse::from(&player))
    }

    pub async fn delete_by_id(&self, id: i64) -> Result<(), ApiError> {
        validate_id(id)?;
        if !self.store.exists(id).await? {
            return Err(ApiError::NotFound(id));
        }

        self.store.delete(id).await?;
        info!("Player {} deleted", id);
        Ok(())
    }

    async fn load(&self, id: i64) -> Result<Player, ApiError> {
        validate_id(id)?;
        self.store.find(id).await?.ok_or(ApiError::NotFound(id))
    }
}
