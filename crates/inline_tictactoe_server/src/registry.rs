//! Game registry: identifier allocation and game persistence.

use std::sync::Arc;

use inline_tictactoe::{GameId, GameState};
use tracing::{debug, info, instrument};

use crate::record::GameRecord;
use crate::store::{KeyValueStore, StoreError};

/// Key holding the next identifier to hand out.
pub const COUNTER_KEY: &str = "games_increment";

/// Key a game is stored under.
pub fn game_key(id: GameId) -> String {
    format!("game{}", id)
}

/// Allocates game identifiers and maps them to stored games.
///
/// The store is injected, so tests and the binary can choose the backend.
/// Writes are full overwrites without a version check; callers that may see
/// concurrent events for one game must serialize them (see
/// [`MoveResolver`](crate::MoveResolver)).
#[derive(Debug, Clone)]
pub struct GameRegistry {
    store: Arc<dyn KeyValueStore>,
}

impl GameRegistry {
    /// Creates a registry over `store`.
    #[instrument(skip(store))]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        info!("Creating GameRegistry");
        Self { store }
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    /// Atomically takes the next identifier. The first call returns 1.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the counter cannot be read or written.
    #[instrument(skip(self))]
    pub fn next_id(&self) -> Result<GameId, StoreError> {
        let id = GameId(self.store.increment(COUNTER_KEY)?);
        debug!(game_id = %id, "Identifier allocated");
        Ok(id)
    }

    /// Creates and stores a new game with no players.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if allocation or the first write fails.
    #[instrument(skip(self))]
    pub fn create(&self, first_player_is_mark1: bool) -> Result<GameState, StoreError> {
        let id = self.next_id()?;
        let state = GameState::new(id, first_player_is_mark1);
        self.save(&state)?;
        info!(game_id = %id, "Game created");
        Ok(state)
    }

    /// Loads the game stored under `id`, or `None` if there is none.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store fails or the record is not a game.
    #[instrument(skip(self))]
    pub fn load(&self, id: GameId) -> Result<Option<GameState>, StoreError> {
        let Some(raw) = self.store.get(&game_key(id))? else {
            debug!(game_id = %id, "Game not found");
            return Ok(None);
        };

        let record: GameRecord = serde_json::from_str(&raw)?;
        Ok(Some(record.into_state(id)))
    }

    /// Writes `state` under its identifier, replacing what was there.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if encoding or the write fails.
    #[instrument(skip(self, state), fields(game_id = %state.id()))]
    pub fn save(&self, state: &GameState) -> Result<(), StoreError> {
        let raw = serde_json::to_string(&GameRecord::from(state))?;
        self.store.set(&game_key(state.id()), &raw)?;
        debug!("Game saved");
        Ok(())
    }
}
