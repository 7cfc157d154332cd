//! Entry point for callback events.
//!
//! The event dispatcher hands every button press to [`MoveResolver`], which
//! loads (or creates) the game, applies the press and returns a
//! [`Resolution`] for the presentation layer to render.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use derive_getters::Getters;
use inline_tictactoe::{GameId, GameState, GameStatus, MoveAccepted, Player, Rejection};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::callback::{CallbackData, TokenError};
use crate::registry::GameRegistry;
use crate::store::StoreError;
use crate::view::GameStateView;

/// How a resolved event left the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Outcome {
    /// The press broke a rule; nothing was written.
    Rejected(Rejection),
    /// The game changed and is still being played.
    InProgress,
    /// The game changed and now has a winner or a full grid.
    Ended(GameStatus),
}

impl Outcome {
    fn after_change(state: &GameState) -> Self {
        match state.status() {
            GameStatus::InProgress => Outcome::InProgress,
            status => Outcome::Ended(status),
        }
    }

    /// Whether the game changed and needs re-rendering.
    pub fn changed(&self) -> bool {
        !matches!(self, Outcome::Rejected(_))
    }
}

/// Result of resolving one event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Getters)]
pub struct Resolution {
    /// Game the event ended up on.
    game_id: GameId,
    /// State after the event.
    view: GameStateView,
    /// What happened.
    outcome: Outcome,
    /// What an accepted press changed. `None` for new games and rejections.
    accepted: Option<MoveAccepted>,
    /// The referenced game was missing and a fresh one was started instead.
    recovered: bool,
}

impl Resolution {
    fn new(state: &GameState, outcome: Outcome, accepted: Option<MoveAccepted>) -> Self {
        Self {
            game_id: state.id(),
            view: GameStateView::from(state),
            outcome,
            accepted,
            recovered: false,
        }
    }
}

/// Failure to resolve an event.
#[derive(Debug, Clone, derive_more::Display, derive_more::From)]
pub enum ResolveError {
    /// The store failed.
    #[display("{}", _0)]
    Store(StoreError),

    /// The callback token could not be decoded.
    #[display("Malformed callback event: {}", _0)]
    MalformedEvent(TokenError),
}

impl std::error::Error for ResolveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ResolveError::Store(err) => Some(err),
            ResolveError::MalformedEvent(err) => Some(err),
        }
    }
}

/// Binds incoming events to games and applies them.
///
/// Events for the same game are applied one at a time; events for
/// different games run in parallel. A game's lock lives only while events
/// for it are in flight.
#[derive(Debug)]
pub struct MoveResolver {
    registry: GameRegistry,
    recovery_first_player_is_mark1: bool,
    locks: Mutex<HashMap<GameId, Arc<Mutex<()>>>>,
}

impl MoveResolver {
    /// Creates a resolver. Games started to replace a missing one use
    /// `recovery_first_player_is_mark1` for their mark assignment.
    #[instrument(skip(registry))]
    pub fn new(registry: GameRegistry, recovery_first_player_is_mark1: bool) -> Self {
        info!("Creating MoveResolver");
        Self {
            registry,
            recovery_first_player_is_mark1,
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the registry.
    pub fn registry(&self) -> &GameRegistry {
        &self.registry
    }

    /// Lock serializing events for one game.
    fn game_lock(&self, game_id: GameId) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(locks.entry(game_id).or_default())
    }

    /// Drops the map entry for `game_id` once no other event holds it.
    ///
    /// Clones are only taken under the map lock, so a count of two (map
    /// plus `lock`) cannot rise while the map is held.
    fn release_game_lock(&self, game_id: GameId, lock: Arc<Mutex<()>>) {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        if Arc::strong_count(&lock) == 2 {
            locks.remove(&game_id);
        }
    }

    /// Starts a game with `user` as player 1.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::Store`] if the game cannot be stored.
    #[instrument(skip(self, user), fields(user_id = %user.id()))]
    pub fn start_new_game(
        &self,
        user: &Player,
        first_player_is_mark1: bool,
    ) -> Result<Resolution, ResolveError> {
        let mut state = self.registry.create(first_player_is_mark1)?;
        state.bind_player1(user.clone());
        self.registry.save(&state)?;

        info!(game_id = %state.id(), "Game started");
        Ok(Resolution::new(&state, Outcome::InProgress, None))
    }

    /// Applies a press by `user` on `cell` of game `game_id`.
    ///
    /// An unknown game is not an error: a new game with `user` as player 1
    /// is started in its place and flagged as recovered.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::Store`] if the store fails.
    #[instrument(skip(self, user), fields(user_id = %user.id()))]
    pub fn resolve_move(
        &self,
        user: &Player,
        game_id: GameId,
        cell: Option<usize>,
    ) -> Result<Resolution, ResolveError> {
        let lock = self.game_lock(game_id);
        let resolution = {
            let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
            self.resolve_locked(user, game_id, cell)
        };
        self.release_game_lock(game_id, lock);
        resolution
    }

    /// Body of [`resolve_move`](Self::resolve_move); the caller holds the
    /// game's lock.
    fn resolve_locked(
        &self,
        user: &Player,
        game_id: GameId,
        cell: Option<usize>,
    ) -> Result<Resolution, ResolveError> {
        let Some(mut state) = self.registry.load(game_id)? else {
            warn!("Game not found, starting a new one");
            let mut resolution = self.start_new_game(user, self.recovery_first_player_is_mark1)?;
            resolution.recovered = true;
            return Ok(resolution);
        };

        match state.apply_move(user, cell) {
            Ok(accepted) => {
                self.registry.save(&state)?;
                let outcome = Outcome::after_change(&state);
                if let Outcome::Ended(status) = outcome {
                    info!(status = ?status, "Game ended");
                }
                Ok(Resolution::new(&state, outcome, Some(accepted)))
            }
            Err(rejection) => {
                debug!(reason = %rejection, "Press rejected");
                Ok(Resolution::new(&state, Outcome::Rejected(rejection), None))
            }
        }
    }

    /// Decodes a callback token and routes it.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::MalformedEvent`] for an undecodable token and
    /// [`ResolveError::Store`] if the store fails.
    #[instrument(skip(self, user), fields(user_id = %user.id()))]
    pub fn dispatch(&self, user: &Player, token: &str) -> Result<Resolution, ResolveError> {
        match token.parse::<CallbackData>()? {
            CallbackData::NewGame {
                first_player_is_mark1,
            } => self.start_new_game(user, first_player_is_mark1),
            CallbackData::Move { game_id, cell } => self.resolve_move(user, game_id, Some(cell)),
        }
    }
}
